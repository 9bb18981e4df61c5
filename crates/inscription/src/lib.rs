//! Inscription extraction from transactions.
//!
//! Every input's witness is checked for the envelope marker, its items are
//! concatenated, and each envelope found in the result is decoded into an
//! [`Inscription`]. Envelopes that fail to decode are reported as
//! [`Diagnostic`]s without stopping the rest of the transaction.
//!
//! Transactions are read through [`TransactionSource`], which is implemented
//! both for [`bitcoin::Transaction`] and for the hex-string JSON shape
//! served by indexers ([`RawTransaction`]).

mod aggregator;
/// Byte-to-text encoders.
pub mod encoding;
mod error;
mod inscription;
mod record;
mod tx;

pub use aggregator::{
    ParseOutcome, find_runestone_in, inscriptions, parse_inscriptions, parse_witness,
};
pub use encoding::{Base64Encoder, ByteEncoder, HexEncoder};
pub use error::{Diagnostic, InputError, SkipReason};
pub use inscription::{Inscription, Location};
pub use ordpool_envelope_fmt::ParseConfig;
pub use ordpool_protocols::Protocol;
pub use record::InscriptionRecord;
pub use tx::{RawInput, RawOutput, RawTransaction, TransactionSource};
