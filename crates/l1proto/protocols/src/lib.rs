//! Sub-protocol recognition on top of decoded inscriptions and output scripts.
//!
//! Covers SRC-20 and CAT-21 tagging of inscriptions and transactions, and the
//! varint payload carried by rune `OP_RETURN` outputs.

/// Inscription and transaction classifiers.
pub mod classify;
mod error;
/// Rune payload decoding.
pub mod runestone;
/// LEB128 varints.
pub mod varint;

pub use classify::{CAT21_LOCK_TIME, Protocol, classify, classify_transaction, is_cat21_mint};
pub use error::{RuneError, RuneResult, VarintError};
pub use runestone::{decode_runestone, find_runestone, runestone_payload};
