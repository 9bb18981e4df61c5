use bitcoin::hex::DisplayHex;
use ordpool_protocols::Protocol;
use serde::Serialize;

use crate::encoding::ByteEncoder;
use crate::inscription::{Inscription, Location};

/// Serializable view of an [`Inscription`] for text-based consumers.
///
/// Text fields are decoded lossily. Parents and metadata are hex. The body is
/// encoded from its raw bytes with the encoder named in `body_encoding`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct InscriptionRecord {
    /// Where the inscription was found.
    #[serde(flatten)]
    pub location: Location,

    /// Content type.
    pub content_type: Option<String>,

    /// Content encoding.
    pub content_encoding: Option<String>,

    /// Pointer.
    pub pointer: Option<u64>,

    /// Parents, hex.
    pub parents: Vec<String>,

    /// Metadata, hex.
    pub metadata: Option<String>,

    /// Metaprotocol.
    pub metaprotocol: Option<String>,

    /// Sub-protocol of the inscription. [`InscriptionRecord::new`] tags by
    /// content only; [`ParseOutcome::records`](crate::ParseOutcome::records)
    /// substitutes a transaction-level tag such as CAT-21.
    pub protocol: Protocol,

    /// Name of the encoder used for `body`.
    pub body_encoding: &'static str,

    /// Encoded body.
    pub body: String,

    /// Body length in bytes, before encoding.
    pub content_length: usize,

    /// Whether the envelope was cut short.
    pub truncated: bool,

    /// Whether the envelope ended on a tag without a value.
    pub malformed_field: bool,
}

impl InscriptionRecord {
    /// Builds the record, encoding the body with `encoder`.
    pub fn new(inscription: &Inscription, encoder: &dyn ByteEncoder) -> Self {
        Self {
            location: inscription.location(),
            content_type: lossy(inscription.content_type_bytes()),
            content_encoding: lossy(inscription.content_encoding_bytes()),
            pointer: inscription.pointer(),
            parents: inscription
                .parents()
                .iter()
                .map(|p| p.to_lower_hex_string())
                .collect(),
            metadata: inscription.metadata().map(|m| m.to_lower_hex_string()),
            metaprotocol: lossy(inscription.metaprotocol_bytes()),
            protocol: inscription.protocol(),
            body_encoding: encoder.name(),
            body: encoder.encode(inscription.body()),
            content_length: inscription.content_length(),
            truncated: inscription.is_truncated(),
            malformed_field: inscription.is_malformed_field(),
        }
    }
}

fn lossy(bytes: Option<&[u8]>) -> Option<String> {
    bytes.map(|b| String::from_utf8_lossy(b).into_owned())
}
