//! Byte-to-text encoders used when handing bodies across a text boundary.
//!
//! The encoder is picked by the host once and passed in; the parser itself
//! only ever deals with raw bytes.

use std::fmt::Debug;

use base64::{Engine, engine::general_purpose::STANDARD};
use bitcoin::hex::DisplayHex;

/// Turns raw bytes into text.
///
/// Implementations must be deterministic: identical bytes always give an
/// identical string.
pub trait ByteEncoder: Debug + Send + Sync {
    /// Encodes `bytes`.
    fn encode(&self, bytes: &[u8]) -> String;

    /// Label of the encoding, recorded next to encoded values.
    fn name(&self) -> &'static str;
}

/// Standard base64 alphabet with padding.
#[derive(Copy, Clone, Debug, Default)]
pub struct Base64Encoder;

impl ByteEncoder for Base64Encoder {
    fn encode(&self, bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    fn name(&self) -> &'static str {
        "base64"
    }
}

/// Lowercase hex.
#[derive(Copy, Clone, Debug, Default)]
pub struct HexEncoder;

impl ByteEncoder for HexEncoder {
    fn encode(&self, bytes: &[u8]) -> String {
        bytes.to_lower_hex_string()
    }

    fn name(&self) -> &'static str {
        "hex"
    }
}
