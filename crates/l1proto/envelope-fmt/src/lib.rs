//! Inscription envelope format utilities.
//!
//! This crate provides functionality for locating and decoding inscription
//! envelopes embedded in witness scripts, and for building them.
//!
//! # Envelope Structure
//!
//! An envelope has the following structure:
//! ```text
//! OP_FALSE OP_IF "ord" (<tag> <value>)* OP_0 <body_chunks> OP_ENDIF
//! ```
//!
//! Each tag and value is a single data push. Body chunks are data pushes of up
//! to 520 bytes which are concatenated in order to form the body.

/// Inscription envelope builder utilities.
pub mod builder;
mod config;
/// Byte cursor and push-data decoding.
pub mod cursor;
mod decoder;
/// Error types for envelope operations.
pub mod errors;
mod field;
/// Marker scanning.
pub mod marker;

pub use config::ParseConfig;
pub use decoder::{
    DecoderState, Envelope, EnvelopeDecoder, EnvelopeEnd, Envelopes, OP_0, OP_ENDIF,
    decode_envelope, envelopes, read_envelope_push,
};
pub use errors::{DecodeError, DecodeResult, EnvelopeBuildError};
pub use field::{
    BODY_SEPARATOR_TAG, Field, FieldKind, KNOWN_TAGS, decode_le_u64, encode_le_u64,
};
pub use marker::{
    INSCRIPTION_MARKER, INSCRIPTION_MARKER_HEX, MARKER_LEN, MarkerScanner, find_next_marker,
    has_marker, has_marker_bytes,
};
