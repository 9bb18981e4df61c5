use std::str;

use ordpool_envelope_fmt::{Envelope, EnvelopeEnd, Field, FieldKind, decode_le_u64};
use ordpool_protocols::{Protocol, classify};
use serde::Serialize;

/// Where an inscription was found: input index, then the envelope's position
/// among the envelopes decoded from that input.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
pub struct Location {
    /// Index of the transaction input.
    pub input_index: usize,

    /// Index of the envelope within the input.
    pub envelope_index: usize,
}

/// Content recovered from a single envelope.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Inscription {
    location: Location,
    content_type: Option<Vec<u8>>,
    content_encoding: Option<Vec<u8>>,
    pointer: Option<Vec<u8>>,
    parents: Vec<Vec<u8>>,
    metadata: Option<Vec<u8>>,
    metaprotocol: Option<Vec<u8>>,
    unknown_fields: Vec<Field>,
    body: Vec<u8>,
    has_body: bool,
    duplicate_field: bool,
    unrecognized_even_field: bool,
    malformed_field: bool,
    end_state: EnvelopeEnd,
}

impl Inscription {
    /// Builds an inscription from a decoded envelope.
    ///
    /// The first occurrence of a known field wins, except for parents, which
    /// are all kept, and metadata, whose values are concatenated.
    pub fn from_envelope(envelope: Envelope, location: Location) -> Self {
        let mut inscription = Self {
            location,
            content_type: None,
            content_encoding: None,
            pointer: None,
            parents: Vec::new(),
            metadata: None,
            metaprotocol: None,
            unknown_fields: Vec::new(),
            body: envelope.body(),
            has_body: envelope.has_body(),
            duplicate_field: false,
            unrecognized_even_field: false,
            malformed_field: envelope.is_malformed_field(),
            end_state: envelope.end_state(),
        };

        for field in envelope.fields() {
            let value = field.value().to_vec();
            let slot = match field.kind() {
                None => {
                    inscription.unrecognized_even_field |= field.is_unrecognized_even();
                    inscription.unknown_fields.push(field.clone());
                    continue;
                }
                Some(FieldKind::Parent) => {
                    inscription.parents.push(value);
                    continue;
                }
                Some(FieldKind::Metadata) => {
                    inscription
                        .metadata
                        .get_or_insert_with(Vec::new)
                        .extend_from_slice(&value);
                    continue;
                }
                Some(FieldKind::ContentType) => &mut inscription.content_type,
                Some(FieldKind::ContentEncoding) => &mut inscription.content_encoding,
                Some(FieldKind::Pointer) => &mut inscription.pointer,
                Some(FieldKind::Metaprotocol) => &mut inscription.metaprotocol,
            };

            if slot.is_some() {
                inscription.duplicate_field = true;
            } else {
                *slot = Some(value);
            }
        }

        inscription
    }

    /// Where the inscription was found.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Index of the input carrying the inscription.
    pub fn input_index(&self) -> usize {
        self.location.input_index
    }

    /// Index of the envelope within its input.
    pub fn envelope_index(&self) -> usize {
        self.location.envelope_index
    }

    /// Content type, if present and valid UTF-8.
    pub fn content_type(&self) -> Option<&str> {
        as_str(self.content_type.as_deref())
    }

    /// Raw content type bytes.
    pub fn content_type_bytes(&self) -> Option<&[u8]> {
        self.content_type.as_deref()
    }

    /// Content encoding, if present and valid UTF-8.
    pub fn content_encoding(&self) -> Option<&str> {
        as_str(self.content_encoding.as_deref())
    }

    /// Raw content encoding bytes.
    pub fn content_encoding_bytes(&self) -> Option<&[u8]> {
        self.content_encoding.as_deref()
    }

    /// Pointer value, if present and no wider than 64 bits.
    ///
    /// The value is surfaced as-is; it does not affect which input an
    /// inscription is attributed to.
    pub fn pointer(&self) -> Option<u64> {
        self.pointer.as_deref().and_then(decode_le_u64)
    }

    /// Raw pointer bytes.
    pub fn pointer_bytes(&self) -> Option<&[u8]> {
        self.pointer.as_deref()
    }

    /// First parent.
    pub fn parent(&self) -> Option<&[u8]> {
        self.parents.first().map(Vec::as_slice)
    }

    /// All parents in envelope order.
    pub fn parents(&self) -> &[Vec<u8>] {
        &self.parents
    }

    /// Metadata bytes.
    pub fn metadata(&self) -> Option<&[u8]> {
        self.metadata.as_deref()
    }

    /// Metaprotocol, if present and valid UTF-8.
    pub fn metaprotocol(&self) -> Option<&str> {
        as_str(self.metaprotocol.as_deref())
    }

    /// Raw metaprotocol bytes.
    pub fn metaprotocol_bytes(&self) -> Option<&[u8]> {
        self.metaprotocol.as_deref()
    }

    /// Fields with tags this crate does not interpret, in envelope order.
    pub fn unknown_fields(&self) -> &[Field] {
        &self.unknown_fields
    }

    /// Body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Consumes the inscription, returning the body.
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Length of the body in bytes.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }

    /// Whether the envelope had a body separator.
    pub fn has_body(&self) -> bool {
        self.has_body
    }

    /// Whether a known field appeared more than once.
    pub fn has_duplicate_field(&self) -> bool {
        self.duplicate_field
    }

    /// Whether an unrecognized even tag was present.
    pub fn has_unrecognized_even_field(&self) -> bool {
        self.unrecognized_even_field
    }

    /// Whether the envelope ended on a tag without a value.
    pub fn is_malformed_field(&self) -> bool {
        self.malformed_field
    }

    /// Whether the witness ended before the envelope was closed.
    pub fn is_truncated(&self) -> bool {
        self.end_state == EnvelopeEnd::Truncated
    }

    /// How the envelope ended.
    pub fn end_state(&self) -> EnvelopeEnd {
        self.end_state
    }

    /// Sub-protocol tag derived from content type and body.
    pub fn protocol(&self) -> Protocol {
        classify(self.content_type(), &self.body)
    }
}

fn as_str(bytes: Option<&[u8]>) -> Option<&str> {
    bytes.and_then(|b| str::from_utf8(b).ok())
}
