//! Tagged fields carried between the marker and the body of an envelope.

use std::fmt;

/// Tag reserved as the separator between fields and body.
pub const BODY_SEPARATOR_TAG: u8 = 0;

/// Field tags with defined semantics.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum FieldKind {
    /// MIME type of the body.
    ContentType,

    /// Output offset the inscribed sat is moved to.
    Pointer,

    /// Inscription id of a parent inscription. May repeat.
    Parent,

    /// CBOR metadata.
    Metadata,

    /// Name of the metaprotocol the inscription belongs to.
    Metaprotocol,

    /// Content encoding of the body, e.g. `br` or `gzip`.
    ContentEncoding,
}

/// Table of the recognized tags, in tag order.
pub const KNOWN_TAGS: [(u8, FieldKind); 6] = [
    (1, FieldKind::ContentType),
    (2, FieldKind::Pointer),
    (3, FieldKind::Parent),
    (5, FieldKind::Metadata),
    (7, FieldKind::Metaprotocol),
    (9, FieldKind::ContentEncoding),
];

impl FieldKind {
    /// Returns the tag number of this field kind.
    pub const fn tag(self) -> u8 {
        match self {
            Self::ContentType => 1,
            Self::Pointer => 2,
            Self::Parent => 3,
            Self::Metadata => 5,
            Self::Metaprotocol => 7,
            Self::ContentEncoding => 9,
        }
    }

    /// Looks up the field kind for a tag number.
    pub fn from_tag(tag: u8) -> Option<Self> {
        KNOWN_TAGS
            .iter()
            .find(|(known, _)| *known == tag)
            .map(|(_, kind)| *kind)
    }

    /// Human readable name, as used in serialized output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ContentType => "content_type",
            Self::Pointer => "pointer",
            Self::Parent => "parent",
            Self::Metadata => "metadata",
            Self::Metaprotocol => "metaprotocol",
            Self::ContentEncoding => "content_encoding",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `(tag, value)` pair read from an envelope.
///
/// A tag is known when its push is exactly the single byte of a
/// [`FieldKind`]. Everything else is kept verbatim as [`Field::Unknown`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Field {
    /// A field with a recognized tag.
    Known {
        /// What the field means.
        kind: FieldKind,

        /// Raw value push.
        value: Vec<u8>,
    },

    /// A field with a tag this crate does not interpret.
    Unknown {
        /// Raw tag push.
        tag: Vec<u8>,

        /// Raw value push.
        value: Vec<u8>,
    },
}

impl Field {
    /// Classifies a tag push and pairs it with its value.
    pub fn from_pushes(tag: &[u8], value: Vec<u8>) -> Self {
        match tag {
            [single] => match FieldKind::from_tag(*single) {
                Some(kind) => Self::Known { kind, value },
                None => Self::Unknown {
                    tag: tag.to_vec(),
                    value,
                },
            },
            _ => Self::Unknown {
                tag: tag.to_vec(),
                value,
            },
        }
    }

    /// Returns the known kind, if any.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Self::Known { kind, .. } => Some(*kind),
            Self::Unknown { .. } => None,
        }
    }

    /// Returns the tag exactly as it was pushed.
    pub fn tag_bytes(&self) -> Vec<u8> {
        match self {
            Self::Known { kind, .. } => vec![kind.tag()],
            Self::Unknown { tag, .. } => tag.clone(),
        }
    }

    /// Returns the tag as a little-endian integer, if it fits in a `u64`.
    pub fn tag_number(&self) -> Option<u64> {
        match self {
            Self::Known { kind, .. } => Some(kind.tag() as u64),
            Self::Unknown { tag, .. } => decode_le_u64(tag),
        }
    }

    /// Returns the value push.
    pub fn value(&self) -> &[u8] {
        match self {
            Self::Known { value, .. } | Self::Unknown { value, .. } => value,
        }
    }

    /// Returns whether the field has an even tag that this crate does not
    /// recognize. Even tags are reserved for fields that change how an
    /// inscription must be interpreted.
    pub fn is_unrecognized_even(&self) -> bool {
        match self {
            Self::Known { .. } => false,
            Self::Unknown { tag, .. } => tag.first().is_some_and(|lsb| lsb % 2 == 0),
        }
    }
}

/// Decodes a little-endian unsigned integer, ignoring trailing zero bytes.
///
/// Returns `None` if more than 8 significant bytes remain.
pub fn decode_le_u64(bytes: &[u8]) -> Option<u64> {
    let significant = bytes
        .iter()
        .rposition(|b| *b != 0)
        .map_or(0, |last| last + 1);

    if significant > 8 {
        return None;
    }

    let mut buf = [0u8; 8];
    buf[..significant].copy_from_slice(&bytes[..significant]);
    Some(u64::from_le_bytes(buf))
}

/// Encodes an integer as little-endian bytes without trailing zeros.
pub fn encode_le_u64(value: u64) -> Vec<u8> {
    let mut bytes = value.to_le_bytes().to_vec();
    while bytes.last() == Some(&0) {
        bytes.pop();
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags_roundtrip() {
        for (tag, kind) in KNOWN_TAGS {
            assert_eq!(kind.tag(), tag);
            assert_eq!(FieldKind::from_tag(tag), Some(kind));
        }

        for tag in [BODY_SEPARATOR_TAG, 4, 6, 8, 10, 11, 0xff] {
            assert_eq!(FieldKind::from_tag(tag), None);
        }
    }

    #[test]
    fn test_field_from_pushes() {
        let field = Field::from_pushes(&[1], b"text/plain".to_vec());
        assert_eq!(field.kind(), Some(FieldKind::ContentType));
        assert_eq!(field.value(), b"text/plain");
        assert_eq!(field.tag_bytes(), vec![1]);

        let field = Field::from_pushes(&[11], vec![0xaa]);
        assert_eq!(field.kind(), None);
        assert_eq!(field.tag_number(), Some(11));
        assert!(!field.is_unrecognized_even());

        // Non-minimal encodings of a known tag are not the known tag.
        let field = Field::from_pushes(&[1, 0], vec![]);
        assert_eq!(field.kind(), None);
        assert_eq!(field.tag_bytes(), vec![1, 0]);
        assert_eq!(field.tag_number(), Some(1));
    }

    #[test]
    fn test_unrecognized_even() {
        assert!(Field::from_pushes(&[4], vec![]).is_unrecognized_even());
        assert!(Field::from_pushes(&[0x10, 0x01], vec![]).is_unrecognized_even());
        assert!(!Field::from_pushes(&[2], vec![]).is_unrecognized_even());
    }

    #[test]
    fn test_decode_le_u64() {
        assert_eq!(decode_le_u64(&[]), Some(0));
        assert_eq!(decode_le_u64(&[0x01, 0x02]), Some(0x0201));
        assert_eq!(decode_le_u64(&[0xff; 8]), Some(u64::MAX));
        assert_eq!(decode_le_u64(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 0]), Some(1));
        assert_eq!(decode_le_u64(&[0, 0, 0, 0, 0, 0, 0, 0, 1]), None);
    }

    #[test]
    fn test_encode_le_u64() {
        assert_eq!(encode_le_u64(0), Vec::<u8>::new());
        assert_eq!(encode_le_u64(0x0201), vec![1, 2]);
        for value in [1, 255, 256, 1 << 40, u64::MAX] {
            assert_eq!(decode_le_u64(&encode_le_u64(value)), Some(value));
        }
    }
}
