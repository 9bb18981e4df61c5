use thiserror::Error;

/// Fatal errors that abort decoding of the current envelope.
///
/// Recoverable conditions (a dangling field tag, a body cut off before
/// `OP_ENDIF`) are not errors; they are reported on the decoded
/// [`Envelope`](crate::Envelope) itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// An opcode outside the recognized push encodings was found where a push
    /// was expected.
    #[error("invalid push opcode {opcode:#04x} at offset {position}")]
    InvalidPushOpcode {
        /// The offending opcode byte.
        opcode: u8,

        /// Offset of the opcode byte in the buffer.
        position: usize,
    },

    /// A read (opcode, length prefix or push payload) ran past the end of the
    /// buffer.
    #[error("read of {needed} bytes at offset {position} overruns {len} byte buffer")]
    OutOfRange {
        /// Offset the read started at.
        position: usize,

        /// Number of bytes requested.
        needed: usize,

        /// Total length of the buffer.
        len: usize,
    },
}

impl DecodeError {
    /// Returns the buffer offset the error was raised at.
    pub fn position(&self) -> usize {
        match self {
            Self::InvalidPushOpcode { position, .. } | Self::OutOfRange { position, .. } => {
                *position
            }
        }
    }
}

/// Result type for envelope decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors that can occur while building inscription envelope scripts.
#[derive(Debug, Error)]
pub enum EnvelopeBuildError {
    /// Failed to convert a pubkey into `PushBytesBuf`.
    #[error("failed to convert pubkey to push bytes buffer")]
    PubkeyConversion,

    /// A push does not fit in a single script element.
    #[error("push of {len} bytes exceeds the script element limit")]
    OversizedValue {
        /// Size of the rejected push.
        len: usize,
    },

    /// A field tag that would be read back as the body separator.
    #[error("field tag {tag:02x?} collides with the body separator")]
    SeparatorTag {
        /// The rejected tag.
        tag: Vec<u8>,
    },
}
