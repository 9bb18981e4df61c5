use ordpool_envelope_fmt::DecodeError;
use thiserror::Error;

/// Errors from decoding LEB128 varints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VarintError {
    /// The value does not fit in a `u128`.
    #[error("varint overflows u128")]
    Overflow,

    /// More continuation bytes than any `u128` needs.
    #[error("varint longer than 19 bytes")]
    Overlong,

    /// The buffer ended with the continuation bit still set.
    #[error("varint missing final byte")]
    Unterminated,
}

/// Errors from decoding a rune payload out of an output script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuneError {
    /// The script does not start with `OP_RETURN`.
    #[error("output script not OP_RETURN")]
    NotOpReturn,

    /// `OP_RETURN` is not followed by `OP_PUSHNUM_13`.
    #[error("OP_RETURN missing rune magic")]
    MissingMagic,

    /// A non-push opcode or a malformed push in the payload.
    #[error("payload push: {0}")]
    Push(#[from] DecodeError),

    /// The concatenated payload is not a sequence of varints.
    #[error("payload varint: {0}")]
    Varint(#[from] VarintError),
}

/// Wrapper result type for rune decoding.
pub type RuneResult<T> = Result<T, RuneError>;
