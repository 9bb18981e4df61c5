use bitcoin::hex::HexToBytesError;
use ordpool_envelope_fmt::DecodeError;
use thiserror::Error;

/// Errors converting transaction data given at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// A witness item is not valid hex.
    #[error("witness item {item} of input {input} not hex: {source}")]
    WitnessHex {
        /// Input index.
        input: usize,

        /// Index of the item within the witness.
        item: usize,

        /// Underlying hex error.
        source: HexToBytesError,
    },

    /// An output script is not valid hex.
    #[error("script of output {output} not hex: {source}")]
    ScriptHex {
        /// Output index.
        output: usize,

        /// Underlying hex error.
        source: HexToBytesError,
    },

    /// Index past the end of the inputs or outputs.
    #[error("index {0} out of bounds")]
    OutOfBounds(usize),
}

/// Reason an envelope or input was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// The envelope could not be decoded.
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),

    /// The input's witness could not be read.
    #[error("input: {0}")]
    Input(#[from] InputError),
}

/// Record of something the aggregator had to skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    input_index: usize,
    marker_offset: Option<usize>,
    reason: SkipReason,
}

impl Diagnostic {
    /// A skipped envelope.
    pub fn envelope(input_index: usize, marker_offset: usize, err: DecodeError) -> Self {
        Self {
            input_index,
            marker_offset: Some(marker_offset),
            reason: err.into(),
        }
    }

    /// A skipped input.
    pub fn input(input_index: usize, err: InputError) -> Self {
        Self {
            input_index,
            marker_offset: None,
            reason: err.into(),
        }
    }

    /// Index of the input the problem was found in.
    pub fn input_index(&self) -> usize {
        self.input_index
    }

    /// Offset of the envelope's marker in the input's witness bytes, if the
    /// problem concerns a single envelope.
    pub fn marker_offset(&self) -> Option<usize> {
        self.marker_offset
    }

    /// Why it was skipped.
    pub fn reason(&self) -> &SkipReason {
        &self.reason
    }
}
