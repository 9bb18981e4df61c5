//! Envelope decoding state machine.
//!
//! Decoding starts right after an
//! [`INSCRIPTION_MARKER`](crate::marker::INSCRIPTION_MARKER) and walks the script
//! one push at a time:
//!
//! ```text
//! SeekingFields --OP_0--> ReadingBody --OP_ENDIF--> Terminated
//!       |                       |
//!       +--OP_ENDIF--> Terminated   +--end of data--> Truncated
//!       +--end of data--> Truncated
//! ```
//!
//! Fields are read as `<tag> <value>` push pairs. A tag with no value behind
//! it (the next byte is `OP_ENDIF`, or the buffer ends) marks the envelope as
//! having a malformed field and stops decoding without a body.

use std::borrow::Cow;

use crate::config::ParseConfig;
use crate::cursor::{read_pushdata, read_u8};
use crate::errors::DecodeResult;
use crate::field::{BODY_SEPARATOR_TAG, Field, FieldKind};
use crate::marker::{MARKER_LEN, MarkerScanner};

/// `OP_0` / `OP_FALSE`, an empty push. Separates fields from the body.
pub const OP_0: u8 = 0x00;

/// `OP_ENDIF`, closes the envelope.
pub const OP_ENDIF: u8 = 0x68;

const OP_1NEGATE: u8 = 0x4f;
const OP_1: u8 = 0x51;
const OP_16: u8 = 0x60;

/// State of an [`EnvelopeDecoder`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DecoderState {
    /// Reading `<tag> <value>` pairs.
    SeekingFields,

    /// Collecting body chunks.
    ReadingBody,

    /// Hit `OP_ENDIF`.
    Terminated,

    /// Ran out of data before `OP_ENDIF`.
    Truncated,
}

impl DecoderState {
    /// Returns whether no further transitions are possible.
    pub fn is_final(self) -> bool {
        matches!(self, Self::Terminated | Self::Truncated)
    }
}

/// How a decoded envelope ended.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EnvelopeEnd {
    /// Closed by `OP_ENDIF`.
    Terminated,

    /// The buffer ended first; fields and body are partial.
    Truncated,
}

/// A decoded envelope: its fields and body chunks, in script order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Envelope {
    start: usize,
    end: usize,
    fields: Vec<Field>,
    body_chunks: Vec<Vec<u8>>,
    has_body: bool,
    malformed_field: bool,
    end_state: EnvelopeEnd,
}

impl Envelope {
    /// Offset of the first byte after the marker.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Offset of the first byte after the envelope.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Offset of the marker that opened this envelope, or `None` if decoding
    /// started less than a marker's length into the buffer.
    pub fn marker_offset(&self) -> Option<usize> {
        self.start.checked_sub(MARKER_LEN)
    }

    /// Fields in the order they appeared.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Returns the value of the first field of the given kind.
    pub fn field(&self, kind: FieldKind) -> Option<&[u8]> {
        self.fields_of(kind).next()
    }

    /// Returns the values of every field of the given kind.
    pub fn fields_of(&self, kind: FieldKind) -> impl Iterator<Item = &[u8]> + '_ {
        self.fields
            .iter()
            .filter(move |field| field.kind() == Some(kind))
            .map(Field::value)
    }

    /// Body chunks, one per push.
    pub fn body_chunks(&self) -> &[Vec<u8>] {
        &self.body_chunks
    }

    /// Concatenation of all body chunks.
    pub fn body(&self) -> Vec<u8> {
        self.body_chunks.concat()
    }

    /// Whether the field/body separator was seen.
    pub fn has_body(&self) -> bool {
        self.has_body
    }

    /// Whether a tag was left without a value.
    pub fn is_malformed_field(&self) -> bool {
        self.malformed_field
    }

    /// How the envelope ended.
    pub fn end_state(&self) -> EnvelopeEnd {
        self.end_state
    }

    /// Shorthand for `end_state() == EnvelopeEnd::Truncated`.
    pub fn is_truncated(&self) -> bool {
        self.end_state == EnvelopeEnd::Truncated
    }
}

/// Reads one push inside an envelope.
///
/// On top of [`read_pushdata`] this treats `OP_0` as an empty push and,
/// when `pushnum_tags` is set, the push-number opcodes as one byte pushes.
pub fn read_envelope_push(
    buf: &[u8],
    position: usize,
    pushnum_tags: bool,
) -> DecodeResult<(Cow<'_, [u8]>, usize)> {
    let (opcode, next) = read_u8(buf, position)?;

    match opcode {
        OP_0 => Ok((Cow::Borrowed(&[]), next)),
        OP_1NEGATE if pushnum_tags => Ok((Cow::Owned(vec![0x81]), next)),
        OP_1..=OP_16 if pushnum_tags => Ok((Cow::Owned(vec![opcode - OP_1 + 1]), next)),
        _ => {
            let (data, next) = read_pushdata(buf, position)?;
            Ok((Cow::Borrowed(data), next))
        }
    }
}

/// Step-wise envelope decoder.
#[derive(Debug)]
pub struct EnvelopeDecoder<'b> {
    buf: &'b [u8],
    start: usize,
    at: usize,
    state: DecoderState,
    pushnum_tags: bool,
    fields: Vec<Field>,
    body_chunks: Vec<Vec<u8>>,
    has_body: bool,
    malformed_field: bool,
}

impl<'b> EnvelopeDecoder<'b> {
    /// Prepares to decode the envelope whose fields start at `start`.
    pub fn new(buf: &'b [u8], start: usize, config: &ParseConfig) -> Self {
        Self {
            buf,
            start,
            at: start,
            state: DecoderState::SeekingFields,
            pushnum_tags: config.pushnum_tags(),
            fields: Vec::new(),
            body_chunks: Vec::new(),
            has_body: false,
            malformed_field: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.at
    }

    /// Fields collected so far.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Body chunks collected so far.
    pub fn body_chunks(&self) -> &[Vec<u8>] {
        &self.body_chunks
    }

    /// Whether a dangling tag was seen.
    pub fn is_malformed_field(&self) -> bool {
        self.malformed_field
    }

    /// Performs a single transition and returns the new state.
    ///
    /// Stepping a decoder in a final state does nothing.
    pub fn step(&mut self) -> DecodeResult<DecoderState> {
        self.state = match self.state {
            DecoderState::SeekingFields => self.step_fields()?,
            DecoderState::ReadingBody => self.step_body()?,
            done => done,
        };
        Ok(self.state)
    }

    /// Steps until a final state and returns the envelope.
    pub fn run(mut self) -> DecodeResult<Envelope> {
        while !self.state.is_final() {
            self.step()?;
        }
        Ok(self.finish())
    }

    fn step_fields(&mut self) -> DecodeResult<DecoderState> {
        match self.buf.get(self.at) {
            None => return Ok(DecoderState::Truncated),
            Some(&OP_ENDIF) => {
                self.at += 1;
                return Ok(DecoderState::Terminated);
            }
            Some(&OP_0) => {
                self.at += 1;
                self.has_body = true;
                return Ok(DecoderState::ReadingBody);
            }
            Some(_) => {}
        }

        let (tag, next) = self.read_push(self.at)?;
        self.at = next;

        if tag.as_ref() == [BODY_SEPARATOR_TAG] {
            self.has_body = true;
            return Ok(DecoderState::ReadingBody);
        }

        match self.buf.get(self.at) {
            None => {
                self.malformed_field = true;
                return Ok(DecoderState::Truncated);
            }
            Some(&OP_ENDIF) => {
                self.malformed_field = true;
                self.at += 1;
                return Ok(DecoderState::Terminated);
            }
            Some(_) => {}
        }

        let (value, next) = self.read_push(self.at)?;
        self.at = next;
        self.fields.push(Field::from_pushes(&tag, value.into_owned()));

        Ok(DecoderState::SeekingFields)
    }

    fn step_body(&mut self) -> DecodeResult<DecoderState> {
        match self.buf.get(self.at) {
            None => return Ok(DecoderState::Truncated),
            Some(&OP_ENDIF) => {
                self.at += 1;
                return Ok(DecoderState::Terminated);
            }
            Some(_) => {}
        }

        let (chunk, next) = self.read_push(self.at)?;
        self.at = next;
        self.body_chunks.push(chunk.into_owned());

        Ok(DecoderState::ReadingBody)
    }

    fn read_push(&self, position: usize) -> DecodeResult<(Cow<'b, [u8]>, usize)> {
        read_envelope_push(self.buf, position, self.pushnum_tags)
    }

    fn finish(self) -> Envelope {
        let end_state = match self.state {
            DecoderState::Truncated => EnvelopeEnd::Truncated,
            _ => EnvelopeEnd::Terminated,
        };

        Envelope {
            start: self.start,
            end: self.at,
            fields: self.fields,
            body_chunks: self.body_chunks,
            has_body: self.has_body,
            malformed_field: self.malformed_field,
            end_state,
        }
    }
}

/// Decodes the envelope whose fields start at `start`.
pub fn decode_envelope(buf: &[u8], start: usize, config: &ParseConfig) -> DecodeResult<Envelope> {
    EnvelopeDecoder::new(buf, start, config).run()
}

/// Iterator over every envelope in a buffer.
///
/// Yields the marker offset with each decode result. After a successful
/// decode, scanning resumes after the envelope; after a failed one, right
/// after the marker.
#[derive(Debug)]
pub struct Envelopes<'b> {
    buf: &'b [u8],
    scanner: MarkerScanner<'b>,
    config: ParseConfig,
}

impl Iterator for Envelopes<'_> {
    type Item = (usize, DecodeResult<Envelope>);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.scanner.next()?;
        let result = decode_envelope(self.buf, start, &self.config);
        if let Ok(envelope) = &result {
            self.scanner.resume_at(envelope.end());
        }
        Some((start - MARKER_LEN, result))
    }
}

/// Walks every envelope in `buf`.
pub fn envelopes<'b>(buf: &'b [u8], config: &ParseConfig) -> Envelopes<'b> {
    Envelopes {
        buf,
        scanner: MarkerScanner::new(buf),
        config: config.clone(),
    }
}
