//! Locating inscription envelopes inside witness bytes.
//!
//! Every envelope opens with the same six bytes:
//!
//! ```text
//! OP_FALSE OP_IF OP_PUSHBYTES_3 "ord"
//!   0x00   0x63      0x03       6f 72 64
//! ```

use bitcoin::hex::DisplayHex;

/// Length of the inscription marker in bytes.
pub const MARKER_LEN: usize = 6;

/// Byte sequence opening every inscription envelope.
pub const INSCRIPTION_MARKER: [u8; MARKER_LEN] = [0x00, 0x63, 0x03, b'o', b'r', b'd'];

/// Lowercase hex rendering of [`INSCRIPTION_MARKER`].
pub const INSCRIPTION_MARKER_HEX: &str = "0063036f7264";

/// Finds the next marker at or after `start`.
///
/// Returns the position just past the marker, which is where the envelope's
/// fields begin, or `None` when the rest of the buffer holds no marker.
pub fn find_next_marker(buf: &[u8], start: usize) -> Option<usize> {
    let rest = buf.get(start..)?;
    rest.windows(MARKER_LEN)
        .position(|window| window == INSCRIPTION_MARKER)
        .map(|offset| start + offset + MARKER_LEN)
}

/// Cheap pre-check over a witness given as hex-encoded items.
///
/// Joins the items and looks for [`INSCRIPTION_MARKER_HEX`]. It may report a
/// marker that the byte scanner would not find (a nibble-misaligned match),
/// but never misses one.
pub fn has_marker<I, S>(witness_hex: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined: String = witness_hex
        .into_iter()
        .map(|item| item.as_ref().to_ascii_lowercase())
        .collect();
    joined.contains(INSCRIPTION_MARKER_HEX)
}

/// Same as [`has_marker`] for a witness given as raw items.
pub fn has_marker_bytes<'w, I>(witness: I) -> bool
where
    I: IntoIterator<Item = &'w [u8]>,
{
    has_marker(witness.into_iter().map(|item| item.to_lower_hex_string()))
}

/// Iterator over the envelope start positions in a buffer.
///
/// Each call to [`next`](Iterator::next) resumes where the previous one left
/// off, so walking a buffer is linear in its length. Callers that consume an
/// envelope can move the scan forward with [`MarkerScanner::resume_at`].
#[derive(Clone, Debug)]
pub struct MarkerScanner<'b> {
    buf: &'b [u8],
    at: usize,
}

impl<'b> MarkerScanner<'b> {
    /// Starts scanning `buf` from the beginning.
    pub fn new(buf: &'b [u8]) -> Self {
        Self { buf, at: 0 }
    }

    /// Returns the position the next scan starts from.
    pub fn position(&self) -> usize {
        self.at
    }

    /// Moves the scan forward to `position`. Never moves backwards.
    pub fn resume_at(&mut self, position: usize) {
        self.at = self.at.max(position);
    }
}

impl Iterator for MarkerScanner<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match find_next_marker(self.buf, self.at) {
            Some(found) => {
                self.at = found;
                Some(found)
            }
            None => {
                self.at = self.buf.len();
                None
            }
        }
    }
}
