//! Little-endian base-128 varints.
//!
//! Each byte carries 7 bits of the value, least significant group first. The
//! high bit is set on every byte except the last.
//!
//! ```txt
//! 1bbbbbbb 1bbbbbbb ... 0bbbbbbb
//! ```

use crate::error::VarintError;

/// Longest encoding of a `u128`.
pub const MAX_VARINT_LEN: usize = 19;

/// Decodes one varint from the front of `buf`.
///
/// Returns the value and the number of bytes consumed.
pub fn decode(buf: &[u8]) -> Result<(u128, usize), VarintError> {
    let mut n = 0u128;

    for (i, &byte) in buf.iter().enumerate() {
        if i >= MAX_VARINT_LEN {
            return Err(VarintError::Overlong);
        }

        let value = u128::from(byte & 0x7f);

        // Only two bits are left at the last byte.
        if i == MAX_VARINT_LEN - 1 && value & 0x7c != 0 {
            return Err(VarintError::Overflow);
        }

        n |= value << (7 * i);

        if byte & 0x80 == 0 {
            return Ok((n, i + 1));
        }
    }

    Err(VarintError::Unterminated)
}

/// Decodes a buffer made up entirely of varints.
pub fn decode_all(buf: &[u8]) -> Result<Vec<u128>, VarintError> {
    let mut integers = Vec::new();
    let mut at = 0;

    while at < buf.len() {
        let (integer, len) = decode(&buf[at..])?;
        integers.push(integer);
        at += len;
    }

    Ok(integers)
}

/// Appends the encoding of `n` to `into`.
pub fn encode_into(mut n: u128, into: &mut Vec<u8>) {
    while n >> 7 > 0 {
        into.push((n as u8 & 0x7f) | 0x80);
        n >>= 7;
    }
    into.push(n as u8);
}

/// Encodes `n` into a fresh vec.
pub fn encode_to_vec(n: u128) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MAX_VARINT_LEN);
    encode_into(n, &mut buf);
    buf
}
