//! Read-with-advance primitives over a script buffer.
//!
//! All functions are stateless: they take the buffer and a position and hand
//! back the position after whatever they consumed.

use crate::errors::{DecodeError, DecodeResult};

/// Largest direct push opcode (`OP_PUSHBYTES_75`).
pub const MAX_DIRECT_PUSH: u8 = 0x4b;

/// `OP_PUSHDATA1`, followed by a 1 byte length.
pub const OP_PUSHDATA1: u8 = 0x4c;

/// `OP_PUSHDATA2`, followed by a 2 byte little-endian length.
pub const OP_PUSHDATA2: u8 = 0x4d;

/// `OP_PUSHDATA4`, followed by a 4 byte little-endian length.
pub const OP_PUSHDATA4: u8 = 0x4e;

/// Reads `n` bytes starting at `position`.
///
/// Returns the slice and the position just past it.
pub fn read_bytes(buf: &[u8], position: usize, n: usize) -> DecodeResult<(&[u8], usize)> {
    let end = position
        .checked_add(n)
        .filter(|end| *end <= buf.len())
        .ok_or(DecodeError::OutOfRange {
            position,
            needed: n,
            len: buf.len(),
        })?;

    Ok((&buf[position..end], end))
}

/// Reads a single byte at `position`.
pub fn read_u8(buf: &[u8], position: usize) -> DecodeResult<(u8, usize)> {
    let (bytes, next) = read_bytes(buf, position, 1)?;
    Ok((bytes[0], next))
}

/// Reads one script data push starting at `position`.
///
/// Accepts direct pushes (`0x01..=0x4b`) and the `OP_PUSHDATA1/2/4` forms.
/// Any other opcode is rejected with [`DecodeError::InvalidPushOpcode`].
pub fn read_pushdata(buf: &[u8], position: usize) -> DecodeResult<(&[u8], usize)> {
    let (opcode, at) = read_u8(buf, position)?;

    let (len, at) = match opcode {
        0x01..=MAX_DIRECT_PUSH => (opcode as usize, at),
        OP_PUSHDATA1 => {
            let (len, at) = read_u8(buf, at)?;
            (len as usize, at)
        }
        OP_PUSHDATA2 => {
            let (raw, at) = read_bytes(buf, at, 2)?;
            (u16::from_le_bytes([raw[0], raw[1]]) as usize, at)
        }
        OP_PUSHDATA4 => {
            let (raw, at) = read_bytes(buf, at, 4)?;
            (u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize, at)
        }
        _ => return Err(DecodeError::InvalidPushOpcode { opcode, position }),
    };

    read_bytes(buf, at, len)
}

#[cfg(test)]
mod tests {
    use bitcoin::opcodes::all;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_opcode_constants_match_bitcoin() {
        assert_eq!(MAX_DIRECT_PUSH, all::OP_PUSHBYTES_75.to_u8());
        assert_eq!(OP_PUSHDATA1, all::OP_PUSHDATA1.to_u8());
        assert_eq!(OP_PUSHDATA2, all::OP_PUSHDATA2.to_u8());
        assert_eq!(OP_PUSHDATA4, all::OP_PUSHDATA4.to_u8());
    }

    #[test]
    fn test_read_bytes() {
        let buf = [1, 2, 3, 4];
        assert_eq!(read_bytes(&buf, 1, 2).unwrap(), (&[2, 3][..], 3));
        assert_eq!(read_bytes(&buf, 4, 0).unwrap(), (&[][..], 4));
        assert_eq!(
            read_bytes(&buf, 3, 2),
            Err(DecodeError::OutOfRange {
                position: 3,
                needed: 2,
                len: 4
            })
        );
    }

    #[test]
    fn test_read_bytes_huge_length_does_not_overflow() {
        let buf = [0u8; 2];
        assert!(matches!(
            read_bytes(&buf, 1, usize::MAX),
            Err(DecodeError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_pushdata_prefixed_lengths() {
        let mut buf = vec![OP_PUSHDATA1, 3, 0xaa, 0xbb, 0xcc];
        assert_eq!(read_pushdata(&buf, 0).unwrap(), (&[0xaa, 0xbb, 0xcc][..], 5));

        buf = vec![OP_PUSHDATA2, 0x02, 0x01];
        buf.extend(std::iter::repeat_n(7u8, 0x0102));
        let (data, next) = read_pushdata(&buf, 0).unwrap();
        assert_eq!(data.len(), 0x0102);
        assert_eq!(next, 3 + 0x0102);

        buf = vec![OP_PUSHDATA4, 2, 0, 0, 0, 9, 8, 0xff];
        assert_eq!(read_pushdata(&buf, 0).unwrap(), (&[9, 8][..], 7));
    }

    #[test]
    fn test_pushdata_invalid_opcode() {
        let buf = [0x01, 0x05, 0xff, 0x01];
        assert_eq!(
            read_pushdata(&buf, 2),
            Err(DecodeError::InvalidPushOpcode {
                opcode: 0xff,
                position: 2
            })
        );

        // OP_0 is not a data push at this level.
        assert!(matches!(
            read_pushdata(&[0x00], 0),
            Err(DecodeError::InvalidPushOpcode { opcode: 0, .. })
        ));
    }

    #[test]
    fn test_pushdata_length_exceeds_buffer() {
        assert!(matches!(
            read_pushdata(&[0x05, 1, 2], 0),
            Err(DecodeError::OutOfRange { position: 1, needed: 5, .. })
        ));
        assert!(matches!(
            read_pushdata(&[OP_PUSHDATA2, 0x01], 0),
            Err(DecodeError::OutOfRange { position: 1, needed: 2, .. })
        ));
        assert!(matches!(
            read_pushdata(&[], 0),
            Err(DecodeError::OutOfRange { .. })
        ));
    }

    proptest! {
        #[test]
        fn proptest_direct_push_advances_by_len_plus_one(
            data in proptest::collection::vec(any::<u8>(), 1..=75),
            prefix in proptest::collection::vec(any::<u8>(), 0..8),
        ) {
            let mut buf = prefix.clone();
            buf.push(data.len() as u8);
            buf.extend_from_slice(&data);
            buf.push(0x68);

            let (read, next) = read_pushdata(&buf, prefix.len()).unwrap();
            prop_assert_eq!(read, &data[..]);
            prop_assert_eq!(next, prefix.len() + 1 + data.len());
        }

        #[test]
        fn proptest_prefixed_push_reads_le_length(
            data in proptest::collection::vec(any::<u8>(), 0..700),
            width in 0usize..3,
        ) {
            let mut buf = Vec::new();
            let header_len = match width {
                0 if data.len() <= u8::MAX as usize => {
                    buf.push(OP_PUSHDATA1);
                    buf.push(data.len() as u8);
                    2
                }
                0 | 1 => {
                    buf.push(OP_PUSHDATA2);
                    buf.extend_from_slice(&(data.len() as u16).to_le_bytes());
                    3
                }
                _ => {
                    buf.push(OP_PUSHDATA4);
                    buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
                    5
                }
            };
            buf.extend_from_slice(&data);

            let (read, next) = read_pushdata(&buf, 0).unwrap();
            prop_assert_eq!(read, &data[..]);
            prop_assert_eq!(next, header_len + data.len());
        }
    }
}
