//! Variable-length and fixed-width integer encodings
//!
//! The variable-length scheme stores values up to 127 in a single byte.
//! Larger values get a prefix byte holding the two's-complement negation of
//! the continuation length K (1..=8), followed by the K-byte little-endian
//! minimal encoding. The fixed-width scheme packs a value into exactly
//! `width` little-endian bytes, truncating on write and zero-extending on
//! read.

use crate::error::{HashiveError, Result};
use smallvec::SmallVec;
use std::io::Read;

/// Read a single byte from `r`.
pub fn read_u8<R: Read>(r: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Minimum number of bytes (1..=8) needed to store `n`.
pub fn fixed_width(n: u64) -> u8 {
    if n > 0xFF_FF_FF_FF_FF_FF_FF {
        8
    } else if n > 0xFF_FF_FF_FF_FF_FF {
        7
    } else if n > 0xFF_FF_FF_FF_FF {
        6
    } else if n > 0xFF_FF_FF_FF {
        5
    } else if n > 0xFF_FF_FF {
        4
    } else if n > 0xFF_FF {
        3
    } else if n > 0xFF {
        2
    } else {
        1
    }
}

/// Append `n` to `out` as exactly `width` little-endian bytes.
///
/// Values that do not fit are truncated.
pub fn write_fixed(out: &mut Vec<u8>, n: u64, width: u8) -> Result<()> {
    match width {
        1..=8 => {
            out.extend_from_slice(&n.to_le_bytes()[..width as usize]);
            Ok(())
        }
        _ => Err(HashiveError::Internal(format!(
            "invalid fixed width {width}"
        ))),
    }
}

/// Read exactly `width` little-endian bytes from `r`, zero-extended to u64.
pub fn read_fixed<R: Read>(r: &mut R, width: u8) -> Result<u64> {
    if !(1..=8).contains(&width) {
        return Err(HashiveError::Internal(format!(
            "invalid fixed width {width}"
        )));
    }
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf[..width as usize])?;
    Ok(u64::from_le_bytes(buf))
}

/// Encode `n` with the variable-length scheme.
pub fn encode_varuint(n: u64) -> SmallVec<[u8; 9]> {
    let mut out = SmallVec::new();
    if n <= 0x7F {
        out.push(n as u8);
        return out;
    }
    let len = fixed_width(n);
    out.push(len.wrapping_neg());
    out.extend_from_slice(&n.to_le_bytes()[..len as usize]);
    out
}

/// Decode a variable-length unsigned integer from `r`.
pub fn read_varuint<R: Read>(r: &mut R) -> Result<u64> {
    let b0 = read_u8(r)?;
    if b0 <= 0x7F {
        return Ok(u64::from(b0));
    }
    read_fixed(r, b0.wrapping_neg())
}

/// Map a signed integer onto an unsigned one.
///
/// Bits 1 upward hold the value; bit 0 says whether they must be
/// complemented on decode. Using a complement flag instead of a sign bit
/// keeps the largest negative integer from being a special case.
pub fn int_to_uint(n: i64) -> u64 {
    if n < 0 {
        (!(n as u64) << 1) | 1
    } else {
        (n as u64) << 1
    }
}

/// Inverse of [`int_to_uint`].
pub fn uint_to_int(u: u64) -> i64 {
    if u & 1 == 1 {
        !(u >> 1) as i64
    } else {
        (u >> 1) as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn varuint_vectors() {
        let cases: &[(u64, &[u8])] = &[
            (0, &[0x00]),
            (7, &[0x07]),
            (0x7F, &[0x7F]),
            (0xFF - 1, &[0xFF, 0xFE]),
            (256, &[0xFE, 0x00, 0x01]),
            (0xFFFF + 1, &[0xFD, 0x00, 0x00, 0x01]),
            (0xFF_FFFF + 1, &[0xFC, 0x00, 0x00, 0x00, 0x01]),
            (0xFFFF_FFFF + 1, &[0xFB, 0x00, 0x00, 0x00, 0x00, 0x01]),
            (0xFF_FFFF_FFFF + 1, &[0xFA, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01]),
            (
                0xFFFF_FFFF_FFFF + 1,
                &[0xF9, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01],
            ),
            (
                0xFF_FFFF_FFFF_FFFF + 1,
                &[0xF8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01],
            ),
        ];
        for (value, bytes) in cases {
            assert_eq!(encode_varuint(*value).as_slice(), *bytes, "encode {value}");
            let decoded = read_varuint(&mut Cursor::new(*bytes)).unwrap();
            assert_eq!(decoded, *value, "decode {value}");
        }
    }

    #[test]
    fn varuint_accepts_non_minimal_widths() {
        // A reader must accept any continuation length, minimal or not.
        let wide = [0xFC, 0x00, 0x00, 0x01, 0x00];
        assert_eq!(read_varuint(&mut Cursor::new(&wide[..])).unwrap(), 0x1_0000);
        let wider = [0xF8, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00];
        assert_eq!(
            read_varuint(&mut Cursor::new(&wider[..])).unwrap(),
            0x1_0000_0000
        );
    }

    #[test]
    fn varuint_rejects_bad_prefix() {
        // 0x80 would mean a 128-byte continuation.
        let err = read_varuint(&mut Cursor::new(&[0x80u8][..])).unwrap_err();
        assert!(matches!(err, HashiveError::Internal(_)));
    }

    #[test]
    fn varuint_short_read_is_io() {
        let err = read_varuint(&mut Cursor::new(&[0xFEu8, 0x00][..])).unwrap_err();
        assert!(matches!(err, HashiveError::Io(_)));
    }

    #[test]
    fn fixed_width_thresholds() {
        assert_eq!(fixed_width(0), 1);
        assert_eq!(fixed_width(0xFF), 1);
        assert_eq!(fixed_width(0x100), 2);
        assert_eq!(fixed_width(0xFFFF), 2);
        assert_eq!(fixed_width(0x1_0000), 3);
        assert_eq!(fixed_width(0xFFFF_FFFF), 4);
        assert_eq!(fixed_width(0x1_0000_0000), 5);
        assert_eq!(fixed_width(u64::MAX), 8);
    }

    #[test]
    fn fixed_roundtrip_truncates_and_extends() {
        let mut out = Vec::new();
        write_fixed(&mut out, 0x0102_0304, 2).unwrap();
        assert_eq!(out, [0x04, 0x03]);
        assert_eq!(read_fixed(&mut Cursor::new(&out[..]), 2).unwrap(), 0x0304);
    }

    #[test]
    fn fixed_rejects_invalid_width() {
        let mut out = Vec::new();
        assert!(write_fixed(&mut out, 1, 0).is_err());
        assert!(write_fixed(&mut out, 1, 9).is_err());
        assert!(read_fixed(&mut Cursor::new(&[0u8; 16][..]), 9).is_err());
    }

    #[test]
    fn int_bijection_edges() {
        assert_eq!(int_to_uint(0), 0);
        assert_eq!(int_to_uint(1), 2);
        assert_eq!(int_to_uint(-1), 1);
        assert_eq!(int_to_uint(-129), 257);
        assert_eq!(int_to_uint(i64::MIN), u64::MAX);
        for n in [0, 1, -1, -129, 12345, -12345, i64::MAX, i64::MIN] {
            assert_eq!(uint_to_int(int_to_uint(n)), n);
        }
    }
}
