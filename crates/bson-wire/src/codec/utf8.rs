//! Codepoint-level UTF-8 emission and validation.
//!
//! String-typed puts funnel through [`write_utf8`] so that every byte of a
//! multi-byte sequence goes through the buffer's single-byte write path and
//! capacity growth triggers incrementally. The read path validates with
//! [`validate`] before any `String` is materialized.

use crate::codec::ByteBuf;
use crate::error::DecodeError;

/// Encodes `s` codepoint by codepoint onto the buffer.
///
/// Standard UTF-8 patterns (RFC 3629), no CESU-8 surrogate splitting:
/// ```text
/// U+0000..U+007F    0xxxxxxx
/// U+0080..U+07FF    110xxxxx 10xxxxxx
/// U+0800..U+FFFF    1110xxxx 10xxxxxx 10xxxxxx
/// U+10000..         11110xxx 10xxxxxx 10xxxxxx 10xxxxxx
/// ```
pub(crate) fn write_utf8(buf: &mut ByteBuf, s: &str) {
    for c in s.chars() {
        let cp = c as u32;
        if cp < 0x80 {
            buf.push_byte(cp as u8);
        } else if cp < 0x800 {
            buf.push_byte(0xC0 | (cp >> 6) as u8);
            buf.push_byte(0x80 | (cp & 0x3F) as u8);
        } else if cp < 0x10000 {
            buf.push_byte(0xE0 | (cp >> 12) as u8);
            buf.push_byte(0x80 | ((cp >> 6) & 0x3F) as u8);
            buf.push_byte(0x80 | (cp & 0x3F) as u8);
        } else {
            buf.push_byte(0xF0 | (cp >> 18) as u8);
            buf.push_byte(0x80 | ((cp >> 12) & 0x3F) as u8);
            buf.push_byte(0x80 | ((cp >> 6) & 0x3F) as u8);
            buf.push_byte(0x80 | (cp & 0x3F) as u8);
        }
    }
}

/// Validates `bytes` as UTF-8, borrowing rather than allocating.
#[inline]
pub(crate) fn validate<'a>(
    bytes: &'a [u8],
    context: &'static str,
) -> Result<&'a str, DecodeError> {
    std::str::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { context })
}

/// Returns the byte offset of the first NUL in `s`, if any.
///
/// Identifier-like strings (cstrings, keys) may not contain NUL because the
/// wire format uses NUL as their terminator.
#[inline]
pub(crate) fn find_nul(s: &str) -> Option<usize> {
    s.as_bytes().iter().position(|&b| b == 0)
}
