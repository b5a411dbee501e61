//! The dual-cursor byte buffer backing BSON serialization.
//!
//! [`ByteBuf`] owns a single growable byte store with independent read and
//! write cursors and a mode flag. Put operations append at the write cursor,
//! get operations consume from the read cursor, and switching between the
//! two flips the buffer exactly once per mode transition so previously
//! written bytes become readable.
//!
//! A `ByteBuf` is not safe for concurrent use: exactly one logical owner
//! mutates an instance at a time.

use crate::codec::utf8;
use crate::error::{DecodeError, EncodeError};

/// Initial capacity of an empty buffer.
const INITIAL_CAPACITY: usize = 1024;

/// Whether the buffer was last used for reading or writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Read,
    Write,
}

/// Growable byte buffer with dual read/write cursor semantics.
///
/// All fixed-width integers and doubles are little-endian on the wire.
/// Strings carry a 4-byte length prefix (payload + trailing NUL) and
/// cstrings are NUL-terminated without a prefix.
///
/// Put operations chain:
///
/// ```rust
/// use bson_wire::ByteBuf;
///
/// let bytes = ByteBuf::new().put_int32(1).put_int32(2).to_bytes();
/// assert_eq!(bytes, [1, 0, 0, 0, 2, 0, 0, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct ByteBuf {
    /// Backing store; `data.len()` is the physical capacity, not the number
    /// of meaningful bytes.
    data: Vec<u8>,
    mode: Mode,
    read_position: usize,
    write_position: usize,
}

impl ByteBuf {
    /// Creates an empty buffer in write mode with the default capacity.
    pub fn new() -> Self {
        Self {
            data: vec![0; INITIAL_CAPACITY],
            mode: Mode::Write,
            read_position: 0,
            write_position: 0,
        }
    }

    /// Creates a buffer in read mode pre-loaded with `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            data: bytes.to_vec(),
            mode: Mode::Read,
            read_position: 0,
            write_position: bytes.len(),
        }
    }

    // =========================================================================
    // MODE TRANSITIONS & CAPACITY
    // =========================================================================

    /// Flips into write mode. Invoked at the top of every put operation;
    /// a no-op when already writing.
    #[inline]
    fn flip_to_write(&mut self) {
        if self.mode == Mode::Read {
            self.mode = Mode::Write;
        }
    }

    /// Flips into read mode, exposing all bytes written so far for reading.
    /// Invoked at the top of every get operation; a no-op when already
    /// reading.
    #[inline]
    fn flip_to_read(&mut self) {
        if self.mode == Mode::Write {
            self.mode = Mode::Read;
        }
    }

    /// Grows the backing store if `needed` more bytes would not fit.
    ///
    /// The new store is sized `2 * (write_position + needed)` and the bytes
    /// written so far are carried over; committed positions never move.
    fn ensure_capacity(&mut self, needed: usize) {
        let required = self.write_position + needed;
        if required > self.data.len() {
            let mut grown = vec![0u8; required * 2];
            grown[..self.write_position].copy_from_slice(&self.data[..self.write_position]);
            self.data = grown;
        }
    }

    /// Bounds-checks a read of `needed` bytes against the write boundary.
    #[inline]
    fn ensure_read(&mut self, needed: usize, context: &'static str) -> Result<(), DecodeError> {
        self.flip_to_read();
        let available = self.write_position - self.read_position;
        if needed > available {
            return Err(DecodeError::UnexpectedEof {
                context,
                needed,
                available,
            });
        }
        Ok(())
    }

    /// Appends one byte through the growth-aware write path.
    ///
    /// Multi-byte UTF-8 sequences are emitted byte by byte through here so
    /// capacity growth triggers incrementally.
    #[inline]
    pub(crate) fn push_byte(&mut self, byte: u8) {
        self.flip_to_write();
        self.ensure_capacity(1);
        self.data[self.write_position] = byte;
        self.write_position += 1;
    }

    #[inline]
    fn push_slice(&mut self, bytes: &[u8]) {
        self.flip_to_write();
        self.ensure_capacity(bytes.len());
        self.data[self.write_position..self.write_position + bytes.len()].copy_from_slice(bytes);
        self.write_position += bytes.len();
    }

    /// Overwrites 4 already-written bytes at `position`. Callers have
    /// bounds-checked.
    #[inline]
    fn patch_int32(&mut self, position: usize, value: i32) {
        self.data[position..position + 4].copy_from_slice(&value.to_le_bytes());
    }

    // =========================================================================
    // WRITE OPERATIONS
    // =========================================================================

    /// Writes a single byte.
    pub fn put_byte(&mut self, byte: u8) -> &mut Self {
        self.push_byte(byte);
        self
    }

    /// Writes `bytes` verbatim.
    pub fn put_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.push_slice(bytes);
        self
    }

    /// Writes a 32-bit signed integer, little-endian.
    pub fn put_int32(&mut self, value: i32) -> &mut Self {
        self.push_slice(&value.to_le_bytes());
        self
    }

    /// Writes a 32-bit unsigned integer, little-endian.
    ///
    /// Takes the caller's logical integer and fails with a [`Range`] error
    /// outside `[0, 2^32 - 1]`.
    ///
    /// [`Range`]: crate::error::ErrorKind::Range
    pub fn put_uint32(&mut self, value: i64) -> Result<&mut Self, EncodeError> {
        if value < 0 || value > u32::MAX as i64 {
            return Err(EncodeError::Uint32OutOfRange { value });
        }
        self.push_slice(&(value as u32).to_le_bytes());
        Ok(self)
    }

    /// Writes a 64-bit signed integer, little-endian.
    pub fn put_int64(&mut self, value: i64) -> &mut Self {
        self.push_slice(&value.to_le_bytes());
        self
    }

    /// Writes an IEEE-754 binary64 double, little-endian.
    pub fn put_double(&mut self, value: f64) -> &mut Self {
        self.push_slice(&value.to_le_bytes());
        self
    }

    /// Writes the UTF-8 bytes of `s` followed by a NUL terminator.
    ///
    /// Fails with an [`InvalidArgument`] error if `s` contains a NUL byte,
    /// since NUL is the terminator on the wire. Nothing is written on
    /// failure.
    ///
    /// [`InvalidArgument`]: crate::error::ErrorKind::InvalidArgument
    pub fn put_cstring(&mut self, s: &str) -> Result<&mut Self, EncodeError> {
        if let Some(offset) = utf8::find_nul(s) {
            return Err(EncodeError::InteriorNul { offset });
        }
        utf8::write_utf8(self, s);
        self.push_byte(0);
        Ok(self)
    }

    /// Writes a length-prefixed string: a 4-byte little-endian byte count
    /// (payload + 1 for the trailing NUL), the UTF-8 payload, then NUL.
    ///
    /// The prefix is reserved up front, the payload emitted, and the
    /// reserved bytes patched with the measured length. Interior NUL bytes
    /// are permitted; the length prefix makes them unambiguous.
    pub fn put_string(&mut self, s: &str) -> &mut Self {
        self.flip_to_write();
        let prefix = self.write_position;
        self.put_int32(0);
        utf8::write_utf8(self, s);
        self.push_byte(0);
        let measured = (self.write_position - prefix - 4) as i32;
        self.patch_int32(prefix, measured);
        self
    }

    /// Writes a symbol's textual form; identical on the wire to
    /// [`put_string`](Self::put_string).
    pub fn put_symbol(&mut self, s: &str) -> &mut Self {
        self.put_string(s)
    }

    /// Writes a decimal128 value as two little-endian 64-bit halves, low
    /// half first (IEEE 754-2008 decimal128, caller-supplied halves).
    pub fn put_decimal128(&mut self, low: u64, high: u64) -> &mut Self {
        self.push_slice(&low.to_le_bytes());
        self.push_slice(&high.to_le_bytes());
        self
    }

    /// Overwrites 4 bytes at an already-written absolute `position` with a
    /// new little-endian 32-bit value. Used to backfill a length field
    /// after its payload is known.
    ///
    /// Fails with an [`InvalidArgument`] error if fewer than 4 bytes have
    /// been written or if `position` extends past the write boundary.
    ///
    /// [`InvalidArgument`]: crate::error::ErrorKind::InvalidArgument
    pub fn replace_int32(&mut self, position: usize, value: i32) -> Result<&mut Self, EncodeError> {
        if self.write_position < 4 {
            return Err(EncodeError::ReplaceUnderflow {
                write_position: self.write_position,
            });
        }
        if position > self.write_position - 4 {
            return Err(EncodeError::ReplaceOutOfBounds {
                position,
                write_position: self.write_position,
            });
        }
        self.patch_int32(position, value);
        Ok(self)
    }

    // =========================================================================
    // READ OPERATIONS
    // =========================================================================

    /// Reads a single byte.
    pub fn get_byte(&mut self) -> Result<u8, DecodeError> {
        self.ensure_read(1, "byte")?;
        let byte = self.data[self.read_position];
        self.read_position += 1;
        Ok(byte)
    }

    /// Reads exactly `n` bytes.
    pub fn get_bytes(&mut self, n: usize) -> Result<Vec<u8>, DecodeError> {
        self.ensure_read(n, "bytes")?;
        let bytes = self.data[self.read_position..self.read_position + n].to_vec();
        self.read_position += n;
        Ok(bytes)
    }

    /// Reads a 32-bit signed integer, little-endian.
    pub fn get_int32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_le_bytes(self.take_array("int32")?))
    }

    /// Reads a 32-bit unsigned integer, little-endian.
    ///
    /// A negative two's-complement bit pattern is reinterpreted as its
    /// unsigned magnitude, so the decode of `0xFFFFFFFF` is `2^32 - 1`,
    /// matching the encode-side upper bound exactly.
    pub fn get_uint32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.take_array("uint32")?))
    }

    /// Reads a 64-bit signed integer, little-endian.
    pub fn get_int64(&mut self) -> Result<i64, DecodeError> {
        Ok(i64::from_le_bytes(self.take_array("int64")?))
    }

    /// Reads an IEEE-754 binary64 double, little-endian.
    pub fn get_double(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_le_bytes(self.take_array("double")?))
    }

    /// Reads a NUL-terminated UTF-8 string, consuming the terminator.
    ///
    /// Scans forward for the NUL within the readable region; a missing
    /// terminator or invalid UTF-8 is a [`DecodeError`].
    pub fn get_cstring(&mut self) -> Result<String, DecodeError> {
        self.flip_to_read();
        let start = self.read_position;
        let region = &self.data[start..self.write_position];
        let len = region
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::MissingNullTerminator {
                position: self.write_position,
            })?;
        let s = utf8::validate(&region[..len], "cstring")?.to_string();
        self.read_position += len + 1;
        Ok(s)
    }

    /// Reads a length-prefixed UTF-8 string, stripping the trailing NUL.
    ///
    /// Fails with a [`DecodeError`] if the declared length exceeds the
    /// bytes available, the final byte is not NUL, or the payload is not
    /// valid UTF-8.
    pub fn get_string(&mut self) -> Result<String, DecodeError> {
        let length = self.get_int32()?;
        if length < 1 {
            return Err(DecodeError::InvalidStringLength { length });
        }
        let needed = length as usize;
        self.ensure_read(needed, "string")?;
        let start = self.read_position;
        if self.data[start + needed - 1] != 0 {
            return Err(DecodeError::MissingNullTerminator {
                position: start + needed - 1,
            });
        }
        let s = utf8::validate(&self.data[start..start + needed - 1], "string")?.to_string();
        self.read_position += needed;
        Ok(s)
    }

    /// Reads the 16 bytes of a decimal128 value.
    pub fn get_decimal128_bytes(&mut self) -> Result<[u8; 16], DecodeError> {
        self.take_array("decimal128")
    }

    #[inline]
    fn take_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], DecodeError> {
        self.ensure_read(N, context)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.read_position..self.read_position + N]);
        self.read_position += N;
        Ok(out)
    }

    // =========================================================================
    // CURSOR & MATERIALIZATION
    // =========================================================================

    /// Resets to read mode at the start of the buffer, so a fully written
    /// buffer can be re-read from position 0.
    pub fn rewind(&mut self) -> &mut Self {
        self.flip_to_read();
        self.read_position = 0;
        self
    }

    /// Returns the number of meaningful bytes: everything written so far in
    /// write mode, or the remaining unread bytes in read mode.
    pub fn len(&self) -> usize {
        match self.mode {
            Mode::Write => self.write_position,
            Mode::Read => self.write_position - self.read_position,
        }
    }

    /// Returns true if [`len`](Self::len) is zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current read cursor.
    pub fn read_position(&self) -> usize {
        self.read_position
    }

    /// Returns the current write cursor, which equals the number of bytes
    /// produced so far.
    pub fn write_position(&self) -> usize {
        self.write_position
    }

    /// Flips to read mode if needed and returns an owned copy of the bytes
    /// written so far. The canonical way to materialize a finished write
    /// session; the copy is never invalidated by later growth.
    pub fn to_bytes(&mut self) -> Vec<u8> {
        self.flip_to_read();
        self.data[..self.write_position].to_vec()
    }
}

impl Default for ByteBuf {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use proptest::prelude::*;

    #[test]
    fn two_int32s_exact_layout() {
        let bytes = ByteBuf::new().put_int32(1).put_int32(2).to_bytes();
        assert_eq!(bytes, [0x01, 0, 0, 0, 0x02, 0, 0, 0]);
    }

    #[test]
    fn string_exact_layout() {
        let bytes = ByteBuf::new().put_string("ab").to_bytes();
        assert_eq!(bytes, [0x03, 0, 0, 0, 0x61, 0x62, 0x00]);
    }

    #[test]
    fn symbol_matches_string_layout() {
        let a = ByteBuf::new().put_symbol("miku").to_bytes();
        let b = ByteBuf::new().put_string("miku").to_bytes();
        assert_eq!(a, b);
    }

    #[test]
    fn string_with_interior_nul_roundtrips() {
        let mut buf = ByteBuf::new();
        buf.put_string("a\0b");
        assert_eq!(buf.to_bytes(), [0x04, 0, 0, 0, 0x61, 0x00, 0x62, 0x00]);
        assert_eq!(buf.get_string().unwrap(), "a\0b");
    }

    #[test]
    fn int32_roundtrip_edges() {
        for v in [0, 1, -1, i32::MIN, i32::MAX] {
            let mut buf = ByteBuf::new();
            buf.put_int32(v);
            assert_eq!(buf.get_int32().unwrap(), v, "failed for {v}");
        }
    }

    #[test]
    fn int64_roundtrip_edges() {
        for v in [0, 1, -1, i64::MIN, i64::MAX] {
            let mut buf = ByteBuf::new();
            buf.put_int64(v);
            assert_eq!(buf.get_int64().unwrap(), v, "failed for {v}");
        }
    }

    #[test]
    fn uint32_accepts_bounds_and_roundtrips() {
        for v in [0i64, u32::MAX as i64] {
            let mut buf = ByteBuf::new();
            buf.put_uint32(v).unwrap();
            assert_eq!(buf.get_uint32().unwrap() as i64, v, "failed for {v}");
        }
    }

    #[test]
    fn uint32_rejects_out_of_range() {
        let mut buf = ByteBuf::new();
        let err = buf.put_uint32(-1).unwrap_err();
        assert_eq!(err, EncodeError::Uint32OutOfRange { value: -1 });
        assert_eq!(err.kind(), ErrorKind::Range);
        assert!(buf.put_uint32(1 << 32).is_err());
        // Nothing was written by the failed puts.
        assert_eq!(buf.write_position(), 0);
    }

    #[test]
    fn uint32_decodes_negative_bit_pattern_as_magnitude() {
        let mut buf = ByteBuf::new();
        buf.put_int32(-1);
        assert_eq!(buf.get_uint32().unwrap(), u32::MAX);
    }

    #[test]
    fn cstring_roundtrips_unicode() {
        let mut buf = ByteBuf::new();
        buf.put_cstring("héllo").unwrap();
        assert_eq!(buf.get_cstring().unwrap(), "héllo");
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn cstring_rejects_interior_nul() {
        let mut buf = ByteBuf::new();
        let err = buf.put_cstring("a\0b").unwrap_err();
        assert_eq!(err, EncodeError::InteriorNul { offset: 1 });
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(buf.write_position(), 0);
    }

    #[test]
    fn get_cstring_without_terminator_fails() {
        let mut buf = ByteBuf::from_bytes(b"abc");
        assert!(matches!(
            buf.get_cstring(),
            Err(DecodeError::MissingNullTerminator { .. })
        ));
    }

    #[test]
    fn get_string_truncated_payload_fails() {
        // Declared length 5, only 3 bytes follow the prefix.
        let mut buf = ByteBuf::from_bytes(&[0x05, 0, 0, 0, 0x61, 0x62, 0x00]);
        assert!(matches!(
            buf.get_string(),
            Err(DecodeError::UnexpectedEof { context: "string", .. })
        ));
    }

    #[test]
    fn get_string_without_trailing_nul_fails() {
        let mut buf = ByteBuf::from_bytes(&[0x03, 0, 0, 0, 0x61, 0x62, 0x63]);
        assert!(matches!(
            buf.get_string(),
            Err(DecodeError::MissingNullTerminator { .. })
        ));
    }

    #[test]
    fn get_string_invalid_utf8_fails() {
        let mut buf = ByteBuf::from_bytes(&[0x03, 0, 0, 0, 0xFF, 0xFE, 0x00]);
        assert_eq!(
            buf.get_string(),
            Err(DecodeError::InvalidUtf8 { context: "string" })
        );
    }

    #[test]
    fn get_string_nonpositive_length_fails() {
        let mut buf = ByteBuf::from_bytes(&[0, 0, 0, 0]);
        assert_eq!(
            buf.get_string(),
            Err(DecodeError::InvalidStringLength { length: 0 })
        );
    }

    #[test]
    fn decimal128_layout_and_roundtrip() {
        let mut buf = ByteBuf::new();
        buf.put_decimal128(1, 2);
        let bytes = buf.get_decimal128_bytes().unwrap();
        assert_eq!(bytes[..8], 1u64.to_le_bytes());
        assert_eq!(bytes[8..], 2u64.to_le_bytes());
    }

    #[test]
    fn replace_int32_matches_direct_write() {
        let mut patched = ByteBuf::new();
        patched.put_int32(100);
        patched.replace_int32(0, 999).unwrap();

        let direct = ByteBuf::new().put_int32(999).to_bytes();
        assert_eq!(patched.to_bytes(), direct);
    }

    #[test]
    fn replace_int32_bounds() {
        let mut buf = ByteBuf::new();
        buf.put_int32(7);
        assert_eq!(
            buf.replace_int32(1, 0).unwrap_err(),
            EncodeError::ReplaceOutOfBounds {
                position: 1,
                write_position: 4
            }
        );

        let mut short = ByteBuf::new();
        short.put_byte(0);
        assert_eq!(
            short.replace_int32(0, 0).unwrap_err(),
            EncodeError::ReplaceUnderflow { write_position: 1 }
        );
    }

    #[test]
    fn growth_is_transparent() {
        // Well past the 1024-byte initial capacity.
        let chunk = [0xABu8; 100];
        let mut grown = ByteBuf::new();
        for _ in 0..50 {
            grown.put_bytes(&chunk);
        }

        let mut presized = ByteBuf::new();
        presized.put_bytes(&vec![0xAB; 5000]);

        assert_eq!(grown.to_bytes(), presized.to_bytes());
    }

    #[test]
    fn growth_preserves_earlier_copies() {
        let mut buf = ByteBuf::new();
        buf.put_int32(42);
        let before = buf.to_bytes();
        buf.put_bytes(&[0u8; 4096]);
        assert_eq!(before, 42i32.to_le_bytes());
    }

    #[test]
    fn single_byte_growth_path() {
        let mut buf = ByteBuf::new();
        for i in 0..2000u32 {
            buf.put_byte((i % 251) as u8);
        }
        let bytes = buf.to_bytes();
        assert_eq!(bytes.len(), 2000);
        assert_eq!(bytes[1999], (1999 % 251) as u8);
    }

    #[test]
    fn rewind_restarts_reading() {
        let mut buf = ByteBuf::new();
        buf.put_int32(5).put_int32(6);
        assert_eq!(buf.get_int32().unwrap(), 5);
        buf.rewind();
        assert_eq!(buf.read_position(), 0);
        assert_eq!(buf.get_int32().unwrap(), 5);
        assert_eq!(buf.get_int32().unwrap(), 6);
    }

    #[test]
    fn len_tracks_mode() {
        let mut buf = ByteBuf::new();
        buf.put_int64(9);
        assert_eq!(buf.len(), 8);
        buf.get_int32().unwrap();
        // Read mode: remaining unread bytes.
        assert_eq!(buf.len(), 4);
    }

    #[test]
    fn from_bytes_starts_in_read_mode() {
        let mut buf = ByteBuf::from_bytes(&[0x2A, 0, 0, 0]);
        assert_eq!(buf.len(), 4);
        assert_eq!(buf.get_int32().unwrap(), 42);
        assert!(buf.is_empty());
    }

    #[test]
    fn write_after_read_appends() {
        let mut buf = ByteBuf::new();
        buf.put_int32(1);
        assert_eq!(buf.get_int32().unwrap(), 1);
        buf.put_int32(2);
        assert_eq!(buf.get_int32().unwrap(), 2);
        assert_eq!(buf.write_position(), 8);
    }

    #[test]
    fn get_bytes_eof() {
        let mut buf = ByteBuf::from_bytes(&[1, 2, 3]);
        assert_eq!(buf.get_bytes(2).unwrap(), vec![1, 2]);
        assert_eq!(
            buf.get_bytes(2),
            Err(DecodeError::UnexpectedEof {
                context: "bytes",
                needed: 2,
                available: 1
            })
        );
    }

    proptest! {
        #[test]
        fn int32_roundtrip(v: i32) {
            let mut buf = ByteBuf::new();
            buf.put_int32(v);
            prop_assert_eq!(buf.get_int32().unwrap(), v);
        }

        #[test]
        fn int64_roundtrip(v: i64) {
            let mut buf = ByteBuf::new();
            buf.put_int64(v);
            prop_assert_eq!(buf.get_int64().unwrap(), v);
        }

        #[test]
        fn double_roundtrip(v: f64) {
            let mut buf = ByteBuf::new();
            buf.put_double(v);
            let back = buf.get_double().unwrap();
            prop_assert_eq!(back.to_bits(), v.to_bits());
        }

        #[test]
        fn uint32_roundtrip(v in 0i64..=u32::MAX as i64) {
            let mut buf = ByteBuf::new();
            buf.put_uint32(v).unwrap();
            prop_assert_eq!(buf.get_uint32().unwrap() as i64, v);
        }

        #[test]
        fn string_roundtrip(s in "\\PC*") {
            let mut buf = ByteBuf::new();
            buf.put_string(&s);
            prop_assert_eq!(buf.get_string().unwrap(), s);
        }

        #[test]
        fn cstring_roundtrip(s in "[^\0]*") {
            let mut buf = ByteBuf::new();
            buf.put_cstring(&s).unwrap();
            prop_assert_eq!(buf.get_cstring().unwrap(), s);
        }

        #[test]
        fn decimal128_roundtrip(low: u64, high: u64) {
            let mut buf = ByteBuf::new();
            buf.put_decimal128(low, high);
            let bytes = buf.get_decimal128_bytes().unwrap();
            prop_assert_eq!(&bytes[..8], low.to_le_bytes());
            prop_assert_eq!(&bytes[8..], high.to_le_bytes());
        }
    }
}
