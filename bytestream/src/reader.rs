//! Byte-level reader with bounded operations.

use crate::error::{StreamError, StreamResult};

/// A byte-level reader for decoding little-endian binary data.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a new `ByteReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of bytes remaining to read.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Returns `true` if there are no more bytes to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the current byte position.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the bytes consumed between `start` and the current position.
    ///
    /// Used for checksums over a region that has just been read.
    #[must_use]
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        let start = start.min(self.pos);
        &self.data[start..self.pos]
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> StreamResult<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Reads a byte as a boolean (any non-zero value is `true`).
    pub fn read_bool(&mut self) -> StreamResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Reads a little-endian `u16`.
    pub fn read_u16(&mut self) -> StreamResult<u16> {
        Ok(u16::from_le_bytes(self.read_array::<2>()?))
    }

    /// Reads a little-endian `u32`.
    pub fn read_u32(&mut self) -> StreamResult<u32> {
        Ok(u32::from_le_bytes(self.read_array::<4>()?))
    }

    /// Reads a little-endian `i32`.
    pub fn read_i32(&mut self) -> StreamResult<i32> {
        Ok(i32::from_le_bytes(self.read_array::<4>()?))
    }

    /// Reads a little-endian `u64`.
    pub fn read_u64(&mut self) -> StreamResult<u64> {
        Ok(u64::from_le_bytes(self.read_array::<8>()?))
    }

    /// Reads a little-endian IEEE-754 `f32`.
    pub fn read_f32(&mut self) -> StreamResult<f32> {
        Ok(f32::from_le_bytes(self.read_array::<4>()?))
    }

    /// Reads a 7-bit continuation varint `u32`.
    ///
    /// At most five bytes; a fifth byte carrying bits above bit 31 (or a
    /// continuation bit) is [`StreamError::InvalidVarint`].
    pub fn read_varu32(&mut self) -> StreamResult<u32> {
        let mut result = 0u32;
        for shift in (0..28).step_by(7) {
            let byte = self.read_u8()?;
            result |= u32::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        let last = self.read_u8()?;
        if last & 0xF0 != 0 {
            return Err(StreamError::InvalidVarint);
        }
        Ok(result | (u32::from(last) << 28))
    }

    /// Reads exactly `len` bytes, borrowing from the underlying buffer.
    pub fn read_bytes(&mut self, len: usize) -> StreamResult<&'a [u8]> {
        self.ensure(len)?;
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    /// Reads every remaining byte.
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let out = &self.data[self.pos.min(self.data.len())..];
        self.pos = self.data.len();
        out
    }

    /// Reads a `u16` length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> StreamResult<String> {
        let len = usize::from(self.read_u16()?);
        let position = self.pos;
        let bytes = self.read_bytes(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| StreamError::InvalidUtf8 { position })
    }

    fn ensure(&self, len: usize) -> StreamResult<()> {
        let available = self.remaining();
        if len > available {
            return Err(StreamError::UnexpectedEof {
                requested: len,
                available,
            });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> StreamResult<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_reader() {
        let reader = ByteReader::new(&[]);
        assert!(reader.is_empty());
        assert_eq!(reader.remaining(), 0);
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn read_from_empty_fails() {
        let mut reader = ByteReader::new(&[]);
        let result = reader.read_u8();
        assert!(matches!(
            result,
            Err(StreamError::UnexpectedEof {
                requested: 1,
                available: 0
            })
        ));
    }

    #[test]
    fn read_u32_little_endian() {
        let mut reader = ByteReader::new(&[0x78, 0x56, 0x34, 0x12]);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert!(reader.is_empty());
    }

    #[test]
    fn short_read_does_not_advance() {
        let mut reader = ByteReader::new(&[0x01, 0x02, 0x03]);
        assert!(reader.read_u32().is_err());
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u16().unwrap(), 0x0201);
    }

    #[test]
    fn read_varu32() {
        let mut reader = ByteReader::new(&[0xAC, 0x02]);
        assert_eq!(reader.read_varu32().unwrap(), 300);
    }

    #[test]
    fn read_varu32_max() {
        let mut reader = ByteReader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
        assert_eq!(reader.read_varu32().unwrap(), u32::MAX);
    }

    #[test]
    fn read_varu32_rejects_bits_above_32() {
        for last in [0x10, 0x1F, 0x7F] {
            let data = [0x80, 0x80, 0x80, 0x80, last];
            let mut reader = ByteReader::new(&data);
            let err = reader.read_varu32().unwrap_err();
            assert_eq!(err, StreamError::InvalidVarint);
        }
    }

    #[test]
    fn read_varu32_invalid() {
        let mut reader = ByteReader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]);
        let err = reader.read_varu32().unwrap_err();
        assert!(matches!(err, StreamError::InvalidVarint));
    }

    #[test]
    fn read_string() {
        let mut reader = ByteReader::new(&[0x02, 0x00, b'h', b'i', 0xAA]);
        assert_eq!(reader.read_string().unwrap(), "hi");
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn read_string_invalid_utf8() {
        let mut reader = ByteReader::new(&[0x01, 0x00, 0xFF]);
        let err = reader.read_string().unwrap_err();
        assert_eq!(err, StreamError::InvalidUtf8 { position: 2 });
    }

    #[test]
    fn consumed_since_tracks_region() {
        let mut reader = ByteReader::new(&[1, 2, 3, 4]);
        reader.read_u8().unwrap();
        let start = reader.position();
        reader.read_u16().unwrap();
        assert_eq!(reader.consumed_since(start), &[2, 3]);
    }

    #[test]
    fn read_remaining_drains() {
        let mut reader = ByteReader::new(&[9, 8, 7]);
        reader.read_u8().unwrap();
        assert_eq!(reader.read_remaining(), &[8, 7]);
        assert!(reader.is_empty());
        assert!(reader.read_remaining().is_empty());
    }
}
