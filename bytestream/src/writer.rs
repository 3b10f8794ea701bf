//! Byte-level writer with backpatching.

use crate::error::{StreamError, StreamResult};

/// A growable byte writer for encoding little-endian binary data.
///
/// Fields whose value is only known once later bytes are written (lengths,
/// checksums) are reserved with a placeholder and filled in with the
/// [`ByteWriter::patch_u16`].
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    bytes: Vec<u8>,
}

impl ByteWriter {
    /// Creates a new empty `ByteWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `ByteWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the written bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the bytes written since `start`.
    #[must_use]
    pub fn written_since(&self, start: usize) -> &[u8] {
        &self.bytes[start.min(self.bytes.len())..]
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.bytes.push(u8::from(value));
    }

    pub fn write_u16(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a 7-bit continuation varint `u32`.
    pub fn write_varu32(&mut self, mut value: u32) {
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            self.bytes.push(byte);
            if value == 0 {
                break;
            }
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Writes a `u16` length-prefixed UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::LengthOverflow`] if the string is longer than
    /// `u16::MAX` bytes.
    pub fn write_string(&mut self, value: &str) -> StreamResult<()> {
        let len = u16::try_from(value.len()).map_err(|_| StreamError::LengthOverflow {
            length: value.len(),
            max: usize::from(u16::MAX),
        })?;
        self.write_u16(len);
        self.write_bytes(value.as_bytes());
        Ok(())
    }

    /// Overwrites a previously written little-endian `u16`.
    pub fn patch_u16(&mut self, position: usize, value: u16) -> StreamResult<()> {
        self.patch(position, &value.to_le_bytes())
    }

    /// Finishes writing and returns the byte buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }

    /// Discards everything written after the first `len` bytes.
    ///
    /// Has no effect if `len` is not shorter than what was written.
    pub fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    fn patch(&mut self, position: usize, value: &[u8]) -> StreamResult<()> {
        let end = position.checked_add(value.len());
        match end {
            Some(end) if end <= self.bytes.len() => {
                self.bytes[position..end].copy_from_slice(value);
                Ok(())
            }
            _ => Err(StreamError::PatchOutOfBounds {
                position,
                width: value.len(),
                written: self.bytes.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_writer() {
        let writer = ByteWriter::new();
        assert_eq!(writer.len(), 0);
        assert!(writer.is_empty());
        assert!(writer.finish().is_empty());
    }

    #[test]
    fn write_u16_little_endian() {
        let mut writer = ByteWriter::new();
        writer.write_u16(0xABCD);
        assert_eq!(writer.finish(), vec![0xCD, 0xAB]);
    }

    #[test]
    fn write_u32_little_endian() {
        let mut writer = ByteWriter::new();
        writer.write_u32(0xDEAD_BEEF);
        assert_eq!(writer.finish(), vec![0xEF, 0xBE, 0xAD, 0xDE]);
    }

    #[test]
    fn write_varu32_multi_byte() {
        let mut writer = ByteWriter::new();
        writer.write_varu32(300);
        assert_eq!(writer.finish(), vec![0xAC, 0x02]);
    }

    #[test]
    fn patch_length_placeholder() {
        let mut writer = ByteWriter::new();
        writer.write_u16(0);
        writer.write_bytes(&[1, 2, 3]);
        let len = writer.len() as u16;
        writer.patch_u16(0, len).unwrap();
        assert_eq!(writer.finish(), vec![5, 0, 1, 2, 3]);
    }

    #[test]
    fn patch_out_of_bounds() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0);
        let err = writer.patch_u16(0, 1).unwrap_err();
        assert_eq!(
            err,
            StreamError::PatchOutOfBounds {
                position: 0,
                width: 2,
                written: 1
            }
        );
    }

    #[test]
    fn patch_position_overflow_is_rejected() {
        let mut writer = ByteWriter::new();
        writer.write_u8(0);
        assert!(writer.patch_u16(usize::MAX, 1).is_err());
    }

    #[test]
    fn write_string_too_long() {
        let mut writer = ByteWriter::new();
        let long = "x".repeat(usize::from(u16::MAX) + 1);
        let err = writer.write_string(&long).unwrap_err();
        assert!(matches!(err, StreamError::LengthOverflow { .. }));
        assert!(writer.is_empty());
    }

    #[test]
    fn written_since() {
        let mut writer = ByteWriter::new();
        writer.write_bytes(&[1, 2, 3, 4]);
        assert_eq!(writer.written_since(1), &[2, 3, 4]);
        assert!(writer.written_since(10).is_empty());
    }

    #[test]
    fn truncate_rolls_back() {
        let mut writer = ByteWriter::new();
        writer.write_u16(0x0102);
        let mark = writer.len();
        writer.write_bytes(&[9, 9, 9]);
        writer.truncate(mark);
        assert_eq!(writer.as_slice(), &[0x02, 0x01]);

        writer.truncate(10);
        assert_eq!(writer.len(), 2);
    }
}
