//! Frame decoding and encoding.

use bytestream::{ByteReader, ByteWriter};

use crate::error::{FrameEncodeError, FrameError, FrameResult, LimitKind};
use crate::header::{FrameHeader, SubChannel, BASE_HEADER_SIZE};
use crate::limits::Limits;

/// A decoded frame borrowing its payload from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub header: FrameHeader,
    pub payload: &'a [u8],
}

impl Frame<'_> {
    /// Total bytes the frame occupied in the stream.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.header.length)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Reads the declared length of the frame at the start of `buf`.
///
/// Validates the length against the header size and `limits` but does not
/// require the whole frame to be present.
pub fn peek_frame_length(buf: &[u8], limits: &Limits) -> FrameResult<usize> {
    if buf.len() < BASE_HEADER_SIZE {
        return Err(FrameError::Incomplete {
            needed: BASE_HEADER_SIZE,
            available: buf.len(),
        });
    }
    let declared = usize::from(u16::from_le_bytes([buf[0], buf[1]]));
    let minimum = SubChannel::new(buf[2]).header_size();
    if declared < minimum {
        return Err(FrameError::InvalidLength { declared, minimum });
    }
    if declared > limits.max_frame_bytes {
        return Err(FrameError::LimitsExceeded {
            kind: LimitKind::FrameBytes,
            limit: limits.max_frame_bytes,
            actual: declared,
        });
    }
    Ok(declared)
}

/// Decodes the frame at the start of `buf`.
///
/// Bytes after the declared length belong to the next frame and are left
/// untouched; use [`Frame::len`] to advance.
pub fn decode_frame<'a>(buf: &'a [u8], limits: &Limits) -> FrameResult<Frame<'a>> {
    let declared = peek_frame_length(buf, limits)?;
    if declared > buf.len() {
        return Err(FrameError::Incomplete {
            needed: declared,
            available: buf.len(),
        });
    }

    let frame = &buf[..declared];
    let mut reader = ByteReader::new(frame);
    let header = read_header(&mut reader).map_err(|_| FrameError::Incomplete {
        needed: declared,
        available: frame.len(),
    })?;
    let payload = reader.read_remaining();
    Ok(Frame { header, payload })
}

fn read_header(reader: &mut ByteReader<'_>) -> bytestream::StreamResult<FrameHeader> {
    let length = reader.read_u16()?;
    let sub_channel = SubChannel::new(reader.read_u8()?);
    let _padding = reader.read_u8()?;
    let mut header = FrameHeader {
        length,
        sub_channel,
        sequence: 0,
        marker: 0,
    };
    if !sub_channel.is_reliable_stream() {
        header.sequence = reader.read_u32()?;
        header.marker = reader.read_u32()?;
        let _reserved = reader.read_u32()?;
    }
    Ok(header)
}

/// Position bookkeeping for a frame under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a started frame must be finished to backpatch its length"]
pub struct FrameMark {
    start: usize,
    payload_start: usize,
}

impl FrameMark {
    /// Writer position where the frame payload begins.
    #[must_use]
    pub const fn payload_start(&self) -> usize {
        self.payload_start
    }
}

/// Writes a frame header with a placeholder length.
///
/// The caller appends the payload and then calls [`finish_frame`]. The
/// `length` field of `header` is ignored.
pub fn begin_frame(writer: &mut ByteWriter, header: &FrameHeader) -> FrameMark {
    let start = writer.len();
    writer.write_u16(0);
    writer.write_u8(header.sub_channel.raw());
    writer.write_u8(0);
    if !header.sub_channel.is_reliable_stream() {
        writer.write_u32(header.sequence);
        writer.write_u32(header.marker);
        writer.write_u32(0);
    }
    FrameMark {
        start,
        payload_start: writer.len(),
    }
}

/// Backpatches the length of a frame started with [`begin_frame`].
///
/// Returns the total frame length.
pub fn finish_frame(writer: &mut ByteWriter, mark: FrameMark) -> Result<usize, FrameEncodeError> {
    let length = writer.len() - mark.start;
    let length_u16 =
        u16::try_from(length).map_err(|_| FrameEncodeError::FrameTooLarge { length })?;
    writer.patch_u16(mark.start, length_u16)?;
    Ok(length)
}

/// Encodes a complete frame around `payload`.
pub fn encode_frame(
    header: &FrameHeader,
    payload: &[u8],
    writer: &mut ByteWriter,
) -> Result<usize, FrameEncodeError> {
    let mark = begin_frame(writer, header);
    writer.write_bytes(payload);
    finish_frame(writer, mark)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{SEQUENCED_HEADER_SIZE, SEQUENCE_MARKER};

    #[test]
    fn reliable_frame_layout() {
        let mut writer = ByteWriter::new();
        let len = encode_frame(&FrameHeader::reliable(), &[0xAA, 0xBB], &mut writer).unwrap();
        assert_eq!(len, 6);
        assert_eq!(writer.finish(), vec![6, 0, 0, 0, 0xAA, 0xBB]);
    }

    #[test]
    fn sequenced_frame_layout() {
        let mut writer = ByteWriter::new();
        let header = FrameHeader::sequenced(SubChannel::new(2), 0x0102_0304);
        encode_frame(&header, &[0x11], &mut writer).unwrap();
        let bytes = writer.finish();
        assert_eq!(bytes.len(), SEQUENCED_HEADER_SIZE + 1);
        assert_eq!(&bytes[0..4], &[17, 0, 2, 0]);
        assert_eq!(&bytes[4..8], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[8..12], &SEQUENCE_MARKER.to_le_bytes());
        assert_eq!(&bytes[12..16], &[0, 0, 0, 0]);
        assert_eq!(bytes[16], 0x11);
    }

    #[test]
    fn decode_roundtrip_sequenced() {
        let mut writer = ByteWriter::new();
        let header = FrameHeader::sequenced(SubChannel::new(5), 42);
        encode_frame(&header, &[1, 2, 3], &mut writer).unwrap();
        let bytes = writer.finish();

        let frame = decode_frame(&bytes, &Limits::for_testing()).unwrap();
        assert_eq!(frame.header.sub_channel, SubChannel::new(5));
        assert_eq!(frame.header.sequence, 42);
        assert_eq!(frame.header.marker, SEQUENCE_MARKER);
        assert_eq!(frame.payload, &[1, 2, 3]);
        assert_eq!(frame.len(), bytes.len());
    }

    #[test]
    fn decode_requires_four_bytes() {
        let err = decode_frame(&[10, 0, 0], &Limits::default()).unwrap_err();
        assert_eq!(
            err,
            FrameError::Incomplete {
                needed: 4,
                available: 3
            }
        );
    }

    #[test]
    fn decode_declared_length_exceeds_available() {
        let mut buf = vec![0u8; 200];
        buf[0..2].copy_from_slice(&500u16.to_le_bytes());
        let err = decode_frame(&buf, &Limits::default()).unwrap_err();
        assert_eq!(
            err,
            FrameError::Incomplete {
                needed: 500,
                available: 200
            }
        );
    }

    #[test]
    fn decode_rejects_length_shorter_than_header() {
        let buf = [3u8, 0, 0, 0];
        let err = decode_frame(&buf, &Limits::default()).unwrap_err();
        assert_eq!(
            err,
            FrameError::InvalidLength {
                declared: 3,
                minimum: 4
            }
        );

        let buf = [8u8, 0, 1, 0, 0, 0, 0, 0];
        let err = decode_frame(&buf, &Limits::default()).unwrap_err();
        assert!(matches!(err, FrameError::InvalidLength { minimum: 16, .. }));
    }

    #[test]
    fn decode_enforces_frame_limit() {
        let mut buf = vec![0u8; 5000];
        buf[0..2].copy_from_slice(&5000u16.to_le_bytes());
        let err = decode_frame(&buf, &Limits::for_testing()).unwrap_err();
        assert!(matches!(
            err,
            FrameError::LimitsExceeded {
                kind: LimitKind::FrameBytes,
                ..
            }
        ));
    }

    #[test]
    fn decode_leaves_trailing_bytes() {
        let buf = [4u8, 0, 0, 0, 9, 9];
        let frame = decode_frame(&buf, &Limits::default()).unwrap();
        assert!(frame.is_empty());
        assert_eq!(frame.len(), 4);
    }

    #[test]
    fn decode_ignores_padding_byte() {
        let buf = [5u8, 0, 0, 0xFF, 7];
        let frame = decode_frame(&buf, &Limits::default()).unwrap();
        assert_eq!(frame.payload, &[7]);
    }

    #[test]
    fn finish_frame_rejects_oversize() {
        let mut writer = ByteWriter::new();
        let mark = begin_frame(&mut writer, &FrameHeader::reliable());
        writer.write_bytes(&vec![0u8; usize::from(u16::MAX)]);
        let err = finish_frame(&mut writer, mark).unwrap_err();
        assert!(matches!(err, FrameEncodeError::FrameTooLarge { .. }));
    }

    #[test]
    fn frames_can_be_appended_back_to_back() {
        let mut writer = ByteWriter::new();
        encode_frame(&FrameHeader::reliable(), &[1], &mut writer).unwrap();
        encode_frame(&FrameHeader::sequenced(SubChannel::new(1), 3), &[2], &mut writer).unwrap();
        let bytes = writer.finish();

        let first = decode_frame(&bytes, &Limits::default()).unwrap();
        assert_eq!(first.payload, &[1]);
        let second = decode_frame(&bytes[first.len()..], &Limits::default()).unwrap();
        assert_eq!(second.payload, &[2]);
        assert_eq!(second.header.sequence, 3);
    }
}
