//! Protocol packet encoding and decoding.
//!
//! A packet is one frame whose payload holds the message header followed by
//! the inner message stream:
//!
//! ```text
//! header:  flags u8 | packed type u16 | checksum u8 | [method u8 | [size u32]]
//! inner:   flags u8 | sync open u8 | [subtype u8] | body .. | sync close u8 | checksum u8
//! ```
//!
//! Both checksums are verified before the bytes they cover are interpreted.

use std::borrow::Cow;

use bytestream::{ByteReader, ByteWriter};
use wire::{begin_frame, decode_frame, finish_frame, Frame, FrameHeader, SubChannel};

use crate::checksum::xor_checksum;
use crate::compression::{deflate, inflate, CompressionMethod};
use crate::error::{ChecksumRegion, CodecError, CodecResult};
use crate::header::{PacketType, ProtocolFlags, SYNC_CLOSE, SYNC_OPEN};
use crate::limits::CodecLimits;
use crate::message::DynMessage;
use crate::registry::{Direction, MessageRegistry};

/// How the inner message stream is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Compression {
    /// Compression flag clear; inner stream follows the header checksum.
    #[default]
    Disabled,
    /// Compression flag set with method 0; inner stream stored as-is.
    Stored,
    /// Compression flag set with method 1; inner stream deflated.
    Deflate,
}

impl Compression {
    const fn method(self) -> Option<CompressionMethod> {
        match self {
            Self::Disabled => None,
            Self::Stored => Some(CompressionMethod::None),
            Self::Deflate => Some(CompressionMethod::Deflate),
        }
    }
}

/// One decoded (or to-be-encoded) message with its transport metadata.
#[derive(Debug, Clone)]
pub struct ProtocolPacket {
    pub sub_channel: SubChannel,
    /// Sequence number; always 0 on the reliable stream.
    pub sequence: u32,
    pub flags: ProtocolFlags,
    pub compression: Compression,
    pub message: Box<dyn DynMessage>,
}

impl PartialEq for ProtocolPacket {
    fn eq(&self, other: &Self) -> bool {
        self.sub_channel == other.sub_channel
            && self.sequence == other.sequence
            && self.flags == other.flags
            && self.compression == other.compression
            && self.message.eq_dyn(other.message.as_ref())
    }
}

impl ProtocolPacket {
    /// Packet on the reliable stream with default flags, uncompressed.
    #[must_use]
    pub fn reliable(message: Box<dyn DynMessage>) -> Self {
        Self {
            sub_channel: SubChannel::RELIABLE_STREAM,
            sequence: 0,
            flags: ProtocolFlags::default(),
            compression: Compression::Disabled,
            message,
        }
    }

    /// Packet on a sequenced sub-channel.
    ///
    /// On the reliable stream the sequence number is dropped.
    #[must_use]
    pub fn sequenced(sub_channel: SubChannel, sequence: u32, message: Box<dyn DynMessage>) -> Self {
        let header = FrameHeader::sequenced(sub_channel, sequence);
        Self {
            sub_channel: header.sub_channel,
            sequence: header.sequence,
            ..Self::reliable(message)
        }
    }

    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: ProtocolFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// A decoded packet and the number of input bytes its frame occupied.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPacket {
    pub packet: ProtocolPacket,
    /// Marker read from a sequenced frame header.
    pub marker: u32,
    pub frame_len: usize,
}

/// Encodes `packet` as one frame appended to `writer`.
///
/// Returns the frame length. On error nothing is appended: the writer is
/// rolled back to its length on entry.
pub fn encode_packet(
    packet: &ProtocolPacket,
    limits: &CodecLimits,
    writer: &mut ByteWriter,
) -> CodecResult<usize> {
    let packed = PacketType {
        opcode: packet.message.opcode(),
        compressed: packet.compression.method().is_some(),
    }
    .pack()?;
    let subtype = checked_subtype(packet.message.as_ref())?;

    let start = writer.len();
    let result = write_packet(packet, packed, subtype, limits, writer);
    if result.is_err() {
        writer.truncate(start);
    }
    result
}

/// Encodes `packet` into a fresh buffer.
pub fn encode_packet_to_vec(packet: &ProtocolPacket, limits: &CodecLimits) -> CodecResult<Vec<u8>> {
    let mut writer = ByteWriter::new();
    encode_packet(packet, limits, &mut writer)?;
    Ok(writer.finish())
}

fn checked_subtype(message: &dyn DynMessage) -> CodecResult<Option<u8>> {
    let Some(range) = message.subtype_range() else {
        return Ok(None);
    };
    let subtype = message.subtype();
    if !range.contains(subtype) {
        return Err(CodecError::SubtypeOutOfRange {
            opcode: message.opcode(),
            subtype,
            min: range.min,
            max: range.max,
        });
    }
    Ok(Some(subtype))
}

fn write_packet(
    packet: &ProtocolPacket,
    packed: u16,
    subtype: Option<u8>,
    limits: &CodecLimits,
    writer: &mut ByteWriter,
) -> CodecResult<usize> {
    let header = FrameHeader::sequenced(packet.sub_channel, packet.sequence);
    let mark = begin_frame(writer, &header);
    let payload_start = mark.payload_start();

    writer.write_u8(packet.flags.raw());
    writer.write_u16(packed);
    let checksum = xor_checksum(writer.written_since(payload_start));
    writer.write_u8(checksum);

    match packet.compression.method() {
        None => write_inner(packet, subtype, writer)?,
        Some(CompressionMethod::None) => {
            writer.write_u8(CompressionMethod::None.raw());
            write_inner(packet, subtype, writer)?;
        }
        Some(CompressionMethod::Deflate) => {
            let mut inner = ByteWriter::new();
            write_inner(packet, subtype, &mut inner)?;
            let inner = inner.finish();
            if inner.len() > limits.max_uncompressed_bytes {
                return Err(CodecError::UncompressedSizeExceedsLimit {
                    declared: inner.len(),
                    limit: limits.max_uncompressed_bytes,
                });
            }
            let size = u32::try_from(inner.len()).map_err(|_| {
                CodecError::UncompressedSizeExceedsLimit {
                    declared: inner.len(),
                    limit: u32::MAX as usize,
                }
            })?;
            let compressed = deflate(&inner)?;
            writer.write_u8(CompressionMethod::Deflate.raw());
            writer.write_u32(size);
            writer.write_bytes(&compressed);
        }
    }

    Ok(finish_frame(writer, mark)?)
}

fn write_inner(
    packet: &ProtocolPacket,
    subtype: Option<u8>,
    writer: &mut ByteWriter,
) -> CodecResult<()> {
    let start = writer.len();
    writer.write_u8(packet.flags.raw());
    writer.write_u8(SYNC_OPEN);
    if let Some(subtype) = subtype {
        writer.write_u8(subtype);
    }
    packet.message.encode_body(writer)?;
    writer.write_u8(SYNC_CLOSE);
    let checksum = xor_checksum(writer.written_since(start));
    writer.write_u8(checksum);
    Ok(())
}

/// Decodes the packet framed at the start of `bytes`.
///
/// Opcodes are resolved against the `direction` table of `registry` only.
pub fn decode_packet(
    registry: &MessageRegistry,
    direction: Direction,
    bytes: &[u8],
    wire_limits: &wire::Limits,
    limits: &CodecLimits,
) -> CodecResult<DecodedPacket> {
    let frame = decode_frame(bytes, wire_limits)?;
    let packet = decode_packet_from_frame(registry, direction, &frame, limits)?;
    Ok(DecodedPacket {
        packet,
        marker: frame.header.marker,
        frame_len: frame.len(),
    })
}

/// Decodes the message carried by an already-parsed frame.
pub fn decode_packet_from_frame(
    registry: &MessageRegistry,
    direction: Direction,
    frame: &Frame<'_>,
    limits: &CodecLimits,
) -> CodecResult<ProtocolPacket> {
    let mut reader = ByteReader::new(frame.payload);
    let start = reader.position();
    let raw_flags = reader.read_u8()?;
    let raw_type = reader.read_u16()?;
    let expected = xor_checksum(reader.consumed_since(start));
    let found = reader.read_u8()?;
    if found != expected {
        return Err(CodecError::ChecksumMismatch {
            region: ChecksumRegion::Header,
            expected,
            found,
        });
    }

    let flags = ProtocolFlags::from_raw(raw_flags)?;
    let packet_type = PacketType::unpack(raw_type);

    let (compression, inner): (Compression, Cow<'_, [u8]>) = if packet_type.compressed {
        match CompressionMethod::from_raw(reader.read_u8()?)? {
            CompressionMethod::None => (Compression::Stored, Cow::Borrowed(reader.read_remaining())),
            CompressionMethod::Deflate => {
                let declared = reader.read_u32()?;
                let inflated = inflate(reader.read_remaining(), declared, limits)?;
                (Compression::Deflate, Cow::Owned(inflated))
            }
        }
    } else {
        (Compression::Disabled, Cow::Borrowed(reader.read_remaining()))
    };

    let mut message = registry.resolve(direction, packet_type.opcode)?;
    read_inner(&inner, flags, message.as_mut())?;

    Ok(ProtocolPacket {
        sub_channel: frame.header.sub_channel,
        sequence: frame.header.sequence,
        flags,
        compression,
        message,
    })
}

fn read_inner(inner: &[u8], flags: ProtocolFlags, message: &mut dyn DynMessage) -> CodecResult<()> {
    let Some((&found, covered)) = inner.split_last() else {
        return Err(bytestream::StreamError::UnexpectedEof {
            requested: 1,
            available: 0,
        }
        .into());
    };
    let expected = xor_checksum(covered);
    if found != expected {
        return Err(CodecError::ChecksumMismatch {
            region: ChecksumRegion::Body,
            expected,
            found,
        });
    }

    let mut reader = ByteReader::new(covered);
    let inner_flags = reader.read_u8()?;
    if inner_flags != flags.raw() {
        return Err(CodecError::InvalidProtocolFlags { flags: inner_flags });
    }
    expect_sync(&mut reader, SYNC_OPEN)?;

    if let Some(range) = message.subtype_range() {
        let subtype = reader.read_u8()?;
        if !range.contains(subtype) {
            return Err(CodecError::SubtypeOutOfRange {
                opcode: message.opcode(),
                subtype,
                min: range.min,
                max: range.max,
            });
        }
        message.set_subtype(subtype);
    }

    message.decode_body(&mut reader)?;
    expect_sync(&mut reader, SYNC_CLOSE)?;

    if !reader.is_empty() {
        return Err(CodecError::TrailingData {
            remaining: reader.remaining(),
        });
    }
    Ok(())
}

fn expect_sync(reader: &mut ByteReader<'_>, expected: u8) -> CodecResult<()> {
    let found = reader.read_u8()?;
    if found != expected {
        return Err(CodecError::StreamSync { expected, found });
    }
    Ok(())
}
