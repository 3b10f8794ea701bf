//! Per-connection inbound decoding.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use wire::{decode_frame, FrameBuffer, SubChannel};

use crate::error::CodecResult;
use crate::limits::CodecLimits;
use crate::packet::{decode_packet_from_frame, ProtocolPacket};
use crate::registry::{Direction, MessageRegistry};

/// Counters kept by an [`InboundStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamStats {
    /// Packets returned to the caller.
    pub decoded: u64,
    /// Sequenced frames dropped because a newer sequence was already seen.
    pub stale: u64,
    /// Sequenced frames whose marker was not the expected constant.
    pub unexpected_markers: u64,
}

/// Decodes one connection's received bytes into packets, in arrival order.
///
/// Frames on the reliable stream are always delivered. On every other
/// sub-channel a frame whose sequence number is not newer than the last one
/// successfully decoded on that sub-channel is dropped.
#[derive(Debug)]
pub struct InboundStream {
    frames: FrameBuffer,
    registry: Arc<MessageRegistry>,
    direction: Direction,
    limits: CodecLimits,
    last_sequence: HashMap<SubChannel, u32>,
    stats: StreamStats,
}

impl InboundStream {
    #[must_use]
    pub fn new(
        registry: Arc<MessageRegistry>,
        direction: Direction,
        wire_limits: wire::Limits,
        limits: CodecLimits,
    ) -> Self {
        Self {
            frames: FrameBuffer::new(wire_limits),
            registry,
            direction,
            limits,
            last_sequence: HashMap::new(),
            stats: StreamStats::default(),
        }
    }

    /// Appends bytes received from the transport.
    pub fn push(&mut self, bytes: &[u8]) -> CodecResult<()> {
        self.frames.push(bytes)?;
        Ok(())
    }

    /// Returns the next decodable packet, or `None` until more bytes arrive.
    ///
    /// An error is terminal for the frame that produced it: the frame is
    /// consumed and its sequence is not recorded, so a later intact copy is
    /// still accepted. The owner decides what to do with the connection.
    pub fn next_packet(&mut self) -> CodecResult<Option<ProtocolPacket>> {
        while let Some(raw) = self.frames.next_frame()? {
            let frame = decode_frame(&raw, self.frames.limits())?;
            if !frame.header.has_expected_marker() {
                self.stats.unexpected_markers += 1;
                debug!(
                    sub_channel = frame.header.sub_channel.raw(),
                    marker = frame.header.marker,
                    "unexpected sequence marker"
                );
            }

            let sub_channel = frame.header.sub_channel;
            let sequence = frame.header.sequence;
            if self.is_stale(sub_channel, sequence) {
                self.stats.stale += 1;
                debug!(
                    sub_channel = sub_channel.raw(),
                    sequence, "dropping stale frame"
                );
                continue;
            }

            let packet = decode_packet_from_frame(&self.registry, self.direction, &frame, &self.limits)
                .map_err(|err| {
                    debug!(
                        sub_channel = sub_channel.raw(),
                        sequence,
                        error = %err,
                        "failed to decode packet"
                    );
                    err
                })?;
            self.record_sequence(sub_channel, sequence);
            self.stats.decoded += 1;
            return Ok(Some(packet));
        }
        Ok(None)
    }

    /// Drains every packet that can be decoded from the buffered bytes.
    pub fn drain_packets(&mut self) -> CodecResult<Vec<ProtocolPacket>> {
        let mut packets = Vec::new();
        while let Some(packet) = self.next_packet()? {
            packets.push(packet);
        }
        Ok(packets)
    }

    #[must_use]
    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// Bytes received but not yet part of a complete frame.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.frames.buffered()
    }

    fn is_stale(&self, sub_channel: SubChannel, sequence: u32) -> bool {
        if sub_channel.is_reliable_stream() {
            return false;
        }
        self.last_sequence
            .get(&sub_channel)
            .is_some_and(|&last| !is_newer(sequence, last))
    }

    fn record_sequence(&mut self, sub_channel: SubChannel, sequence: u32) {
        if !sub_channel.is_reliable_stream() {
            self.last_sequence.insert(sub_channel, sequence);
        }
    }
}

/// Wrapping comparison: `sequence` is newer if it lies in the half of the
/// sequence space ahead of `last`.
#[allow(clippy::cast_possible_wrap)]
const fn is_newer(sequence: u32, last: u32) -> bool {
    (sequence.wrapping_sub(last) as i32) > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{DynMessage, Message, Opcode};
    use crate::packet::encode_packet_to_vec;
    use bytestream::{ByteReader, ByteWriter};

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Tick(u32);

    impl Message for Tick {
        fn opcode(&self) -> Opcode {
            Opcode(0x30)
        }

        fn decode_body(&mut self, reader: &mut ByteReader<'_>) -> CodecResult<()> {
            self.0 = reader.read_u32()?;
            Ok(())
        }

        fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
            writer.write_u32(self.0);
            Ok(())
        }
    }

    fn stream() -> InboundStream {
        let mut registry = MessageRegistry::new();
        registry.register_message::<Tick>(Direction::Inbound).unwrap();
        InboundStream::new(
            Arc::new(registry),
            Direction::Inbound,
            wire::Limits::for_testing(),
            CodecLimits::for_testing(),
        )
    }

    fn frame(sub_channel: u8, sequence: u32, value: u32) -> Vec<u8> {
        let message: Box<dyn DynMessage> = Box::new(Tick(value));
        let packet = ProtocolPacket::sequenced(SubChannel::new(sub_channel), sequence, message);
        encode_packet_to_vec(&packet, &CodecLimits::for_testing()).unwrap()
    }

    fn values(packets: &[ProtocolPacket]) -> Vec<u32> {
        packets
            .iter()
            .map(|p| p.message.downcast_ref::<Tick>().unwrap().0)
            .collect()
    }

    #[test]
    fn newer_comparison_wraps() {
        assert!(is_newer(2, 1));
        assert!(!is_newer(1, 1));
        assert!(!is_newer(1, 2));
        assert!(is_newer(0, u32::MAX));
        assert!(!is_newer(u32::MAX, 0));
    }

    #[test]
    fn partial_frame_waits_for_more_bytes() {
        let mut stream = stream();
        let bytes = frame(0, 0, 7);
        stream.push(&bytes[..5]).unwrap();
        assert!(stream.next_packet().unwrap().is_none());
        stream.push(&bytes[5..]).unwrap();
        let packets = stream.drain_packets().unwrap();
        assert_eq!(values(&packets), vec![7]);
        assert_eq!(stream.buffered(), 0);
    }

    #[test]
    fn reliable_stream_never_drops() {
        let mut stream = stream();
        stream.push(&frame(0, 0, 1)).unwrap();
        stream.push(&frame(0, 0, 2)).unwrap();
        assert_eq!(values(&stream.drain_packets().unwrap()), vec![1, 2]);
        assert_eq!(stream.stats().stale, 0);
    }

    #[test]
    fn stale_sequences_dropped_per_sub_channel() {
        let mut stream = stream();
        stream.push(&frame(1, 10, 1)).unwrap();
        stream.push(&frame(1, 9, 2)).unwrap();
        stream.push(&frame(2, 3, 3)).unwrap();
        stream.push(&frame(1, 10, 4)).unwrap();
        stream.push(&frame(1, 11, 5)).unwrap();

        assert_eq!(values(&stream.drain_packets().unwrap()), vec![1, 3, 5]);
        let stats = stream.stats();
        assert_eq!(stats.decoded, 3);
        assert_eq!(stats.stale, 2);
    }

    #[test]
    fn unexpected_marker_is_counted_not_fatal() {
        let mut stream = stream();
        let mut bytes = frame(1, 1, 8);
        bytes[8] = 0;
        stream.push(&bytes).unwrap();
        assert_eq!(values(&stream.drain_packets().unwrap()), vec![8]);
        assert_eq!(stream.stats().unexpected_markers, 1);
    }

    #[test]
    fn decode_error_is_surfaced() {
        let mut stream = stream();
        let mut bytes = frame(0, 0, 8);
        let last = bytes.len() - 1;
        bytes[last] ^= 0x10;
        stream.push(&bytes).unwrap();
        assert!(stream.next_packet().is_err());
    }

    #[test]
    fn corrupt_frame_does_not_claim_its_sequence() {
        let mut stream = stream();
        let intact = frame(1, 5, 42);
        let mut corrupt = intact.clone();
        let last = corrupt.len() - 1;
        corrupt[last] ^= 0x01;

        stream.push(&corrupt).unwrap();
        stream.push(&intact).unwrap();
        let err = stream.next_packet().unwrap_err();
        assert!(matches!(err, crate::CodecError::ChecksumMismatch { .. }));

        assert_eq!(values(&stream.drain_packets().unwrap()), vec![42]);
        let stats = stream.stats();
        assert_eq!(stats.decoded, 1);
        assert_eq!(stats.stale, 0);

        stream.push(&frame(1, 5, 43)).unwrap();
        assert!(stream.drain_packets().unwrap().is_empty());
        assert_eq!(stream.stats().stale, 1);
    }
}
