use std::fmt::Write as _;

use codec::{
    decode_packet_from_frame, CodecLimits, Compression, Direction, Message, MessageRegistry,
    WireLimits,
};
use serde::Serialize;
use wire::decode_frame;

/// One frame of a capture. Exactly one of `packet` and `error` is set.
#[derive(Debug, Serialize)]
pub struct FrameReport {
    pub offset: usize,
    pub frame_len: usize,
    pub sub_channel: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_ok: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet: Option<PacketReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PacketReport {
    pub opcode: String,
    pub subtype: u8,
    pub compression: &'static str,
    pub dont_fragment: bool,
    /// `Debug` rendering of the decoded message.
    pub message: String,
}

/// Result of walking a capture frame by frame.
#[derive(Debug, Serialize)]
pub struct CaptureReport {
    pub direction: String,
    pub total_bytes: usize,
    pub frames: Vec<FrameReport>,
    /// Bytes after the last complete frame.
    pub trailing_bytes: usize,
    /// Set when framing itself broke and the walk stopped early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped: Option<String>,
}

impl CaptureReport {
    #[must_use]
    pub fn decoded(&self) -> usize {
        self.frames.iter().filter(|f| f.packet.is_some()).count()
    }
}

/// Walks `bytes` frame by frame, decoding each against `registry`.
///
/// Per-frame decode errors are recorded and the walk continues with the next
/// frame. Framing errors stop the walk.
pub fn inspect_capture(
    bytes: &[u8],
    registry: &MessageRegistry,
    direction: Direction,
    wire_limits: &WireLimits,
    limits: &CodecLimits,
) -> CaptureReport {
    let mut report = CaptureReport {
        direction: direction.to_string(),
        total_bytes: bytes.len(),
        frames: Vec::new(),
        trailing_bytes: 0,
        stopped: None,
    };

    let mut offset = 0;
    while offset < bytes.len() {
        let rest = &bytes[offset..];
        let frame = match decode_frame(rest, wire_limits) {
            Ok(frame) => frame,
            Err(err) if err.is_incomplete() => {
                report.trailing_bytes = rest.len();
                break;
            }
            Err(err) => {
                report.stopped = Some(format!("offset {offset}: {err}"));
                break;
            }
        };

        let header = frame.header;
        let sequenced = !header.sub_channel.is_reliable_stream();
        let mut entry = FrameReport {
            offset,
            frame_len: frame.len(),
            sub_channel: header.sub_channel.raw(),
            sequence: sequenced.then_some(header.sequence),
            marker_ok: sequenced.then(|| header.has_expected_marker()),
            packet: None,
            error: None,
        };
        match decode_packet_from_frame(registry, direction, &frame, limits) {
            Ok(packet) => {
                entry.packet = Some(PacketReport {
                    opcode: packet.message.opcode().to_string(),
                    subtype: packet.message.subtype(),
                    compression: compression_name(packet.compression),
                    dont_fragment: packet.flags.is_dont_fragment(),
                    message: format!("{:?}", packet.message),
                });
            }
            Err(err) => entry.error = Some(err.to_string()),
        }
        offset += entry.frame_len;
        report.frames.push(entry);
    }
    report
}

const fn compression_name(compression: Compression) -> &'static str {
    match compression {
        Compression::Disabled => "disabled",
        Compression::Stored => "stored",
        Compression::Deflate => "deflate",
    }
}

/// Human-readable rendering of a capture report.
#[must_use]
pub fn format_capture_pretty(report: &CaptureReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} bytes, {} frames ({} decoded), direction {}",
        report.total_bytes,
        report.frames.len(),
        report.decoded(),
        report.direction
    );
    for frame in &report.frames {
        let _ = write!(
            out,
            "@{:<6} len {:<5} sc {:<3}",
            frame.offset, frame.frame_len, frame.sub_channel
        );
        if let Some(sequence) = frame.sequence {
            let _ = write!(out, " seq {sequence}");
        }
        if frame.marker_ok == Some(false) {
            out.push_str(" (bad marker)");
        }
        match (&frame.packet, &frame.error) {
            (Some(packet), _) => {
                let _ = write!(
                    out,
                    " opcode {} subtype {} {}: {}",
                    packet.opcode, packet.subtype, packet.compression, packet.message
                );
            }
            (None, Some(error)) => {
                let _ = write!(out, " error: {error}");
            }
            (None, None) => {}
        }
        out.push('\n');
    }
    if report.trailing_bytes > 0 {
        let _ = writeln!(out, "{} trailing bytes (incomplete frame)", report.trailing_bytes);
    }
    if let Some(reason) = &report.stopped {
        let _ = writeln!(out, "stopped: {reason}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use codec::{encode_packet_to_vec, ProtocolPacket, SubChannel};
    use demo_messages::{Move, Ping};

    fn capture() -> Vec<u8> {
        let limits = CodecLimits::default();
        let mut bytes = Vec::new();
        bytes.extend(
            encode_packet_to_vec(
                &ProtocolPacket::reliable(Box::new(Ping { client_time: 5 })),
                &limits,
            )
            .unwrap(),
        );
        bytes.extend(
            encode_packet_to_vec(
                &ProtocolPacket::sequenced(SubChannel::new(3), 11, Box::new(Move::default()))
                    .with_compression(Compression::Deflate),
                &limits,
            )
            .unwrap(),
        );
        bytes
    }

    #[test]
    fn walks_every_frame() {
        let registry = demo_messages::registry().unwrap();
        let bytes = capture();
        let report = inspect_capture(
            &bytes,
            &registry,
            Direction::Inbound,
            &WireLimits::default(),
            &CodecLimits::default(),
        );
        assert_eq!(report.frames.len(), 2);
        assert_eq!(report.decoded(), 2);
        assert_eq!(report.trailing_bytes, 0);
        assert_eq!(report.frames[0].sequence, None);
        assert_eq!(report.frames[1].sequence, Some(11));
        assert_eq!(report.frames[1].marker_ok, Some(true));
        let packet = report.frames[1].packet.as_ref().unwrap();
        assert_eq!(packet.opcode, "0x0002");
        assert_eq!(packet.compression, "deflate");
        assert_eq!(
            report.frames[0].offset + report.frames[0].frame_len,
            report.frames[1].offset
        );
    }

    #[test]
    fn wrong_direction_is_reported_per_frame() {
        let registry = demo_messages::registry().unwrap();
        let bytes = capture();
        let report = inspect_capture(
            &bytes,
            &registry,
            Direction::Outbound,
            &WireLimits::default(),
            &CodecLimits::default(),
        );
        assert_eq!(report.frames.len(), 2);
        assert_eq!(report.decoded(), 0);
        assert!(report.frames.iter().all(|f| f.error.is_some()));
    }

    #[test]
    fn truncated_tail_is_trailing() {
        let registry = demo_messages::registry().unwrap();
        let mut bytes = capture();
        bytes.truncate(bytes.len() - 3);
        let report = inspect_capture(
            &bytes,
            &registry,
            Direction::Inbound,
            &WireLimits::default(),
            &CodecLimits::default(),
        );
        assert_eq!(report.frames.len(), 1);
        assert!(report.trailing_bytes > 0);

        let pretty = format_capture_pretty(&report);
        assert!(pretty.contains("trailing bytes"));
        assert!(pretty.contains("Ping"));
    }
}
