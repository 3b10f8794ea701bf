//! Frame header types and constants.

/// Header size of a reliable-stream frame: length, sub-channel, padding.
pub const BASE_HEADER_SIZE: usize = 2 + 1 + 1;

/// Header size of a frame on any other sub-channel.
pub const SEQUENCED_HEADER_SIZE: usize = BASE_HEADER_SIZE + 4 + 4 + 4;

/// Constant written after the sequence number on sequenced sub-channels.
pub const SEQUENCE_MARKER: u32 = 0xDEAD_BEEF;

/// Logical sub-stream within one physical connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct SubChannel(u8);

impl SubChannel {
    /// Sub-channel 0: ordered reliable stream, no sequence fields.
    pub const RELIABLE_STREAM: Self = Self(0);

    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_reliable_stream(self) -> bool {
        self.0 == 0
    }

    /// Size of the frame header used on this sub-channel.
    #[must_use]
    pub const fn header_size(self) -> usize {
        if self.is_reliable_stream() {
            BASE_HEADER_SIZE
        } else {
            SEQUENCED_HEADER_SIZE
        }
    }
}

/// Decoded frame header.
///
/// `sequence` and `marker` are zero on the reliable stream, which carries no
/// extra fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Total frame length in bytes, including the header.
    pub length: u16,
    pub sub_channel: SubChannel,
    pub sequence: u32,
    /// Marker as read from the wire; [`SEQUENCE_MARKER`] when well-formed.
    pub marker: u32,
}

impl FrameHeader {
    /// Header for a reliable-stream frame (length filled in on encode).
    #[must_use]
    pub const fn reliable() -> Self {
        Self {
            length: 0,
            sub_channel: SubChannel::RELIABLE_STREAM,
            sequence: 0,
            marker: 0,
        }
    }

    /// Header for a sequenced frame on `sub_channel`.
    ///
    /// A reliable-stream `sub_channel` yields [`FrameHeader::reliable`] and
    /// drops the sequence number, since the wire has nowhere to carry it.
    #[must_use]
    pub const fn sequenced(sub_channel: SubChannel, sequence: u32) -> Self {
        if sub_channel.is_reliable_stream() {
            return Self::reliable();
        }
        Self {
            length: 0,
            sub_channel,
            sequence,
            marker: SEQUENCE_MARKER,
        }
    }

    #[must_use]
    pub const fn header_size(&self) -> usize {
        self.sub_channel.header_size()
    }

    /// Returns `true` unless a sequenced frame carried an unexpected marker.
    #[must_use]
    pub const fn has_expected_marker(&self) -> bool {
        self.sub_channel.is_reliable_stream() || self.marker == SEQUENCE_MARKER
    }
}
