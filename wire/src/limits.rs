//! Configurable limits for bounded frame decoding.

/// Wire-level limits for frame decoding.
///
/// These limits are enforced during decoding to prevent resource exhaustion
/// and ensure bounded memory usage per connection. Message body limits belong
/// to the codec layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum declared frame length in bytes.
    pub max_frame_bytes: usize,

    /// Maximum number of not-yet-framed bytes buffered for one connection.
    pub max_buffered_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // The length field is 16 bits wide.
            max_frame_bytes: usize::from(u16::MAX),
            max_buffered_bytes: 4 * usize::from(u16::MAX),
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_frame_bytes: 4096,
            max_buffered_bytes: 16 * 1024,
        }
    }

    /// Creates limits with no restrictions beyond the wire format itself.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_frame_bytes: usize::MAX,
            max_buffered_bytes: usize::MAX,
        }
    }
}
