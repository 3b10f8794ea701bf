//! Limits for codec-level decoding.

/// Codec-specific limits enforced during message decoding.
///
/// Frame-level limits live in [`wire::Limits`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum declared uncompressed size of a deflated message body.
    ///
    /// Checked before the inflate buffer is allocated. Encoding applies the
    /// same bound so a peer with equal limits can always decode our output.
    pub max_uncompressed_bytes: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_uncompressed_bytes: 256 * 1024,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_uncompressed_bytes: 4096,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_uncompressed_bytes: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_are_reasonable() {
        let limits = CodecLimits::default();
        assert!(limits.max_uncompressed_bytes >= usize::from(u16::MAX));
    }

    #[test]
    fn testing_limits_smaller() {
        assert!(
            CodecLimits::for_testing().max_uncompressed_bytes
                < CodecLimits::default().max_uncompressed_bytes
        );
    }

    #[test]
    fn unlimited_limits() {
        assert_eq!(CodecLimits::unlimited().max_uncompressed_bytes, usize::MAX);
    }
}
