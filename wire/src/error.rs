//! Error types for frame operations.

use std::fmt;

use bytestream::StreamError;

/// Result type for frame decoding.
pub type FrameResult<T> = Result<T, FrameError>;

/// Frame decode errors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FrameError {
    /// The stream has not delivered a complete frame yet.
    Incomplete { needed: usize, available: usize },

    /// Declared length is shorter than the frame header it must contain.
    InvalidLength { declared: usize, minimum: usize },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

impl FrameError {
    /// Returns `true` when more bytes may complete the frame.
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete { .. })
    }
}

/// Specific wire limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    FrameBytes,
    BufferedBytes,
}

/// Errors that can occur during frame encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEncodeError {
    /// The finished frame does not fit the 16-bit length field.
    FrameTooLarge { length: usize },
    /// Backpatching the header failed.
    Stream(StreamError),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incomplete { needed, available } => {
                write!(
                    f,
                    "incomplete frame: need {needed} bytes, {available} available"
                )
            }
            Self::InvalidLength { declared, minimum } => {
                write!(
                    f,
                    "invalid frame length {declared}: header alone needs {minimum}"
                )
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FrameBytes => "frame bytes",
            Self::BufferedBytes => "buffered bytes",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for FrameEncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FrameTooLarge { length } => {
                write!(f, "frame too large: {length} bytes exceeds 65535")
            }
            Self::Stream(err) => write!(f, "stream error: {err}"),
        }
    }
}

impl From<StreamError> for FrameEncodeError {
    fn from(err: StreamError) -> Self {
        Self::Stream(err)
    }
}

impl std::error::Error for FrameError {}

impl std::error::Error for FrameEncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Stream(err) => Some(err),
            Self::FrameTooLarge { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_error_display_incomplete() {
        let err = FrameError::Incomplete {
            needed: 500,
            available: 200,
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("200"));
        assert!(err.is_incomplete());
    }

    #[test]
    fn frame_error_display_limits_exceeded() {
        let err = FrameError::LimitsExceeded {
            kind: LimitKind::BufferedBytes,
            limit: 4,
            actual: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("buffered bytes"));
        assert!(msg.contains("10"));
        assert!(!err.is_incomplete());
    }

    #[test]
    fn encode_error_display() {
        let err = FrameEncodeError::FrameTooLarge { length: 70_000 };
        assert!(err.to_string().contains("70000"));
    }
}
