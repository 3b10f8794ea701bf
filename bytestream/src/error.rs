//! Error types for byte stream operations.

use std::fmt;

/// Result type for byte stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur while reading or writing a byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Attempted to read past the end of the buffer.
    UnexpectedEof {
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// A varint ran past five bytes without terminating.
    InvalidVarint,

    /// A length-prefixed string was not valid UTF-8.
    InvalidUtf8 {
        /// Byte offset of the string body.
        position: usize,
    },

    /// Value does not fit the length prefix used to encode it.
    LengthOverflow {
        /// The length that was rejected.
        length: usize,
        /// Maximum representable length.
        max: usize,
    },

    /// Attempted to backpatch bytes that were never written.
    PatchOutOfBounds {
        /// Position of the patch.
        position: usize,
        /// Width of the patch in bytes.
        width: usize,
        /// Bytes written so far.
        written: usize,
    },
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => {
                write!(
                    f,
                    "attempted to read {requested} bytes but only {available} bytes available"
                )
            }
            Self::InvalidVarint => write!(f, "invalid varint"),
            Self::InvalidUtf8 { position } => {
                write!(f, "invalid utf-8 string at byte {position}")
            }
            Self::LengthOverflow { length, max } => {
                write!(f, "length {length} exceeds maximum {max}")
            }
            Self::PatchOutOfBounds {
                position,
                width,
                written,
            } => {
                write!(
                    f,
                    "cannot patch {width} bytes at {position}: only {written} bytes written"
                )
            }
        }
    }
}

impl std::error::Error for StreamError {}
