//! Error types for message encoding/decoding.

use std::fmt;

use bytestream::StreamError;
use wire::{FrameEncodeError, FrameError};

use crate::message::Opcode;
use crate::registry::Direction;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding a message packet.
///
/// Every decode error is terminal for the frame that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    /// Outer frame error.
    Frame(FrameError),

    /// Byte cursor error (truncated field, bad string, ...).
    Stream(StreamError),

    /// XOR checksum did not match.
    ChecksumMismatch {
        region: ChecksumRegion,
        expected: u8,
        found: u8,
    },

    /// Compression method byte is not a known method.
    UnsupportedCompressionMethod { method: u8 },

    /// Declared uncompressed size is above the configured limit.
    UncompressedSizeExceedsLimit { declared: usize, limit: usize },

    /// Inflation failed or did not produce exactly the declared size.
    DecompressionFailed { expected: usize, reason: String },

    /// Deflating an outgoing body failed.
    CompressionFailed { reason: String },

    /// Opcode is not registered for the decode direction.
    UnknownOrWrongDirectionOpcode {
        opcode: Opcode,
        direction: Direction,
        /// Direction the opcode is registered for, if any.
        registered: Option<Direction>,
    },

    /// Subtype byte lies outside the message kind's declared range.
    SubtypeOutOfRange {
        opcode: Opcode,
        subtype: u8,
        min: u8,
        max: u8,
    },

    /// Stream-sync marker mismatch.
    StreamSync { expected: u8, found: u8 },

    /// Protocol flags have reserved bits set, or the inner flags differ
    /// from the header flags.
    InvalidProtocolFlags { flags: u8 },

    /// Bytes remained in the inner stream after the close marker.
    TrailingData { remaining: usize },

    /// Opcode does not fit the 15-bit packed type field.
    OpcodeOutOfRange { opcode: u16 },

    /// A message body rejected its own content.
    InvalidBody {
        opcode: Opcode,
        reason: &'static str,
    },

    /// Encoded frame would exceed the 16-bit length field.
    FrameTooLarge { length: usize },
}

/// Region covered by a checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChecksumRegion {
    /// Protocol flags and packed type.
    Header,
    /// Inner message stream.
    Body,
}

impl fmt::Display for ChecksumRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "header"),
            Self::Body => write!(f, "body"),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frame(e) => write!(f, "frame error: {e}"),
            Self::Stream(e) => write!(f, "stream error: {e}"),
            Self::ChecksumMismatch {
                region,
                expected,
                found,
            } => {
                write!(
                    f,
                    "{region} checksum mismatch: expected 0x{expected:02X}, found 0x{found:02X}"
                )
            }
            Self::UnsupportedCompressionMethod { method } => {
                write!(f, "unsupported compression method {method}")
            }
            Self::UncompressedSizeExceedsLimit { declared, limit } => {
                write!(
                    f,
                    "declared uncompressed size {declared} exceeds limit {limit}"
                )
            }
            Self::DecompressionFailed { expected, reason } => {
                write!(f, "failed to inflate {expected} bytes: {reason}")
            }
            Self::CompressionFailed { reason } => write!(f, "failed to deflate body: {reason}"),
            Self::UnknownOrWrongDirectionOpcode {
                opcode,
                direction,
                registered,
            } => match registered {
                Some(registered) => write!(
                    f,
                    "opcode {opcode} is {registered}, not {direction}"
                ),
                None => write!(f, "unknown {direction} opcode {opcode}"),
            },
            Self::SubtypeOutOfRange {
                opcode,
                subtype,
                min,
                max,
            } => {
                write!(
                    f,
                    "subtype {subtype} out of range {min}..={max} for opcode {opcode}"
                )
            }
            Self::StreamSync { expected, found } => {
                write!(
                    f,
                    "stream desynchronized: expected marker {expected}, found {found}"
                )
            }
            Self::InvalidProtocolFlags { flags } => {
                write!(f, "invalid protocol flags 0x{flags:02X}")
            }
            Self::TrailingData { remaining } => {
                write!(f, "{remaining} trailing bytes after message")
            }
            Self::OpcodeOutOfRange { opcode } => {
                write!(f, "opcode 0x{opcode:04X} exceeds 0x7FFF")
            }
            Self::InvalidBody { opcode, reason } => {
                write!(f, "invalid body for opcode {opcode}: {reason}")
            }
            Self::FrameTooLarge { length } => {
                write!(f, "frame of {length} bytes exceeds 65535")
            }
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Frame(e) => Some(e),
            Self::Stream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FrameError> for CodecError {
    fn from(err: FrameError) -> Self {
        Self::Frame(err)
    }
}

impl From<StreamError> for CodecError {
    fn from(err: StreamError) -> Self {
        Self::Stream(err)
    }
}

impl From<FrameEncodeError> for CodecError {
    fn from(err: FrameEncodeError) -> Self {
        match err {
            FrameEncodeError::FrameTooLarge { length } => Self::FrameTooLarge { length },
            FrameEncodeError::Stream(e) => Self::Stream(e),
        }
    }
}

/// Errors raised while building a [`MessageRegistry`](crate::MessageRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// Opcode already registered, in this or the other direction.
    OpcodeInUse {
        opcode: Opcode,
        direction: Direction,
    },
    /// Opcode does not fit the 15-bit packed type field.
    OpcodeOutOfRange { opcode: Opcode },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpcodeInUse { opcode, direction } => {
                write!(f, "opcode {opcode} already registered as {direction}")
            }
            Self::OpcodeOutOfRange { opcode } => {
                write!(f, "opcode {opcode} exceeds 0x7FFF")
            }
        }
    }
}

impl std::error::Error for RegistryError {}
