//! Optional raw-deflate stage for message bodies.

use std::io::{Read, Write};

use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression as Level;

use crate::error::{CodecError, CodecResult};
use crate::limits::CodecLimits;

/// Compression method byte that follows the header checksum when the
/// packed type's compression flag is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CompressionMethod {
    /// Flag set but body stored as-is.
    None = 0,
    /// Raw deflate stream preceded by a `u32` uncompressed size.
    Deflate = 1,
}

impl CompressionMethod {
    pub fn from_raw(raw: u8) -> CodecResult<Self> {
        match raw {
            0 => Ok(Self::None),
            1 => Ok(Self::Deflate),
            method => Err(CodecError::UnsupportedCompressionMethod { method }),
        }
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }
}

/// Deflates `body` into a raw deflate stream.
pub fn deflate(body: &[u8]) -> CodecResult<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::with_capacity(body.len() / 2), Level::default());
    encoder
        .write_all(body)
        .map_err(|err| CodecError::CompressionFailed {
            reason: err.to_string(),
        })?;
    let compressed = encoder.finish().map_err(|err| CodecError::CompressionFailed {
        reason: err.to_string(),
    })?;

    #[cfg(feature = "compression-trace")]
    tracing::trace!(
        uncompressed = body.len(),
        compressed = compressed.len(),
        "deflated message body"
    );

    Ok(compressed)
}

/// Inflates `compressed` into exactly `declared_size` bytes.
///
/// `declared_size` comes off the wire and is checked against `limits` before
/// anything is allocated.
pub fn inflate(compressed: &[u8], declared_size: u32, limits: &CodecLimits) -> CodecResult<Vec<u8>> {
    let expected = usize::try_from(declared_size).unwrap_or(usize::MAX);
    if expected > limits.max_uncompressed_bytes {
        return Err(CodecError::UncompressedSizeExceedsLimit {
            declared: expected,
            limit: limits.max_uncompressed_bytes,
        });
    }

    #[cfg(feature = "compression-trace")]
    tracing::trace!(
        compressed = compressed.len(),
        declared = expected,
        "inflating message body"
    );

    let mut inflated = Vec::with_capacity(expected);
    // One extra byte so an oversized stream is detected without reading it all.
    let mut decoder = DeflateDecoder::new(compressed).take(u64::from(declared_size) + 1);
    decoder
        .read_to_end(&mut inflated)
        .map_err(|err| CodecError::DecompressionFailed {
            expected,
            reason: err.to_string(),
        })?;

    if inflated.len() != expected {
        return Err(CodecError::DecompressionFailed {
            expected,
            reason: if inflated.len() > expected {
                "stream inflates past declared size".to_owned()
            } else {
                format!("stream ended after {} bytes", inflated.len())
            },
        });
    }
    Ok(inflated)
}
