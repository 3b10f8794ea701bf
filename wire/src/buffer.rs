//! Reassembly of frames from one connection's byte stream.

use crate::error::{FrameError, FrameResult, LimitKind};
use crate::frame::peek_frame_length;
use crate::limits::Limits;

/// Accumulates received bytes and splits them into frames in arrival order.
///
/// Transport reads deliver arbitrary chunks; a frame may arrive split across
/// several reads or several frames may arrive in one. One `FrameBuffer`
/// belongs to exactly one connection.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    limits: Limits,
    pending: Vec<u8>,
}

impl FrameBuffer {
    #[must_use]
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            pending: Vec::new(),
        }
    }

    /// Number of received bytes not yet returned as frames.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Appends received bytes.
    pub fn push(&mut self, bytes: &[u8]) -> FrameResult<()> {
        let total = self.pending.len().saturating_add(bytes.len());
        if total > self.limits.max_buffered_bytes {
            return Err(FrameError::LimitsExceeded {
                kind: LimitKind::BufferedBytes,
                limit: self.limits.max_buffered_bytes,
                actual: total,
            });
        }
        self.pending.extend_from_slice(bytes);
        Ok(())
    }

    /// Removes and returns the next complete frame, header included.
    ///
    /// Returns `Ok(None)` while the next frame is still incomplete. Any other
    /// error means the stream is corrupt and the buffer should be discarded.
    pub fn next_frame(&mut self) -> FrameResult<Option<Vec<u8>>> {
        let declared = match peek_frame_length(&self.pending, &self.limits) {
            Ok(declared) => declared,
            Err(err) if err.is_incomplete() => return Ok(None),
            Err(err) => return Err(err),
        };
        if declared > self.pending.len() {
            return Ok(None);
        }
        let frame: Vec<u8> = self.pending.drain(..declared).collect();
        Ok(Some(frame))
    }

    /// Drops all buffered bytes.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(Limits::default())
    }
}
