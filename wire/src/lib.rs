//! Length-prefixed transport framing for cellnet.
//!
//! This crate handles the outer transport frame: the 16-bit length prefix,
//! the sub-channel byte, and the sequence fields carried by every sub-channel
//! except the reliable stream. It does not know about opcodes or message
//! bodies, only the structure of frames.
//!
//! # Design Principles
//!
//! - **Byte-exact layout** - All integers are little-endian; see [`FrameHeader`].
//! - **Incomplete is not corrupt** - A short buffer yields [`FrameError::Incomplete`],
//!   which stream owners treat as "wait for more bytes".
//! - **Bounded decoding** - Declared lengths are validated against [`Limits`]
//!   before any payload is touched.

mod buffer;
mod error;
mod frame;
mod header;
mod limits;

pub use buffer::FrameBuffer;
pub use error::{FrameEncodeError, FrameError, FrameResult, LimitKind};
pub use frame::{
    begin_frame, decode_frame, encode_frame, finish_frame, peek_frame_length, Frame, FrameMark,
};
pub use header::{
    FrameHeader, SubChannel, BASE_HEADER_SIZE, SEQUENCED_HEADER_SIZE, SEQUENCE_MARKER,
};
pub use limits::Limits;
