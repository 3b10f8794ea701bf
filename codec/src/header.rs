//! Message header fields: protocol flags, packed type, stream-sync markers.

use crate::error::{CodecError, CodecResult};
use crate::message::Opcode;

/// Marker written before the subtype/body of every inner message stream.
pub const SYNC_OPEN: u8 = 41;

/// Marker written after the body of every inner message stream.
pub const SYNC_CLOSE: u8 = 42;

/// Protocol flags byte carried in the header and repeated in the inner stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolFlags(u8);

impl ProtocolFlags {
    pub const DONT_FRAGMENT: u8 = 1 << 0;
    const RESERVED_MASK: u8 = !Self::DONT_FRAGMENT;

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn dont_fragment() -> Self {
        Self(Self::DONT_FRAGMENT)
    }

    /// Parses a flags byte, rejecting reserved bits.
    pub fn from_raw(raw: u8) -> CodecResult<Self> {
        if raw & Self::RESERVED_MASK != 0 {
            return Err(CodecError::InvalidProtocolFlags { flags: raw });
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_dont_fragment(self) -> bool {
        self.0 & Self::DONT_FRAGMENT != 0
    }
}

impl Default for ProtocolFlags {
    fn default() -> Self {
        Self::dont_fragment()
    }
}

/// Opcode plus compression flag, packed as `(opcode << 1) | compressed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PacketType {
    pub opcode: Opcode,
    pub compressed: bool,
}

impl PacketType {
    pub fn pack(self) -> CodecResult<u16> {
        if !self.opcode.is_valid() {
            return Err(CodecError::OpcodeOutOfRange {
                opcode: self.opcode.raw(),
            });
        }
        Ok((self.opcode.raw() << 1) | u16::from(self.compressed))
    }

    #[must_use]
    pub const fn unpack(raw: u16) -> Self {
        Self {
            opcode: Opcode(raw >> 1),
            compressed: raw & 1 != 0,
        }
    }
}
