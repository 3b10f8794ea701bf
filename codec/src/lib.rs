//! Message codec for cellnet.
//!
//! This crate sits on top of the [`wire`] frame layer and turns frame payloads
//! into typed messages and back: protocol flags, the packed opcode, XOR
//! checksums, the optional deflate stage, stream-sync markers and the
//! opcode registry.
//!
//! # Features
//!
//! - Symmetric `encode_packet` / `decode_packet` for every sub-channel and
//!   compression setting
//! - Direction-aware opcode registry with disjoint inbound/outbound spaces
//! - Per-connection [`InboundStream`] with stale-sequence dropping
//! - `compression-trace`: trace-level diagnostics from the deflate stage
//!
//! # Design Principles
//!
//! - **Fail per frame** - Every decode error is terminal for its frame and is
//!   returned to the connection owner; nothing here closes connections.
//! - **Untrusted sizes** - Declared uncompressed sizes are bounded by
//!   [`CodecLimits`] before allocation.
//! - **Integrity first** - Checksums are verified before the bytes they cover
//!   are interpreted.

mod checksum;
mod compression;
mod error;
mod header;
mod limits;
mod message;
mod packet;
mod registry;
mod stream;

pub use checksum::xor_checksum;
pub use compression::{deflate, inflate, CompressionMethod};
pub use error::{ChecksumRegion, CodecError, CodecResult, RegistryError};
pub use header::{PacketType, ProtocolFlags, SYNC_CLOSE, SYNC_OPEN};
pub use limits::CodecLimits;
pub use message::{DynMessage, Message, Opcode, SubtypeRange};
pub use packet::{
    decode_packet, decode_packet_from_frame, encode_packet, encode_packet_to_vec, Compression,
    DecodedPacket, ProtocolPacket,
};
pub use registry::{Direction, MessageFactory, MessageRegistry};
pub use stream::{InboundStream, StreamStats};
pub use wire::{Limits as WireLimits, SubChannel};
