//! The message contract consumed and produced by the codec.

use std::any::Any;
use std::fmt;

use bytestream::{ByteReader, ByteWriter};

use crate::error::CodecResult;

/// Wire opcode identifying a message kind within one direction.
///
/// Only `0..=Opcode::MAX` fits the packed type field; larger values are
/// rejected at registration and encode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Largest opcode the 15-bit packed field can carry.
    pub const MAX: u16 = 0x7FFF;

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 <= Self::MAX
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

/// Inclusive subtype range declared by a message kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubtypeRange {
    pub min: u8,
    pub max: u8,
}

impl SubtypeRange {
    #[must_use]
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub const fn contains(self, subtype: u8) -> bool {
        subtype >= self.min && subtype <= self.max
    }
}

/// A typed message body.
///
/// Implementors only read and write their own fields; flags, sync markers,
/// the subtype byte and checksums are handled by the codec.
pub trait Message: fmt::Debug + Send + Sync + 'static {
    fn opcode(&self) -> Opcode;

    /// Declared subtype range, or `None` if the kind carries no subtype byte.
    fn subtype_range(&self) -> Option<SubtypeRange> {
        None
    }

    fn subtype(&self) -> u8 {
        0
    }

    /// Called with the validated subtype byte before [`Message::decode_body`].
    fn set_subtype(&mut self, _subtype: u8) {}

    fn decode_body(&mut self, reader: &mut ByteReader<'_>) -> CodecResult<()>;

    fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()>;
}

/// Object-safe view of a [`Message`] that supports downcasting, cloning and
/// comparison through `Box<dyn DynMessage>`.
///
/// Implemented automatically for every `Message + Clone + PartialEq`.
pub trait DynMessage: Message {
    fn as_any(&self) -> &dyn Any;

    fn clone_boxed(&self) -> Box<dyn DynMessage>;

    fn eq_dyn(&self, other: &dyn DynMessage) -> bool;
}

impl<T> DynMessage for T
where
    T: Message + Clone + PartialEq,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn DynMessage> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn DynMessage) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }
}

impl dyn DynMessage {
    /// Returns the concrete message if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: DynMessage>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    #[must_use]
    pub fn is<T: DynMessage>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl Clone for Box<dyn DynMessage> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

impl PartialEq for dyn DynMessage {
    fn eq(&self, other: &Self) -> bool {
        self.eq_dyn(other)
    }
}
