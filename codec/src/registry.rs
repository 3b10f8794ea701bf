//! Opcode to message-kind registry, one table per direction.

use std::collections::HashMap;
use std::fmt;

use crate::error::{CodecError, CodecResult, RegistryError};
use crate::message::{DynMessage, Message, Opcode};

/// Which side originated a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Client to server.
    Inbound,
    /// Server to client.
    Outbound,
}

impl Direction {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Inbound => Self::Outbound,
            Self::Outbound => Self::Inbound,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inbound => write!(f, "inbound"),
            Self::Outbound => write!(f, "outbound"),
        }
    }
}

/// Constructs a fresh, empty instance of a message kind for decoding.
pub type MessageFactory = fn() -> Box<dyn DynMessage>;

fn default_factory<T>() -> Box<dyn DynMessage>
where
    T: Message + Clone + PartialEq + Default,
{
    Box::new(T::default())
}

/// Maps opcodes to message factories.
///
/// The inbound and outbound opcode spaces are disjoint: an opcode can be
/// registered in at most one direction.
#[derive(Debug, Clone, Default)]
pub struct MessageRegistry {
    inbound: HashMap<Opcode, MessageFactory>,
    outbound: HashMap<Opcode, MessageFactory>,
}

impl MessageRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` for `opcode` in `direction`.
    pub fn register(
        &mut self,
        direction: Direction,
        opcode: Opcode,
        factory: MessageFactory,
    ) -> Result<(), RegistryError> {
        if !opcode.is_valid() {
            return Err(RegistryError::OpcodeOutOfRange { opcode });
        }
        if let Some(existing) = self.direction_of(opcode) {
            return Err(RegistryError::OpcodeInUse {
                opcode,
                direction: existing,
            });
        }
        self.table_mut(direction).insert(opcode, factory);
        Ok(())
    }

    /// Registers `T` under the opcode reported by `T::default()`.
    pub fn register_message<T>(&mut self, direction: Direction) -> Result<(), RegistryError>
    where
        T: Message + Clone + PartialEq + Default,
    {
        let opcode = T::default().opcode();
        self.register(direction, opcode, default_factory::<T>)
    }

    /// Constructs a fresh message for `opcode` from the `direction` table.
    pub fn resolve(&self, direction: Direction, opcode: Opcode) -> CodecResult<Box<dyn DynMessage>> {
        match self.table(direction).get(&opcode) {
            Some(factory) => Ok(factory()),
            None => Err(CodecError::UnknownOrWrongDirectionOpcode {
                opcode,
                direction,
                registered: self.direction_of(opcode),
            }),
        }
    }

    #[must_use]
    pub fn contains(&self, direction: Direction, opcode: Opcode) -> bool {
        self.table(direction).contains_key(&opcode)
    }

    /// Direction `opcode` is registered for, if any.
    #[must_use]
    pub fn direction_of(&self, opcode: Opcode) -> Option<Direction> {
        if self.inbound.contains_key(&opcode) {
            Some(Direction::Inbound)
        } else if self.outbound.contains_key(&opcode) {
            Some(Direction::Outbound)
        } else {
            None
        }
    }

    /// Registered opcodes for `direction`, sorted.
    #[must_use]
    pub fn opcodes(&self, direction: Direction) -> Vec<Opcode> {
        let mut opcodes: Vec<Opcode> = self.table(direction).keys().copied().collect();
        opcodes.sort_unstable();
        opcodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inbound.len() + self.outbound.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn table(&self, direction: Direction) -> &HashMap<Opcode, MessageFactory> {
        match direction {
            Direction::Inbound => &self.inbound,
            Direction::Outbound => &self.outbound,
        }
    }

    fn table_mut(&mut self, direction: Direction) -> &mut HashMap<Opcode, MessageFactory> {
        match direction {
            Direction::Inbound => &mut self.inbound,
            Direction::Outbound => &mut self.outbound,
        }
    }
}
