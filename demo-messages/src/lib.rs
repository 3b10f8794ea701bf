//! Reference message catalog for the cellnet demos.
//!
//! Client requests (`Login`, `Move`, `CallServerMethod`, `Ping`) are
//! registered inbound; `BeginCharacterSelection` is registered outbound.
//! Body layouts are fixed here so tools and benchmarks can exchange real
//! packets; gameplay semantics are not modeled.

mod inbound;
mod outbound;

use codec::{Direction, MessageRegistry, RegistryError};

pub use inbound::{CallServerMethod, Login, Move, MoveMode, Ping, MAX_METHOD_ARGS_BYTES};
pub use outbound::{BeginCharacterSelection, Race, MAX_ENABLED_RACES};

pub mod opcodes {
    //! Opcodes used by the catalog.

    use codec::Opcode;

    pub const LOGIN: Opcode = Opcode(0x0001);
    pub const MOVE: Opcode = Opcode(0x0002);
    pub const CALL_SERVER_METHOD: Opcode = Opcode(0x0003);
    pub const PING: Opcode = Opcode(0x0005);
    pub const BEGIN_CHARACTER_SELECTION: Opcode = Opcode(0x0101);
}

/// Registry with every catalog message registered in its direction.
pub fn registry() -> Result<MessageRegistry, RegistryError> {
    let mut registry = MessageRegistry::new();
    registry.register_message::<Login>(Direction::Inbound)?;
    registry.register_message::<Move>(Direction::Inbound)?;
    registry.register_message::<CallServerMethod>(Direction::Inbound)?;
    registry.register_message::<Ping>(Direction::Inbound)?;
    registry.register_message::<BeginCharacterSelection>(Direction::Outbound)?;
    Ok(registry)
}
