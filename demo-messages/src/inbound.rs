//! Client-originated messages.

use bytestream::{ByteReader, ByteWriter};
use codec::{CodecError, CodecResult, Message, Opcode, SubtypeRange};

use crate::opcodes;

/// Largest argument blob accepted by [`CallServerMethod`].
pub const MAX_METHOD_ARGS_BYTES: usize = 4096;

/// Session authentication request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Login {
    pub user_id: u32,
    pub session_token: String,
    pub client_version: u32,
}

impl Message for Login {
    fn opcode(&self) -> Opcode {
        opcodes::LOGIN
    }

    fn decode_body(&mut self, reader: &mut ByteReader<'_>) -> CodecResult<()> {
        self.user_id = reader.read_u32()?;
        self.session_token = reader.read_string()?;
        self.client_version = reader.read_u32()?;
        Ok(())
    }

    fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        writer.write_u32(self.user_id);
        writer.write_string(&self.session_token)?;
        writer.write_u32(self.client_version);
        Ok(())
    }
}

/// Movement style, carried in the subtype byte of [`Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum MoveMode {
    #[default]
    Walk = 0,
    Run = 1,
    Jump = 2,
}

impl MoveMode {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Run,
            2 => Self::Jump,
            _ => Self::Walk,
        }
    }
}

/// Position report for the sender's avatar.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Move {
    pub mode: MoveMode,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub heading: f32,
}

impl Message for Move {
    fn opcode(&self) -> Opcode {
        opcodes::MOVE
    }

    fn subtype_range(&self) -> Option<SubtypeRange> {
        Some(SubtypeRange::new(MoveMode::Walk as u8, MoveMode::Jump as u8))
    }

    fn subtype(&self) -> u8 {
        self.mode as u8
    }

    fn set_subtype(&mut self, subtype: u8) {
        self.mode = MoveMode::from_raw(subtype);
    }

    fn decode_body(&mut self, reader: &mut ByteReader<'_>) -> CodecResult<()> {
        self.x = reader.read_f32()?;
        self.y = reader.read_f32()?;
        self.z = reader.read_f32()?;
        self.heading = reader.read_f32()?;
        Ok(())
    }

    fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        writer.write_f32(self.x);
        writer.write_f32(self.y);
        writer.write_f32(self.z);
        writer.write_f32(self.heading);
        Ok(())
    }
}

/// Remote invocation of a server-side method on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallServerMethod {
    pub entity: u32,
    pub method: u32,
    /// Opaque argument blob.
    pub args: Vec<u8>,
}

impl Message for CallServerMethod {
    fn opcode(&self) -> Opcode {
        opcodes::CALL_SERVER_METHOD
    }

    fn decode_body(&mut self, reader: &mut ByteReader<'_>) -> CodecResult<()> {
        self.entity = reader.read_u32()?;
        self.method = reader.read_varu32()?;
        let len = reader.read_varu32()? as usize;
        if len > MAX_METHOD_ARGS_BYTES {
            return Err(CodecError::InvalidBody {
                opcode: opcodes::CALL_SERVER_METHOD,
                reason: "argument blob too large",
            });
        }
        self.args = reader.read_bytes(len)?.to_vec();
        Ok(())
    }

    fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        let len = u32::try_from(self.args.len())
            .ok()
            .filter(|len| *len as usize <= MAX_METHOD_ARGS_BYTES)
            .ok_or(CodecError::InvalidBody {
                opcode: opcodes::CALL_SERVER_METHOD,
                reason: "argument blob too large",
            })?;
        writer.write_u32(self.entity);
        writer.write_varu32(self.method);
        writer.write_varu32(len);
        writer.write_bytes(&self.args);
        Ok(())
    }
}

/// Latency probe; the server echoes `client_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ping {
    pub client_time: u64,
}

impl Message for Ping {
    fn opcode(&self) -> Opcode {
        opcodes::PING
    }

    fn decode_body(&mut self, reader: &mut ByteReader<'_>) -> CodecResult<()> {
        self.client_time = reader.read_u64()?;
        Ok(())
    }

    fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        writer.write_u64(self.client_time);
        Ok(())
    }
}
