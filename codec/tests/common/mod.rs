#![allow(dead_code)]

use bytestream::{ByteReader, ByteWriter};
use codec::{CodecError, CodecResult, Direction, Message, MessageRegistry, Opcode, SubtypeRange};

pub const POSITION_OPCODE: Opcode = Opcode(0x0004);
pub const NOTICE_OPCODE: Opcode = Opcode(0x0102);
pub const HEARTBEAT_OPCODE: Opcode = Opcode(0x7FFF);

/// Client-originated position report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub flags: u8,
}

impl Message for Position {
    fn opcode(&self) -> Opcode {
        POSITION_OPCODE
    }

    fn decode_body(&mut self, reader: &mut ByteReader<'_>) -> CodecResult<()> {
        self.x = reader.read_f32()?;
        self.y = reader.read_f32()?;
        self.z = reader.read_f32()?;
        self.flags = reader.read_u8()?;
        Ok(())
    }

    fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        writer.write_f32(self.x);
        writer.write_f32(self.y);
        writer.write_f32(self.z);
        writer.write_u8(self.flags);
        Ok(())
    }
}

/// Server-originated notice with a subtype in `1..=4`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Notice {
    pub level: u8,
    pub lines: Vec<String>,
}

impl Message for Notice {
    fn opcode(&self) -> Opcode {
        NOTICE_OPCODE
    }

    fn subtype_range(&self) -> Option<SubtypeRange> {
        Some(SubtypeRange::new(1, 4))
    }

    fn subtype(&self) -> u8 {
        self.level
    }

    fn set_subtype(&mut self, subtype: u8) {
        self.level = subtype;
    }

    fn decode_body(&mut self, reader: &mut ByteReader<'_>) -> CodecResult<()> {
        let count = reader.read_varu32()?;
        if count > 64 {
            return Err(CodecError::InvalidBody {
                opcode: NOTICE_OPCODE,
                reason: "too many lines",
            });
        }
        self.lines = (0..count)
            .map(|_| reader.read_string())
            .collect::<Result<_, _>>()?;
        Ok(())
    }

    fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        let count = u32::try_from(self.lines.len()).map_err(|_| CodecError::InvalidBody {
            opcode: NOTICE_OPCODE,
            reason: "too many lines",
        })?;
        writer.write_varu32(count);
        for line in &self.lines {
            writer.write_string(line)?;
        }
        Ok(())
    }
}

/// Empty-bodied message registered at the largest opcode.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Heartbeat;

impl Message for Heartbeat {
    fn opcode(&self) -> Opcode {
        HEARTBEAT_OPCODE
    }

    fn decode_body(&mut self, _reader: &mut ByteReader<'_>) -> CodecResult<()> {
        Ok(())
    }

    fn encode_body(&self, _writer: &mut ByteWriter) -> CodecResult<()> {
        Ok(())
    }
}

pub fn registry() -> MessageRegistry {
    let mut registry = MessageRegistry::new();
    registry
        .register_message::<Position>(Direction::Inbound)
        .unwrap();
    registry
        .register_message::<Heartbeat>(Direction::Inbound)
        .unwrap();
    registry
        .register_message::<Notice>(Direction::Outbound)
        .unwrap();
    registry
}
