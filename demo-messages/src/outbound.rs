//! Server-originated messages.

use bytestream::{ByteReader, ByteWriter};
use codec::{CodecError, CodecResult, Message, Opcode};

use crate::opcodes;

/// Upper bound on the race list in [`BeginCharacterSelection`].
pub const MAX_ENABLED_RACES: usize = 16;

/// Playable race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Race {
    Human = 1,
    Forean = 2,
    Brann = 3,
    Thrax = 4,
}

impl Race {
    pub const ALL: [Self; 4] = [Self::Human, Self::Forean, Self::Brann, Self::Thrax];

    #[must_use]
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(Self::Human),
            2 => Some(Self::Forean),
            3 => Some(Self::Brann),
            4 => Some(Self::Thrax),
            _ => None,
        }
    }

    #[must_use]
    pub const fn raw(self) -> i32 {
        self as i32
    }
}

/// Opens the character-selection screen for a freshly logged-in account.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BeginCharacterSelection {
    pub family_name: String,
    pub has_characters: bool,
    pub user_id: u32,
    pub enabled_races: Vec<Race>,
    pub can_skip_bootcamp: bool,
}

impl BeginCharacterSelection {
    /// Every race enabled and bootcamp skippable.
    #[must_use]
    pub fn new(family_name: impl Into<String>, has_characters: bool, user_id: u32) -> Self {
        Self {
            family_name: family_name.into(),
            has_characters,
            user_id,
            enabled_races: Race::ALL.to_vec(),
            can_skip_bootcamp: true,
        }
    }
}

impl Message for BeginCharacterSelection {
    fn opcode(&self) -> Opcode {
        opcodes::BEGIN_CHARACTER_SELECTION
    }

    fn decode_body(&mut self, reader: &mut ByteReader<'_>) -> CodecResult<()> {
        self.family_name = reader.read_string()?;
        self.has_characters = reader.read_bool()?;
        self.user_id = reader.read_u32()?;

        let count = usize::from(reader.read_u8()?);
        if count > MAX_ENABLED_RACES {
            return Err(invalid("too many races"));
        }
        self.enabled_races = (0..count)
            .map(|_| {
                let raw = reader.read_i32()?;
                Race::from_raw(raw).ok_or_else(|| invalid("unknown race"))
            })
            .collect::<CodecResult<_>>()?;

        self.can_skip_bootcamp = reader.read_bool()?;
        Ok(())
    }

    fn encode_body(&self, writer: &mut ByteWriter) -> CodecResult<()> {
        if self.enabled_races.len() > MAX_ENABLED_RACES {
            return Err(invalid("too many races"));
        }
        writer.write_string(&self.family_name)?;
        writer.write_bool(self.has_characters);
        writer.write_u32(self.user_id);
        #[allow(clippy::cast_possible_truncation)]
        writer.write_u8(self.enabled_races.len() as u8);
        for race in &self.enabled_races {
            writer.write_i32(race.raw());
        }
        writer.write_bool(self.can_skip_bootcamp);
        Ok(())
    }
}

const fn invalid(reason: &'static str) -> CodecError {
    CodecError::InvalidBody {
        opcode: opcodes::BEGIN_CHARACTER_SELECTION,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(message: &BeginCharacterSelection) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        message.encode_body(&mut writer).unwrap();
        writer.finish()
    }

    #[test]
    fn defaults_enable_every_race() {
        let message = BeginCharacterSelection::new("Ashford", false, 9);
        assert_eq!(message.enabled_races.len(), 4);
        assert!(message.can_skip_bootcamp);
    }

    #[test]
    fn body_roundtrip() {
        let mut message = BeginCharacterSelection::new("Ashford", true, 77);
        message.enabled_races = vec![Race::Thrax, Race::Human];
        message.can_skip_bootcamp = false;

        let bytes = encode(&message);
        // name(2 + 7) + bool + u32 + count + 2 * i32 + bool
        assert_eq!(bytes.len(), 9 + 1 + 4 + 1 + 8 + 1);

        let mut decoded = BeginCharacterSelection::default();
        let mut reader = ByteReader::new(&bytes);
        decoded.decode_body(&mut reader).unwrap();
        assert!(reader.is_empty());
        assert_eq!(decoded, message);
    }

    #[test]
    fn unknown_race_rejected() {
        let mut bytes = encode(&BeginCharacterSelection::new("A", false, 1));
        // First race entry starts after name(3) + bool + u32 + count.
        bytes[9..13].copy_from_slice(&99i32.to_le_bytes());
        let mut decoded = BeginCharacterSelection::default();
        let err = decoded
            .decode_body(&mut ByteReader::new(&bytes))
            .unwrap_err();
        assert_eq!(err, invalid("unknown race"));
    }

    #[test]
    fn race_raw_values() {
        for race in Race::ALL {
            assert_eq!(Race::from_raw(race.raw()), Some(race));
        }
        assert_eq!(Race::from_raw(0), None);
    }
}
