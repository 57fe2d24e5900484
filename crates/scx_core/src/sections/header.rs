use serde::{Deserialize, Serialize};

use super::{PLAYER_NAME_LEN, PLAYER_SLOTS, SectionCodec};
use crate::cursor::ByteCursor;
use crate::error::{Result, ScxError};
use crate::layout::SectionId;
use crate::records::{expect_len, read_vec};

/// Inner format version stored as a float at the top of the compressed body.
pub const HEADER_VERSION: f32 = 1.22;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioHeader {
    pub next_unit_id: u32,
    /// One fixed 256-byte slot per player.
    pub player_names: Vec<String>,
    pub player_name_string_ids: Vec<u32>,
    pub players: Vec<PlayerSlot>,
    /// Usually 1.
    pub unknown1: u32,
    pub reserved: u8,
    /// Usually -1.
    pub unknown2: f32,
    pub original_file_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub active: u32,
    pub human: u32,
    pub civ: u32,
    /// Usually 4.
    pub unknown: u32,
}

impl Default for ScenarioHeader {
    fn default() -> Self {
        Self {
            next_unit_id: 0,
            player_names: vec![String::new(); PLAYER_SLOTS],
            player_name_string_ids: vec![0; PLAYER_SLOTS],
            players: vec![PlayerSlot::default(); PLAYER_SLOTS],
            unknown1: 1,
            reserved: 0,
            unknown2: -1.0,
            original_file_name: String::new(),
        }
    }
}

impl PlayerSlot {
    fn decode(c: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            active: c.read_u32()?,
            human: c.read_u32()?,
            civ: c.read_u32()?,
            unknown: c.read_u32()?,
        })
    }

    fn encode(&self, c: &mut ByteCursor) {
        c.write_u32(self.active);
        c.write_u32(self.human);
        c.write_u32(self.civ);
        c.write_u32(self.unknown);
    }
}

impl SectionCodec for ScenarioHeader {
    const ID: SectionId = SectionId::Header;

    fn decode(c: &mut ByteCursor) -> Result<Self> {
        let next_unit_id = c.read_u32()?;

        let version = c.read_f32()?;
        if version != HEADER_VERSION {
            return Err(ScxError::VersionMismatch {
                what: "header",
                expected: HEADER_VERSION.to_string(),
                found: version.to_string(),
            });
        }

        let player_names = read_vec(c, PLAYER_SLOTS, |c| c.read_fixed_string(PLAYER_NAME_LEN))?;
        let player_name_string_ids = read_vec(c, PLAYER_SLOTS, ByteCursor::read_u32)?;
        let players = read_vec(c, PLAYER_SLOTS, PlayerSlot::decode)?;

        let unknown1 = c.read_u32()?;
        let reserved = c.read_u8()?;
        let unknown2 = c.read_f32()?;
        let original_file_name = c.read_string_i16()?;

        Ok(Self {
            next_unit_id,
            player_names,
            player_name_string_ids,
            players,
            unknown1,
            reserved,
            unknown2,
            original_file_name,
        })
    }

    fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        expect_len(self.player_names.len(), PLAYER_SLOTS, "header player names")?;
        expect_len(
            self.player_name_string_ids.len(),
            PLAYER_SLOTS,
            "header player name string ids",
        )?;
        expect_len(self.players.len(), PLAYER_SLOTS, "header player slots")?;

        c.write_u32(self.next_unit_id);
        c.write_f32(HEADER_VERSION);
        for name in &self.player_names {
            c.write_fixed_string(name, PLAYER_NAME_LEN)?;
        }
        for &id in &self.player_name_string_ids {
            c.write_u32(id);
        }
        for player in &self.players {
            player.encode(c);
        }
        c.write_u32(self.unknown1);
        c.write_u8(self.reserved);
        c.write_f32(self.unknown2);
        c.write_string_i16(&self.original_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn default_header_has_fixed_size() {
        let mut c = ByteCursor::default();
        ScenarioHeader::default().encode(&mut c).expect("encode");
        // id + version + names + string ids + player slots + tail + empty file name
        let expected = 4 + 4 + 16 * 256 + 16 * 4 + 16 * 16 + 4 + 1 + 4 + 2;
        assert_eq!(c.len(), expected);
    }

    #[test]
    fn wrong_inner_version_is_rejected() {
        let mut c = ByteCursor::default();
        ScenarioHeader::default().encode(&mut c).expect("encode");
        let mut bytes = c.into_inner();
        bytes[4..8].copy_from_slice(&1.21f32.to_le_bytes());

        let err = ScenarioHeader::decode(&mut ByteCursor::new(bytes)).expect_err("version");
        assert_eq!(err.code(), ErrorCode::VersionMismatch);
    }

    #[test]
    fn player_count_is_enforced_on_encode() {
        let mut header = ScenarioHeader::default();
        header.player_names.pop();
        let mut c = ByteCursor::default();
        let err = header.encode(&mut c).expect_err("15 names");
        assert_eq!(err.code(), ErrorCode::FormatViolation);
        assert!(c.is_empty());
    }

    #[test]
    fn names_round_trip() {
        let mut header = ScenarioHeader::default();
        header.player_names[0] = "Saladin".to_string();
        header.players[0] = PlayerSlot {
            active: 1,
            human: 1,
            civ: 9,
            unknown: 4,
        };
        header.original_file_name = "saladin1.scx".to_string();

        let mut c = ByteCursor::default();
        header.encode(&mut c).expect("encode");
        c.seek_to(0).expect("seek");
        let decoded = ScenarioHeader::decode(&mut c).expect("decode");
        assert_eq!(decoded, header);
        assert_eq!(c.remaining(), 0);
    }
}
