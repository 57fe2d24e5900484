use serde::{Deserialize, Serialize};

use super::SectionCodec;
use crate::cursor::ByteCursor;
use crate::error::{Result, ScxError};
use crate::layout::SectionId;
use crate::records::{expect_len, read_vec};

pub const PLAYER_ENTRIES: usize = 8;
/// Entries with this version carry an extra 8-byte block.
pub const EXTENDED_ENTRY_VERSION: f32 = 2.0;
pub const UNKNOWN_BLOCK_LEN: usize = 44;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDiplomacyVarious {
    pub player_count: u32,
    pub entries: Vec<PlayerDiplomacyEntry>,
    pub unknown: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDiplomacyEntry {
    pub player_name: String,
    pub camera_x: f32,
    pub camera_y: f32,
    pub unknown_x: i16,
    pub unknown_y: i16,
    pub allied_victory: u8,
    /// Byte-sized stances (0 allied, 1 neutral, 3 enemy).
    pub stances: Vec<u8>,
    /// Word-sized stances (0 Gaia, 1 self, 2 allied, 3 neutral, 4 enemy).
    pub stance_types: Vec<u32>,
    pub color: u32,
    pub version: f32,
    /// Present exactly when `version` is 2.0.
    pub extended: Option<[u8; 8]>,
    /// Opaque 44-byte records.
    pub unknown_blocks: Vec<Vec<u8>>,
    pub unknown_tail: [u8; 7],
    pub unknown_end: i32,
}

impl Default for PlayerDiplomacyVarious {
    fn default() -> Self {
        Self {
            player_count: 0,
            entries: vec![PlayerDiplomacyEntry::default(); PLAYER_ENTRIES],
            unknown: 0,
        }
    }
}

impl Default for PlayerDiplomacyEntry {
    fn default() -> Self {
        Self {
            player_name: String::new(),
            camera_x: 0.0,
            camera_y: 0.0,
            unknown_x: 0,
            unknown_y: 0,
            allied_victory: 0,
            stances: Vec::new(),
            stance_types: Vec::new(),
            color: 0,
            version: EXTENDED_ENTRY_VERSION,
            extended: Some([0; 8]),
            unknown_blocks: Vec::new(),
            unknown_tail: [0; 7],
            unknown_end: -1,
        }
    }
}

impl PlayerDiplomacyEntry {
    fn is_extended(&self) -> bool {
        self.version == EXTENDED_ENTRY_VERSION
    }

    fn decode(c: &mut ByteCursor) -> Result<Self> {
        let player_name = c.read_string_u16()?;
        let camera_x = c.read_f32()?;
        let camera_y = c.read_f32()?;
        let unknown_x = c.read_i16()?;
        let unknown_y = c.read_i16()?;
        let allied_victory = c.read_u8()?;

        let stance_count = c.read_u16()? as usize;
        let stances = c.read_bytes(stance_count)?;
        let stance_types = read_vec(c, stance_count, ByteCursor::read_u32)?;

        let color = c.read_u32()?;
        let version = c.read_f32()?;
        let block_count = c.read_u16()? as usize;
        let extended = if version == EXTENDED_ENTRY_VERSION {
            Some(c.read_array::<8>()?)
        } else {
            None
        };
        let unknown_blocks = read_vec(c, block_count, |c| c.read_bytes(UNKNOWN_BLOCK_LEN))?;
        let unknown_tail = c.read_array::<7>()?;
        let unknown_end = c.read_i32()?;

        Ok(Self {
            player_name,
            camera_x,
            camera_y,
            unknown_x,
            unknown_y,
            allied_victory,
            stances,
            stance_types,
            color,
            version,
            extended,
            unknown_blocks,
            unknown_tail,
            unknown_end,
        })
    }

    fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        if self.stances.len() != self.stance_types.len() {
            return Err(ScxError::violation(format!(
                "player diplomacy: {} stances but {} stance types",
                self.stances.len(),
                self.stance_types.len()
            )));
        }
        if self.extended.is_some() != self.is_extended() {
            return Err(ScxError::violation(format!(
                "player diplomacy: extended block presence does not match version {}",
                self.version
            )));
        }
        for block in &self.unknown_blocks {
            expect_len(block.len(), UNKNOWN_BLOCK_LEN, "player diplomacy block")?;
        }
        let stance_count = u16::try_from(self.stances.len())
            .map_err(|_| ScxError::violation("player diplomacy: too many stances"))?;
        let block_count = u16::try_from(self.unknown_blocks.len())
            .map_err(|_| ScxError::violation("player diplomacy: too many blocks"))?;

        c.write_string_u16(&self.player_name)?;
        c.write_f32(self.camera_x);
        c.write_f32(self.camera_y);
        c.write_i16(self.unknown_x);
        c.write_i16(self.unknown_y);
        c.write_u8(self.allied_victory);
        c.write_u16(stance_count);
        c.write_bytes(&self.stances);
        for &stance in &self.stance_types {
            c.write_u32(stance);
        }
        c.write_u32(self.color);
        c.write_f32(self.version);
        c.write_u16(block_count);
        if let Some(extended) = &self.extended {
            c.write_bytes(extended);
        }
        for block in &self.unknown_blocks {
            c.write_bytes(block);
        }
        c.write_bytes(&self.unknown_tail);
        c.write_i32(self.unknown_end);
        Ok(())
    }
}

impl SectionCodec for PlayerDiplomacyVarious {
    const ID: SectionId = SectionId::PlayerDiplomacyVarious;

    fn decode(c: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            player_count: c.read_u32()?,
            entries: read_vec(c, PLAYER_ENTRIES, PlayerDiplomacyEntry::decode)?,
            unknown: c.read_u64()?,
        })
    }

    fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        expect_len(self.entries.len(), PLAYER_ENTRIES, "player diplomacy entries")?;

        c.write_u32(self.player_count);
        for entry in &self.entries {
            entry.encode(c)?;
        }
        c.write_u64(self.unknown);
        Ok(())
    }
}
