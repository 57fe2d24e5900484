use serde::{Deserialize, Serialize};

use super::{PLAYER_SLOTS, SectionCodec};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::layout::SectionId;
use crate::records::{expect_len, read_sentinel, read_vec, write_sentinel};

const UNKNOWN_STRING_COUNT: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAiResources {
    pub unknown_strings: Vec<String>,
    pub ai_names: Vec<String>,
    pub ai_files: Vec<AiFile>,
    pub ai_types: Vec<u8>,
    pub resources: Vec<StartingResources>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AiFile {
    pub unknown1: u32,
    pub unknown2: u32,
    /// Contents of the player's `.per` script.
    pub script: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StartingResources {
    pub gold: u32,
    pub wood: u32,
    pub food: u32,
    pub stone: u32,
    pub ore: u32,
    pub padding: u32,
}

impl Default for PlayerAiResources {
    fn default() -> Self {
        Self {
            unknown_strings: vec![String::new(); UNKNOWN_STRING_COUNT],
            ai_names: vec![String::new(); PLAYER_SLOTS],
            ai_files: vec![AiFile::default(); PLAYER_SLOTS],
            ai_types: vec![0; PLAYER_SLOTS],
            resources: vec![StartingResources::default(); PLAYER_SLOTS],
        }
    }
}

impl AiFile {
    fn decode(c: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            unknown1: c.read_u32()?,
            unknown2: c.read_u32()?,
            script: c.read_string_i32()?,
        })
    }

    fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        c.write_u32(self.unknown1);
        c.write_u32(self.unknown2);
        c.write_string_i32(&self.script)
    }
}

impl StartingResources {
    fn decode(c: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            gold: c.read_u32()?,
            wood: c.read_u32()?,
            food: c.read_u32()?,
            stone: c.read_u32()?,
            ore: c.read_u32()?,
            padding: c.read_u32()?,
        })
    }

    fn encode(&self, c: &mut ByteCursor) {
        for v in [
            self.gold,
            self.wood,
            self.food,
            self.stone,
            self.ore,
            self.padding,
        ] {
            c.write_u32(v);
        }
    }
}

impl SectionCodec for PlayerAiResources {
    const ID: SectionId = SectionId::PlayerAiResources;

    fn decode(c: &mut ByteCursor) -> Result<Self> {
        let unknown_strings = read_vec(c, UNKNOWN_STRING_COUNT, ByteCursor::read_string_i16)?;
        let ai_names = read_vec(c, PLAYER_SLOTS, ByteCursor::read_string_i16)?;
        let ai_files = read_vec(c, PLAYER_SLOTS, AiFile::decode)?;
        let ai_types = read_vec(c, PLAYER_SLOTS, ByteCursor::read_u8)?;
        read_sentinel(c, "player AI and resources")?;
        let resources = read_vec(c, PLAYER_SLOTS, StartingResources::decode)?;

        Ok(Self {
            unknown_strings,
            ai_names,
            ai_files,
            ai_types,
            resources,
        })
    }

    fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        expect_len(self.unknown_strings.len(), UNKNOWN_STRING_COUNT, "unknown strings")?;
        expect_len(self.ai_names.len(), PLAYER_SLOTS, "AI names")?;
        expect_len(self.ai_files.len(), PLAYER_SLOTS, "AI files")?;
        expect_len(self.ai_types.len(), PLAYER_SLOTS, "AI types")?;
        expect_len(self.resources.len(), PLAYER_SLOTS, "starting resources")?;

        for s in self.unknown_strings.iter().chain(&self.ai_names) {
            c.write_string_i16(s)?;
        }
        for file in &self.ai_files {
            file.encode(c)?;
        }
        c.write_bytes(&self.ai_types);
        write_sentinel(c);
        for entry in &self.resources {
            entry.encode(c);
        }
        Ok(())
    }
}
