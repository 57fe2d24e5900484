use std::fmt;

use serde::{Deserialize, Serialize};

use super::SectionCodec;
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::layout::SectionId;
use crate::records::{read_sentinel, write_sentinel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VictoryMode {
    #[default]
    Standard,
    Conquest,
    Score,
    Timed,
    Custom,
    Unknown(u32),
}

impl VictoryMode {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            0 => Self::Standard,
            1 => Self::Conquest,
            2 => Self::Score,
            3 => Self::Timed,
            4 => Self::Custom,
            other => Self::Unknown(other),
        }
    }

    pub fn raw(&self) -> u32 {
        match *self {
            Self::Standard => 0,
            Self::Conquest => 1,
            Self::Score => 2,
            Self::Timed => 3,
            Self::Custom => 4,
            Self::Unknown(other) => other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Standard => "Standard",
            Self::Conquest => "Conquest",
            Self::Score => "Score",
            Self::Timed => "Timed",
            Self::Custom => "Custom",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for VictoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Unknown(v) => write!(f, "Unknown ({})", v),
            _ => f.write_str(self.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlobalVictory {
    pub conquest_required: u32,
    pub unused1: u32,
    pub relics_required: u32,
    pub unused2: u32,
    pub explored_percent_required: u32,
    pub unused3: u32,
    pub all_custom_conditions_required: u32,
    pub mode: VictoryMode,
    pub score_required: u32,
    pub time_required: u32,
}

impl SectionCodec for GlobalVictory {
    const ID: SectionId = SectionId::GlobalVictory;

    fn decode(c: &mut ByteCursor) -> Result<Self> {
        read_sentinel(c, "global victory")?;
        Ok(Self {
            conquest_required: c.read_u32()?,
            unused1: c.read_u32()?,
            relics_required: c.read_u32()?,
            unused2: c.read_u32()?,
            explored_percent_required: c.read_u32()?,
            unused3: c.read_u32()?,
            all_custom_conditions_required: c.read_u32()?,
            mode: VictoryMode::from_raw(c.read_u32()?),
            score_required: c.read_u32()?,
            time_required: c.read_u32()?,
        })
    }

    fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        write_sentinel(c);
        for v in [
            self.conquest_required,
            self.unused1,
            self.relics_required,
            self.unused2,
            self.explored_percent_required,
            self.unused3,
            self.all_custom_conditions_required,
            self.mode.raw(),
            self.score_required,
            self.time_required,
        ] {
            c.write_u32(v);
        }
        Ok(())
    }
}
