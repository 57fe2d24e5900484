use serde::{Deserialize, Serialize};

use super::{PLAYER_SLOTS, SectionCodec};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::layout::SectionId;
use crate::records::{expect_len, read_sentinel, read_vec, write_sentinel};

/// Zero block between the stance matrix and the allied victory flags.
const GAP_LEN: usize = 11520;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diplomacy {
    /// `stances[from][to]`, 16 × 16.
    pub stances: Vec<Vec<u32>>,
    pub allied_victory: Vec<u32>,
}

impl Default for Diplomacy {
    fn default() -> Self {
        Self {
            stances: vec![vec![0; PLAYER_SLOTS]; PLAYER_SLOTS],
            allied_victory: vec![0; PLAYER_SLOTS],
        }
    }
}

impl SectionCodec for Diplomacy {
    const ID: SectionId = SectionId::Diplomacy;

    fn decode(c: &mut ByteCursor) -> Result<Self> {
        let stances = read_vec(c, PLAYER_SLOTS, |c| {
            read_vec(c, PLAYER_SLOTS, ByteCursor::read_u32)
        })?;
        c.skip(GAP_LEN)?;
        read_sentinel(c, "diplomacy")?;
        let allied_victory = read_vec(c, PLAYER_SLOTS, ByteCursor::read_u32)?;

        Ok(Self {
            stances,
            allied_victory,
        })
    }

    fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        expect_len(self.stances.len(), PLAYER_SLOTS, "diplomacy stance rows")?;
        for row in &self.stances {
            expect_len(row.len(), PLAYER_SLOTS, "diplomacy stance row")?;
        }
        expect_len(self.allied_victory.len(), PLAYER_SLOTS, "allied victory flags")?;

        for &stance in self.stances.iter().flatten() {
            c.write_u32(stance);
        }
        c.write_zeros(GAP_LEN);
        write_sentinel(c);
        for &flag in &self.allied_victory {
            c.write_u32(flag);
        }
        Ok(())
    }
}
