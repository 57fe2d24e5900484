use serde::{Deserialize, Serialize};

use super::{PLAYER_SLOTS, SectionCodec};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::layout::SectionId;
use crate::records::{
    check_padded_lists, expect_len, read_padded_lists, read_vec, write_padded_lists,
};

pub const MAX_DISABLED_TECHS: usize = 30;
pub const MAX_DISABLED_UNITS: usize = 30;
pub const MAX_DISABLED_BUILDINGS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Disables {
    pub techs: Vec<Vec<u32>>,
    pub units: Vec<Vec<u32>>,
    pub buildings: Vec<Vec<u32>>,
    pub unused1: u32,
    pub unused2: u32,
    pub full_tech_mode: u32,
    pub starting_ages: Vec<i32>,
}

impl Default for Disables {
    fn default() -> Self {
        Self {
            techs: vec![Vec::new(); PLAYER_SLOTS],
            units: vec![Vec::new(); PLAYER_SLOTS],
            buildings: vec![Vec::new(); PLAYER_SLOTS],
            unused1: 0,
            unused2: 0,
            full_tech_mode: 0,
            starting_ages: vec![0; PLAYER_SLOTS],
        }
    }
}

impl Disables {
    fn padded_lists(&self) -> [(&[Vec<u32>], usize, &'static str); 3] {
        [
            (self.techs.as_slice(), MAX_DISABLED_TECHS, "disabled techs"),
            (self.units.as_slice(), MAX_DISABLED_UNITS, "disabled units"),
            (self.buildings.as_slice(), MAX_DISABLED_BUILDINGS, "disabled buildings"),
        ]
    }
}

impl SectionCodec for Disables {
    const ID: SectionId = SectionId::Disables;

    fn decode(c: &mut ByteCursor) -> Result<Self> {
        let techs = read_padded_lists(c, PLAYER_SLOTS, MAX_DISABLED_TECHS, "disabled techs")?;
        let units = read_padded_lists(c, PLAYER_SLOTS, MAX_DISABLED_UNITS, "disabled units")?;
        let buildings =
            read_padded_lists(c, PLAYER_SLOTS, MAX_DISABLED_BUILDINGS, "disabled buildings")?;

        Ok(Self {
            techs,
            units,
            buildings,
            unused1: c.read_u32()?,
            unused2: c.read_u32()?,
            full_tech_mode: c.read_u32()?,
            starting_ages: read_vec(c, PLAYER_SLOTS, ByteCursor::read_i32)?,
        })
    }

    fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        expect_len(self.starting_ages.len(), PLAYER_SLOTS, "starting ages")?;
        for (lists, capacity, what) in self.padded_lists() {
            check_padded_lists(lists, PLAYER_SLOTS, capacity, what)?;
        }

        write_padded_lists(c, &self.techs, PLAYER_SLOTS, MAX_DISABLED_TECHS, "disabled techs")?;
        write_padded_lists(c, &self.units, PLAYER_SLOTS, MAX_DISABLED_UNITS, "disabled units")?;
        write_padded_lists(
            c,
            &self.buildings,
            PLAYER_SLOTS,
            MAX_DISABLED_BUILDINGS,
            "disabled buildings",
        )?;
        c.write_u32(self.unused1);
        c.write_u32(self.unused2);
        c.write_u32(self.full_tech_mode);
        for &age in &self.starting_ages {
            c.write_i32(age);
        }
        Ok(())
    }
}
