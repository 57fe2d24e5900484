use serde::{Deserialize, Serialize};

use super::SectionCodec;
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::layout::SectionId;
use crate::records::{expect_len, read_count, read_counted, read_vec, write_count, write_counted};

/// Number of resource/population entries, one per playable player.
pub const RESOURCE_ENTRIES: usize = 8;

/// Placed units. Section 0 belongs to Gaia, sections 1..=8 to the players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Units {
    pub resources: Vec<ResourcePopulation>,
    pub sections: Vec<Vec<UnitEntry>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourcePopulation {
    pub gold: f32,
    pub wood: f32,
    pub food: f32,
    pub stone: f32,
    pub ore: f32,
    pub padding: u32,
    pub population_limit: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitEntry {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Instance id referenced by trigger effects and conditions.
    pub id: u32,
    pub unit_id: u16,
    pub state: u8,
    pub rotation: f32,
    pub frame: u16,
    /// Instance id of the containing unit, or -1.
    pub garrisoned_in: i32,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            resources: vec![ResourcePopulation::default(); RESOURCE_ENTRIES],
            sections: vec![Vec::new(); RESOURCE_ENTRIES + 1],
        }
    }
}

impl Units {
    pub fn unit_count(&self) -> usize {
        self.sections.iter().map(Vec::len).sum()
    }

    pub fn find(&self, id: u32) -> Option<&UnitEntry> {
        self.sections.iter().flatten().find(|unit| unit.id == id)
    }
}

impl ResourcePopulation {
    fn decode(c: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            gold: c.read_f32()?,
            wood: c.read_f32()?,
            food: c.read_f32()?,
            stone: c.read_f32()?,
            ore: c.read_f32()?,
            padding: c.read_u32()?,
            population_limit: c.read_f32()?,
        })
    }

    fn encode(&self, c: &mut ByteCursor) {
        c.write_f32(self.gold);
        c.write_f32(self.wood);
        c.write_f32(self.food);
        c.write_f32(self.stone);
        c.write_f32(self.ore);
        c.write_u32(self.padding);
        c.write_f32(self.population_limit);
    }
}

impl UnitEntry {
    fn decode(c: &mut ByteCursor) -> Result<Self> {
        Ok(Self {
            x: c.read_f32()?,
            y: c.read_f32()?,
            z: c.read_f32()?,
            id: c.read_u32()?,
            unit_id: c.read_u16()?,
            state: c.read_u8()?,
            rotation: c.read_f32()?,
            frame: c.read_u16()?,
            garrisoned_in: c.read_i32()?,
        })
    }

    fn encode(&self, c: &mut ByteCursor) {
        c.write_f32(self.x);
        c.write_f32(self.y);
        c.write_f32(self.z);
        c.write_u32(self.id);
        c.write_u16(self.unit_id);
        c.write_u8(self.state);
        c.write_f32(self.rotation);
        c.write_u16(self.frame);
        c.write_i32(self.garrisoned_in);
    }
}

impl SectionCodec for Units {
    const ID: SectionId = SectionId::Units;

    fn decode(c: &mut ByteCursor) -> Result<Self> {
        let section_count = read_count(c, "unit section")?;
        let resources = read_vec(c, RESOURCE_ENTRIES, ResourcePopulation::decode)?;
        let sections = read_vec(c, section_count, |c| {
            read_counted(c, "unit", UnitEntry::decode)
        })?;
        Ok(Self {
            resources,
            sections,
        })
    }

    fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        expect_len(self.resources.len(), RESOURCE_ENTRIES, "resource/population entries")?;

        write_count(c, self.sections.len(), "unit section")?;
        for entry in &self.resources {
            entry.encode(c);
        }
        for units in &self.sections {
            write_counted(c, units, "unit", |c, unit| {
                unit.encode(c);
                Ok(())
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn archer(id: u32) -> UnitEntry {
        UnitEntry {
            x: 10.5,
            y: 20.5,
            id,
            unit_id: 4,
            state: 2,
            garrisoned_in: -1,
            ..UnitEntry::default()
        }
    }

    #[test]
    fn unit_records_are_twenty_nine_bytes() {
        let mut units = Units::default();
        units.sections[1] = vec![archer(100), archer(101)];
        units.sections[3] = vec![archer(102)];

        let mut c = ByteCursor::default();
        units.encode(&mut c).expect("encode");
        assert_eq!(c.len(), 4 + 8 * 28 + 9 * 4 + 3 * 29);

        c.seek_to(0).expect("seek");
        let decoded = Units::decode(&mut c).expect("decode");
        assert_eq!(decoded.unit_count(), 3);
        assert_eq!(decoded.find(102).map(|u| u.unit_id), Some(4));
        assert_eq!(decoded, units);
    }

    #[test]
    fn negative_section_count_is_rejected() {
        let mut c = ByteCursor::default();
        c.write_i32(-1);
        c.write_zeros(8 * 28);
        c.seek_to(0).expect("seek");
        let err = Units::decode(&mut c).expect_err("negative");
        assert_eq!(err.code(), ErrorCode::FormatViolation);
    }
}
