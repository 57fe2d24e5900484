use serde::{Deserialize, Serialize};

use super::SectionCodec;
use crate::cursor::ByteCursor;
use crate::error::{Result, ScxError};
use crate::layout::SectionId;
use crate::records::{expect_len, read_sentinel, read_vec, write_sentinel};

/// Terrain grid. Tiles are stored row-major, `width * height` entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Map {
    pub camera_y: i32,
    pub camera_x: i32,
    pub ai_map_code: i32,
    pub width: u32,
    pub height: u32,
    pub tiles: Vec<Tile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: u8,
    pub elevation: u8,
    pub unused: u8,
}

impl Map {
    /// A `width` × `height` map filled with `terrain` at elevation zero.
    pub fn filled(width: u32, height: u32, terrain: u8) -> Self {
        let count = width as usize * height as usize;
        Self {
            width,
            height,
            tiles: vec![
                Tile {
                    terrain,
                    ..Tile::default()
                };
                count
            ],
            ..Self::default()
        }
    }

    pub fn tile(&self, x: u32, y: u32) -> Option<&Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(y as usize * self.width as usize + x as usize)
    }

    fn tile_count(&self) -> Result<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or_else(|| {
                ScxError::violation(format!("map size {}x{} overflows", self.width, self.height))
            })
    }
}

impl SectionCodec for Map {
    const ID: SectionId = SectionId::Map;

    fn decode(c: &mut ByteCursor) -> Result<Self> {
        read_sentinel(c, "map")?;
        let camera_y = c.read_i32()?;
        let camera_x = c.read_i32()?;
        let ai_map_code = c.read_i32()?;
        let width = c.read_u32()?;
        let height = c.read_u32()?;

        let mut map = Self {
            camera_y,
            camera_x,
            ai_map_code,
            width,
            height,
            tiles: Vec::new(),
        };
        let count = map.tile_count()?;
        map.tiles = read_vec(c, count, |c| {
            Ok(Tile {
                terrain: c.read_u8()?,
                elevation: c.read_u8()?,
                unused: c.read_u8()?,
            })
        })?;
        Ok(map)
    }

    fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        expect_len(self.tiles.len(), self.tile_count()?, "map tiles")?;

        write_sentinel(c);
        c.write_i32(self.camera_y);
        c.write_i32(self.camera_x);
        c.write_i32(self.ai_map_code);
        c.write_u32(self.width);
        c.write_u32(self.height);
        for tile in &self.tiles {
            c.write_bytes(&[tile.terrain, tile.elevation, tile.unused]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn tiles_are_three_bytes_each() {
        let mut map = Map::filled(4, 3, 2);
        map.tiles[5].elevation = 1;
        let mut c = ByteCursor::default();
        map.encode(&mut c).expect("encode");
        assert_eq!(c.len(), 4 + 5 * 4 + 12 * 3);

        c.seek_to(0).expect("seek");
        let decoded = Map::decode(&mut c).expect("decode");
        assert_eq!(decoded.tile(1, 1).map(|t| t.elevation), Some(1));
        assert_eq!(decoded, map);
    }

    #[test]
    fn tile_count_must_match_dimensions() {
        let mut map = Map::filled(2, 2, 0);
        map.tiles.pop();
        let err = map.encode(&mut ByteCursor::default()).expect_err("3 tiles");
        assert_eq!(err.code(), ErrorCode::FormatViolation);
    }

    #[test]
    fn oversized_dimensions_run_out_of_data() {
        let mut map = Map::filled(1, 1, 0);
        map.width = 5000;
        map.height = 5000;
        map.tiles.clear();
        let mut c = ByteCursor::default();
        write_sentinel(&mut c);
        c.write_zeros(12);
        c.write_u32(map.width);
        c.write_u32(map.height);
        c.seek_to(0).expect("seek");

        let err = Map::decode(&mut c).expect_err("no tiles");
        assert_eq!(err.code(), ErrorCode::OutOfData);
    }

    #[test]
    fn out_of_range_tile_lookup() {
        let map = Map::filled(2, 2, 0);
        assert!(map.tile(2, 0).is_none());
        assert!(map.tile(1, 1).is_some());
    }
}
