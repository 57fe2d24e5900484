use serde::{Deserialize, Serialize};

use super::SectionCodec;
use crate::bitmap::{Bitmap, ImageCodec};
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::layout::SectionId;
use crate::records::{presence_flag, read_if};

const BITMAP_MARKER_PRESENT: i16 = -1;
const BITMAP_MARKER_ABSENT: i16 = 1;

/// Message texts, cinematic file names and the optional background bitmap.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MessagesCinematics {
    pub instructions_string_id: u32,
    pub hints_string_id: u32,
    pub victory_string_id: u32,
    pub loss_string_id: u32,
    pub history_string_id: u32,
    pub scouts_string_id: u32,
    pub instructions: String,
    pub hints: String,
    pub victory: String,
    pub loss: String,
    pub history: String,
    pub scouts: String,
    pub pregame_cinematic: String,
    pub victory_cinematic: String,
    pub loss_cinematic: String,
    pub background_file_name: String,
    pub bitmap: Option<Bitmap>,
}

impl SectionCodec for MessagesCinematics {
    const ID: SectionId = SectionId::MessagesCinematics;

    fn decode(c: &mut ByteCursor) -> Result<Self> {
        let instructions_string_id = c.read_u32()?;
        let hints_string_id = c.read_u32()?;
        let victory_string_id = c.read_u32()?;
        let loss_string_id = c.read_u32()?;
        let history_string_id = c.read_u32()?;
        let scouts_string_id = c.read_u32()?;

        let instructions = c.read_string_i16()?;
        let hints = c.read_string_i16()?;
        let victory = c.read_string_i16()?;
        let loss = c.read_string_i16()?;
        let history = c.read_string_i16()?;
        let scouts = c.read_string_i16()?;
        let pregame_cinematic = c.read_string_i16()?;
        let victory_cinematic = c.read_string_i16()?;
        let loss_cinematic = c.read_string_i16()?;
        let background_file_name = c.read_string_i16()?;

        let included = c.read_u32()?;
        // Stored width, height and marker are re-derived from the bitmap on write.
        let _width = c.read_i32()?;
        let _height = c.read_i32()?;
        let _marker = c.read_i16()?;
        let bitmap = read_if(c, included != 0, |c| Bitmap::decode(c, false))?;

        Ok(Self {
            instructions_string_id,
            hints_string_id,
            victory_string_id,
            loss_string_id,
            history_string_id,
            scouts_string_id,
            instructions,
            hints,
            victory,
            loss,
            history,
            scouts,
            pregame_cinematic,
            victory_cinematic,
            loss_cinematic,
            background_file_name,
            bitmap,
        })
    }

    fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        c.write_u32(self.instructions_string_id);
        c.write_u32(self.hints_string_id);
        c.write_u32(self.victory_string_id);
        c.write_u32(self.loss_string_id);
        c.write_u32(self.history_string_id);
        c.write_u32(self.scouts_string_id);

        for text in [
            &self.instructions,
            &self.hints,
            &self.victory,
            &self.loss,
            &self.history,
            &self.scouts,
            &self.pregame_cinematic,
            &self.victory_cinematic,
            &self.loss_cinematic,
            &self.background_file_name,
        ] {
            c.write_string_i16(text)?;
        }

        c.write_u32(presence_flag(&self.bitmap));
        match &self.bitmap {
            Some(bitmap) => {
                c.write_i32(bitmap.width());
                c.write_i32(bitmap.height());
                c.write_i16(BITMAP_MARKER_PRESENT);
                bitmap.encode(c, false)?;
            }
            None => {
                c.write_i32(0);
                c.write_i32(0);
                c.write_i16(BITMAP_MARKER_ABSENT);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_bitmap() -> Bitmap {
        Bitmap::indexed8(2, 2, vec![[10, 20, 30, 0]; 4], &[0, 1, 2, 3]).expect("bitmap")
    }

    #[test]
    fn absent_bitmap_writes_placeholder_fields() {
        let mut c = ByteCursor::default();
        MessagesCinematics::default().encode(&mut c).expect("encode");
        let bytes = c.into_inner();
        // 6 ids + 10 empty strings, then flag/width/height/marker.
        let tail = &bytes[6 * 4 + 10 * 2..];
        assert_eq!(tail.len(), 14);
        assert_eq!(&tail[..4], &0u32.to_le_bytes());
        assert_eq!(&tail[12..], &1i16.to_le_bytes());
    }

    #[test]
    fn bitmap_flag_follows_presence() {
        let messages = MessagesCinematics {
            instructions: "Hold the pass.".to_string(),
            bitmap: Some(tiny_bitmap()),
            ..Default::default()
        };
        let mut c = ByteCursor::default();
        messages.encode(&mut c).expect("encode");

        let flag_at = 6 * 4 + 10 * 2 + "Hold the pass.".len();
        let bytes = c.as_slice();
        assert_eq!(&bytes[flag_at..flag_at + 4], &1u32.to_le_bytes());
        assert_eq!(&bytes[flag_at + 4..flag_at + 8], &2i32.to_le_bytes());
        assert_eq!(&bytes[flag_at + 12..flag_at + 14], &(-1i16).to_le_bytes());

        c.seek_to(0).expect("seek");
        let decoded = MessagesCinematics::decode(&mut c).expect("decode");
        assert_eq!(decoded, messages);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn stale_header_dimensions_are_ignored() {
        let messages = MessagesCinematics {
            bitmap: Some(tiny_bitmap()),
            ..Default::default()
        };
        let mut c = ByteCursor::default();
        messages.encode(&mut c).expect("encode");
        let mut bytes = c.into_inner();
        let width_at = 6 * 4 + 10 * 2 + 4;
        bytes[width_at..width_at + 4].copy_from_slice(&999i32.to_le_bytes());

        let decoded = MessagesCinematics::decode(&mut ByteCursor::new(bytes)).expect("decode");
        let bitmap = decoded.bitmap.expect("bitmap present");
        assert_eq!(bitmap.width(), 2);
    }
}
