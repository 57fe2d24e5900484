//! Device-independent bitmaps as embedded in the messages section.

use serde::{Deserialize, Serialize};

use crate::cursor::ByteCursor;
use crate::error::{Result, ScxError};
use crate::records::read_vec;

const FILE_MAGIC: [u8; 2] = *b"BM";
const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: u32 = 40;
const BI_RGB: u32 = 0;

/// Image codec capability used for the embedded scenario bitmap.
pub trait ImageCodec: Sized {
    /// Decode an image at the cursor. `read_file_header` selects whether a
    /// 14-byte `BM` file header precedes the info header.
    fn decode(c: &mut ByteCursor, read_file_header: bool) -> Result<Self>;

    fn encode(&self, c: &mut ByteCursor, write_file_header: bool) -> Result<()>;

    fn width(&self) -> i32;

    fn height(&self) -> i32;
}

/// Uncompressed (`BI_RGB`) bitmap: info header, palette and raw rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bitmap {
    pub width: i32,
    /// Positive for bottom-up rows, negative for top-down.
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub size_image: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
    /// BGRX entries.
    pub palette: Vec<[u8; 4]>,
    /// Rows padded to a multiple of four bytes.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Build an 8-bit paletted bitmap from unpadded, bottom-up pixel rows.
    pub fn indexed8(
        width: u16,
        height: u16,
        palette: Vec<[u8; 4]>,
        rows: &[u8],
    ) -> Result<Self> {
        if palette.is_empty() || palette.len() > 256 {
            return Err(ScxError::violation(format!(
                "8-bit palette must hold 1..=256 entries, got {}",
                palette.len()
            )));
        }
        if width == 0 || height == 0 {
            return Err(ScxError::violation("bitmap dimensions must be non-zero"));
        }
        let w = usize::from(width);
        let h = usize::from(height);
        if rows.len() != w * h {
            return Err(ScxError::violation(format!(
                "{width}x{height} bitmap needs {} pixels, got {}",
                w * h,
                rows.len()
            )));
        }

        let stride = (w + 3) & !3;
        let mut pixels = vec![0u8; stride * h];
        for (dst, src) in pixels.chunks_exact_mut(stride).zip(rows.chunks_exact(w)) {
            dst[..w].copy_from_slice(&src[..w]);
        }

        Ok(Self {
            width: width.into(),
            height: height.into(),
            planes: 1,
            bit_count: 8,
            size_image: pixels.len() as u32,
            x_pels_per_meter: 0,
            y_pels_per_meter: 0,
            colors_used: palette.len() as u32,
            colors_important: 0,
            palette,
            pixels,
        })
    }

    pub fn row_stride(&self) -> Result<usize> {
        let width = u64::try_from(self.width)
            .map_err(|_| ScxError::violation(format!("negative bitmap width {}", self.width)))?;
        let bits = width * u64::from(self.bit_count);
        usize::try_from(bits.div_ceil(32) * 4)
            .map_err(|_| ScxError::violation("bitmap row stride overflows"))
    }

    pub fn pixel_data_len(&self) -> Result<usize> {
        let rows = self.height.unsigned_abs() as usize;
        self.row_stride()?
            .checked_mul(rows)
            .ok_or_else(|| ScxError::violation("bitmap pixel data size overflows"))
    }

    pub fn palette_len(&self) -> usize {
        if self.colors_used != 0 {
            self.colors_used as usize
        } else if self.bit_count <= 8 {
            1 << self.bit_count
        } else {
            0
        }
    }

    /// Standalone `.bmp` file bytes.
    pub fn to_bmp_file(&self) -> Result<Vec<u8>> {
        let mut c = ByteCursor::default();
        self.encode(&mut c, true)?;
        Ok(c.into_inner())
    }

    fn validate(&self) -> Result<()> {
        if !matches!(self.bit_count, 1 | 4 | 8 | 16 | 24 | 32) {
            return Err(ScxError::violation(format!(
                "unsupported bitmap bit count {}",
                self.bit_count
            )));
        }
        if self.palette.len() != self.palette_len() {
            return Err(ScxError::violation(format!(
                "bitmap palette has {} entries, header implies {}",
                self.palette.len(),
                self.palette_len()
            )));
        }
        let expected = self.pixel_data_len()?;
        if self.pixels.len() != expected {
            return Err(ScxError::violation(format!(
                "bitmap pixel data has {} bytes, {}x{}@{}bpp needs {expected}",
                self.pixels.len(),
                self.width,
                self.height,
                self.bit_count
            )));
        }
        Ok(())
    }
}

impl ImageCodec for Bitmap {
    fn decode(c: &mut ByteCursor, read_file_header: bool) -> Result<Self> {
        if read_file_header {
            let magic = c.read_array::<2>()?;
            if magic != FILE_MAGIC {
                return Err(ScxError::violation(format!(
                    "bitmap file header magic {magic:02X?}, expected \"BM\""
                )));
            }
            // File size, two reserved words and the pixel offset are derived on write.
            c.skip(FILE_HEADER_LEN - 2)?;
        }

        let info_len = c.read_u32()?;
        if info_len != INFO_HEADER_LEN {
            return Err(ScxError::violation(format!(
                "bitmap info header of {info_len} bytes, only {INFO_HEADER_LEN} is supported"
            )));
        }
        let width = c.read_i32()?;
        let height = c.read_i32()?;
        let planes = c.read_u16()?;
        let bit_count = c.read_u16()?;
        let compression = c.read_u32()?;
        if compression != BI_RGB {
            return Err(ScxError::violation(format!(
                "bitmap compression mode {compression} is not supported"
            )));
        }

        let mut bitmap = Self {
            width,
            height,
            planes,
            bit_count,
            size_image: c.read_u32()?,
            x_pels_per_meter: c.read_i32()?,
            y_pels_per_meter: c.read_i32()?,
            colors_used: c.read_u32()?,
            colors_important: c.read_u32()?,
            palette: Vec::new(),
            pixels: Vec::new(),
        };

        bitmap.palette = read_vec(c, bitmap.palette_len(), ByteCursor::read_array::<4>)?;
        let data_len = bitmap.pixel_data_len()?;
        bitmap.pixels = c.read_bytes(data_len)?;
        bitmap.validate()?;
        Ok(bitmap)
    }

    fn encode(&self, c: &mut ByteCursor, write_file_header: bool) -> Result<()> {
        self.validate()?;

        if write_file_header {
            let offset = FILE_HEADER_LEN + INFO_HEADER_LEN as usize + 4 * self.palette.len();
            let file_len = u32::try_from(offset + self.pixels.len())
                .map_err(|_| ScxError::violation("bitmap exceeds 4 GiB"))?;
            c.write_bytes(&FILE_MAGIC);
            c.write_u32(file_len);
            c.write_u32(0);
            c.write_u32(offset as u32);
        }

        c.write_u32(INFO_HEADER_LEN);
        c.write_i32(self.width);
        c.write_i32(self.height);
        c.write_u16(self.planes);
        c.write_u16(self.bit_count);
        c.write_u32(BI_RGB);
        c.write_u32(self.size_image);
        c.write_i32(self.x_pels_per_meter);
        c.write_i32(self.y_pels_per_meter);
        c.write_u32(self.colors_used);
        c.write_u32(self.colors_important);
        for entry in &self.palette {
            c.write_bytes(entry);
        }
        c.write_bytes(&self.pixels);
        Ok(())
    }

    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn checkerboard() -> Bitmap {
        let palette = vec![[0, 0, 0, 0], [255, 255, 255, 0]];
        let rows: Vec<u8> = (0..15).map(|i| (i % 2) as u8).collect();
        Bitmap::indexed8(5, 3, palette, &rows).expect("valid bitmap")
    }

    #[test]
    fn rows_are_padded_to_four_bytes() {
        let bmp = checkerboard();
        assert_eq!(bmp.row_stride().expect("stride"), 8);
        assert_eq!(bmp.pixels.len(), 24);
        assert_eq!(&bmp.pixels[..8], &[0, 1, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn decode_without_file_header() {
        let bmp = checkerboard();
        let mut c = ByteCursor::default();
        bmp.encode(&mut c, false).expect("encode");
        assert_eq!(c.len(), 40 + 2 * 4 + 24);

        c.seek_to(0).expect("seek");
        let decoded = Bitmap::decode(&mut c, false).expect("decode");
        assert_eq!(decoded, bmp);
        assert_eq!((decoded.width(), decoded.height()), (5, 3));
    }

    #[test]
    fn standalone_file_has_bm_header() {
        let file = checkerboard().to_bmp_file().expect("bmp file");
        assert_eq!(&file[..2], b"BM");
        assert_eq!(u32::from_le_bytes(file[2..6].try_into().unwrap()) as usize, file.len());
        assert_eq!(u32::from_le_bytes(file[10..14].try_into().unwrap()), 14 + 40 + 8);

        let decoded = Bitmap::decode(&mut ByteCursor::new(file), true).expect("decode");
        assert_eq!(decoded, checkerboard());
    }

    #[test]
    fn compressed_bitmaps_are_rejected() {
        let mut c = ByteCursor::default();
        checkerboard().encode(&mut c, false).expect("encode");
        let mut bytes = c.into_inner();
        bytes[16..20].copy_from_slice(&1u32.to_le_bytes());
        let err = Bitmap::decode(&mut ByteCursor::new(bytes), false).expect_err("RLE8");
        assert_eq!(err.code(), ErrorCode::FormatViolation);
    }

    #[test]
    fn truncated_pixels_run_out_of_data() {
        let mut c = ByteCursor::default();
        checkerboard().encode(&mut c, false).expect("encode");
        let mut bytes = c.into_inner();
        bytes.truncate(bytes.len() - 1);
        let err = Bitmap::decode(&mut ByteCursor::new(bytes), false).expect_err("short");
        assert_eq!(err.code(), ErrorCode::OutOfData);
    }
}
