use crate::error::{Result, ScxError};

/// Position-tracking little-endian view over a growable byte buffer.
///
/// Reads advance the position and fail with `OutOfData` instead of
/// returning short results. Writes overwrite at the position and grow the
/// buffer when they run past its end.
#[derive(Debug, Clone, Default)]
pub struct ByteCursor {
    buf: Vec<u8>,
    pos: usize,
}

impl ByteCursor {
    pub fn new(buf: Vec<u8>) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Vec::with_capacity(capacity))
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    /// Bytes from the position to the end of the buffer, without consuming them.
    pub fn remaining_slice(&self) -> &[u8] {
        &self.buf[self.pos.min(self.buf.len())..]
    }

    pub fn seek_to(&mut self, pos: usize) -> Result<()> {
        if pos > self.buf.len() {
            return Err(ScxError::OutOfData {
                offset: pos,
                needed: 0,
                available: 0,
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        let available = self.remaining();
        if n > available {
            return Err(ScxError::OutOfData {
                offset: self.pos,
                needed: n,
                available,
            });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&self.buf[start..self.pos])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        Ok(self.take(n)?.to_vec())
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32_array<const N: usize>(&mut self) -> Result<[i32; N]> {
        let mut result = [0i32; N];
        for item in &mut result {
            *item = self.read_i32()?;
        }
        Ok(result)
    }

    pub fn read_u32_array<const N: usize>(&mut self) -> Result<[u32; N]> {
        let mut result = [0u32; N];
        for item in &mut result {
            *item = self.read_u32()?;
        }
        Ok(result)
    }

    /// Read exactly `n` bytes as a string.
    pub fn read_string(&mut self, n: usize) -> Result<String> {
        Ok(latin1_decode(self.take(n)?))
    }

    /// Read an `n`-byte slot, dropping the trailing NUL padding.
    ///
    /// Anything before the last non-NUL byte is kept verbatim, so writing
    /// the value back with [`ByteCursor::write_fixed_string`] restores the slot.
    pub fn read_fixed_string(&mut self, n: usize) -> Result<String> {
        let bytes = self.take(n)?;
        let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        Ok(latin1_decode(&bytes[..end]))
    }

    pub fn read_string_i16(&mut self) -> Result<String> {
        let offset = self.pos;
        let len = self.read_i16()?;
        let len = non_negative(len.into(), offset, "string length")?;
        self.read_string(len)
    }

    pub fn read_string_u16(&mut self) -> Result<String> {
        let len = self.read_u16()?;
        self.read_string(len.into())
    }

    pub fn read_string_i32(&mut self) -> Result<String> {
        let offset = self.pos;
        let len = self.read_i32()?;
        let len = non_negative(len, offset, "string length")?;
        self.read_string(len)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            self.buf.resize(end, 0);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
    }

    pub fn write_zeros(&mut self, n: usize) {
        let end = self.pos + n;
        if end > self.buf.len() {
            self.buf.resize(end, 0);
        }
        self.buf[self.pos..end].fill(0);
        self.pos = end;
    }

    pub fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_u16(&mut self, v: u16) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_string(&mut self, s: &str) -> Result<()> {
        let bytes = latin1_encode(s)?;
        self.write_bytes(&bytes);
        Ok(())
    }

    /// Write `s` into an `n`-byte slot, zero padded.
    pub fn write_fixed_string(&mut self, s: &str, n: usize) -> Result<()> {
        let bytes = latin1_encode(s)?;
        if bytes.len() > n {
            return Err(ScxError::violation(format!(
                "string of {} bytes does not fit a {n}-byte slot",
                bytes.len()
            )));
        }
        self.write_bytes(&bytes);
        self.write_zeros(n - bytes.len());
        Ok(())
    }

    pub fn write_string_i16(&mut self, s: &str) -> Result<()> {
        let bytes = latin1_encode(s)?;
        let len = i16::try_from(bytes.len()).map_err(|_| too_long(bytes.len(), "i16"))?;
        self.write_i16(len);
        self.write_bytes(&bytes);
        Ok(())
    }

    pub fn write_string_u16(&mut self, s: &str) -> Result<()> {
        let bytes = latin1_encode(s)?;
        let len = u16::try_from(bytes.len()).map_err(|_| too_long(bytes.len(), "u16"))?;
        self.write_u16(len);
        self.write_bytes(&bytes);
        Ok(())
    }

    pub fn write_string_i32(&mut self, s: &str) -> Result<()> {
        let bytes = latin1_encode(s)?;
        let len = i32::try_from(bytes.len()).map_err(|_| too_long(bytes.len(), "i32"))?;
        self.write_i32(len);
        self.write_bytes(&bytes);
        Ok(())
    }
}

fn non_negative(value: i32, offset: usize, what: &str) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        ScxError::violation(format!("negative {what} {value} at offset {offset}"))
    })
}

fn too_long(len: usize, prefix: &str) -> ScxError {
    ScxError::violation(format!("string of {len} bytes overflows its {prefix} length prefix"))
}

/// Map wire bytes 1:1 onto chars U+0000..=U+00FF.
pub fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Inverse of [`latin1_decode`]; chars above U+00FF have no wire form.
pub fn latin1_encode(s: &str) -> Result<Vec<u8>> {
    s.chars()
        .map(|c| {
            u8::try_from(c).map_err(|_| {
                ScxError::violation(format!(
                    "character {c:?} (U+{:04X}) cannot be stored as a single byte",
                    c as u32
                ))
            })
        })
        .collect()
}
