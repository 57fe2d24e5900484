use serde::{Deserialize, Serialize};

use super::SectionCodec;
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::layout::SectionId;
use crate::records::{expect_len, presence_flag, read_counted, read_if, write_counted};

pub const ES_ONLY_DATA_LEN: usize = 396;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncludedFiles {
    /// Opaque 396-byte block.
    pub es_only_data: Option<Vec<u8>>,
    /// `None` when the files flag is clear; `Some(vec![])` keeps a set flag with no files.
    pub files: Option<Vec<IncludedFile>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncludedFile {
    pub title: String,
    pub content: String,
}

impl IncludedFiles {
    pub fn file_count(&self) -> usize {
        self.files.as_ref().map_or(0, Vec::len)
    }
}

impl SectionCodec for IncludedFiles {
    const ID: SectionId = SectionId::IncludedFiles;

    fn decode(c: &mut ByteCursor) -> Result<Self> {
        let files_flag = c.read_i32()?;
        let es_only_flag = c.read_u32()?;
        let es_only_data = read_if(c, es_only_flag != 0, |c| c.read_bytes(ES_ONLY_DATA_LEN))?;
        let files = read_if(c, files_flag > 0, |c| {
            read_counted(c, "included file", |c| {
                Ok(IncludedFile {
                    title: c.read_string_i32()?,
                    content: c.read_string_i32()?,
                })
            })
        })?;

        Ok(Self {
            es_only_data,
            files,
        })
    }

    fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        if let Some(data) = &self.es_only_data {
            expect_len(data.len(), ES_ONLY_DATA_LEN, "included files extra data")?;
        }

        c.write_i32(presence_flag(&self.files) as i32);
        c.write_u32(presence_flag(&self.es_only_data));
        if let Some(data) = &self.es_only_data {
            c.write_bytes(data);
        }
        if let Some(files) = &self.files {
            write_counted(c, files, "included file", |c, file| {
                c.write_string_i32(&file.title)?;
                c.write_string_i32(&file.content)
            })?;
        }
        Ok(())
    }
}
