use std::io::{Read, Write};

use flate2::Compression;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bitmap::Bitmap;
use crate::cursor::ByteCursor;
use crate::deflate::{deflate, inflate};
use crate::error::{Result, ScxError};
use crate::layout::{BodyLayout, ByteRange, SectionLayout};
use crate::sections::{
    Diplomacy, Disables, GlobalVictory, IncludedFiles, Map, MessagesCinematics,
    PlayerAiResources, PlayerDiplomacyVarious, ScenarioHeader, SectionCodec, Triggers, Units,
};

/// Four-byte tag opening every container.
pub const CONTAINER_VERSION: &[u8; 4] = b"1.21";

const PROLOGUE_MARKER: u32 = 2;
const PROLOGUE_TRAILER: u32 = 0;
/// Prologue bytes counted by the header length besides the instructions.
const HEADER_LEN_FIXED: usize = 20;

/// A whole scenario: prologue fields plus the eleven body sections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scenario {
    pub last_save_timestamp: u32,
    pub instructions: String,
    pub player_count: u32,
    pub header: ScenarioHeader,
    pub messages: MessagesCinematics,
    pub player_ai: PlayerAiResources,
    pub victory: GlobalVictory,
    pub diplomacy: Diplomacy,
    pub disables: Disables,
    pub map: Map,
    pub units: Units,
    pub player_diplomacy: PlayerDiplomacyVarious,
    pub triggers: Triggers,
    pub included_files: IncludedFiles,
}

struct Prologue {
    last_save_timestamp: u32,
    instructions: String,
    player_count: u32,
}

struct Capture {
    sections: Vec<SectionLayout>,
}

impl Capture {
    fn section<T: SectionCodec>(&mut self, c: &mut ByteCursor) -> Result<T> {
        let start = c.position();
        let value = T::decode(c)?;
        let end = c.position();
        let id = T::ID;
        debug!(section = %id, start, end, "decoded section");
        self.sections.push(SectionLayout {
            id: T::ID,
            range: ByteRange { start, end },
        });
        Ok(value)
    }
}

fn encode_section<T: SectionCodec>(value: &T, c: &mut ByteCursor) -> Result<()> {
    let start = c.position();
    value.encode(c)?;
    let id = T::ID;
    debug!(section = %id, start, end = c.position(), "encoded section");
    Ok(())
}

fn read_prologue(c: &mut ByteCursor) -> Result<Prologue> {
    let tag = c.read_array::<4>()?;
    if &tag != CONTAINER_VERSION {
        return Err(ScxError::VersionMismatch {
            what: "container",
            expected: String::from_utf8_lossy(CONTAINER_VERSION).into_owned(),
            found: String::from_utf8_lossy(&tag).into_owned(),
        });
    }

    let header_len = c.read_u32()?;
    let marker = c.read_u32()?;
    if marker != PROLOGUE_MARKER {
        warn!(marker, "unexpected prologue marker");
    }
    let last_save_timestamp = c.read_u32()?;
    let instructions = c.read_string_i32()?;
    let trailer = c.read_u32()?;
    if trailer != PROLOGUE_TRAILER {
        warn!(trailer, "unexpected prologue trailer");
    }
    let player_count = c.read_u32()?;

    let expected_len = instructions.chars().count() + HEADER_LEN_FIXED;
    if header_len as usize != expected_len {
        warn!(header_len, expected_len, "prologue header length does not match instructions");
    }
    debug!(len = c.position(), header_len, player_count, "read prologue");

    Ok(Prologue {
        last_save_timestamp,
        instructions,
        player_count,
    })
}

impl Scenario {
    /// An empty scenario: 16 player slots, a 0×0 map, no triggers.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::decode_with_layout(bytes).map(|(scenario, _)| scenario)
    }

    /// Decode and also report where each section sits in the body.
    pub fn decode_with_layout(bytes: &[u8]) -> Result<(Self, BodyLayout)> {
        let mut c = ByteCursor::new(bytes.to_vec());
        let prologue = read_prologue(&mut c)?;
        let prologue_len = c.position();

        let body = inflate(c.remaining_slice())?;
        debug!(
            compressed = bytes.len() - prologue_len,
            body = body.len(),
            "inflated body"
        );

        let body_len = body.len();
        let mut c = ByteCursor::new(body);
        let mut capture = Capture {
            sections: Vec::with_capacity(11),
        };

        let scenario = Self {
            last_save_timestamp: prologue.last_save_timestamp,
            instructions: prologue.instructions,
            player_count: prologue.player_count,
            header: capture.section(&mut c)?,
            messages: capture.section(&mut c)?,
            player_ai: capture.section(&mut c)?,
            victory: capture.section(&mut c)?,
            diplomacy: capture.section(&mut c)?,
            disables: capture.section(&mut c)?,
            map: capture.section(&mut c)?,
            units: capture.section(&mut c)?,
            player_diplomacy: capture.section(&mut c)?,
            triggers: capture.section(&mut c)?,
            included_files: capture.section(&mut c)?,
        };

        if c.remaining() > 0 {
            return Err(ScxError::violation(format!(
                "{} trailing bytes after the last section at offset {}",
                c.remaining(),
                c.position()
            )));
        }

        let layout = BodyLayout {
            prologue_len,
            compressed_len: bytes.len() - prologue_len,
            body_len,
            sections: capture.sections,
        };
        layout.validate()?;
        Ok((scenario, layout))
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::decode(&bytes)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        self.encode_with(Compression::default())
    }

    pub fn encode_with(&self, level: Compression) -> Result<Vec<u8>> {
        let body = self.encode_body()?;
        let compressed = deflate(&body, level)?;
        debug!(body = body.len(), compressed = compressed.len(), "deflated body");

        let mut c = ByteCursor::with_capacity(64 + self.instructions.len() + compressed.len());
        c.write_bytes(CONTAINER_VERSION);
        let header_len = u32::try_from(self.instructions.chars().count() + HEADER_LEN_FIXED)
            .map_err(|_| ScxError::violation("instructions too long for the prologue"))?;
        c.write_u32(header_len);
        c.write_u32(PROLOGUE_MARKER);
        c.write_u32(self.last_save_timestamp);
        c.write_string_i32(&self.instructions)?;
        c.write_u32(PROLOGUE_TRAILER);
        c.write_u32(self.player_count);
        c.write_bytes(&compressed);
        Ok(c.into_inner())
    }

    /// The uncompressed body: all eleven sections back to back.
    pub fn encode_body(&self) -> Result<Vec<u8>> {
        let mut c = ByteCursor::default();
        encode_section(&self.header, &mut c)?;
        encode_section(&self.messages, &mut c)?;
        encode_section(&self.player_ai, &mut c)?;
        encode_section(&self.victory, &mut c)?;
        encode_section(&self.diplomacy, &mut c)?;
        encode_section(&self.disables, &mut c)?;
        encode_section(&self.map, &mut c)?;
        encode_section(&self.units, &mut c)?;
        encode_section(&self.player_diplomacy, &mut c)?;
        encode_section(&self.triggers, &mut c)?;
        encode_section(&self.included_files, &mut c)?;
        Ok(c.into_inner())
    }

    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        let bytes = self.encode()?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    pub fn bitmap(&self) -> Option<&Bitmap> {
        self.messages.bitmap.as_ref()
    }
}
