//! Codecs for the eleven sections of the compressed body, in body order.

mod diplomacy;
mod disables;
mod header;
mod included_files;
mod map;
mod messages;
mod player_ai;
mod player_diplomacy;
mod triggers;
mod units;
mod victory;

pub use diplomacy::Diplomacy;
pub use disables::{Disables, MAX_DISABLED_BUILDINGS, MAX_DISABLED_TECHS, MAX_DISABLED_UNITS};
pub use header::{HEADER_VERSION, PlayerSlot, ScenarioHeader};
pub use included_files::{ES_ONLY_DATA_LEN, IncludedFile, IncludedFiles};
pub use map::{Map, Tile};
pub use messages::MessagesCinematics;
pub use player_ai::{AiFile, PlayerAiResources, StartingResources};
pub use player_diplomacy::{
    EXTENDED_ENTRY_VERSION, PLAYER_ENTRIES, PlayerDiplomacyEntry, PlayerDiplomacyVarious,
    UNKNOWN_BLOCK_LEN,
};
pub use triggers::*;
pub use units::{RESOURCE_ENTRIES, ResourcePopulation, UnitEntry, Units};
pub use victory::{GlobalVictory, VictoryMode};

use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::layout::SectionId;

/// Player slots in the fixed per-player tables.
pub const PLAYER_SLOTS: usize = 16;
/// Byte width of a fixed player name.
pub const PLAYER_NAME_LEN: usize = 256;

/// One section of the body. `decode` starts at the cursor position and
/// consumes exactly the bytes `encode` produces for the same value.
pub trait SectionCodec: Sized {
    const ID: SectionId;

    fn decode(c: &mut ByteCursor) -> Result<Self>;

    /// Validates the value before writing; on error nothing may be relied on
    /// in the cursor past its starting position.
    fn encode(&self, c: &mut ByteCursor) -> Result<()>;
}
