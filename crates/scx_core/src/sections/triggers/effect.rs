use serde::{Deserialize, Serialize};

use super::{Area, Location, ObjectFilter};
use crate::cursor::ByteCursor;
use crate::error::{Result, ScxError};
use crate::records::{
    read_clamped_count, read_vec, with_terminator, write_count, write_terminated_string_i32,
};

/// Structure marker following the kind tag of every effect record.
pub const EFFECT_MARKER: u32 = 0x17;

kind_enum! {
    EffectKind {
        ChangeDiplomacy = 1,
        ResearchTechnology = 2,
        SendChat = 3,
        PlaySound = 4,
        SendTribute = 5,
        UnlockGate = 6,
        LockGate = 7,
        ActivateTrigger = 8,
        DeactivateTrigger = 9,
        AiScriptGoal = 10,
        CreateObject = 11,
        TaskObject = 12,
        DeclareVictory = 13,
        KillObject = 14,
        RemoveObject = 15,
        ChangeView = 16,
        Unload = 17,
        ChangeOwnership = 18,
        Patrol = 19,
        DisplayInstructions = 20,
        ClearInstructions = 21,
        FreezeUnit = 22,
        UseAdvancedButtons = 23,
        DamageObject = 24,
        PlaceFoundation = 25,
        ChangeObjectName = 26,
        ChangeObjectHitpoints = 27,
        ChangeObjectAttack = 28,
        StopUnit = 29,
        SnapView = 30,
        Unknown = 31,
        EnableTech = 32,
        DisableTech = 33,
        EnableUnit = 34,
        DisableUnit = 35,
        FlashObjects = 36,
    }
}

/// One effect exactly as laid out on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectRecord {
    pub kind: u32,
    pub ai_goal: i32,
    pub amount: i32,
    pub resource_id: i32,
    pub diplomacy: i32,
    pub location_unit_instance_id: i32,
    pub unit_type: i32,
    pub player_source: i32,
    pub player_target: i32,
    pub research_id: i32,
    pub string_id: i32,
    pub sound_id: i32,
    pub display_time: i32,
    pub trigger_index: i32,
    pub location_x: i32,
    pub location_y: i32,
    pub area_bottom_left_x: i32,
    pub area_bottom_left_y: i32,
    pub area_top_right_x: i32,
    pub area_top_right_y: i32,
    pub unit_class: i32,
    pub unit_type2: i32,
    pub instruction_panel: i32,
    pub text: String,
    pub sound_file: String,
    pub selected_unit_ids: Vec<u32>,
}

impl EffectRecord {
    /// A record of `kind` with every field at `-1` and empty text.
    pub fn blank(kind: EffectKind) -> Self {
        Self {
            kind: kind.raw(),
            ai_goal: -1,
            amount: -1,
            resource_id: -1,
            diplomacy: -1,
            location_unit_instance_id: -1,
            unit_type: -1,
            player_source: -1,
            player_target: -1,
            research_id: -1,
            string_id: -1,
            sound_id: -1,
            display_time: -1,
            trigger_index: -1,
            location_x: -1,
            location_y: -1,
            area_bottom_left_x: -1,
            area_bottom_left_y: -1,
            area_top_right_x: -1,
            area_top_right_y: -1,
            unit_class: -1,
            unit_type2: -1,
            instruction_panel: -1,
            text: String::new(),
            sound_file: String::new(),
            selected_unit_ids: Vec::new(),
        }
    }

    pub fn kind(&self) -> EffectKind {
        EffectKind::from_raw(self.kind)
    }

    fn area(&self) -> Area {
        Area {
            bottom_left_x: self.area_bottom_left_x,
            bottom_left_y: self.area_bottom_left_y,
            top_right_x: self.area_top_right_x,
            top_right_y: self.area_top_right_y,
        }
    }

    fn set_area(&mut self, area: Area) {
        self.area_bottom_left_x = area.bottom_left_x;
        self.area_bottom_left_y = area.bottom_left_y;
        self.area_top_right_x = area.top_right_x;
        self.area_top_right_y = area.top_right_y;
    }

    fn location(&self) -> Location {
        Location {
            x: self.location_x,
            y: self.location_y,
        }
    }

    fn set_location(&mut self, location: Location) {
        self.location_x = location.x;
        self.location_y = location.y;
    }

    fn filter(&self) -> ObjectFilter {
        ObjectFilter {
            unit_type: self.unit_type,
            unit_class: self.unit_class,
            unit_type2: self.unit_type2,
        }
    }

    fn set_filter(&mut self, filter: ObjectFilter) {
        self.unit_type = filter.unit_type;
        self.unit_class = filter.unit_class;
        self.unit_type2 = filter.unit_type2;
    }

    /// The record as it will be written: text fields terminated.
    fn normalized(&self) -> Self {
        Self {
            text: with_terminator(&self.text).into_owned(),
            sound_file: with_terminator(&self.sound_file).into_owned(),
            ..self.clone()
        }
    }

    pub fn decode(c: &mut ByteCursor) -> Result<Self> {
        let kind = c.read_u32()?;
        let offset = c.position();
        let marker = c.read_u32()?;
        if marker != EFFECT_MARKER {
            return Err(ScxError::violation(format!(
                "effect at offset {offset}: expected marker 0x{EFFECT_MARKER:02X}, found 0x{marker:08X}"
            )));
        }

        let ai_goal = c.read_i32()?;
        let amount = c.read_i32()?;
        let resource_id = c.read_i32()?;
        let diplomacy = c.read_i32()?;
        let selected_count = read_clamped_count(c)?;
        let location_unit_instance_id = c.read_i32()?;
        let unit_type = c.read_i32()?;
        let player_source = c.read_i32()?;
        let player_target = c.read_i32()?;
        let research_id = c.read_i32()?;
        let string_id = c.read_i32()?;
        let sound_id = c.read_i32()?;
        let display_time = c.read_i32()?;
        let trigger_index = c.read_i32()?;
        let location_x = c.read_i32()?;
        let location_y = c.read_i32()?;
        let area_bottom_left_x = c.read_i32()?;
        let area_bottom_left_y = c.read_i32()?;
        let area_top_right_x = c.read_i32()?;
        let area_top_right_y = c.read_i32()?;
        let unit_class = c.read_i32()?;
        let unit_type2 = c.read_i32()?;
        let instruction_panel = c.read_i32()?;
        let text = c.read_string_i32()?;
        let sound_file = c.read_string_i32()?;
        let selected_unit_ids = read_vec(c, selected_count, ByteCursor::read_u32)?;

        Ok(Self {
            kind,
            ai_goal,
            amount,
            resource_id,
            diplomacy,
            location_unit_instance_id,
            unit_type,
            player_source,
            player_target,
            research_id,
            string_id,
            sound_id,
            display_time,
            trigger_index,
            location_x,
            location_y,
            area_bottom_left_x,
            area_bottom_left_y,
            area_top_right_x,
            area_top_right_y,
            unit_class,
            unit_type2,
            instruction_panel,
            text,
            sound_file,
            selected_unit_ids,
        })
    }

    pub fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        c.write_u32(self.kind);
        c.write_u32(EFFECT_MARKER);
        c.write_i32(self.ai_goal);
        c.write_i32(self.amount);
        c.write_i32(self.resource_id);
        c.write_i32(self.diplomacy);
        write_count(c, self.selected_unit_ids.len(), "selected unit")?;
        for v in [
            self.location_unit_instance_id,
            self.unit_type,
            self.player_source,
            self.player_target,
            self.research_id,
            self.string_id,
            self.sound_id,
            self.display_time,
            self.trigger_index,
            self.location_x,
            self.location_y,
            self.area_bottom_left_x,
            self.area_bottom_left_y,
            self.area_top_right_x,
            self.area_top_right_y,
            self.unit_class,
            self.unit_type2,
            self.instruction_panel,
        ] {
            c.write_i32(v);
        }
        write_terminated_string_i32(c, &self.text)?;
        write_terminated_string_i32(c, &self.sound_file)?;
        for &id in &self.selected_unit_ids {
            c.write_u32(id);
        }
        Ok(())
    }
}

/// Typed payloads map a subset of the record fields in both directions.
trait EffectFields: Sized {
    fn read(r: &EffectRecord) -> Self;
    fn write(&self, r: &mut EffectRecord);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyTarget {
    pub player: i32,
    pub research_id: i32,
}

impl EffectFields for TechnologyTarget {
    fn read(r: &EffectRecord) -> Self {
        Self {
            player: r.player_source,
            research_id: r.research_id,
        }
    }

    fn write(&self, r: &mut EffectRecord) {
        r.player_source = self.player;
        r.research_id = self.research_id;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTarget {
    pub player: i32,
    pub unit_type: i32,
}

impl EffectFields for UnitTarget {
    fn read(r: &EffectRecord) -> Self {
        Self {
            player: r.player_source,
            unit_type: r.unit_type,
        }
    }

    fn write(&self, r: &mut EffectRecord) {
        r.player_source = self.player;
        r.unit_type = self.unit_type;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub player: i32,
    pub text: String,
    pub sound_file: String,
    pub string_id: i32,
}

impl EffectFields for Chat {
    fn read(r: &EffectRecord) -> Self {
        Self {
            player: r.player_source,
            text: r.text.clone(),
            sound_file: r.sound_file.clone(),
            string_id: r.string_id,
        }
    }

    fn write(&self, r: &mut EffectRecord) {
        r.player_source = self.player;
        r.text = self.text.clone();
        r.sound_file = self.sound_file.clone();
        r.string_id = self.string_id;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructions {
    pub player: i32,
    pub text: String,
    pub sound_file: String,
    pub string_id: i32,
    /// Seconds on screen.
    pub display_time: i32,
    pub panel: i32,
}

impl EffectFields for Instructions {
    fn read(r: &EffectRecord) -> Self {
        Self {
            player: r.player_source,
            text: r.text.clone(),
            sound_file: r.sound_file.clone(),
            string_id: r.string_id,
            display_time: r.display_time,
            panel: r.instruction_panel,
        }
    }

    fn write(&self, r: &mut EffectRecord) {
        r.player_source = self.player;
        r.text = self.text.clone();
        r.sound_file = self.sound_file.clone();
        r.string_id = self.string_id;
        r.display_time = self.display_time;
        r.instruction_panel = self.panel;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sound {
    pub player: i32,
    pub sound_file: String,
    pub location: Location,
}

impl EffectFields for Sound {
    fn read(r: &EffectRecord) -> Self {
        Self {
            player: r.player_source,
            sound_file: r.sound_file.clone(),
            location: r.location(),
        }
    }

    fn write(&self, r: &mut EffectRecord) {
        r.player_source = self.player;
        r.sound_file = self.sound_file.clone();
        r.set_location(self.location);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tribute {
    pub from: i32,
    pub to: i32,
    pub resource_id: i32,
    pub amount: i32,
}

impl EffectFields for Tribute {
    fn read(r: &EffectRecord) -> Self {
        Self {
            from: r.player_source,
            to: r.player_target,
            resource_id: r.resource_id,
            amount: r.amount,
        }
    }

    fn write(&self, r: &mut EffectRecord) {
        r.player_source = self.from;
        r.player_target = self.to;
        r.resource_id = self.resource_id;
        r.amount = self.amount;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub player: i32,
    pub unit_type: i32,
    pub location: Location,
}

impl EffectFields for Placement {
    fn read(r: &EffectRecord) -> Self {
        Self {
            player: r.player_source,
            unit_type: r.unit_type,
            location: r.location(),
        }
    }

    fn write(&self, r: &mut EffectRecord) {
        r.player_source = self.player;
        r.unit_type = self.unit_type;
        r.set_location(self.location);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub player: i32,
    pub location: Location,
}

impl EffectFields for View {
    fn read(r: &EffectRecord) -> Self {
        Self {
            player: r.player_source,
            location: r.location(),
        }
    }

    fn write(&self, r: &mut EffectRecord) {
        r.player_source = self.player;
        r.set_location(self.location);
    }
}

/// Objects an effect applies to: explicit instance ids, or everything of
/// `player` inside `area` matching `filter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTargets {
    pub player: i32,
    pub selected: Vec<u32>,
    pub area: Area,
    pub filter: ObjectFilter,
}

impl ObjectTargets {
    pub fn unit(id: u32) -> Self {
        Self {
            player: -1,
            selected: vec![id],
            area: Area::UNSET,
            filter: ObjectFilter::ANY,
        }
    }
}

impl EffectFields for ObjectTargets {
    fn read(r: &EffectRecord) -> Self {
        Self {
            player: r.player_source,
            selected: r.selected_unit_ids.clone(),
            area: r.area(),
            filter: r.filter(),
        }
    }

    fn write(&self, r: &mut EffectRecord) {
        r.player_source = self.player;
        r.selected_unit_ids = self.selected.clone();
        r.set_area(self.area);
        r.set_filter(self.filter);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMove {
    pub targets: ObjectTargets,
    /// Destination object, or -1 to use `location`.
    pub location_unit_instance_id: i32,
    pub location: Location,
}

impl EffectFields for ObjectMove {
    fn read(r: &EffectRecord) -> Self {
        Self {
            targets: ObjectTargets::read(r),
            location_unit_instance_id: r.location_unit_instance_id,
            location: r.location(),
        }
    }

    fn write(&self, r: &mut EffectRecord) {
        self.targets.write(r);
        r.location_unit_instance_id = self.location_unit_instance_id;
        r.set_location(self.location);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTransfer {
    pub targets: ObjectTargets,
    pub to: i32,
}

impl EffectFields for ObjectTransfer {
    fn read(r: &EffectRecord) -> Self {
        Self {
            targets: ObjectTargets::read(r),
            to: r.player_target,
        }
    }

    fn write(&self, r: &mut EffectRecord) {
        self.targets.write(r);
        r.player_target = self.to;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectAdjust {
    pub targets: ObjectTargets,
    pub amount: i32,
}

impl EffectFields for ObjectAdjust {
    fn read(r: &EffectRecord) -> Self {
        Self {
            targets: ObjectTargets::read(r),
            amount: r.amount,
        }
    }

    fn write(&self, r: &mut EffectRecord) {
        self.targets.write(r);
        r.amount = self.amount;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRename {
    pub targets: ObjectTargets,
    pub name: String,
}

impl EffectFields for ObjectRename {
    fn read(r: &EffectRecord) -> Self {
        Self {
            targets: ObjectTargets::read(r),
            name: r.text.clone(),
        }
    }

    fn write(&self, r: &mut EffectRecord) {
        self.targets.write(r);
        r.text = self.name.clone();
    }
}

/// A trigger effect, typed by kind.
///
/// Records whose fields do not fit the typed shape of their kind (or whose
/// kind is unknown) are kept whole in [`Effect::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    ChangeDiplomacy { player: i32, target: i32, stance: i32 },
    ResearchTechnology(TechnologyTarget),
    SendChat(Chat),
    PlaySound(Sound),
    SendTribute(Tribute),
    UnlockGate { selected: Vec<u32> },
    LockGate { selected: Vec<u32> },
    ActivateTrigger { trigger_index: i32 },
    DeactivateTrigger { trigger_index: i32 },
    AiScriptGoal { goal: i32 },
    CreateObject(Placement),
    TaskObject(ObjectMove),
    DeclareVictory { player: i32 },
    KillObject(ObjectTargets),
    RemoveObject(ObjectTargets),
    ChangeView(View),
    Unload(ObjectMove),
    ChangeOwnership(ObjectTransfer),
    Patrol(ObjectMove),
    DisplayInstructions(Instructions),
    ClearInstructions { panel: i32 },
    FreezeUnit(ObjectTargets),
    UseAdvancedButtons,
    DamageObject(ObjectAdjust),
    PlaceFoundation(Placement),
    ChangeObjectName(ObjectRename),
    ChangeObjectHitpoints(ObjectAdjust),
    ChangeObjectAttack(ObjectAdjust),
    StopUnit(ObjectTargets),
    SnapView(View),
    EnableTech(TechnologyTarget),
    DisableTech(TechnologyTarget),
    EnableUnit(UnitTarget),
    DisableUnit(UnitTarget),
    FlashObjects(ObjectTargets),
    Other(EffectRecord),
}

impl Effect {
    pub fn activate_trigger(trigger_index: i32) -> Self {
        Self::ActivateTrigger { trigger_index }
    }

    pub fn research_technology(research_id: i32, player: i32) -> Self {
        Self::ResearchTechnology(TechnologyTarget {
            player,
            research_id,
        })
    }

    /// Order `unit` to act on the object `target`.
    pub fn task_object(unit: u32, target: i32, player: i32) -> Self {
        Self::TaskObject(ObjectMove {
            targets: ObjectTargets {
                player,
                ..ObjectTargets::unit(unit)
            },
            location_unit_instance_id: target,
            location: Location::UNSET,
        })
    }

    pub fn rename(unit: u32, name: &str) -> Self {
        Self::ChangeObjectName(ObjectRename {
            targets: ObjectTargets::unit(unit),
            name: with_terminator(name).into_owned(),
        })
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Self::ChangeDiplomacy { .. } => EffectKind::ChangeDiplomacy,
            Self::ResearchTechnology(_) => EffectKind::ResearchTechnology,
            Self::SendChat(_) => EffectKind::SendChat,
            Self::PlaySound(_) => EffectKind::PlaySound,
            Self::SendTribute(_) => EffectKind::SendTribute,
            Self::UnlockGate { .. } => EffectKind::UnlockGate,
            Self::LockGate { .. } => EffectKind::LockGate,
            Self::ActivateTrigger { .. } => EffectKind::ActivateTrigger,
            Self::DeactivateTrigger { .. } => EffectKind::DeactivateTrigger,
            Self::AiScriptGoal { .. } => EffectKind::AiScriptGoal,
            Self::CreateObject(_) => EffectKind::CreateObject,
            Self::TaskObject(_) => EffectKind::TaskObject,
            Self::DeclareVictory { .. } => EffectKind::DeclareVictory,
            Self::KillObject(_) => EffectKind::KillObject,
            Self::RemoveObject(_) => EffectKind::RemoveObject,
            Self::ChangeView(_) => EffectKind::ChangeView,
            Self::Unload(_) => EffectKind::Unload,
            Self::ChangeOwnership(_) => EffectKind::ChangeOwnership,
            Self::Patrol(_) => EffectKind::Patrol,
            Self::DisplayInstructions(_) => EffectKind::DisplayInstructions,
            Self::ClearInstructions { .. } => EffectKind::ClearInstructions,
            Self::FreezeUnit(_) => EffectKind::FreezeUnit,
            Self::UseAdvancedButtons => EffectKind::UseAdvancedButtons,
            Self::DamageObject(_) => EffectKind::DamageObject,
            Self::PlaceFoundation(_) => EffectKind::PlaceFoundation,
            Self::ChangeObjectName(_) => EffectKind::ChangeObjectName,
            Self::ChangeObjectHitpoints(_) => EffectKind::ChangeObjectHitpoints,
            Self::ChangeObjectAttack(_) => EffectKind::ChangeObjectAttack,
            Self::StopUnit(_) => EffectKind::StopUnit,
            Self::SnapView(_) => EffectKind::SnapView,
            Self::EnableTech(_) => EffectKind::EnableTech,
            Self::DisableTech(_) => EffectKind::DisableTech,
            Self::EnableUnit(_) => EffectKind::EnableUnit,
            Self::DisableUnit(_) => EffectKind::DisableUnit,
            Self::FlashObjects(_) => EffectKind::FlashObjects,
            Self::Other(record) => record.kind(),
        }
    }

    pub fn to_record(&self) -> EffectRecord {
        let mut r = EffectRecord::blank(self.kind());
        match self {
            Self::ChangeDiplomacy {
                player,
                target,
                stance,
            } => {
                r.player_source = *player;
                r.player_target = *target;
                r.diplomacy = *stance;
            }
            Self::ResearchTechnology(p) | Self::EnableTech(p) | Self::DisableTech(p) => {
                p.write(&mut r)
            }
            Self::EnableUnit(p) | Self::DisableUnit(p) => p.write(&mut r),
            Self::SendChat(p) => p.write(&mut r),
            Self::DisplayInstructions(p) => p.write(&mut r),
            Self::PlaySound(p) => p.write(&mut r),
            Self::SendTribute(p) => p.write(&mut r),
            Self::UnlockGate { selected } | Self::LockGate { selected } => {
                r.selected_unit_ids = selected.clone();
            }
            Self::ActivateTrigger { trigger_index } | Self::DeactivateTrigger { trigger_index } => {
                r.trigger_index = *trigger_index;
            }
            Self::AiScriptGoal { goal } => r.ai_goal = *goal,
            Self::CreateObject(p) | Self::PlaceFoundation(p) => p.write(&mut r),
            Self::TaskObject(p) | Self::Unload(p) | Self::Patrol(p) => p.write(&mut r),
            Self::DeclareVictory { player } => r.player_source = *player,
            Self::KillObject(p)
            | Self::RemoveObject(p)
            | Self::FreezeUnit(p)
            | Self::StopUnit(p)
            | Self::FlashObjects(p) => p.write(&mut r),
            Self::ChangeView(p) | Self::SnapView(p) => p.write(&mut r),
            Self::ChangeOwnership(p) => p.write(&mut r),
            Self::ClearInstructions { panel } => r.instruction_panel = *panel,
            Self::UseAdvancedButtons => {}
            Self::DamageObject(p) | Self::ChangeObjectHitpoints(p) | Self::ChangeObjectAttack(p) => {
                p.write(&mut r)
            }
            Self::ChangeObjectName(p) => p.write(&mut r),
            Self::Other(record) => return record.clone(),
        }
        r
    }

    /// Typed view of `record`; falls back to [`Effect::Other`] unless the
    /// typed value writes back the same bytes.
    pub fn from_record(record: EffectRecord) -> Self {
        let r = &record;
        let typed = match record.kind() {
            EffectKind::ChangeDiplomacy => Self::ChangeDiplomacy {
                player: r.player_source,
                target: r.player_target,
                stance: r.diplomacy,
            },
            EffectKind::ResearchTechnology => Self::ResearchTechnology(TechnologyTarget::read(r)),
            EffectKind::SendChat => Self::SendChat(Chat::read(r)),
            EffectKind::PlaySound => Self::PlaySound(Sound::read(r)),
            EffectKind::SendTribute => Self::SendTribute(Tribute::read(r)),
            EffectKind::UnlockGate => Self::UnlockGate {
                selected: r.selected_unit_ids.clone(),
            },
            EffectKind::LockGate => Self::LockGate {
                selected: r.selected_unit_ids.clone(),
            },
            EffectKind::ActivateTrigger => Self::ActivateTrigger {
                trigger_index: r.trigger_index,
            },
            EffectKind::DeactivateTrigger => Self::DeactivateTrigger {
                trigger_index: r.trigger_index,
            },
            EffectKind::AiScriptGoal => Self::AiScriptGoal { goal: r.ai_goal },
            EffectKind::CreateObject => Self::CreateObject(Placement::read(r)),
            EffectKind::TaskObject => Self::TaskObject(ObjectMove::read(r)),
            EffectKind::DeclareVictory => Self::DeclareVictory {
                player: r.player_source,
            },
            EffectKind::KillObject => Self::KillObject(ObjectTargets::read(r)),
            EffectKind::RemoveObject => Self::RemoveObject(ObjectTargets::read(r)),
            EffectKind::ChangeView => Self::ChangeView(View::read(r)),
            EffectKind::Unload => Self::Unload(ObjectMove::read(r)),
            EffectKind::ChangeOwnership => Self::ChangeOwnership(ObjectTransfer::read(r)),
            EffectKind::Patrol => Self::Patrol(ObjectMove::read(r)),
            EffectKind::DisplayInstructions => Self::DisplayInstructions(Instructions::read(r)),
            EffectKind::ClearInstructions => Self::ClearInstructions {
                panel: r.instruction_panel,
            },
            EffectKind::FreezeUnit => Self::FreezeUnit(ObjectTargets::read(r)),
            EffectKind::UseAdvancedButtons => Self::UseAdvancedButtons,
            EffectKind::DamageObject => Self::DamageObject(ObjectAdjust::read(r)),
            EffectKind::PlaceFoundation => Self::PlaceFoundation(Placement::read(r)),
            EffectKind::ChangeObjectName => Self::ChangeObjectName(ObjectRename::read(r)),
            EffectKind::ChangeObjectHitpoints => {
                Self::ChangeObjectHitpoints(ObjectAdjust::read(r))
            }
            EffectKind::ChangeObjectAttack => Self::ChangeObjectAttack(ObjectAdjust::read(r)),
            EffectKind::StopUnit => Self::StopUnit(ObjectTargets::read(r)),
            EffectKind::SnapView => Self::SnapView(View::read(r)),
            EffectKind::EnableTech => Self::EnableTech(TechnologyTarget::read(r)),
            EffectKind::DisableTech => Self::DisableTech(TechnologyTarget::read(r)),
            EffectKind::EnableUnit => Self::EnableUnit(UnitTarget::read(r)),
            EffectKind::DisableUnit => Self::DisableUnit(UnitTarget::read(r)),
            EffectKind::FlashObjects => Self::FlashObjects(ObjectTargets::read(r)),
            EffectKind::Unknown | EffectKind::Unrecognized(_) => return Self::Other(record),
        };

        if typed.to_record().normalized() == record.normalized() {
            typed
        } else {
            Self::Other(record)
        }
    }

    pub fn decode(c: &mut ByteCursor) -> Result<Self> {
        EffectRecord::decode(c).map(Self::from_record)
    }

    pub fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        match self {
            Self::Other(record) => record.encode(c),
            typed => typed.to_record().encode(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn encoded(effect: &Effect) -> Vec<u8> {
        let mut c = ByteCursor::default();
        effect.encode(&mut c).expect("encode");
        c.into_inner()
    }

    fn decoded(bytes: Vec<u8>) -> Effect {
        let mut c = ByteCursor::new(bytes);
        let effect = Effect::decode(&mut c).expect("decode");
        assert_eq!(c.remaining(), 0);
        effect
    }

    #[test]
    fn kind_table_covers_thirty_six_kinds() {
        for raw in 1..=36 {
            let kind = EffectKind::from_raw(raw);
            assert!(!matches!(kind, EffectKind::Unrecognized(_)), "kind {raw}");
            assert_eq!(kind.raw(), raw);
        }
        assert_eq!(EffectKind::from_raw(0), EffectKind::Unrecognized(0));
        assert_eq!(EffectKind::from_raw(8).to_string(), "ActivateTrigger");
    }

    #[test]
    fn activate_trigger_layout() {
        let bytes = encoded(&Effect::activate_trigger(0));
        // tag + marker + 23 ints + two one-byte strings
        assert_eq!(bytes.len(), 4 + 4 + 23 * 4 + 5 + 5);
        assert_eq!(&bytes[..8], &[8, 0, 0, 0, 0x17, 0, 0, 0]);
        // trigger index is the 14th int after the marker
        let at = 8 + 13 * 4;
        assert_eq!(&bytes[at..at + 4], &0i32.to_le_bytes());
        assert_eq!(&bytes[8..12], &(-1i32).to_le_bytes());

        assert_eq!(
            decoded(bytes),
            Effect::ActivateTrigger { trigger_index: 0 }
        );
    }

    #[test]
    fn unit_ids_follow_the_strings() {
        let effect = Effect::task_object(41, 77, 1);
        let bytes = encoded(&effect);
        assert_eq!(&bytes[bytes.len() - 4..], &41u32.to_le_bytes());
        // selected count sits after ai goal, amount, resource and diplomacy
        assert_eq!(&bytes[24..28], &1i32.to_le_bytes());
        assert_eq!(decoded(bytes), effect);
    }

    #[test]
    fn typed_views_round_trip() {
        let effects = [
            Effect::rename(12, "Sir Lancelot"),
            Effect::research_technology(22, 1),
            Effect::SendChat(Chat {
                player: 2,
                text: "Surrender!\0".to_string(),
                sound_file: "taunt.wav\0".to_string(),
                string_id: -1,
            }),
            Effect::KillObject(ObjectTargets {
                player: 3,
                selected: Vec::new(),
                area: Area {
                    bottom_left_x: 0,
                    bottom_left_y: 0,
                    top_right_x: 10,
                    top_right_y: 10,
                },
                filter: ObjectFilter {
                    unit_class: 6,
                    ..ObjectFilter::ANY
                },
            }),
            Effect::UseAdvancedButtons,
        ];
        for effect in effects {
            assert_eq!(decoded(encoded(&effect)), effect);
        }
    }

    #[test]
    fn stray_fields_keep_the_whole_record() {
        let mut record = EffectRecord::blank(EffectKind::ActivateTrigger);
        record.trigger_index = 3;
        record.amount = 50;
        let effect = Effect::from_record(record.clone());
        assert_eq!(effect, Effect::Other(record.clone()));
        assert_eq!(effect.kind(), EffectKind::ActivateTrigger);

        let mut c = ByteCursor::default();
        record.encode(&mut c).expect("encode record");
        assert_eq!(encoded(&effect), c.into_inner());
    }

    #[test]
    fn unknown_kind_round_trips_opaquely() {
        let mut record = EffectRecord::blank(EffectKind::Unrecognized(99));
        record.amount = 7;
        record.text = "x\0".to_string();
        record.sound_file = "\0".to_string();
        record.selected_unit_ids = vec![1, 2];
        let bytes = encoded(&Effect::Other(record.clone()));
        assert_eq!(&bytes[..4], &99u32.to_le_bytes());
        assert_eq!(decoded(bytes), Effect::Other(record));
    }

    #[test]
    fn negative_unit_count_decodes_empty() {
        let mut bytes = encoded(&Effect::activate_trigger(2));
        bytes[24..28].copy_from_slice(&(-1i32).to_le_bytes());
        assert_eq!(
            decoded(bytes),
            Effect::ActivateTrigger { trigger_index: 2 }
        );
    }

    #[test]
    fn wrong_marker_is_rejected() {
        let mut bytes = encoded(&Effect::activate_trigger(2));
        bytes[4] = 0x10;
        let err = Effect::decode(&mut ByteCursor::new(bytes)).expect_err("marker");
        assert_eq!(err.code(), ErrorCode::FormatViolation);
    }
}
