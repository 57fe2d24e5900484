use serde::{Deserialize, Serialize};

use super::{Area, ObjectFilter};
use crate::cursor::ByteCursor;
use crate::error::{Result, ScxError};

/// Structure marker following the kind tag of every condition record.
pub const CONDITION_MARKER: u32 = 0x10;

kind_enum! {
    ConditionKind {
        BringObjectToArea = 1,
        BringObjectToObject = 2,
        OwnObjects = 3,
        OwnFewerObjects = 4,
        ObjectsInArea = 5,
        DestroyObject = 6,
        CaptureObject = 7,
        AccumulateAttribute = 8,
        ResearchTechnology = 9,
        Timer = 10,
        ObjectSelected = 11,
        AiSignal = 12,
        PlayerDefeated = 13,
        ObjectHasTarget = 14,
        ObjectVisible = 15,
        ObjectNotVisible = 16,
        ResearchingTechnology = 17,
        UnitsGarrisoned = 18,
        DifficultyLevel = 19,
        OwnFewerFoundations = 20,
        SelectedObjectsInArea = 21,
        PoweredObjectsInArea = 22,
        UnitsQueuedPastPopCap = 23,
    }
}

/// One condition exactly as laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionRecord {
    pub kind: u32,
    pub amount: i32,
    pub resource_id: i32,
    pub unit_instance_id: i32,
    pub unit_location: i32,
    pub unit_type: i32,
    pub player: i32,
    pub research_id: i32,
    pub timer: i32,
    pub unknown: i32,
    pub area_bottom_left_x: i32,
    pub area_bottom_left_y: i32,
    pub area_top_right_x: i32,
    pub area_top_right_y: i32,
    pub unit_class: i32,
    pub unit_type2: i32,
    pub ai_signal: i32,
}

impl ConditionRecord {
    pub fn blank(kind: ConditionKind) -> Self {
        Self {
            kind: kind.raw(),
            amount: -1,
            resource_id: -1,
            unit_instance_id: -1,
            unit_location: -1,
            unit_type: -1,
            player: -1,
            research_id: -1,
            timer: -1,
            unknown: -1,
            area_bottom_left_x: -1,
            area_bottom_left_y: -1,
            area_top_right_x: -1,
            area_top_right_y: -1,
            unit_class: -1,
            unit_type2: -1,
            ai_signal: -1,
        }
    }

    pub fn kind(&self) -> ConditionKind {
        ConditionKind::from_raw(self.kind)
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

    pub fn decode(c: &mut ByteCursor) -> Result<Self> {
        let kind = c.read_u32()?;
        let offset = c.position();
        let marker = c.read_u32()?;
        if marker != CONDITION_MARKER {
            return Err(ScxError::violation(format!(
                "condition at offset {offset}: expected marker 0x{CONDITION_MARKER:02X}, found 0x{marker:08X}"
            )));
        }
        let [
            amount,
            resource_id,
            unit_instance_id,
            unit_location,
            unit_type,
            player,
            research_id,
            timer,
            unknown,
            area_bottom_left_x,
            area_bottom_left_y,
            area_top_right_x,
            area_top_right_y,
            unit_class,
            unit_type2,
            ai_signal,
        ] = c.read_i32_array::<16>()?;

        Ok(Self {
            kind,
            amount,
            resource_id,
            unit_instance_id,
            unit_location,
            unit_type,
            player,
            research_id,
            timer,
            unknown,
            area_bottom_left_x,
            area_bottom_left_y,
            area_top_right_x,
            area_top_right_y,
            unit_class,
            unit_type2,
            ai_signal,
        })
    }

    pub fn encode(&self, c: &mut ByteCursor) {
        c.write_u32(self.kind);
        c.write_u32(CONDITION_MARKER);
        for v in [
            self.amount,
            self.resource_id,
            self.unit_instance_id,
            self.unit_location,
            self.unit_type,
            self.player,
            self.research_id,
            self.timer,
            self.unknown,
            self.area_bottom_left_x,
            self.area_bottom_left_y,
            self.area_top_right_x,
            self.area_top_right_y,
            self.unit_class,
            self.unit_type2,
            self.ai_signal,
        ] {
            c.write_i32(v);
        }
    }
}

trait ConditionFields: Sized {
    fn read(r: &ConditionRecord) -> Self;
    fn write(&self, r: &mut ConditionRecord);
}

/// "`player` has `amount` objects matching `filter` inside `area`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectCount {
    pub player: i32,
    pub amount: i32,
    pub area: Area,
    pub filter: ObjectFilter,
}

impl ConditionFields for ObjectCount {
    fn read(r: &ConditionRecord) -> Self {
        Self {
            player: r.player,
            amount: r.amount,
            area: r.area(),
            filter: r.filter(),
        }
    }

    fn write(&self, r: &mut ConditionRecord) {
        r.player = self.player;
        r.amount = self.amount;
        r.set_area(self.area);
        r.set_filter(self.filter);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectOwner {
    pub unit_instance_id: i32,
    pub player: i32,
}

impl ConditionFields for ObjectOwner {
    fn read(r: &ConditionRecord) -> Self {
        Self {
            unit_instance_id: r.unit_instance_id,
            player: r.player,
        }
    }

    fn write(&self, r: &mut ConditionRecord) {
        r.unit_instance_id = self.unit_instance_id;
        r.player = self.player;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyState {
    pub player: i32,
    pub research_id: i32,
}

impl ConditionFields for TechnologyState {
    fn read(r: &ConditionRecord) -> Self {
        Self {
            player: r.player,
            research_id: r.research_id,
        }
    }

    fn write(&self, r: &mut ConditionRecord) {
        r.player = self.player;
        r.research_id = self.research_id;
    }
}

/// A trigger condition, typed by kind. See [`super::Effect`] for the
/// fallback rule behind [`Condition::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    BringObjectToArea { unit_instance_id: i32, area: Area },
    BringObjectToObject { unit_instance_id: i32, unit_location: i32 },
    OwnObjects(ObjectCount),
    OwnFewerObjects(ObjectCount),
    ObjectsInArea(ObjectCount),
    DestroyObject(ObjectOwner),
    CaptureObject(ObjectOwner),
    AccumulateAttribute { player: i32, resource_id: i32, amount: i32 },
    ResearchTechnology(TechnologyState),
    Timer { seconds: i32 },
    ObjectSelected { unit_instance_id: i32 },
    AiSignal { signal: i32 },
    PlayerDefeated { player: i32 },
    ObjectHasTarget {
        unit_instance_id: i32,
        unit_location: i32,
        filter: ObjectFilter,
    },
    ObjectVisible { unit_instance_id: i32 },
    ObjectNotVisible { unit_instance_id: i32 },
    ResearchingTechnology(TechnologyState),
    UnitsGarrisoned { unit_instance_id: i32, amount: i32 },
    DifficultyLevel { level: i32 },
    OwnFewerFoundations(ObjectCount),
    SelectedObjectsInArea(ObjectCount),
    PoweredObjectsInArea(ObjectCount),
    UnitsQueuedPastPopCap { player: i32, amount: i32 },
    Other(ConditionRecord),
}

impl Condition {
    pub fn timer(seconds: i32) -> Self {
        Self::Timer { seconds }
    }

    pub fn destroy_object(unit_instance_id: u32, player: i32) -> Self {
        Self::DestroyObject(ObjectOwner {
            unit_instance_id: unit_instance_id as i32,
            player,
        })
    }

    pub fn kind(&self) -> ConditionKind {
        match self {
            Self::BringObjectToArea { .. } => ConditionKind::BringObjectToArea,
            Self::BringObjectToObject { .. } => ConditionKind::BringObjectToObject,
            Self::OwnObjects(_) => ConditionKind::OwnObjects,
            Self::OwnFewerObjects(_) => ConditionKind::OwnFewerObjects,
            Self::ObjectsInArea(_) => ConditionKind::ObjectsInArea,
            Self::DestroyObject(_) => ConditionKind::DestroyObject,
            Self::CaptureObject(_) => ConditionKind::CaptureObject,
            Self::AccumulateAttribute { .. } => ConditionKind::AccumulateAttribute,
            Self::ResearchTechnology(_) => ConditionKind::ResearchTechnology,
            Self::Timer { .. } => ConditionKind::Timer,
            Self::ObjectSelected { .. } => ConditionKind::ObjectSelected,
            Self::AiSignal { .. } => ConditionKind::AiSignal,
            Self::PlayerDefeated { .. } => ConditionKind::PlayerDefeated,
            Self::ObjectHasTarget { .. } => ConditionKind::ObjectHasTarget,
            Self::ObjectVisible { .. } => ConditionKind::ObjectVisible,
            Self::ObjectNotVisible { .. } => ConditionKind::ObjectNotVisible,
            Self::ResearchingTechnology(_) => ConditionKind::ResearchingTechnology,
            Self::UnitsGarrisoned { .. } => ConditionKind::UnitsGarrisoned,
            Self::DifficultyLevel { .. } => ConditionKind::DifficultyLevel,
            Self::OwnFewerFoundations(_) => ConditionKind::OwnFewerFoundations,
            Self::SelectedObjectsInArea(_) => ConditionKind::SelectedObjectsInArea,
            Self::PoweredObjectsInArea(_) => ConditionKind::PoweredObjectsInArea,
            Self::UnitsQueuedPastPopCap { .. } => ConditionKind::UnitsQueuedPastPopCap,
            Self::Other(record) => record.kind(),
        }
    }

    pub fn to_record(&self) -> ConditionRecord {
        let mut r = ConditionRecord::blank(self.kind());
        match *self {
            Self::BringObjectToArea {
                unit_instance_id,
                area,
            } => {
                r.unit_instance_id = unit_instance_id;
                r.set_area(area);
            }
            Self::BringObjectToObject {
                unit_instance_id,
                unit_location,
            } => {
                r.unit_instance_id = unit_instance_id;
                r.unit_location = unit_location;
            }
            Self::OwnObjects(p)
            | Self::OwnFewerObjects(p)
            | Self::ObjectsInArea(p)
            | Self::OwnFewerFoundations(p)
            | Self::SelectedObjectsInArea(p)
            | Self::PoweredObjectsInArea(p) => p.write(&mut r),
            Self::DestroyObject(p) | Self::CaptureObject(p) => p.write(&mut r),
            Self::AccumulateAttribute {
                player,
                resource_id,
                amount,
            } => {
                r.player = player;
                r.resource_id = resource_id;
                r.amount = amount;
            }
            Self::ResearchTechnology(p) | Self::ResearchingTechnology(p) => p.write(&mut r),
            Self::Timer { seconds } => r.timer = seconds,
            Self::ObjectSelected { unit_instance_id }
            | Self::ObjectVisible { unit_instance_id }
            | Self::ObjectNotVisible { unit_instance_id } => {
                r.unit_instance_id = unit_instance_id;
            }
            Self::AiSignal { signal } => r.ai_signal = signal,
            Self::PlayerDefeated { player } => r.player = player,
            Self::ObjectHasTarget {
                unit_instance_id,
                unit_location,
                filter,
            } => {
                r.unit_instance_id = unit_instance_id;
                r.unit_location = unit_location;
                r.set_filter(filter);
            }
            Self::UnitsGarrisoned {
                unit_instance_id,
                amount,
            } => {
                r.unit_instance_id = unit_instance_id;
                r.amount = amount;
            }
            Self::DifficultyLevel { level } => r.amount = level,
            Self::UnitsQueuedPastPopCap { player, amount } => {
                r.player = player;
                r.amount = amount;
            }
            Self::Other(record) => return record,
        }
        r
    }

    /// Typed view of `record`, or [`Condition::Other`] when the typed shape
    /// would drop a field.
    pub fn from_record(record: ConditionRecord) -> Self {
        let r = &record;
        let typed = match record.kind() {
            ConditionKind::BringObjectToArea => Self::BringObjectToArea {
                unit_instance_id: r.unit_instance_id,
                area: r.area(),
            },
            ConditionKind::BringObjectToObject => Self::BringObjectToObject {
                unit_instance_id: r.unit_instance_id,
                unit_location: r.unit_location,
            },
            ConditionKind::OwnObjects => Self::OwnObjects(ObjectCount::read(r)),
            ConditionKind::OwnFewerObjects => Self::OwnFewerObjects(ObjectCount::read(r)),
            ConditionKind::ObjectsInArea => Self::ObjectsInArea(ObjectCount::read(r)),
            ConditionKind::DestroyObject => Self::DestroyObject(ObjectOwner::read(r)),
            ConditionKind::CaptureObject => Self::CaptureObject(ObjectOwner::read(r)),
            ConditionKind::AccumulateAttribute => Self::AccumulateAttribute {
                player: r.player,
                resource_id: r.resource_id,
                amount: r.amount,
            },
            ConditionKind::ResearchTechnology => {
                Self::ResearchTechnology(TechnologyState::read(r))
            }
            ConditionKind::Timer => Self::Timer { seconds: r.timer },
            ConditionKind::ObjectSelected => Self::ObjectSelected {
                unit_instance_id: r.unit_instance_id,
            },
            ConditionKind::AiSignal => Self::AiSignal {
                signal: r.ai_signal,
            },
            ConditionKind::PlayerDefeated => Self::PlayerDefeated { player: r.player },
            ConditionKind::ObjectHasTarget => Self::ObjectHasTarget {
                unit_instance_id: r.unit_instance_id,
                unit_location: r.unit_location,
                filter: r.filter(),
            },
            ConditionKind::ObjectVisible => Self::ObjectVisible {
                unit_instance_id: r.unit_instance_id,
            },
            ConditionKind::ObjectNotVisible => Self::ObjectNotVisible {
                unit_instance_id: r.unit_instance_id,
            },
            ConditionKind::ResearchingTechnology => {
                Self::ResearchingTechnology(TechnologyState::read(r))
            }
            ConditionKind::UnitsGarrisoned => Self::UnitsGarrisoned {
                unit_instance_id: r.unit_instance_id,
                amount: r.amount,
            },
            ConditionKind::DifficultyLevel => Self::DifficultyLevel { level: r.amount },
            ConditionKind::OwnFewerFoundations => Self::OwnFewerFoundations(ObjectCount::read(r)),
            ConditionKind::SelectedObjectsInArea => {
                Self::SelectedObjectsInArea(ObjectCount::read(r))
            }
            ConditionKind::PoweredObjectsInArea => {
                Self::PoweredObjectsInArea(ObjectCount::read(r))
            }
            ConditionKind::UnitsQueuedPastPopCap => Self::UnitsQueuedPastPopCap {
                player: r.player,
                amount: r.amount,
            },
            ConditionKind::Unrecognized(_) => return Self::Other(record),
        };

        if typed.to_record() == record {
            typed
        } else {
            Self::Other(record)
        }
    }

    pub fn decode(c: &mut ByteCursor) -> Result<Self> {
        ConditionRecord::decode(c).map(Self::from_record)
    }

    pub fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        self.to_record().encode(c);
        Ok(())
    }
}
