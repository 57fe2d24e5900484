//! Trigger section: triggers with their effects and conditions.
//!
//! Effects and conditions exist in two shapes. [`EffectRecord`] and
//! [`ConditionRecord`] mirror the fixed wire layout, every field present
//! and `-1` where a field does not apply. [`Effect`] and [`Condition`] are
//! the typed views callers match on; converting between the two never
//! changes the bytes written.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::SectionCodec;
use crate::cursor::ByteCursor;
use crate::error::Result;
use crate::layout::SectionId;
use crate::records::{
    expect_paired, read_count, read_vec, with_terminator, write_count,
    write_terminated_string_i32,
};

/// Declares a fieldless wire discriminator with a catch-all for values
/// outside the known table.
macro_rules! kind_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $raw:literal,)+ }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $($variant,)+
            Unrecognized(u32),
        }

        impl $name {
            pub fn from_raw(raw: u32) -> Self {
                match raw {
                    $($raw => Self::$variant,)+
                    other => Self::Unrecognized(other),
                }
            }

            pub fn raw(&self) -> u32 {
                match *self {
                    $(Self::$variant => $raw,)+
                    Self::Unrecognized(other) => other,
                }
            }

            pub fn as_str(&self) -> &'static str {
                match *self {
                    $(Self::$variant => stringify!($variant),)+
                    Self::Unrecognized(_) => "Unrecognized",
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match *self {
                    Self::Unrecognized(v) => write!(f, "Unrecognized ({})", v),
                    _ => f.write_str(self.as_str()),
                }
            }
        }
    };
}

mod condition;
mod effect;

pub use condition::{
    CONDITION_MARKER, Condition, ConditionKind, ConditionRecord, ObjectCount, ObjectOwner,
    TechnologyState,
};
pub use effect::{
    Chat, EFFECT_MARKER, Effect, EffectKind, EffectRecord, Instructions, ObjectAdjust, ObjectMove,
    ObjectRename, ObjectTargets, ObjectTransfer, Placement, Sound, TechnologyTarget, Tribute,
    UnitTarget, View,
};

/// Rectangle in tile coordinates; all `-1` when unused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Area {
    pub bottom_left_x: i32,
    pub bottom_left_y: i32,
    pub top_right_x: i32,
    pub top_right_y: i32,
}

impl Area {
    pub const UNSET: Area = Area {
        bottom_left_x: -1,
        bottom_left_y: -1,
        top_right_x: -1,
        top_right_y: -1,
    };

    pub fn is_set(&self) -> bool {
        *self != Self::UNSET
    }
}

impl Default for Area {
    fn default() -> Self {
        Self::UNSET
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const UNSET: Location = Location { x: -1, y: -1 };
}

impl Default for Location {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Restricts an effect or condition to one unit type or class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectFilter {
    pub unit_type: i32,
    pub unit_class: i32,
    pub unit_type2: i32,
}

impl ObjectFilter {
    pub const ANY: ObjectFilter = ObjectFilter {
        unit_type: -1,
        unit_class: -1,
        unit_type2: -1,
    };
}

impl Default for ObjectFilter {
    fn default() -> Self {
        Self::ANY
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Triggers {
    pub unknown: u8,
    pub triggers: Vec<Trigger>,
    pub display_indices: Vec<i32>,
}

impl Triggers {
    /// Append `trigger`, listed last in the editor. Returns its index.
    pub fn push(&mut self, trigger: Trigger) -> usize {
        let index = self.triggers.len();
        self.display_indices.push(index as i32);
        self.triggers.push(trigger);
        index
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub enabled: u32,
    pub looping: u32,
    pub state: u8,
    pub show_as_objective: u8,
    pub objective_order: i32,
    pub unknown: u32,
    /// Stored with its trailing NUL.
    pub description: String,
    /// Stored with its trailing NUL.
    pub name: String,
    pub effects: Vec<Effect>,
    pub effect_display_indices: Vec<i32>,
    pub conditions: Vec<Condition>,
    pub condition_display_indices: Vec<i32>,
}

impl Trigger {
    /// An enabled, non-looping trigger with no effects or conditions.
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            enabled: 1,
            looping: 0,
            state: 0,
            show_as_objective: 0,
            objective_order: 0,
            unknown: 0,
            description: with_terminator(description).into_owned(),
            name: with_terminator(name).into_owned(),
            effects: Vec::new(),
            effect_display_indices: Vec::new(),
            conditions: Vec::new(),
            condition_display_indices: Vec::new(),
        }
    }

    /// Name without the trailing NUL.
    pub fn display_name(&self) -> &str {
        self.name.trim_end_matches('\0')
    }

    pub fn push_effect(&mut self, effect: Effect) {
        self.effect_display_indices.push(self.effects.len() as i32);
        self.effects.push(effect);
    }

    pub fn push_condition(&mut self, condition: Condition) {
        self.condition_display_indices.push(self.conditions.len() as i32);
        self.conditions.push(condition);
    }

    fn decode(c: &mut ByteCursor) -> Result<Self> {
        let enabled = c.read_u32()?;
        let looping = c.read_u32()?;
        let state = c.read_u8()?;
        let show_as_objective = c.read_u8()?;
        let objective_order = c.read_i32()?;
        let unknown = c.read_u32()?;
        let description = c.read_string_i32()?;
        let name = c.read_string_i32()?;

        let effect_count = read_count(c, "effect")?;
        let effects = read_vec(c, effect_count, Effect::decode)?;
        let effect_display_indices = read_vec(c, effect_count, ByteCursor::read_i32)?;

        let condition_count = read_count(c, "condition")?;
        let conditions = read_vec(c, condition_count, Condition::decode)?;
        let condition_display_indices = read_vec(c, condition_count, ByteCursor::read_i32)?;

        Ok(Self {
            enabled,
            looping,
            state,
            show_as_objective,
            objective_order,
            unknown,
            description,
            name,
            effects,
            effect_display_indices,
            conditions,
            condition_display_indices,
        })
    }

    fn validate(&self) -> Result<()> {
        expect_paired(
            self.effects.len(),
            self.effect_display_indices.len(),
            "trigger effects",
        )?;
        expect_paired(
            self.conditions.len(),
            self.condition_display_indices.len(),
            "trigger conditions",
        )
    }

    fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        c.write_u32(self.enabled);
        c.write_u32(self.looping);
        c.write_u8(self.state);
        c.write_u8(self.show_as_objective);
        c.write_i32(self.objective_order);
        c.write_u32(self.unknown);
        write_terminated_string_i32(c, &self.description)?;
        write_terminated_string_i32(c, &self.name)?;

        write_count(c, self.effects.len(), "effect")?;
        for effect in &self.effects {
            effect.encode(c)?;
        }
        for &index in &self.effect_display_indices {
            c.write_i32(index);
        }

        write_count(c, self.conditions.len(), "condition")?;
        for condition in &self.conditions {
            condition.encode(c)?;
        }
        for &index in &self.condition_display_indices {
            c.write_i32(index);
        }
        Ok(())
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} conditions, {} effects)",
            self.display_name(),
            self.conditions.len(),
            self.effects.len()
        )
    }
}

impl SectionCodec for Triggers {
    const ID: SectionId = SectionId::Triggers;

    fn decode(c: &mut ByteCursor) -> Result<Self> {
        let unknown = c.read_u8()?;
        let count = read_count(c, "trigger")?;
        let triggers = read_vec(c, count, Trigger::decode)?;
        let display_indices = read_vec(c, count, ByteCursor::read_i32)?;
        Ok(Self {
            unknown,
            triggers,
            display_indices,
        })
    }

    fn encode(&self, c: &mut ByteCursor) -> Result<()> {
        // Check every paired list before the first byte goes out.
        expect_paired(self.triggers.len(), self.display_indices.len(), "triggers")?;
        for trigger in &self.triggers {
            trigger.validate()?;
        }

        c.write_u8(self.unknown);
        write_count(c, self.triggers.len(), "trigger")?;
        for trigger in &self.triggers {
            trigger.encode(c)?;
        }
        for &index in &self.display_indices {
            c.write_i32(index);
        }
        Ok(())
    }
}
