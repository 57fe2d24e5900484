use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScxError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Body sections in their fixed wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionId {
    Header,
    MessagesCinematics,
    PlayerAiResources,
    GlobalVictory,
    Diplomacy,
    Disables,
    Map,
    Units,
    PlayerDiplomacyVarious,
    Triggers,
    IncludedFiles,
}

impl SectionId {
    pub const ALL: [SectionId; 11] = [
        SectionId::Header,
        SectionId::MessagesCinematics,
        SectionId::PlayerAiResources,
        SectionId::GlobalVictory,
        SectionId::Diplomacy,
        SectionId::Disables,
        SectionId::Map,
        SectionId::Units,
        SectionId::PlayerDiplomacyVarious,
        SectionId::Triggers,
        SectionId::IncludedFiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::MessagesCinematics => "messages_cinematics",
            Self::PlayerAiResources => "player_ai_resources",
            Self::GlobalVictory => "global_victory",
            Self::Diplomacy => "diplomacy",
            Self::Disables => "disables",
            Self::Map => "map",
            Self::Units => "units",
            Self::PlayerDiplomacyVarious => "player_diplomacy_various",
            Self::Triggers => "triggers",
            Self::IncludedFiles => "included_files",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLayout {
    pub id: SectionId,
    pub range: ByteRange,
}

/// Where each section sits inside the decompressed body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyLayout {
    /// Length of the prologue preceding the compressed stream.
    pub prologue_len: usize,
    pub compressed_len: usize,
    pub body_len: usize,
    pub sections: Vec<SectionLayout>,
}

impl BodyLayout {
    pub fn section(&self, id: SectionId) -> Option<&SectionLayout> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.sections.first() else {
            return Err(ScxError::violation(
                "body layout must contain at least one section",
            ));
        };

        if first.range.start != 0 {
            return Err(ScxError::violation("body layout does not start at byte 0"));
        }

        let mut expected = 0usize;
        for section in &self.sections {
            if section.range.start != expected {
                return Err(ScxError::violation(format!(
                    "layout gap/overlap around section {}: expected start {}, got {}",
                    section.id, expected, section.range.start
                )));
            }
            if section.range.end < section.range.start {
                return Err(ScxError::violation(format!(
                    "invalid section range {}: {}",
                    section.id, section.range
                )));
            }
            expected = section.range.end;
        }

        if expected != self.body_len {
            return Err(ScxError::violation(format!(
                "layout does not cover body: ended at {}, body length {}",
                expected, self.body_len
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn layout(ranges: &[(usize, usize)], body_len: usize) -> BodyLayout {
        BodyLayout {
            prologue_len: 0,
            compressed_len: 0,
            body_len,
            sections: ranges
                .iter()
                .zip(SectionId::ALL)
                .map(|(&(start, end), id)| SectionLayout {
                    id,
                    range: ByteRange { start, end },
                })
                .collect(),
        }
    }

    #[test]
    fn contiguous_layout_is_valid() {
        let layout = layout(&[(0, 10), (10, 25), (25, 25)], 25);
        layout.validate().expect("valid");
        assert_eq!(
            layout.section(SectionId::PlayerAiResources).map(|s| s.range.is_empty()),
            Some(true)
        );
    }

    #[test]
    fn gaps_and_short_coverage_are_rejected() {
        for (ranges, len) in [
            (vec![(0, 10), (11, 20)], 20),
            (vec![(1, 10)], 10),
            (vec![(0, 10)], 12),
            (vec![], 0),
        ] {
            let err = layout(&ranges, len).validate().expect_err("invalid");
            assert_eq!(err.code(), ErrorCode::FormatViolation);
        }
    }

    #[test]
    fn section_names() {
        assert_eq!(SectionId::ALL.len(), 11);
        assert_eq!(SectionId::PlayerDiplomacyVarious.to_string(), "player_diplomacy_various");
    }
}
