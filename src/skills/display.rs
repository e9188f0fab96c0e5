//! Display helpers for proficiency on character sheets and skill lists

use crate::skills::progression::MAX_PROFICIENCY;
use serde::{Deserialize, Serialize};

/// Human-readable proficiency tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProficiencyTier {
    Novice,
    Familiar,
    Skilled,
    Adept,
    Expert,
    Mastered,
}

impl ProficiencyTier {
    pub fn from_percent(proficiency: u8) -> Self {
        match proficiency {
            p if p >= MAX_PROFICIENCY => ProficiencyTier::Mastered,
            90..=99 => ProficiencyTier::Expert,
            75..=89 => ProficiencyTier::Adept,
            50..=74 => ProficiencyTier::Skilled,
            25..=49 => ProficiencyTier::Familiar,
            _ => ProficiencyTier::Novice,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProficiencyTier::Novice => "Novice",
            ProficiencyTier::Familiar => "Familiar",
            ProficiencyTier::Skilled => "Skilled",
            ProficiencyTier::Adept => "Adept",
            ProficiencyTier::Expert => "Expert",
            ProficiencyTier::Mastered => "Mastered",
        }
    }
}

/// "Skilled (63%)", or just "Mastered" at 100
pub fn proficiency_display(proficiency: u8) -> String {
    let tier = ProficiencyTier::from_percent(proficiency);
    match tier {
        ProficiencyTier::Mastered => tier.name().to_string(),
        _ => format!("{} ({}%)", tier.name(), proficiency),
    }
}

/// Bar fill for visual rendering (0.0 to 1.0)
pub fn proficiency_bar(proficiency: u8) -> f32 {
    (proficiency as f32 / MAX_PROFICIENCY as f32).clamp(0.0, 1.0)
}
