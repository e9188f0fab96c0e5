//! Progression curves: how hard it is to gain proficiency at each tier

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Highest proficiency percentage; reaching it means mastery
pub const MAX_PROFICIENCY: u8 = 100;

/// Per-ability rule for proficiency growth
pub trait ProgressionCurve {
    /// Instant curves start mastered and never move
    fn is_instant(&self) -> bool;

    /// Percentage chance (0 to 100) that one growth roll passes at this proficiency
    fn gain_chance(&self, current_proficiency: u8) -> u8;

    fn starting_proficiency(&self) -> u8 {
        if self.is_instant() {
            MAX_PROFICIENCY
        } else {
            1
        }
    }
}

/// Built-in learning curves
///
/// Each curve has a base gain chance and a scaling factor that erodes the
/// chance as proficiency climbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkillProgression {
    /// Mastered on learning (weapon families, armor types, spell schools)
    Instant,
    /// Movement and combat basics
    Trivial,
    /// Common combat skills
    Easy,
    /// Most skills
    #[default]
    Normal,
    /// Specialised skills
    Hard,
    /// Advanced techniques
    VeryHard,
    /// Master-level abilities
    Legendary,
}

impl SkillProgression {
    pub const ALL: [SkillProgression; 7] = [
        SkillProgression::Instant,
        SkillProgression::Trivial,
        SkillProgression::Easy,
        SkillProgression::Normal,
        SkillProgression::Hard,
        SkillProgression::VeryHard,
        SkillProgression::Legendary,
    ];

    /// Base percentage chance to gain on use
    pub fn base_gain_chance(&self) -> u8 {
        match self {
            SkillProgression::Instant => 0,
            SkillProgression::Trivial => 50,
            SkillProgression::Easy => 35,
            SkillProgression::Normal => 25,
            SkillProgression::Hard => 15,
            SkillProgression::VeryHard => 10,
            SkillProgression::Legendary => 5,
        }
    }

    /// Erosion of the base chance per proficiency point
    pub fn difficulty_scaling(&self) -> f64 {
        match self {
            SkillProgression::Instant => 0.0,
            SkillProgression::Trivial => 0.3,
            SkillProgression::Easy => 0.25,
            SkillProgression::Normal => 0.2,
            SkillProgression::Hard => 0.15,
            SkillProgression::VeryHard => 0.1,
            SkillProgression::Legendary => 0.05,
        }
    }

    /// Lenient parse used for data files; unknown names fall back to Normal
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl ProgressionCurve for SkillProgression {
    fn is_instant(&self) -> bool {
        matches!(self, SkillProgression::Instant)
    }

    fn gain_chance(&self, current_proficiency: u8) -> u8 {
        if self.is_instant() || current_proficiency >= MAX_PROFICIENCY {
            return 0;
        }
        // base * (1 - (p/100) * scaling * 10), floored at 10% of base
        let modifier = 1.0 - (current_proficiency as f64 / 100.0) * self.difficulty_scaling() * 10.0;
        let chance = (self.base_gain_chance() as f64 * modifier.max(0.1)).round() as u8;
        chance.max(1)
    }
}

impl FromStr for SkillProgression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "INSTANT" => Ok(SkillProgression::Instant),
            "TRIVIAL" => Ok(SkillProgression::Trivial),
            "EASY" => Ok(SkillProgression::Easy),
            "NORMAL" => Ok(SkillProgression::Normal),
            "HARD" => Ok(SkillProgression::Hard),
            "VERY_HARD" => Ok(SkillProgression::VeryHard),
            "LEGENDARY" => Ok(SkillProgression::Legendary),
            _ => Err(format!("Unknown progression: {}", s)),
        }
    }
}
