//! Ability definitions and proficiency progression
//!
//! Proficiency is a 0-100% mastery value per ability. Using an ability may
//! raise it by a point; how likely that is depends on the ability's curve
//! and on whether the attempt succeeded.

pub mod definitions;
pub mod display;
pub mod proficiency;
pub mod progression;

pub use definitions::{AbilityCatalog, AbilityDescriptor, AbilityRequest, AbilityTrait};
pub use display::{proficiency_display, ProficiencyTier};
pub use proficiency::{
    attempt_growth, ProficiencyDelta, ProficiencyEngine, ProficiencyOutcome, ProficiencyRecord,
    ProficiencyStore,
};
pub use progression::{ProgressionCurve, SkillProgression, MAX_PROFICIENCY};
