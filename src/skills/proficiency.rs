//! Stochastic proficiency growth
//!
//! Every use of a non-instant ability may teach a little:
//! - success: one roll against the curve's gain chance
//! - failure: two rolls, both must pass (p² instead of p)
//!
//! A passing check adds exactly one percentage point. This is the only code
//! path that raises proficiency.

use crate::core::types::{AbilityId, AbilityKind, CharacterId};
use crate::skills::definitions::AbilityDescriptor;
use crate::skills::progression::{ProgressionCurve, MAX_PROFICIENCY};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A character's proficiency in one ability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProficiencyRecord {
    pub character: CharacterId,
    pub kind: AbilityKind,
    pub ability_id: AbilityId,
    proficiency: u8,
}

impl ProficiencyRecord {
    pub fn new(character: CharacterId, kind: AbilityKind, ability_id: AbilityId, proficiency: u8) -> Self {
        Self {
            character,
            kind,
            ability_id,
            proficiency: proficiency.min(MAX_PROFICIENCY),
        }
    }

    /// Fresh record at the curve's starting point
    pub fn learned(character: CharacterId, ability: &AbilityDescriptor) -> Self {
        Self::new(
            character,
            ability.kind,
            ability.id,
            ability.progression.starting_proficiency(),
        )
    }

    pub fn proficiency(&self) -> u8 {
        self.proficiency
    }

    pub fn is_mastered(&self) -> bool {
        self.proficiency >= MAX_PROFICIENCY
    }

    pub(crate) fn set_proficiency(&mut self, proficiency: u8) {
        self.proficiency = proficiency.min(MAX_PROFICIENCY);
    }
}

/// Persistence collaborator for proficiency records
#[cfg_attr(test, mockall::automock)]
pub trait ProficiencyStore: Send + Sync {
    fn get(&self, character: CharacterId, kind: AbilityKind, ability_id: AbilityId) -> Option<ProficiencyRecord>;

    /// Returns false when the write did not land
    fn set(&self, character: CharacterId, kind: AbilityKind, ability_id: AbilityId, proficiency: u8) -> bool;
}

/// Proficiency before and after a growth check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProficiencyDelta {
    pub old: u8,
    pub new: u8,
}

impl ProficiencyDelta {
    pub fn unchanged(value: u8) -> Self {
        Self { old: value, new: value }
    }

    pub fn improved(&self) -> bool {
        self.new > self.old
    }
}

/// Result of one growth check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProficiencyOutcome {
    pub ability_name: String,
    pub delta: ProficiencyDelta,
}

impl ProficiencyOutcome {
    pub fn improved(&self) -> bool {
        self.delta.improved()
    }

    /// Player-facing text, `None` when nothing changed
    pub fn improvement_message(&self) -> Option<String> {
        if !self.improved() {
            return None;
        }
        Some(format!(
            "Your {} has improved! ({}% -> {}%)",
            self.ability_name, self.delta.old, self.delta.new
        ))
    }
}

/// One percentile roll (1 to 100) against a gain chance
pub fn roll_gain<R: Rng + ?Sized>(rng: &mut R, gain_chance: u8) -> bool {
    rng.gen_range(1..=100u8) <= gain_chance
}

/// Decide whether a use at `current` proficiency teaches a point
///
/// Both failure rolls are always drawn so the stream of draws does not depend
/// on the first outcome.
pub fn attempt_growth<C, R>(curve: &C, current: u8, succeeded: bool, rng: &mut R) -> bool
where
    C: ProgressionCurve + ?Sized,
    R: Rng + ?Sized,
{
    if curve.is_instant() || current >= MAX_PROFICIENCY {
        return false;
    }

    let gain_chance = curve.gain_chance(current);
    if succeeded {
        roll_gain(rng, gain_chance)
    } else {
        let first = roll_gain(rng, gain_chance);
        let second = roll_gain(rng, gain_chance);
        first && second
    }
}

/// Applies growth checks and writes gains through the store
#[derive(Clone)]
pub struct ProficiencyEngine {
    store: Arc<dyn ProficiencyStore>,
}

impl std::fmt::Debug for ProficiencyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProficiencyEngine").finish_non_exhaustive()
    }
}

impl ProficiencyEngine {
    pub fn new(store: Arc<dyn ProficiencyStore>) -> Self {
        Self { store }
    }

    /// Growth check using the ability's own curve
    pub fn check_growth<R: Rng + ?Sized>(
        &self,
        ability: &AbilityDescriptor,
        record: &mut ProficiencyRecord,
        succeeded: bool,
        rng: &mut R,
    ) -> ProficiencyOutcome {
        self.check_growth_on_curve(&ability.name, &ability.progression, record, succeeded, rng)
    }

    /// Growth check against an arbitrary curve
    ///
    /// A failed write is logged and otherwise ignored: the caller still sees
    /// the gain and the in-memory record is still updated.
    pub fn check_growth_on_curve<C, R>(
        &self,
        ability_name: &str,
        curve: &C,
        record: &mut ProficiencyRecord,
        succeeded: bool,
        rng: &mut R,
    ) -> ProficiencyOutcome
    where
        C: ProgressionCurve + ?Sized,
        R: Rng + ?Sized,
    {
        let old = record.proficiency();
        if !attempt_growth(curve, old, succeeded, rng) {
            return ProficiencyOutcome {
                ability_name: ability_name.to_string(),
                delta: ProficiencyDelta::unchanged(old),
            };
        }

        let new = old + 1;
        if !self.store.set(record.character, record.kind, record.ability_id, new) {
            tracing::warn!(
                "Failed to persist {} proficiency {}% for character {:?}",
                ability_name,
                new,
                record.character
            );
        }
        record.set_proficiency(new);
        tracing::info!(
            "{:?} improved {} ({}% -> {}%)",
            record.character,
            ability_name,
            old,
            new
        );

        ProficiencyOutcome {
            ability_name: ability_name.to_string(),
            delta: ProficiencyDelta { old, new },
        }
    }
}
