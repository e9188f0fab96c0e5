//! Ability descriptors as supplied by the host's ability catalog

use crate::core::types::{AbilityId, AbilityKind};
use crate::skills::progression::SkillProgression;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Usage constraints attached to an ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbilityTrait {
    /// Only usable while in combat
    Combat,
    /// Only usable outside combat
    #[serde(rename = "NOCOMBAT", alias = "NO_COMBAT")]
    NoCombat,
    /// Requires a shield in the off-hand (skills only)
    Shield,
    /// Host-side marker for abilities everyone knows. Gating and growth
    /// ignore it; starting proficiency comes from the progression curve.
    Innate,
}

/// Read-only description of a skill or spell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityDescriptor {
    pub kind: AbilityKind,
    pub id: AbilityId,
    pub name: String,
    /// Cooldown in seconds; zero means none
    #[serde(default)]
    pub cooldown_seconds: f64,
    #[serde(default)]
    pub traits: Vec<AbilityTrait>,
    #[serde(default)]
    pub progression: SkillProgression,
    /// Effects applied on a successful use (buffs, debuffs)
    #[serde(default)]
    pub effect_ids: Vec<String>,
}

impl AbilityDescriptor {
    pub fn new(kind: AbilityKind, id: AbilityId, name: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            name: name.into(),
            cooldown_seconds: 0.0,
            traits: Vec::new(),
            progression: SkillProgression::default(),
            effect_ids: Vec::new(),
        }
    }

    pub fn skill(id: u32, name: impl Into<String>) -> Self {
        Self::new(AbilityKind::Skill, AbilityId(id), name)
    }

    pub fn spell(id: u32, name: impl Into<String>) -> Self {
        Self::new(AbilityKind::Spell, AbilityId(id), name)
    }

    pub fn with_cooldown(mut self, seconds: f64) -> Self {
        self.cooldown_seconds = seconds.max(0.0);
        self
    }

    pub fn with_trait(mut self, ability_trait: AbilityTrait) -> Self {
        if !self.traits.contains(&ability_trait) {
            self.traits.push(ability_trait);
        }
        self
    }

    pub fn with_progression(mut self, progression: SkillProgression) -> Self {
        self.progression = progression;
        self
    }

    pub fn with_effect(mut self, effect_id: impl Into<String>) -> Self {
        self.effect_ids.push(effect_id.into());
        self
    }

    pub fn display_name(&self) -> &str {
        &self.name
    }

    pub fn has_cooldown(&self) -> bool {
        self.cooldown_seconds > 0.0
    }

    pub fn has_trait(&self, ability_trait: AbilityTrait) -> bool {
        self.traits.contains(&ability_trait)
    }

    pub fn has_effects(&self) -> bool {
        !self.effect_ids.is_empty()
    }
}

/// Host-owned lookup from (kind, id) to descriptor
pub trait AbilityCatalog: Send + Sync {
    /// `None` for unknown ids
    fn lookup(&self, kind: AbilityKind, id: AbilityId) -> Option<Arc<AbilityDescriptor>>;
}

/// The ability a caller is attempting, which may have failed to resolve
///
/// Keeps the kind even when the descriptor is missing so the denial can say
/// "Invalid skill." or "Invalid spell.".
#[derive(Debug, Clone, Copy)]
pub struct AbilityRequest<'a> {
    kind: AbilityKind,
    descriptor: Option<&'a AbilityDescriptor>,
}

impl<'a> AbilityRequest<'a> {
    pub fn new(kind: AbilityKind, descriptor: Option<&'a AbilityDescriptor>) -> Self {
        Self { kind, descriptor }
    }

    pub fn unknown(kind: AbilityKind) -> Self {
        Self { kind, descriptor: None }
    }

    pub fn kind(&self) -> AbilityKind {
        self.descriptor.map_or(self.kind, |d| d.kind)
    }

    pub fn descriptor(&self) -> Option<&'a AbilityDescriptor> {
        self.descriptor
    }
}

impl<'a> From<&'a AbilityDescriptor> for AbilityRequest<'a> {
    fn from(descriptor: &'a AbilityDescriptor) -> Self {
        Self {
            kind: descriptor.kind,
            descriptor: Some(descriptor),
        }
    }
}
