//! Applying an ability's declared effects (buffs, debuffs) after a use
//!
//! Sits beside the cooldown/proficiency flow rather than inside it; callers
//! usually invoke it right after a successful execution.

use crate::core::types::CharacterId;
use crate::skills::definitions::AbilityDescriptor;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A live effect created by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectInstance {
    pub id: Uuid,
    pub effect_id: String,
    pub caster: CharacterId,
    pub target: CharacterId,
}

impl EffectInstance {
    pub fn new(effect_id: impl Into<String>, caster: CharacterId, target: CharacterId) -> Self {
        Self {
            id: Uuid::new_v4(),
            effect_id: effect_id.into(),
            caster,
            target,
        }
    }
}

/// Host-owned registry of effect definitions
#[cfg_attr(test, mockall::automock)]
pub trait EffectRegistry: Send + Sync {
    /// Display name of a known effect, `None` for unknown ids
    fn definition_name(&self, effect_id: &str) -> Option<String>;

    /// Apply an effect; `None` when the registry refused it
    fn apply(
        &self,
        effect_id: &str,
        caster: CharacterId,
        target: CharacterId,
        params: &AHashMap<String, String>,
    ) -> Option<EffectInstance>;
}

/// Which of an ability's effects landed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectOutcome {
    /// Display names of applied effects
    pub applied: Vec<String>,
    /// Ids of effects that were unknown or refused
    pub failed: Vec<String>,
}

impl EffectOutcome {
    pub fn has_applied(&self) -> bool {
        !self.applied.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Comma-separated applied names, `None` if nothing applied
    pub fn summary(&self) -> Option<String> {
        if self.applied.is_empty() {
            None
        } else {
            Some(self.applied.join(", "))
        }
    }
}

/// Apply every effect the ability declares, passing the user's proficiency along
pub fn apply_effects(
    registry: &dyn EffectRegistry,
    ability: &AbilityDescriptor,
    caster: CharacterId,
    target: CharacterId,
    proficiency: u8,
) -> EffectOutcome {
    let mut outcome = EffectOutcome::default();
    if !ability.has_effects() {
        return outcome;
    }

    let mut params = AHashMap::new();
    params.insert("proficiency".to_string(), proficiency.to_string());

    for effect_id in &ability.effect_ids {
        let Some(name) = registry.definition_name(effect_id) else {
            tracing::warn!("{} references unknown effect '{}'", ability.name, effect_id);
            outcome.failed.push(effect_id.clone());
            continue;
        };
        match registry.apply(effect_id, caster, target, &params) {
            Some(instance) => {
                tracing::debug!("Applied {} ({}) to {:?}", name, instance.id, target);
                outcome.applied.push(name);
            }
            None => outcome.failed.push(effect_id.clone()),
        }
    }

    outcome
}

/// Self-targeted variant: caster and target are the same character
pub fn apply_effects_to_self(
    registry: &dyn EffectRegistry,
    ability: &AbilityDescriptor,
    character: CharacterId,
    proficiency: u8,
) -> EffectOutcome {
    apply_effects(registry, ability, character, character, proficiency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[test]
    fn test_no_effects_touches_nothing() {
        let mut registry = MockEffectRegistry::new();
        registry.expect_definition_name().never();
        registry.expect_apply().never();

        let outcome = apply_effects_to_self(&registry, &AbilityDescriptor::skill(1, "Kick"), CharacterId(1), 50);
        assert_eq!(outcome, EffectOutcome::default());
        assert_eq!(outcome.summary(), None);
    }

    #[test]
    fn test_mixed_outcome() {
        let mut registry = MockEffectRegistry::new();
        registry
            .expect_definition_name()
            .with(eq("heroism"))
            .return_const(Some("Heroism".to_string()));
        registry
            .expect_definition_name()
            .with(eq("haste"))
            .return_const(Some("Haste".to_string()));
        registry
            .expect_definition_name()
            .with(eq("bogus"))
            .return_const(None);
        registry
            .expect_apply()
            .withf(|id, caster, target, params| {
                id == "heroism"
                    && *caster == CharacterId(1)
                    && *target == CharacterId(2)
                    && params.get("proficiency").map(String::as_str) == Some("64")
            })
            .returning(|id, caster, target, _| Some(EffectInstance::new(id, caster, target)));
        registry
            .expect_apply()
            .withf(|id, _, _, _| id == "haste")
            .returning(|_, _, _, _| None);

        let strike = AbilityDescriptor::skill(20, "Heroic Strike")
            .with_effect("heroism")
            .with_effect("bogus")
            .with_effect("haste");
        let outcome = apply_effects(&registry, &strike, CharacterId(1), CharacterId(2), 64);

        assert_eq!(outcome.applied, vec!["Heroism".to_string()]);
        assert_eq!(outcome.failed, vec!["bogus".to_string(), "haste".to_string()]);
        assert!(outcome.has_applied());
        assert!(outcome.has_failures());
        assert_eq!(outcome.summary().as_deref(), Some("Heroism"));
    }

    #[test]
    fn test_summary_joins_names() {
        let outcome = EffectOutcome {
            applied: vec!["Bless".to_string(), "Armor".to_string()],
            failed: Vec::new(),
        };
        assert_eq!(outcome.summary().as_deref(), Some("Bless, Armor"));
    }
}
