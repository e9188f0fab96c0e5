//! Precondition gate: may this entity use this ability right now?
//!
//! Checks run in a fixed order and the first failure wins:
//! 1. unknown ability
//! 2. cooldown still running
//! 3. COMBAT trait outside combat
//! 4. NOCOMBAT trait inside combat
//! 5. SHIELD trait without a shield (skills)
//! 6. silenced (spells)
//! 7. stunned, for abilities with a cooldown; the stun is consumed
//!
//! Player denials are worded for display. Mobile denials are terse since
//! nobody reads them.

use crate::combat::status::{CombatState, Combatant, EquipmentProvider, StatusFlag};
use crate::cooldown::CooldownTracker;
use crate::core::types::{AbilityKind, CharacterId, EntityRef, MobileId};
use crate::skills::definitions::{AbilityDescriptor, AbilityRequest, AbilityTrait};
use std::sync::Arc;

/// Outcome of a precondition check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    Passed,
    Failed { reason: String },
}

impl CheckResult {
    pub fn success() -> Self {
        CheckResult::Passed
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        CheckResult::Failed { reason: reason.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, CheckResult::Passed)
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            CheckResult::Passed => None,
            CheckResult::Failed { reason } => Some(reason),
        }
    }
}

fn deny(entity: &EntityRef, reason: String) -> CheckResult {
    tracing::debug!("{} denied: {}", entity, reason);
    CheckResult::Failed { reason }
}

/// "N second" / "N seconds"
fn seconds_phrase(remaining: f64) -> String {
    let seconds = remaining.ceil().max(0.0) as u64;
    format!("{} second{}", seconds, if seconds != 1 { "s" } else { "" })
}

/// Composes cooldown state with host combat and equipment state
#[derive(Clone)]
pub struct PreconditionGate {
    cooldowns: Arc<CooldownTracker>,
    combat: Arc<dyn CombatState>,
    equipment: Arc<dyn EquipmentProvider>,
}

impl std::fmt::Debug for PreconditionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreconditionGate")
            .field("cooldowns", &self.cooldowns)
            .finish_non_exhaustive()
    }
}

impl PreconditionGate {
    pub fn new(
        cooldowns: Arc<CooldownTracker>,
        combat: Arc<dyn CombatState>,
        equipment: Arc<dyn EquipmentProvider>,
    ) -> Self {
        Self {
            cooldowns,
            combat,
            equipment,
        }
    }

    pub fn cooldowns(&self) -> &Arc<CooldownTracker> {
        &self.cooldowns
    }

    /// Full player check
    ///
    /// Not idempotent: a stunned player attempting a cooldown-bearing ability
    /// loses the stun as part of this call, so only the first attempt after
    /// being stunned is blocked.
    pub fn check_player_and_consume_stun<'a>(
        &self,
        name: &str,
        character: Option<CharacterId>,
        ability: impl Into<AbilityRequest<'a>>,
    ) -> CheckResult {
        let request = ability.into();
        let entity = EntityRef::player(name);
        let Some(ability) = request.descriptor() else {
            return deny(&entity, format!("Invalid {}.", request.kind().noun()));
        };

        // One read: a tick landing between two reads could report "0 seconds"
        let remaining = self.cooldowns.remaining(&entity, ability.kind, ability.id);
        if remaining > 0.0 {
            return deny(
                &entity,
                format!(
                    "{} is on cooldown for another {}.",
                    ability.name,
                    seconds_phrase(remaining)
                ),
            );
        }

        let in_combat = character.map_or(false, |c| self.combat.is_in_combat(c));
        if ability.has_trait(AbilityTrait::Combat) && !in_combat {
            return deny(&entity, format!("{} can only be used in combat.", ability.name));
        }
        if ability.has_trait(AbilityTrait::NoCombat) && in_combat {
            return deny(&entity, format!("{} cannot be used in combat.", ability.name));
        }

        if ability.kind == AbilityKind::Skill && ability.has_trait(AbilityTrait::Shield) {
            if let Some(c) = character {
                if !self.equipment.has_shield_equipped(c) {
                    return deny(&entity, format!("{} requires a shield equipped.", ability.name));
                }
            }
        }

        let combatant = character.and_then(|c| self.combat.combatant_for_character(c));
        if let Some(combatant) = combatant {
            if ability.kind == AbilityKind::Spell && combatant.has_status_flag(StatusFlag::Silenced) {
                return deny(&entity, "You are silenced and cannot cast spells!".to_string());
            }
            if consume_stun(ability, combatant.as_ref()) {
                return deny(
                    &entity,
                    format!(
                        "You are stunned and cannot {} {}!",
                        ability.kind.verb(),
                        ability.name
                    ),
                );
            }
        }

        CheckResult::Passed
    }

    /// Mobile check; the caller supplies combat state directly
    ///
    /// Status flags are only consulted when the host exposes a combatant for
    /// the mobile.
    pub fn check_mobile_and_consume_stun<'a>(
        &self,
        mobile: MobileId,
        ability: impl Into<AbilityRequest<'a>>,
        in_combat: bool,
    ) -> CheckResult {
        let request = ability.into();
        let entity = EntityRef::mobile(mobile);
        let Some(ability) = request.descriptor() else {
            return deny(&entity, format!("Invalid {}.", request.kind().noun()));
        };

        if self.cooldowns.is_active(&entity, ability.kind, ability.id) {
            return deny(&entity, "On cooldown.".to_string());
        }
        if ability.has_trait(AbilityTrait::Combat) && !in_combat {
            return deny(&entity, "Combat only.".to_string());
        }
        if ability.has_trait(AbilityTrait::NoCombat) && in_combat {
            return deny(&entity, "No combat.".to_string());
        }

        if let Some(combatant) = self.combat.combatant_for_mobile(mobile) {
            if ability.kind == AbilityKind::Spell && combatant.has_status_flag(StatusFlag::Silenced) {
                return deny(&entity, "Silenced.".to_string());
            }
            if consume_stun(ability, combatant.as_ref()) {
                return deny(&entity, "Stunned.".to_string());
            }
        }

        CheckResult::Passed
    }

    /// Start the ability's cooldown, if it has one
    ///
    /// Kept apart from the checks: the cooldown applies after any executed
    /// attempt, including ones whose effect fizzles.
    pub fn apply_cooldown(&self, entity: &EntityRef, ability: &AbilityDescriptor) {
        if !ability.has_cooldown() {
            return;
        }
        self.cooldowns
            .set(entity, ability.kind, ability.id, ability.cooldown_seconds);
        tracing::debug!(
            "{} cooldown on {} for {:.1}s",
            entity,
            ability.name,
            ability.cooldown_seconds
        );
    }
}

/// Stuns only block abilities that have a cooldown; blocking removes the stun
fn consume_stun(ability: &AbilityDescriptor, combatant: &dyn Combatant) -> bool {
    if ability.has_cooldown() && combatant.is_stunned() {
        combatant.consume_stunned();
        return true;
    }
    false
}
