//! Combat state consumed by the precondition gate
//!
//! The combat turn engine itself lives elsewhere; this module only names
//! what the gate needs to ask of it.

use crate::core::types::{CharacterId, MobileId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Temporary combat conditions carried by a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusFlag {
    /// Next attack is cancelled
    Interrupted,
    /// Cannot move
    Rooted,
    /// Blocks the next cooldown-bearing ability attempt, then wears off
    Stunned,
    /// Reduced attack speed
    Slowed,
    /// Cannot cast spells
    Silenced,
    /// Cannot use weapon attacks
    Disarmed,
    /// Reduced accuracy
    Blinded,
    /// May attack allies
    Confused,
}

/// A participant in an active fight
#[cfg_attr(test, mockall::automock)]
pub trait Combatant: Send + Sync {
    fn has_status_flag(&self, flag: StatusFlag) -> bool;

    /// Remove the stun if present; returns whether it was present
    fn consume_stunned(&self) -> bool;

    fn is_stunned(&self) -> bool {
        self.has_status_flag(StatusFlag::Stunned)
    }
}

/// Host-side view of who is fighting
#[cfg_attr(test, mockall::automock)]
pub trait CombatState: Send + Sync {
    fn is_in_combat(&self, character: CharacterId) -> bool;

    fn combatant_for_character(&self, character: CharacterId) -> Option<Arc<dyn Combatant>>;

    /// Mobiles usually have no status tracking outside the fight loop
    fn combatant_for_mobile(&self, _mobile: MobileId) -> Option<Arc<dyn Combatant>> {
        None
    }
}

/// Equipment lookup for shield-requiring skills
#[cfg_attr(test, mockall::automock)]
pub trait EquipmentProvider: Send + Sync {
    /// Whether a shield sits in the off-hand slot
    fn has_shield_equipped(&self, character: CharacterId) -> bool;
}
