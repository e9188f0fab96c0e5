//! Combat-facing primitives: opposed level checks and the combat state the
//! ability gate reads

pub mod opposed;
pub mod status;

pub use opposed::{success_chance, success_chance_with_proficiency, CHANCE_TABLE};
pub use status::{CombatState, Combatant, EquipmentProvider, StatusFlag};
