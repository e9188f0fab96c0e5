//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier of a skill or spell, unique within its [`AbilityKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AbilityId(pub u32);

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Persistent database id of a player character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub u32);

/// Runtime instance id of a spawned non-player actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MobileId(pub u64);

/// Ability namespace. A skill and a spell may share a numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbilityKind {
    Skill,
    Spell,
}

impl AbilityKind {
    /// Lowercase noun used in player-facing text
    pub fn noun(&self) -> &'static str {
        match self {
            AbilityKind::Skill => "skill",
            AbilityKind::Spell => "spell",
        }
    }

    /// Verb used in "cannot ___ X" messages
    pub fn verb(&self) -> &'static str {
        match self {
            AbilityKind::Skill => "use",
            AbilityKind::Spell => "cast",
        }
    }
}

impl fmt::Display for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.noun())
    }
}

/// Case-normalized player character name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of anything that can hold cooldowns
///
/// Players are keyed by name (case-insensitive), mobiles by instance id.
/// The two variants never compare equal, so a player literally named
/// "mob:5" cannot collide with mobile instance 5.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Player(PlayerName),
    Mobile(MobileId),
}

impl EntityRef {
    pub fn player(name: &str) -> Self {
        EntityRef::Player(PlayerName::new(name))
    }

    pub fn mobile(id: MobileId) -> Self {
        EntityRef::Mobile(id)
    }

    pub fn is_player(&self) -> bool {
        matches!(self, EntityRef::Player(_))
    }
}

impl From<MobileId> for EntityRef {
    fn from(id: MobileId) -> Self {
        EntityRef::Mobile(id)
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Player(name) => write!(f, "player:{}", name),
            EntityRef::Mobile(id) => write!(f, "mobile:{}", id.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_player_names_are_case_insensitive() {
        assert_eq!(EntityRef::player("Gandalf"), EntityRef::player("gANDALF"));
        assert_eq!(EntityRef::player("  Frodo "), EntityRef::player("frodo"));
        assert_ne!(EntityRef::player("Frodo"), EntityRef::player("Sam"));
    }

    #[test]
    fn test_player_and_mobile_never_collide() {
        let player = EntityRef::player("mob:5");
        let mobile = EntityRef::mobile(MobileId(5));
        assert_ne!(player, mobile);

        let mut map: HashMap<EntityRef, &str> = HashMap::new();
        map.insert(player.clone(), "player");
        map.insert(mobile.clone(), "mobile");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&player), Some(&"player"));
    }

    #[test]
    fn test_kind_text() {
        assert_eq!(AbilityKind::Skill.noun(), "skill");
        assert_eq!(AbilityKind::Spell.verb(), "cast");
        assert_eq!(AbilityKind::Spell.to_string(), "spell");
    }
}
