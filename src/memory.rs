//! In-memory collaborators for the demo driver and tests
//!
//! A real host backs these with its world model and database. These keep
//! everything in concurrent maps so they can be shared across threads.

use crate::combat::status::{CombatState, Combatant, EquipmentProvider, StatusFlag};
use crate::core::error::{EngineError, Result};
use crate::core::types::{AbilityId, AbilityKind, CharacterId, MobileId};
use crate::execution::effects::{EffectInstance, EffectRegistry};
use crate::skills::definitions::{AbilityCatalog, AbilityDescriptor};
use crate::skills::proficiency::{ProficiencyRecord, ProficiencyStore};
use ahash::AHashMap;
use dashmap::{DashMap, DashSet};
use serde::Deserialize;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Catalog file layout: a list of `[[ability]]` tables
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "ability")]
    abilities: Vec<AbilityDescriptor>,
}

/// Fixed ability catalog keyed by (kind, id)
#[derive(Debug, Default)]
pub struct StaticCatalog {
    abilities: AHashMap<(AbilityKind, AbilityId), Arc<AbilityDescriptor>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(descriptors: impl IntoIterator<Item = AbilityDescriptor>) -> Result<Self> {
        let mut catalog = Self::new();
        for descriptor in descriptors {
            catalog.insert(descriptor)?;
        }
        Ok(catalog)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::from_descriptors(file.abilities)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&content)?;
        tracing::info!("Loaded {} abilities from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Skills and spells may share an id; the same kind may not
    pub fn insert(&mut self, descriptor: AbilityDescriptor) -> Result<()> {
        let key = (descriptor.kind, descriptor.id);
        if self.abilities.contains_key(&key) {
            return Err(EngineError::DuplicateAbility {
                kind: descriptor.kind,
                id: descriptor.id,
            });
        }
        self.abilities.insert(key, Arc::new(descriptor));
        Ok(())
    }

    /// Case-insensitive lookup by display name
    pub fn find_by_name(&self, kind: AbilityKind, name: &str) -> Option<Arc<AbilityDescriptor>> {
        self.abilities
            .values()
            .find(|d| d.kind == kind && d.name.eq_ignore_ascii_case(name.trim()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

impl AbilityCatalog for StaticCatalog {
    fn lookup(&self, kind: AbilityKind, id: AbilityId) -> Option<Arc<AbilityDescriptor>> {
        self.abilities.get(&(kind, id)).cloned()
    }
}

/// Combatant whose status flags can be set from any thread
#[derive(Debug, Default)]
pub struct SharedCombatant {
    flags: DashSet<StatusFlag>,
}

impl SharedCombatant {
    pub fn with_flags(flags: &[StatusFlag]) -> Self {
        let combatant = Self::default();
        for flag in flags {
            combatant.add_flag(*flag);
        }
        combatant
    }

    pub fn add_flag(&self, flag: StatusFlag) {
        self.flags.insert(flag);
    }

    pub fn remove_flag(&self, flag: StatusFlag) -> bool {
        self.flags.remove(&flag).is_some()
    }
}

impl Combatant for SharedCombatant {
    fn has_status_flag(&self, flag: StatusFlag) -> bool {
        self.flags.contains(&flag)
    }

    fn consume_stunned(&self) -> bool {
        self.remove_flag(StatusFlag::Stunned)
    }
}

/// Who is fighting, and their combatant state
#[derive(Debug, Default)]
pub struct InMemoryCombatState {
    characters: DashMap<CharacterId, Arc<SharedCombatant>>,
    mobiles: DashMap<MobileId, Arc<SharedCombatant>>,
}

impl InMemoryCombatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a character into combat; returns its combatant (existing or new)
    pub fn enter_combat(&self, character: CharacterId) -> Arc<SharedCombatant> {
        Arc::clone(&self.characters.entry(character).or_default())
    }

    pub fn leave_combat(&self, character: CharacterId) {
        self.characters.remove(&character);
    }

    /// Start tracking status flags for a mobile
    pub fn track_mobile(&self, mobile: MobileId) -> Arc<SharedCombatant> {
        Arc::clone(&self.mobiles.entry(mobile).or_default())
    }

    pub fn untrack_mobile(&self, mobile: MobileId) {
        self.mobiles.remove(&mobile);
    }
}

impl CombatState for InMemoryCombatState {
    fn is_in_combat(&self, character: CharacterId) -> bool {
        self.characters.contains_key(&character)
    }

    fn combatant_for_character(&self, character: CharacterId) -> Option<Arc<dyn Combatant>> {
        self.characters
            .get(&character)
            .map(|c| Arc::clone(c.value()) as Arc<dyn Combatant>)
    }

    fn combatant_for_mobile(&self, mobile: MobileId) -> Option<Arc<dyn Combatant>> {
        self.mobiles
            .get(&mobile)
            .map(|c| Arc::clone(c.value()) as Arc<dyn Combatant>)
    }
}

/// Tracks which characters hold a shield
#[derive(Debug, Default)]
pub struct InMemoryEquipment {
    shields: DashSet<CharacterId>,
}

impl InMemoryEquipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_shield(&self, character: CharacterId, equipped: bool) {
        if equipped {
            self.shields.insert(character);
        } else {
            self.shields.remove(&character);
        }
    }
}

impl EquipmentProvider for InMemoryEquipment {
    fn has_shield_equipped(&self, character: CharacterId) -> bool {
        self.shields.contains(&character)
    }
}

/// Proficiency table; writes can be made to fail to exercise best-effort saves
#[derive(Debug, Default)]
pub struct InMemoryProficiencyStore {
    records: DashMap<(CharacterId, AbilityKind, AbilityId), u8>,
    reject_writes: AtomicBool,
}

impl InMemoryProficiencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: &ProficiencyRecord) {
        self.records.insert(
            (record.character, record.kind, record.ability_id),
            record.proficiency(),
        );
    }

    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ProficiencyStore for InMemoryProficiencyStore {
    fn get(&self, character: CharacterId, kind: AbilityKind, ability_id: AbilityId) -> Option<ProficiencyRecord> {
        self.records
            .get(&(character, kind, ability_id))
            .map(|p| ProficiencyRecord::new(character, kind, ability_id, *p))
    }

    fn set(&self, character: CharacterId, kind: AbilityKind, ability_id: AbilityId, proficiency: u8) -> bool {
        if self.reject_writes.load(Ordering::Relaxed) {
            return false;
        }
        self.records.insert((character, kind, ability_id), proficiency);
        true
    }
}

/// Effect definitions by id, plus the instances applied so far
#[derive(Debug, Default)]
pub struct InMemoryEffectRegistry {
    names: AHashMap<String, String>,
    refused: DashSet<String>,
    active: DashMap<Uuid, EffectInstance>,
}

impl InMemoryEffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definition(mut self, effect_id: impl Into<String>, name: impl Into<String>) -> Self {
        self.names.insert(effect_id.into(), name.into());
        self
    }

    /// Known effect that nonetheless fails to apply (immune target and the like)
    pub fn refuse(&self, effect_id: impl Into<String>) {
        self.refused.insert(effect_id.into());
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn active_on(&self, target: CharacterId) -> Vec<EffectInstance> {
        self.active
            .iter()
            .filter(|e| e.target == target)
            .map(|e| e.value().clone())
            .collect()
    }
}

impl EffectRegistry for InMemoryEffectRegistry {
    fn definition_name(&self, effect_id: &str) -> Option<String> {
        self.names.get(effect_id).cloned()
    }

    fn apply(
        &self,
        effect_id: &str,
        caster: CharacterId,
        target: CharacterId,
        _params: &AHashMap<String, String>,
    ) -> Option<EffectInstance> {
        if !self.names.contains_key(effect_id) || self.refused.contains(effect_id) {
            return None;
        }
        let instance = EffectInstance::new(effect_id, caster, target);
        self.active.insert(instance.id, instance.clone());
        Some(instance)
    }
}
