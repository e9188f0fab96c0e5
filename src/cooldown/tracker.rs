//! Per-entity cooldown storage with tick-quantized decay
//!
//! Each entity owns a bucket of cooldowns keyed by ability kind and id.
//! Buckets live inside a sharded concurrent map and are only ever touched
//! while their shard lock is held, so the ticker pruning an empty bucket
//! cannot lose an insert racing into that same bucket.

use crate::core::types::{AbilityId, AbilityKind, EntityRef};
use ahash::AHashMap;
use dashmap::DashMap;

/// Bucket key: a skill and a spell sharing a numeric id stay distinct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CooldownKey {
    pub kind: AbilityKind,
    pub ability_id: AbilityId,
}

impl CooldownKey {
    pub fn new(kind: AbilityKind, ability_id: AbilityId) -> Self {
        Self { kind, ability_id }
    }
}

/// A single ability countdown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    kind: AbilityKind,
    ability_id: AbilityId,
    remaining_seconds: f64,
}

impl Cooldown {
    pub fn new(kind: AbilityKind, ability_id: AbilityId, remaining_seconds: f64) -> Self {
        Self {
            kind,
            ability_id,
            remaining_seconds: remaining_seconds.max(0.0),
        }
    }

    pub fn kind(&self) -> AbilityKind {
        self.kind
    }

    pub fn ability_id(&self) -> AbilityId {
        self.ability_id
    }

    pub fn key(&self) -> CooldownKey {
        CooldownKey::new(self.kind, self.ability_id)
    }

    pub fn remaining_seconds(&self) -> f64 {
        self.remaining_seconds
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_seconds <= 0.0
    }

    /// Decrement by one tick; returns true once expired
    fn tick(&mut self, delta_seconds: f64) -> bool {
        self.remaining_seconds = (self.remaining_seconds - delta_seconds).max(0.0);
        self.is_expired()
    }
}

type Bucket = AHashMap<CooldownKey, Cooldown>;

/// Process-lifetime cooldown state for players and mobiles
#[derive(Debug, Default)]
pub struct CooldownTracker {
    entities: DashMap<EntityRef, Bucket, ahash::RandomState>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a cooldown
    ///
    /// Durations of zero or less, and NaN, mean "no cooldown" and leave any
    /// existing entry untouched.
    pub fn set(
        &self,
        entity: &EntityRef,
        kind: AbilityKind,
        ability_id: AbilityId,
        duration_seconds: f64,
    ) {
        if !(duration_seconds > 0.0) {
            return;
        }
        let cooldown = Cooldown::new(kind, ability_id, duration_seconds);
        self.entities
            .entry(entity.clone())
            .or_default()
            .insert(cooldown.key(), cooldown);
    }

    pub fn is_active(&self, entity: &EntityRef, kind: AbilityKind, ability_id: AbilityId) -> bool {
        let key = CooldownKey::new(kind, ability_id);
        self.entities.get(entity).map_or(false, |bucket| {
            bucket.get(&key).map_or(false, |cd| !cd.is_expired())
        })
    }

    /// Remaining seconds, or 0.0 when the ability is ready
    pub fn remaining(&self, entity: &EntityRef, kind: AbilityKind, ability_id: AbilityId) -> f64 {
        let key = CooldownKey::new(kind, ability_id);
        self.entities
            .get(entity)
            .and_then(|bucket| bucket.get(&key).map(Cooldown::remaining_seconds))
            .unwrap_or(0.0)
    }

    pub fn clear(&self, entity: &EntityRef, kind: AbilityKind, ability_id: AbilityId) {
        let key = CooldownKey::new(kind, ability_id);
        if let Some(mut bucket) = self.entities.get_mut(entity) {
            bucket.remove(&key);
        }
        self.entities.remove_if(entity, |_, bucket| bucket.is_empty());
    }

    /// Drop every cooldown for an entity (logout, despawn, admin reset)
    pub fn clear_all(&self, entity: &EntityRef) {
        self.entities.remove(entity);
    }

    /// Advance every cooldown by one fixed tick
    ///
    /// Expired cooldowns and emptied buckets are removed in the same pass.
    pub fn tick(&self, delta_seconds: f64) {
        self.entities.retain(|_, bucket| {
            bucket.retain(|_, cd| !cd.tick(delta_seconds));
            !bucket.is_empty()
        });
    }

    /// Live cooldowns for one entity, ordered by kind then id
    pub fn snapshot(&self, entity: &EntityRef) -> Vec<Cooldown> {
        let mut cooldowns: Vec<Cooldown> = self
            .entities
            .get(entity)
            .map(|bucket| bucket.values().filter(|cd| !cd.is_expired()).copied().collect())
            .unwrap_or_default();
        cooldowns.sort_by_key(|cd| (cd.kind, cd.ability_id));
        cooldowns
    }

    pub fn tracked_entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn total_active_cooldowns(&self) -> usize {
        self.entities.iter().map(|bucket| bucket.value().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MobileId;
    use std::sync::Arc;
    use std::thread;

    const KICK: AbilityId = AbilityId(7);

    fn alice() -> EntityRef {
        EntityRef::player("Alice")
    }

    #[test]
    fn test_set_marks_active() {
        let tracker = CooldownTracker::new();
        tracker.set(&alice(), AbilityKind::Skill, KICK, 5.0);

        assert!(tracker.is_active(&alice(), AbilityKind::Skill, KICK));
        assert_eq!(tracker.remaining(&alice(), AbilityKind::Skill, KICK), 5.0);
        // Same id in the other namespace is unaffected
        assert!(!tracker.is_active(&alice(), AbilityKind::Spell, KICK));
    }

    #[test]
    fn test_lookup_ignores_name_case() {
        let tracker = CooldownTracker::new();
        tracker.set(&EntityRef::player("ALICE"), AbilityKind::Skill, KICK, 3.0);
        assert!(tracker.is_active(&EntityRef::player("alice"), AbilityKind::Skill, KICK));
    }

    #[test]
    fn test_non_positive_duration_is_noop() {
        let tracker = CooldownTracker::new();
        tracker.set(&alice(), AbilityKind::Skill, KICK, 0.0);
        tracker.set(&alice(), AbilityKind::Skill, KICK, -2.0);
        tracker.set(&alice(), AbilityKind::Skill, KICK, f64::NAN);
        assert!(!tracker.is_active(&alice(), AbilityKind::Skill, KICK));
        assert_eq!(tracker.tracked_entity_count(), 0);

        // Prior state survives a zero-duration set
        tracker.set(&alice(), AbilityKind::Skill, KICK, 4.0);
        tracker.set(&alice(), AbilityKind::Skill, KICK, 0.0);
        assert_eq!(tracker.remaining(&alice(), AbilityKind::Skill, KICK), 4.0);
    }

    #[test]
    fn test_set_replaces_existing() {
        let tracker = CooldownTracker::new();
        tracker.set(&alice(), AbilityKind::Skill, KICK, 10.0);
        tracker.set(&alice(), AbilityKind::Skill, KICK, 2.0);
        assert_eq!(tracker.remaining(&alice(), AbilityKind::Skill, KICK), 2.0);
        assert_eq!(tracker.total_active_cooldowns(), 1);
    }

    #[test]
    fn test_tick_expires_and_prunes_bucket() {
        let tracker = CooldownTracker::new();
        tracker.set(&alice(), AbilityKind::Skill, KICK, 1.0);

        tracker.tick(0.5);
        assert!(tracker.is_active(&alice(), AbilityKind::Skill, KICK));
        assert_eq!(tracker.remaining(&alice(), AbilityKind::Skill, KICK), 0.5);

        tracker.tick(0.5);
        assert!(!tracker.is_active(&alice(), AbilityKind::Skill, KICK));
        assert_eq!(tracker.remaining(&alice(), AbilityKind::Skill, KICK), 0.0);
        assert_eq!(tracker.tracked_entity_count(), 0);
    }

    #[test]
    fn test_oversized_tick_never_goes_negative() {
        let tracker = CooldownTracker::new();
        tracker.set(&alice(), AbilityKind::Spell, KICK, 0.2);
        tracker.set(&alice(), AbilityKind::Skill, KICK, 30.0);
        tracker.tick(5.0);

        assert_eq!(tracker.remaining(&alice(), AbilityKind::Spell, KICK), 0.0);
        assert_eq!(tracker.remaining(&alice(), AbilityKind::Skill, KICK), 25.0);
    }

    #[test]
    fn test_clear_single_and_all() {
        let tracker = CooldownTracker::new();
        let mob = EntityRef::mobile(MobileId(12));
        tracker.set(&mob, AbilityKind::Skill, AbilityId(1), 5.0);
        tracker.set(&mob, AbilityKind::Spell, AbilityId(2), 5.0);

        tracker.clear(&mob, AbilityKind::Skill, AbilityId(1));
        assert!(!tracker.is_active(&mob, AbilityKind::Skill, AbilityId(1)));
        assert!(tracker.is_active(&mob, AbilityKind::Spell, AbilityId(2)));

        tracker.clear(&mob, AbilityKind::Spell, AbilityId(2));
        assert_eq!(tracker.tracked_entity_count(), 0);

        tracker.set(&mob, AbilityKind::Skill, AbilityId(1), 5.0);
        tracker.set(&alice(), AbilityKind::Skill, AbilityId(1), 5.0);
        tracker.clear_all(&mob);
        assert!(!tracker.is_active(&mob, AbilityKind::Skill, AbilityId(1)));
        assert!(tracker.is_active(&alice(), AbilityKind::Skill, AbilityId(1)));
    }

    #[test]
    fn test_snapshot_is_ordered() {
        let tracker = CooldownTracker::new();
        tracker.set(&alice(), AbilityKind::Spell, AbilityId(3), 1.0);
        tracker.set(&alice(), AbilityKind::Skill, AbilityId(9), 1.0);
        tracker.set(&alice(), AbilityKind::Skill, AbilityId(2), 1.0);

        let keys: Vec<_> = tracker.snapshot(&alice()).iter().map(Cooldown::key).collect();
        assert_eq!(
            keys,
            vec![
                CooldownKey::new(AbilityKind::Skill, AbilityId(2)),
                CooldownKey::new(AbilityKind::Skill, AbilityId(9)),
                CooldownKey::new(AbilityKind::Spell, AbilityId(3)),
            ]
        );
    }

    #[test]
    fn test_concurrent_set_and_tick() {
        let tracker = Arc::new(CooldownTracker::new());
        let mut handles = Vec::new();

        for worker in 0..4u64 {
            let tracker = Arc::clone(&tracker);
            handles.push(thread::spawn(move || {
                let entity = EntityRef::mobile(MobileId(worker));
                for i in 0..500u32 {
                    tracker.set(&entity, AbilityKind::Skill, AbilityId(i % 8), 1.0);
                    let remaining = tracker.remaining(&entity, AbilityKind::Skill, AbilityId(i % 8));
                    assert!(remaining >= 0.0);
                    assert!(remaining <= 1.0);
                }
            }));
        }

        let ticker = {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || {
                for _ in 0..200 {
                    tracker.tick(0.1);
                }
            })
        };

        for handle in handles {
            handle.join().unwrap();
        }
        ticker.join().unwrap();

        // Drain whatever is left
        for _ in 0..20 {
            tracker.tick(0.1);
        }
        assert_eq!(tracker.tracked_entity_count(), 0);
        assert_eq!(tracker.total_active_cooldowns(), 0);
    }
}
