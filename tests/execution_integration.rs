//! End-to-end tests for the executor: gate, logic, cooldown and growth

use ability_engine::core::{AbilityId, AbilityKind, CharacterId, EngineContext, EntityRef, MobileId};
use ability_engine::execution::{apply_effects_to_self, AbilityExecutor};
use ability_engine::memory::{
    InMemoryCombatState, InMemoryEffectRegistry, InMemoryEquipment, InMemoryProficiencyStore, StaticCatalog,
};
use ability_engine::skills::{
    AbilityCatalog, AbilityDescriptor, AbilityRequest, AbilityTrait, ProficiencyRecord, ProficiencyStore,
    SkillProgression,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

const HERO: CharacterId = CharacterId(1);

struct World {
    ctx: EngineContext,
    combat: Arc<InMemoryCombatState>,
    store: Arc<InMemoryProficiencyStore>,
    executor: AbilityExecutor,
}

fn world() -> World {
    let ctx = EngineContext::default();
    let combat = Arc::new(InMemoryCombatState::new());
    let equipment = Arc::new(InMemoryEquipment::new());
    let store = Arc::new(InMemoryProficiencyStore::new());
    let executor = ctx.executor(combat.clone(), equipment, store.clone());
    World {
        ctx,
        combat,
        store,
        executor,
    }
}

#[test]
fn test_kick_cooldown_expires_on_tenth_tick() {
    let w = world();
    let kick = AbilityDescriptor::skill(7, "Kick").with_cooldown(5.0);
    let hero = EntityRef::player("Hero");
    let delta = w.ctx.config.tick_delta_seconds();

    let result = w.executor.execute_player("Hero", Some(HERO), &kick, None, || true);
    assert!(result.executed);
    assert!(w.ctx.cooldowns.is_active(&hero, AbilityKind::Skill, AbilityId(7)));

    for _ in 0..9 {
        w.ctx.cooldowns.tick(delta);
    }
    assert!(w.ctx.cooldowns.is_active(&hero, AbilityKind::Skill, AbilityId(7)));
    assert_eq!(w.ctx.cooldowns.remaining(&hero, AbilityKind::Skill, AbilityId(7)), 0.5);

    w.ctx.cooldowns.tick(delta);
    assert!(!w.ctx.cooldowns.is_active(&hero, AbilityKind::Skill, AbilityId(7)));

    let again = w.executor.execute_player("Hero", Some(HERO), &kick, None, || true);
    assert!(again.executed);
}

#[test]
fn test_fizzled_spell_consumes_cooldown() {
    let w = world();
    let fireball = AbilityDescriptor::spell(4, "Fireball").with_cooldown(3.0);

    let result = w.executor.execute_player("Hero", Some(HERO), &fireball, None, || false);

    assert!(result.executed);
    assert!(!result.succeeded);
    assert!(w
        .ctx
        .cooldowns
        .is_active(&EntityRef::player("HERO"), AbilityKind::Spell, AbilityId(4)));
}

#[test]
fn test_instant_ability_stays_mastered() {
    let w = world();
    let parry = AbilityDescriptor::skill(5, "Parry").with_progression(SkillProgression::Instant);
    let mut record = ProficiencyRecord::learned(HERO, &parry);
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..1000 {
        let result = w
            .executor
            .execute_player_with_rng("Hero", Some(HERO), &parry, Some(&mut record), || true, &mut rng);
        assert!(result.executed);
        assert!(!result.proficiency_improved());
        assert_eq!(record.proficiency(), 100);
    }
    assert!(w.store.is_empty());
}

#[test]
fn test_growth_is_persisted() {
    let w = world();
    let jab = AbilityDescriptor::skill(2, "Jab").with_progression(SkillProgression::Trivial);
    let mut record = ProficiencyRecord::learned(HERO, &jab);
    w.store.insert(&record);
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    let mut gains = 0;
    for _ in 0..300 {
        let result = w
            .executor
            .execute_player_with_rng("Hero", Some(HERO), &jab, Some(&mut record), || true, &mut rng);
        if let Some(delta) = result.proficiency_delta() {
            assert!(delta.new == delta.old || delta.new == delta.old + 1);
            if delta.new > delta.old {
                gains += 1;
            }
        }
    }

    assert!(gains > 0);
    assert_eq!(record.proficiency(), 1 + gains);
    let stored = w.store.get(HERO, AbilityKind::Skill, AbilityId(2)).map(|r| r.proficiency());
    assert_eq!(stored, Some(record.proficiency()));
}

#[test]
fn test_rejected_write_is_best_effort() {
    let w = world();
    w.store.set_reject_writes(true);
    let jab = AbilityDescriptor::skill(2, "Jab").with_progression(SkillProgression::Trivial);
    let mut record = ProficiencyRecord::learned(HERO, &jab);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let mut improved = false;
    for _ in 0..300 {
        let result = w
            .executor
            .execute_player_with_rng("Hero", Some(HERO), &jab, Some(&mut record), || true, &mut rng);
        improved |= result.proficiency_improved();
    }

    assert!(improved);
    assert!(record.proficiency() > 1);
    assert!(w.store.get(HERO, AbilityKind::Skill, AbilityId(2)).is_none());
}

#[test]
fn test_blocked_attempt_has_no_side_effects() {
    let w = world();
    let rescue = AbilityDescriptor::skill(8, "Rescue")
        .with_cooldown(4.0)
        .with_trait(AbilityTrait::Combat)
        .with_progression(SkillProgression::Trivial);
    let mut record = ProficiencyRecord::learned(HERO, &rescue);

    let result = w
        .executor
        .execute_player("Hero", Some(HERO), &rescue, Some(&mut record), || panic!("must not run"));

    assert!(!result.executed);
    assert_eq!(
        result.pre_check_failure.as_deref(),
        Some("Rescue can only be used in combat.")
    );
    assert_eq!(result.proficiency, None);
    assert_eq!(w.ctx.cooldowns.total_active_cooldowns(), 0);
    assert_eq!(record.proficiency(), 1);

    w.combat.enter_combat(HERO);
    assert!(w.executor.execute_player("Hero", Some(HERO), &rescue, None, || true).executed);
}

#[test]
fn test_mobile_has_no_proficiency_but_gets_cooldown() {
    let w = world();
    let bite = AbilityDescriptor::skill(11, "Bite").with_cooldown(2.0);
    let wolf = MobileId(12);

    assert!(w.executor.execute_mobile(wolf, &bite, true, || true));
    assert!(!w.executor.execute_mobile(wolf, &bite, true, || true));
    assert!(w.store.is_empty());

    w.ctx.cooldowns.tick(2.0);
    assert!(w.executor.execute_mobile(wolf, &bite, true, || false));
}

#[test]
fn test_catalog_driven_cast_with_effects() {
    let w = world();
    let catalog = StaticCatalog::from_toml_str(
        r#"
        [[ability]]
        kind = "spell"
        id = 20
        name = "Bless"
        cooldown_seconds = 10.0
        traits = ["NOCOMBAT"]
        effect_ids = ["bless"]
        "#,
    )
    .unwrap();
    let registry = InMemoryEffectRegistry::new().with_definition("bless", "Blessed");

    let bless = catalog.lookup(AbilityKind::Spell, AbilityId(20));
    let request = AbilityRequest::new(AbilityKind::Spell, bless.as_deref());
    let result = w.executor.execute_player("Hero", Some(HERO), request, None, || true);
    assert!(result.executed);

    let outcome = bless
        .as_deref()
        .map(|b| apply_effects_to_self(&registry, b, HERO, 55))
        .unwrap_or_default();
    assert_eq!(outcome.summary().as_deref(), Some("Blessed"));
    assert_eq!(registry.active_on(HERO).len(), 1);

    let missing = catalog.lookup(AbilityKind::Spell, AbilityId(21));
    let request = AbilityRequest::new(AbilityKind::Spell, missing.as_deref());
    let result = w.executor.execute_player("Hero", Some(HERO), request, None, || true);
    assert_eq!(result.pre_check_failure.as_deref(), Some("Invalid spell."));
}

#[test]
fn test_record_use_for_hand_rolled_flows() {
    let w = world();
    let backstab = AbilityDescriptor::skill(30, "Backstab")
        .with_cooldown(6.0)
        .with_progression(SkillProgression::Instant);
    let mut record = ProficiencyRecord::learned(HERO, &backstab);

    let outcome = w.executor.record_use("Hero", &backstab, Some(&mut record), false);

    assert_eq!(outcome.map(|o| o.improved()), Some(false));
    assert_eq!(
        w.ctx
            .cooldowns
            .remaining(&EntityRef::player("Hero"), AbilityKind::Skill, AbilityId(30)),
        6.0
    );
}
