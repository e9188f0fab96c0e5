//! Ability Sim - Entry Point
//!
//! Drives a short scripted fight between a player and a mobile so the
//! cooldown, gate and proficiency rules can be watched in the log.

use ability_engine::combat::{opposed, StatusFlag};
use ability_engine::core::error::Result;
use ability_engine::core::{AbilityId, AbilityKind, CharacterId, EngineConfig, EngineContext, EntityRef, MobileId};
use ability_engine::execution::apply_effects_to_self;
use ability_engine::memory::{
    InMemoryCombatState, InMemoryEffectRegistry, InMemoryEquipment, InMemoryProficiencyStore, StaticCatalog,
};
use ability_engine::skills::{proficiency_display, AbilityCatalog, AbilityRequest, ProficiencyRecord, ProficiencyStore};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

const BUILTIN_CATALOG: &str = r#"
[[ability]]
kind = "skill"
id = 7
name = "Kick"
cooldown_seconds = 5.0
traits = ["COMBAT"]
progression = "TRIVIAL"

[[ability]]
kind = "skill"
id = 3
name = "Shield Bash"
cooldown_seconds = 8.0
traits = ["COMBAT", "SHIELD"]
progression = "HARD"

[[ability]]
kind = "spell"
id = 7
name = "Armor"
traits = ["NOCOMBAT"]
progression = "EASY"
effect_ids = ["armor"]

[[ability]]
kind = "skill"
id = 11
name = "Bite"
cooldown_seconds = 2.0
"#;

/// Ability Sim - scripted player vs mobile rounds
#[derive(Parser, Debug)]
#[command(name = "ability-sim")]
#[command(about = "Run a scripted fight and log cooldowns, gate denials and proficiency growth")]
struct Args {
    /// Engine config (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ability catalog (TOML); a small built-in catalog is used otherwise
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Random seed for deterministic runs (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of combat rounds, one cooldown tick each
    #[arg(long, default_value_t = 40)]
    rounds: u32,

    /// Player level
    #[arg(long, default_value_t = 10)]
    hero_level: i32,

    /// Mobile level
    #[arg(long, default_value_t = 11)]
    mob_level: i32,

    /// Let the background ticker decay cooldowns in real time
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ability_engine=debug".into()),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let seed = args.seed.or(config.rng_seed).unwrap_or_else(rand::random);
    let catalog = match &args.catalog {
        Some(path) => StaticCatalog::load(path)?,
        None => StaticCatalog::from_toml_str(BUILTIN_CATALOG)?,
    };
    tracing::info!("Ability sim starting (seed {}, {} abilities)", seed, catalog.len());

    let ctx = EngineContext::new(config);
    let combat = Arc::new(InMemoryCombatState::new());
    let equipment = Arc::new(InMemoryEquipment::new());
    let store = Arc::new(InMemoryProficiencyStore::new());
    let effects = InMemoryEffectRegistry::new().with_definition("armor", "Armor");
    let executor = ctx.executor(combat.clone(), equipment.clone(), store.clone());

    let mut combat_rng = ChaCha8Rng::seed_from_u64(seed);
    let mut growth_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));

    let hero_name = "Aldric";
    let hero = CharacterId(1);
    let mob = MobileId(1001);

    let kick = catalog.lookup(AbilityKind::Skill, AbilityId(7));
    let bash = catalog.lookup(AbilityKind::Skill, AbilityId(3));
    let armor = catalog.lookup(AbilityKind::Spell, AbilityId(7));
    let bite = catalog.lookup(AbilityKind::Skill, AbilityId(11));

    let mut kick_record = kick.as_deref().map(|k| ProficiencyRecord::learned(hero, k));
    let mut bash_record = bash.as_deref().map(|b| ProficiencyRecord::learned(hero, b));
    for record in kick_record.iter().chain(bash_record.iter()) {
        store.insert(record);
    }

    // Buff up before the fight
    let armor_request = AbilityRequest::new(AbilityKind::Spell, armor.as_deref());
    let armored = executor.execute_player(hero_name, Some(hero), armor_request, None, || true);
    if let (true, Some(armor)) = (armored.executed, armor.as_deref()) {
        let outcome = apply_effects_to_self(&effects, armor, hero, 100);
        println!("{} casts {}: {}", hero_name, armor.name, outcome.summary().unwrap_or_default());
    }

    let hero_combatant = combat.enter_combat(hero);
    let mob_combatant = combat.track_mobile(mob);

    let runtime = if args.realtime { Some(Runtime::new()?) } else { None };
    let ticker = runtime
        .as_ref()
        .map(|rt| {
            let _guard = rt.enter();
            ctx.spawn_ticker()
        })
        .transpose()?;

    for round in 1..=args.rounds {
        if round == 3 {
            hero_combatant.add_flag(StatusFlag::Stunned);
            println!("[round {}] {} is stunned!", round, hero_name);
        }
        if round == 12 {
            equipment.set_shield(hero, true);
            println!("[round {}] {} straps on a shield", round, hero_name);
        }
        if round == 20 {
            mob_combatant.add_flag(StatusFlag::Stunned);
        }

        for (ability, record) in [(&kick, &mut kick_record), (&bash, &mut bash_record)] {
            let proficiency = record.as_ref().map_or(0, |r| r.proficiency()) as i32;
            let request = AbilityRequest::new(AbilityKind::Skill, ability.as_deref());
            let result = executor.execute_player_with_rng(
                hero_name,
                Some(hero),
                request,
                record.as_mut(),
                || opposed::check_with_proficiency_with_rng(&mut combat_rng, args.hero_level, args.mob_level, proficiency),
                &mut growth_rng,
            );

            if let Some(reason) = &result.pre_check_failure {
                println!("[round {}] {}", round, reason);
                continue;
            }
            let name = ability.as_deref().map_or("?", |a| a.name.as_str());
            println!(
                "[round {}] {} uses {}: {}",
                round,
                hero_name,
                name,
                if result.succeeded { "hit" } else { "miss" }
            );
            if let Some(message) = result.proficiency_message() {
                println!("[round {}] {}", round, message);
            }
        }

        let bite_request = AbilityRequest::new(AbilityKind::Skill, bite.as_deref());
        if executor.execute_mobile(mob, bite_request, true, || opposed::check_with_rng(&mut combat_rng, args.mob_level, args.hero_level)) {
            println!("[round {}] the mobile bites", round);
        }

        match &runtime {
            Some(_) => std::thread::sleep(ctx.config.tick_interval()),
            None => ctx.cooldowns.tick(ctx.config.tick_delta_seconds()),
        }
    }

    if let Some(ticker) = ticker {
        ticker.stop();
    }

    println!();
    println!("=== {} ===", hero_name);
    for record in kick_record.iter().chain(bash_record.iter()) {
        let stored = store
            .get(record.character, record.kind, record.ability_id)
            .map_or(0, |r| r.proficiency());
        let name = catalog
            .lookup(record.kind, record.ability_id)
            .map_or_else(|| record.ability_id.to_string(), |a| a.name.clone());
        println!("  {:<12} {} (stored {}%)", name, proficiency_display(record.proficiency()), stored);
    }
    for cooldown in ctx.cooldowns.snapshot(&EntityRef::player(hero_name)) {
        println!(
            "  {} {} still cooling: {:.1}s",
            cooldown.kind(),
            cooldown.ability_id(),
            cooldown.remaining_seconds()
        );
    }

    Ok(())
}
