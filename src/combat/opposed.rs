//! Opposed level checks
//!
//! Compares an initiator's level with a defender's and yields a success
//! chance. Aggro AI and contested skills depend on the exact table values,
//! so they are spelled out rather than derived.
//!
//! - Equal level: 50%
//! - Each level above: halves the remaining gap to 100%, capped at +5
//! - Each level below: halves the chance, reaching 0% at -5

use rand::Rng;

/// Largest level difference the table distinguishes
pub const MAX_LEVEL_DIFF: i32 = 5;

/// Success chance indexed by level difference (index 0 = -5, index 10 = +5)
pub const CHANCE_TABLE: [f64; 11] = [
    0.0,     // -5
    0.03125, // -4
    0.0625,  // -3
    0.125,   // -2
    0.25,    // -1
    0.5,     //  0
    0.75,    // +1
    0.875,   // +2
    0.9375,  // +3
    0.96875, // +4
    1.0,     // +5
];

/// Base success chance (0.0 to 1.0) for an opposed check
pub fn success_chance(attacker_level: i32, defender_level: i32) -> f64 {
    let diff = attacker_level
        .saturating_sub(defender_level)
        .clamp(-MAX_LEVEL_DIFF, MAX_LEVEL_DIFF);
    CHANCE_TABLE[(diff + MAX_LEVEL_DIFF) as usize]
}

/// Base chance shifted by an additive modifier (gear, status), clamped
pub fn success_chance_with_modifier(attacker_level: i32, defender_level: i32, modifier: f64) -> f64 {
    (success_chance(attacker_level, defender_level) + modifier).clamp(0.0, 1.0)
}

/// Base chance as a rounded percentage (0 to 100)
pub fn success_percent(attacker_level: i32, defender_level: i32) -> u8 {
    (success_chance(attacker_level, defender_level) * 100.0).round() as u8
}

// Proficiency scales the base chance by 0.5 + proficiency:
//   0%   -> half the base chance
//   50%  -> unchanged
//   100% -> one and a half times the base chance

/// Multiplier (0.5 to 1.5) for an integer proficiency percentage
pub fn proficiency_multiplier(proficiency_percent: i32) -> f64 {
    0.5 + proficiency_percent.clamp(0, 100) as f64 / 100.0
}

/// Multiplier (0.5 to 1.5) for a proficiency fraction in 0.0..=1.0
pub fn proficiency_multiplier_decimal(proficiency: f64) -> f64 {
    0.5 + proficiency.clamp(0.0, 1.0)
}

/// Base chance scaled by proficiency, clamped to 0.0..=1.0
pub fn success_chance_with_proficiency(
    attacker_level: i32,
    defender_level: i32,
    proficiency_percent: i32,
) -> f64 {
    let chance = success_chance(attacker_level, defender_level)
        * proficiency_multiplier(proficiency_percent);
    chance.clamp(0.0, 1.0)
}

/// Fractional-proficiency form of [`success_chance_with_proficiency`]
pub fn success_chance_with_proficiency_decimal(
    attacker_level: i32,
    defender_level: i32,
    proficiency: f64,
) -> f64 {
    let chance = success_chance(attacker_level, defender_level)
        * proficiency_multiplier_decimal(proficiency);
    chance.clamp(0.0, 1.0)
}

pub fn success_percent_with_proficiency(
    attacker_level: i32,
    defender_level: i32,
    proficiency_percent: i32,
) -> u8 {
    (success_chance_with_proficiency(attacker_level, defender_level, proficiency_percent) * 100.0)
        .round() as u8
}

/// One uniform draw against a chance; never retried
pub fn roll<R: Rng + ?Sized>(rng: &mut R, chance: f64) -> bool {
    rng.gen::<f64>() < chance
}

pub fn check_with_rng<R: Rng + ?Sized>(rng: &mut R, attacker_level: i32, defender_level: i32) -> bool {
    roll(rng, success_chance(attacker_level, defender_level))
}

pub fn check_with_modifier_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    attacker_level: i32,
    defender_level: i32,
    modifier: f64,
) -> bool {
    roll(rng, success_chance_with_modifier(attacker_level, defender_level, modifier))
}

pub fn check_with_proficiency_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    attacker_level: i32,
    defender_level: i32,
    proficiency_percent: i32,
) -> bool {
    roll(
        rng,
        success_chance_with_proficiency(attacker_level, defender_level, proficiency_percent),
    )
}

pub fn check_with_proficiency_decimal_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    attacker_level: i32,
    defender_level: i32,
    proficiency: f64,
) -> bool {
    roll(
        rng,
        success_chance_with_proficiency_decimal(attacker_level, defender_level, proficiency),
    )
}

/// Opposed check using the calling thread's generator
pub fn check(attacker_level: i32, defender_level: i32) -> bool {
    check_with_rng(&mut rand::thread_rng(), attacker_level, defender_level)
}

pub fn check_with_modifier(attacker_level: i32, defender_level: i32, modifier: f64) -> bool {
    check_with_modifier_with_rng(&mut rand::thread_rng(), attacker_level, defender_level, modifier)
}

pub fn check_with_proficiency(attacker_level: i32, defender_level: i32, proficiency_percent: i32) -> bool {
    check_with_proficiency_with_rng(
        &mut rand::thread_rng(),
        attacker_level,
        defender_level,
        proficiency_percent,
    )
}

pub fn check_with_proficiency_decimal(attacker_level: i32, defender_level: i32, proficiency: f64) -> bool {
    check_with_proficiency_decimal_with_rng(
        &mut rand::thread_rng(),
        attacker_level,
        defender_level,
        proficiency,
    )
}
