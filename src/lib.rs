//! Ability Engine - cooldowns, precondition gates, opposed checks and
//! proficiency growth for skills and spells

pub mod combat;
pub mod cooldown;
pub mod core;
pub mod execution;
pub mod memory;
pub mod skills;
