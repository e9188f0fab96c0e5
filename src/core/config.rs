//! Engine configuration and the shared runtime context
//!
//! The context replaces process-wide singletons: it is built once at server
//! startup and handed to whatever needs cooldown state.

use crate::combat::status::{CombatState, EquipmentProvider};
use crate::cooldown::{CooldownTicker, CooldownTracker};
use crate::core::error::{EngineError, Result};
use crate::execution::{AbilityExecutor, PreconditionGate};
use crate::skills::proficiency::{ProficiencyEngine, ProficiencyStore};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Default cooldown tick period, matching the combat round cadence
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 500;

/// Configuration for the ability engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Period of the cooldown ticker in milliseconds
    ///
    /// Every tick subtracts exactly this amount from every live cooldown,
    /// regardless of how late the tick actually fires.
    pub tick_interval_ms: u64,

    /// Seed for reproducible rolls (demo runs and tests)
    ///
    /// `None` means rolls come from the per-thread generator.
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "tick_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Seconds removed from every cooldown per tick
    pub fn tick_delta_seconds(&self) -> f64 {
        self.tick_interval_ms as f64 / 1000.0
    }
}

/// Shared engine state, constructed once and passed to every component
#[derive(Debug, Clone)]
pub struct EngineContext {
    pub config: EngineConfig,
    pub cooldowns: Arc<CooldownTracker>,
}

impl EngineContext {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            cooldowns: Arc::new(CooldownTracker::new()),
        }
    }

    /// Gate sharing this context's cooldown state
    pub fn gate(
        &self,
        combat: Arc<dyn CombatState>,
        equipment: Arc<dyn EquipmentProvider>,
    ) -> PreconditionGate {
        PreconditionGate::new(Arc::clone(&self.cooldowns), combat, equipment)
    }

    pub fn executor(
        &self,
        combat: Arc<dyn CombatState>,
        equipment: Arc<dyn EquipmentProvider>,
        store: Arc<dyn ProficiencyStore>,
    ) -> AbilityExecutor {
        AbilityExecutor::new(self.gate(combat, equipment), ProficiencyEngine::new(store))
    }

    /// Start decaying this context's cooldowns; needs a tokio runtime
    ///
    /// The config is re-validated here since its fields are public.
    pub fn spawn_ticker(&self) -> Result<CooldownTicker> {
        self.config.validate()?;
        CooldownTicker::spawn(Arc::clone(&self.cooldowns), self.config.tick_interval())
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
