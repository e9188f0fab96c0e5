//! Periodic driver for cooldown decay
//!
//! The ticker is the only writer that removes cooldowns because time passed.
//! Each firing subtracts the fixed period, not the measured elapsed time, so
//! a late tick stretches every cooldown slightly. Missed ticks are delivered
//! back to back, matching fixed-rate scheduling.

use crate::cooldown::CooldownTracker;
use crate::core::error::{EngineError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Handle to the running ticker task; aborts the task when stopped or dropped
#[derive(Debug)]
pub struct CooldownTicker {
    handle: JoinHandle<()>,
    period: Duration,
}

impl CooldownTicker {
    /// Spawn the ticker on the current tokio runtime
    ///
    /// The first tick fires one full period after spawning. A zero period is
    /// rejected before anything is spawned.
    pub fn spawn(tracker: Arc<CooldownTracker>, period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(EngineError::InvalidConfig(
                "cooldown tick period must be greater than zero".into(),
            ));
        }
        let delta_seconds = period.as_secs_f64();
        tracing::info!("Cooldown ticker started ({}ms period)", period.as_millis());

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                tracker.tick(delta_seconds);
            }
        });

        Ok(Self { handle, period })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for CooldownTicker {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            self.handle.abort();
            tracing::info!("Cooldown ticker stopped");
        }
    }
}
