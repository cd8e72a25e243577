//! State coordinator.
//!
//! Owns the single mutex that guards both counters, their timestamps and the
//! RNG. Every compound update runs in one critical section; the forced delay
//! at the alert ceiling runs after the lock is released so one waiting caller
//! never stalls other callers or the cooldown scheduler.
//!
//! ## Break protocol
//!
//! ```text
//! perform_break(options)
//!   ├─ options empty → Err(EmptyOptions), nothing touched
//!   ├─ lock: pick option, apply elapsed pressure, reduce pressure, roll alert
//!   ├─ unlock
//!   ├─ alert == ALERT_MAX → DelayGate::wait()
//!   └─ BreakOutcome
//! ```
//!
//! The coordinator is a cheap handle; clones share the same state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use super::alert::{AlertCooldown, AlertCounter, ALERT_MAX};
use super::clock::{Clock, SystemClock};
use super::cooldown::CooldownScheduler;
use super::delay::DelayGate;
use super::pressure::PressureCounter;
use crate::config::RuntimeConfig;
use crate::error::{BreakError, ConfigError};

/// What a caller gets back from a break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakOutcome {
    pub message: String,
    pub summary: String,
    pub pressure_level: u32,
    pub alert_level: u32,
    pub delay_applied: bool,
}

/// Read-only copy of the shared state for status consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub timestamp: DateTime<Utc>,
    pub pressure_level: u32,
    /// Pressure including whole minutes elapsed since the last break.
    pub projected_pressure_level: u32,
    pub alert_level: u32,
    pub last_break_time: DateTime<Utc>,
    pub last_cooldown_time: DateTime<Utc>,
    pub cooldown_seconds_remaining: u64,
    pub alert_probability_percent: u32,
    pub cooldown_period_seconds: u64,
}

struct EngineState {
    pressure: PressureCounter,
    alert: AlertCounter,
    rng: Mcg128Xsl64,
}

struct Shared {
    state: Mutex<EngineState>,
    clock: Arc<dyn Clock>,
    delay: DelayGate,
    config: RuntimeConfig,
}

#[derive(Clone)]
pub struct StateCoordinator {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for StateCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.shared.state.try_lock() {
            Ok(state) => write!(
                f,
                "StateCoordinator(pressure={}, alert={})",
                state.pressure.level(),
                state.alert.level()
            ),
            Err(_) => write!(f, "StateCoordinator(<locked>)"),
        }
    }
}

impl StateCoordinator {
    /// Build a coordinator on the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is out of range.
    pub fn new(config: RuntimeConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build a coordinator on an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is out of range.
    pub fn with_clock(config: RuntimeConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;

        let now = clock.now();
        let rng = match config.seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        let state = EngineState {
            pressure: PressureCounter::new(now),
            alert: AlertCounter::new(
                config.alert_probability_percent,
                config.cooldown_period_seconds,
                now,
            ),
            rng,
        };

        tracing::info!(
            alert_probability_percent = config.alert_probability_percent,
            cooldown_period_seconds = config.cooldown_period_seconds,
            "state coordinator initialized"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                clock,
                delay: DelayGate::new(config.delay()),
                config,
            }),
        })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.shared.config
    }

    /// Take a break with one of `options` chosen uniformly at random.
    ///
    /// Blocks for the configured delay when the alert level ends at
    /// [`ALERT_MAX`].
    ///
    /// # Errors
    ///
    /// Returns [`BreakError::EmptyOptions`] without touching state when
    /// `options` is empty.
    pub fn perform_break(&self, options: &[(String, String)]) -> Result<BreakOutcome, BreakError> {
        if options.is_empty() {
            return Err(BreakError::EmptyOptions);
        }

        let (choice, pressure_level, alert_level) = {
            let mut guard = self.lock();
            let now = self.shared.clock.now();
            let EngineState {
                pressure,
                alert,
                rng,
            } = &mut *guard;

            let choice = rng.gen_range(0..options.len());
            pressure.apply_elapsed(now);
            pressure.reduce_for_break(now, rng);
            alert.register_break(rng);
            (choice, pressure.level(), alert.level())
        };

        let delay_applied = alert_level == ALERT_MAX;
        if delay_applied {
            let delay = self.shared.delay.duration();
            tracing::warn!(delay_ms = delay.as_millis() as u64, "boss alert at ceiling, delaying break");
            self.shared.delay.wait();
            tracing::info!("break delay completed");
        }

        let (message, summary) = options[choice].clone();
        Ok(BreakOutcome {
            message,
            summary,
            pressure_level,
            alert_level,
            delay_applied,
        })
    }

    /// One cooldown evaluation under the lock. Driven by [`CooldownScheduler`].
    pub fn cooldown_step(&self) -> Option<AlertCooldown> {
        let mut guard = self.lock();
        let now = self.shared.clock.now();
        guard.alert.cooldown_step(now)
    }

    /// Consistent copy of the shared state. Never mutates.
    pub fn snapshot(&self) -> StateSnapshot {
        let guard = self.lock();
        let now = self.shared.clock.now();
        StateSnapshot {
            timestamp: now,
            pressure_level: guard.pressure.level(),
            projected_pressure_level: guard.pressure.projected_level(now),
            alert_level: guard.alert.level(),
            last_break_time: guard.pressure.last_break_time(),
            last_cooldown_time: guard.alert.last_cooldown_time(),
            cooldown_seconds_remaining: guard.alert.cooldown_remaining(now),
            alert_probability_percent: self.shared.config.alert_probability_percent,
            cooldown_period_seconds: self.shared.config.cooldown_period_seconds,
        }
    }

    /// Start the background cooldown loop at the configured tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the scheduler thread cannot be spawned.
    pub fn start_cooldown(&self) -> std::io::Result<CooldownScheduler> {
        CooldownScheduler::spawn(self.clone(), self.shared.config.tick())
    }

    // Counters hold plain integers, so state behind a poisoned lock is still valid.
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
