//! Alert counter.
//!
//! Rises by one with a configured probability on each break and falls by one
//! each time a full cooldown period has passed. Always within `0..=ALERT_MAX`.
//! Not synchronized: the coordinator's lock must be held.
//!
//! ## Cooldown clock
//!
//! `last_cooldown_time` restarts whenever a full period has elapsed, even
//! when the level is already zero and nothing is decremented. A long idle
//! stretch therefore never banks an instant cooldown for the next raise.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Upper bound of the alert level. Reaching it forces the break delay.
pub const ALERT_MAX: u32 = 5;

/// A successful alert roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRaise {
    pub from: u32,
    pub to: u32,
}

/// A cooldown that lowered the level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertCooldown {
    pub from: u32,
    pub to: u32,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Clone)]
pub struct AlertCounter {
    level: u32,
    probability_percent: u32,
    cooldown_period: Duration,
    last_cooldown_time: DateTime<Utc>,
}

impl AlertCounter {
    /// `probability_percent` is expected to be validated to `0..=100`.
    pub fn new(probability_percent: u32, cooldown_period_seconds: u64, now: DateTime<Utc>) -> Self {
        let cooldown_period = i64::try_from(cooldown_period_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or_else(Duration::max_value);
        Self {
            level: 0,
            probability_percent: probability_percent.min(100),
            cooldown_period,
            last_cooldown_time: now,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn last_cooldown_time(&self) -> DateTime<Utc> {
        self.last_cooldown_time
    }

    pub fn is_at_ceiling(&self) -> bool {
        self.level == ALERT_MAX
    }

    /// Roll `0..100`; below the configured probability raises the level by one
    /// (clamped at [`ALERT_MAX`]). A probability of 0 never raises, 100 always does.
    pub fn register_break<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<AlertRaise> {
        let draw: u32 = rng.gen_range(0..100);
        if draw >= self.probability_percent {
            return None;
        }

        let from = self.level;
        self.level = (from + 1).min(ALERT_MAX);
        if self.level != from {
            tracing::warn!(from, to = self.level, "boss alert increased");
        }
        Some(AlertRaise { from, to: self.level })
    }

    /// Decay by one if a full cooldown period has passed since the last reset.
    pub fn cooldown_step(&mut self, now: DateTime<Utc>) -> Option<AlertCooldown> {
        let elapsed = now - self.last_cooldown_time;
        if elapsed < self.cooldown_period {
            return None;
        }

        self.last_cooldown_time = self.last_cooldown_time.max(now);
        if self.level == 0 {
            return None;
        }

        let from = self.level;
        self.level -= 1;
        let elapsed_seconds = elapsed.num_milliseconds() as f64 / 1000.0;
        tracing::info!(from, to = self.level, elapsed_seconds, "boss alert cooldown");
        Some(AlertCooldown {
            from,
            to: self.level,
            elapsed_seconds,
        })
    }

    /// Whole seconds until the next decrement could happen; 0 at level 0.
    pub fn cooldown_remaining(&self, now: DateTime<Utc>) -> u64 {
        if self.level == 0 {
            return 0;
        }
        let remaining = self
            .cooldown_period
            .checked_sub(&(now - self.last_cooldown_time))
            .unwrap_or(self.cooldown_period);
        if remaining <= Duration::zero() {
            return 0;
        }
        // Round partial seconds up so a nonzero wait never reports 0.
        let millis = remaining.num_milliseconds();
        u64::try_from(millis.saturating_add(999) / 1000).unwrap_or(0)
    }
}
