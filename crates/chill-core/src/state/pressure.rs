//! Pressure (stress) counter.
//!
//! Grows by one point per whole minute since the last break and drops by a
//! random 1..=100 amount when a break is taken. Always within
//! `0..=PRESSURE_MAX`. Not synchronized: the coordinator's lock must be held.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Upper bound of the pressure level.
pub const PRESSURE_MAX: u32 = 100;

/// Result of [`PressureCounter::apply_elapsed`] when the level moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressureIncrease {
    pub from: u32,
    pub to: u32,
    pub elapsed_minutes: i64,
}

/// Result of [`PressureCounter::reduce_for_break`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressureReduction {
    pub from: u32,
    pub to: u32,
    /// The drawn reduction, before clamping at zero.
    pub amount: u32,
}

#[derive(Debug, Clone)]
pub struct PressureCounter {
    level: u32,
    last_break_time: DateTime<Utc>,
}

impl PressureCounter {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            level: 0,
            last_break_time: now,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn last_break_time(&self) -> DateTime<Utc> {
        self.last_break_time
    }

    /// Whole minutes since the last break, never negative.
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.last_break_time).num_minutes().max(0)
    }

    /// Level the counter would report if elapsed time were applied at `now`.
    pub fn projected_level(&self, now: DateTime<Utc>) -> u32 {
        Self::grow(self.level, self.elapsed_minutes(now))
    }

    /// Add one point per whole elapsed minute, clamped at [`PRESSURE_MAX`].
    ///
    /// Leaves `last_break_time` alone; only a break moves it.
    pub fn apply_elapsed(&mut self, now: DateTime<Utc>) -> Option<PressureIncrease> {
        let elapsed_minutes = self.elapsed_minutes(now);
        if elapsed_minutes == 0 {
            return None;
        }

        let from = self.level;
        self.level = Self::grow(from, elapsed_minutes);
        if self.level == from {
            return None;
        }

        tracing::info!(
            from,
            to = self.level,
            elapsed_minutes,
            "stress auto-increased"
        );
        Some(PressureIncrease {
            from,
            to: self.level,
            elapsed_minutes,
        })
    }

    /// Draw a reduction in `1..=100`, subtract it (saturating at zero) and
    /// stamp the break time.
    pub fn reduce_for_break<R: Rng + ?Sized>(
        &mut self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> PressureReduction {
        let amount = rng.gen_range(1..=PRESSURE_MAX);
        let from = self.level;
        self.level = from.saturating_sub(amount);
        self.last_break_time = self.last_break_time.max(now);

        tracing::info!(from, to = self.level, amount, "break taken");
        PressureReduction {
            from,
            to: self.level,
            amount,
        }
    }

    fn grow(level: u32, elapsed_minutes: i64) -> u32 {
        let increase = u32::try_from(elapsed_minutes.clamp(0, i64::from(PRESSURE_MAX)))
            .unwrap_or(PRESSURE_MAX);
        (level + increase).min(PRESSURE_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    #[test]
    fn test_starts_at_zero() {
        let counter = PressureCounter::new(Utc::now());
        assert_eq!(counter.level(), 0);
    }

    #[test]
    fn test_elapsed_minutes_are_floored() {
        let start = Utc::now();
        let mut counter = PressureCounter::new(start);

        // 59 seconds is not a whole minute
        assert!(counter.apply_elapsed(start + Duration::seconds(59)).is_none());
        assert_eq!(counter.level(), 0);

        let increase = counter
            .apply_elapsed(start + Duration::seconds(3 * 60 + 59))
            .unwrap();
        assert_eq!(increase.from, 0);
        assert_eq!(increase.to, 3);
        assert_eq!(increase.elapsed_minutes, 3);
    }

    #[test]
    fn test_apply_elapsed_does_not_move_break_time() {
        let start = Utc::now();
        let mut counter = PressureCounter::new(start);
        counter.apply_elapsed(start + Duration::minutes(10));
        assert_eq!(counter.last_break_time(), start);
    }

    #[test]
    fn test_growth_clamps_at_max() {
        let start = Utc::now();
        let mut counter = PressureCounter::new(start);
        counter.apply_elapsed(start + Duration::days(3));
        assert_eq!(counter.level(), PRESSURE_MAX);

        // Already at max: no transition reported
        assert!(counter.apply_elapsed(start + Duration::days(4)).is_none());
    }

    #[test]
    fn test_clock_going_backwards_is_ignored() {
        let start = Utc::now();
        let mut counter = PressureCounter::new(start);
        assert!(counter.apply_elapsed(start - Duration::minutes(30)).is_none());
        assert_eq!(counter.projected_level(start - Duration::minutes(30)), 0);
    }

    #[test]
    fn test_reduce_for_break_saturates_and_stamps() {
        let start = Utc::now();
        let mut counter = PressureCounter::new(start);
        let mut rng = Mcg128Xsl64::seed_from_u64(7);

        let later = start + Duration::minutes(2);
        let reduction = counter.reduce_for_break(later, &mut rng);
        assert!((1..=PRESSURE_MAX).contains(&reduction.amount));
        assert_eq!(reduction.from, 0);
        assert_eq!(reduction.to, 0);
        assert_eq!(counter.last_break_time(), later);
    }

    #[test]
    fn test_reduce_for_break_subtracts_draw() {
        let start = Utc::now();
        let mut counter = PressureCounter::new(start);
        counter.apply_elapsed(start + Duration::hours(5));
        assert_eq!(counter.level(), PRESSURE_MAX);

        let mut rng = Mcg128Xsl64::seed_from_u64(99);
        let reduction = counter.reduce_for_break(start + Duration::hours(5), &mut rng);
        assert_eq!(reduction.to, PRESSURE_MAX - reduction.amount);
        assert_eq!(counter.level(), reduction.to);
    }

    #[test]
    fn test_break_time_is_monotonic() {
        let start = Utc::now();
        let mut counter = PressureCounter::new(start);
        let mut rng = Mcg128Xsl64::seed_from_u64(1);

        counter.reduce_for_break(start - Duration::minutes(5), &mut rng);
        assert_eq!(counter.last_break_time(), start);
    }
}
