//! End-to-end scenarios for the break protocol.
//!
//! Covers the alert ceiling delay, zero-probability runs, idle pressure
//! growth and empty option lists against a real coordinator.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chill_core::{
    BreakError, BreakKind, ManualClock, RuntimeConfig, StateCoordinator, ALERT_MAX,
};

const DELAY: Duration = Duration::from_millis(80);

fn options() -> Vec<(String, String)> {
    BreakKind::TakeABreak.options()
}

#[test]
fn test_rapid_breaks_reach_ceiling_and_delay() {
    let config = RuntimeConfig::new(100, 5).with_seed(1).with_delay(DELAY);
    let coordinator = StateCoordinator::new(config).unwrap();

    let mut outcomes = Vec::new();
    for _ in 0..5 {
        outcomes.push(coordinator.perform_break(&options()).unwrap());
    }
    let levels: Vec<u32> = outcomes.iter().map(|o| o.alert_level).collect();
    assert_eq!(levels, vec![1, 2, 3, 4, 5]);
    assert!(outcomes[..4].iter().all(|o| !o.delay_applied));
    assert!(outcomes[4].delay_applied);

    let started = Instant::now();
    let sixth = coordinator.perform_break(&options()).unwrap();
    assert!(sixth.delay_applied);
    assert_eq!(sixth.alert_level, ALERT_MAX);
    let waited = started.elapsed();
    assert!(waited >= DELAY);
    assert!(waited < DELAY * 10, "delay overshot: {waited:?}");
}

#[test]
fn test_zero_probability_never_alerts() {
    let config = RuntimeConfig::new(0, 300).with_seed(2).with_delay(DELAY);
    let coordinator = StateCoordinator::new(config).unwrap();

    for _ in 0..10 {
        let outcome = coordinator.perform_break(&options()).unwrap();
        assert_eq!(outcome.alert_level, 0);
        assert!(!outcome.delay_applied);
    }
    assert_eq!(coordinator.snapshot().alert_level, 0);
}

#[test]
fn test_idle_minutes_raise_pressure_before_break() {
    let clock = ManualClock::default();
    let coordinator = StateCoordinator::with_clock(
        RuntimeConfig::new(0, 300).with_seed(3),
        Arc::new(clock.clone()),
    )
    .unwrap();

    clock.advance(chrono::Duration::minutes(3));
    assert_eq!(coordinator.snapshot().projected_pressure_level, 3);

    let outcome = coordinator.perform_break(&options()).unwrap();
    assert!(outcome.pressure_level <= 3);
}

#[test]
fn test_idle_increase_is_exactly_elapsed_minutes() {
    // Same seed means the same reduction draw in both runs.
    let run = |minutes: i64| {
        let clock = ManualClock::default();
        let coordinator = StateCoordinator::with_clock(
            RuntimeConfig::new(0, 300).with_seed(11),
            Arc::new(clock.clone()),
        )
        .unwrap();
        clock.advance(chrono::Duration::minutes(minutes));
        coordinator.perform_break(&options()).unwrap().pressure_level
    };

    let base = run(60);
    let longer = run(63);
    assert!(longer >= base);
    if base > 0 {
        assert_eq!(longer - base, 3);
    } else {
        assert!(longer <= 3);
    }
}

#[test]
fn test_empty_options_rejected_without_side_effects() {
    let clock = ManualClock::default();
    let coordinator = StateCoordinator::with_clock(
        RuntimeConfig::new(100, 300).with_seed(4),
        Arc::new(clock.clone()),
    )
    .unwrap();
    coordinator.perform_break(&options()).unwrap();
    clock.advance(chrono::Duration::minutes(2));
    let before = coordinator.snapshot();

    let result = coordinator.perform_break(&[]);
    assert_eq!(result, Err(BreakError::EmptyOptions));

    let after = coordinator.snapshot();
    assert_eq!(after.pressure_level, before.pressure_level);
    assert_eq!(after.alert_level, before.alert_level);
    assert_eq!(after.last_break_time, before.last_break_time);
}

#[test]
fn test_every_catalog_kind_can_take_a_break() {
    let coordinator =
        StateCoordinator::new(RuntimeConfig::new(0, 300).with_seed(5)).unwrap();
    for kind in BreakKind::ALL {
        let options = kind.options();
        let outcome = coordinator.perform_break(&options).unwrap();
        assert!(options.contains(&(outcome.message.clone(), outcome.summary.clone())));
    }
}
