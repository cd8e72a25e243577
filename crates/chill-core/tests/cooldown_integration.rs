//! Cooldown scheduler driving a live coordinator.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chill_core::{BreakKind, Clock, ManualClock, RuntimeConfig, StateCoordinator};

fn wait_for_alert(coordinator: &StateCoordinator, level: u32) -> bool {
    let deadline = Instant::now() + Duration::from_secs(3);
    while Instant::now() < deadline {
        if coordinator.snapshot().alert_level == level {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_scheduler_decays_one_level_per_period() {
    let clock = ManualClock::default();
    let config = RuntimeConfig::new(100, 10)
        .with_seed(9)
        .with_tick_millis(5);
    let coordinator = StateCoordinator::with_clock(config, Arc::new(clock.clone())).unwrap();

    let options = BreakKind::CoffeeMission.options();
    for _ in 0..3 {
        coordinator.perform_break(&options).unwrap();
    }
    assert_eq!(coordinator.snapshot().alert_level, 3);

    let scheduler = coordinator.start_cooldown().unwrap();
    assert!(scheduler.is_running());

    // Not enough time yet
    thread::sleep(Duration::from_millis(40));
    assert_eq!(coordinator.snapshot().alert_level, 3);

    clock.advance(chrono::Duration::seconds(10));
    assert!(wait_for_alert(&coordinator, 2));

    // Many ticks, but only one qualifying interval
    thread::sleep(Duration::from_millis(40));
    assert_eq!(coordinator.snapshot().alert_level, 2);

    clock.advance(chrono::Duration::seconds(10));
    assert!(wait_for_alert(&coordinator, 1));

    scheduler.stop();

    clock.advance(chrono::Duration::seconds(10));
    thread::sleep(Duration::from_millis(40));
    assert_eq!(coordinator.snapshot().alert_level, 1);
}

#[test]
fn test_idle_at_zero_does_not_bank_a_cooldown() {
    let clock = ManualClock::default();
    let config = RuntimeConfig::new(100, 10)
        .with_seed(10)
        .with_tick_millis(5);
    let coordinator = StateCoordinator::with_clock(config, Arc::new(clock.clone())).unwrap();
    let scheduler = coordinator.start_cooldown().unwrap();

    // Long idle stretch at level 0; the scheduler keeps restarting the period
    clock.advance(chrono::Duration::seconds(120));
    let deadline = Instant::now() + Duration::from_secs(3);
    while coordinator.snapshot().last_cooldown_time != clock.now() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(coordinator.snapshot().last_cooldown_time, clock.now());

    coordinator
        .perform_break(&BreakKind::ShowMeme.options())
        .unwrap();
    thread::sleep(Duration::from_millis(40));
    assert_eq!(coordinator.snapshot().alert_level, 1);

    scheduler.stop();
}

#[test]
fn test_release_profile_keeps_unwinding() {
    // Panicking ticks are recovered with catch_unwind, which aborts under panic = "abort".
    let manifest = concat!(env!("CARGO_MANIFEST_DIR"), "/../../Cargo.toml");
    let text = std::fs::read_to_string(manifest).unwrap();
    let workspace: toml::Value = toml::from_str(&text).unwrap();

    let profiles = workspace.get("profile").and_then(|p| p.as_table());
    for (name, profile) in profiles.into_iter().flatten() {
        let strategy = profile.get("panic").and_then(|v| v.as_str());
        assert_ne!(strategy, Some("abort"), "profile.{name} sets panic = \"abort\"");
    }
}

#[test]
fn test_panicking_tick_keeps_scheduler_alive() {
    let ticks = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let seen = Arc::clone(&ticks);
    let scheduler = chill_core::CooldownScheduler::with_step(Duration::from_millis(5), move || {
        if seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 0 {
            panic!("first tick fails");
        }
    })
    .unwrap();

    thread::sleep(Duration::from_millis(200));
    assert!(ticks.load(std::sync::atomic::Ordering::SeqCst) > 1);
    assert!(scheduler.is_running());
    scheduler.stop();
}
