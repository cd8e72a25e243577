//! Fixed blocking wait imposed on a break taken at the alert ceiling.
//!
//! The wait is measured on the monotonic clock and cannot be cancelled: once
//! started it runs to completion for that call. The coordinator invokes it
//! after releasing its lock.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayGate {
    duration: Duration,
}

impl DelayGate {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Block the calling thread until the full duration has passed.
    pub fn wait(&self) {
        let deadline = Instant::now() + self.duration;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::sleep(deadline - now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waits_at_least_duration() {
        let gate = DelayGate::new(Duration::from_millis(60));
        let started = Instant::now();
        gate.wait();
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_zero_duration_returns_immediately() {
        let gate = DelayGate::new(Duration::ZERO);
        let started = Instant::now();
        gate.wait();
        assert!(started.elapsed() < Duration::from_millis(50));
    }
}
