//! Background cooldown loop.
//!
//! Wakes once per tick and asks the coordinator for one cooldown evaluation.
//! A panicking tick is logged and the loop keeps going. The loop ends when
//! [`CooldownScheduler::stop`] is called or the handle is dropped; the stop
//! signal interrupts a pending tick immediately.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::coordinator::StateCoordinator;

// A tick that panics is caught and logged; that needs an unwinding runtime.
#[cfg(not(panic = "unwind"))]
compile_error!("the cooldown scheduler requires panic = \"unwind\"");

const THREAD_NAME: &str = "boss-alert-cooldown";

/// Handle to the running cooldown thread.
#[derive(Debug)]
pub struct CooldownScheduler {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl CooldownScheduler {
    /// Run `coordinator.cooldown_step()` every `tick`.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(coordinator: StateCoordinator, tick: Duration) -> std::io::Result<Self> {
        Self::with_step(tick, move || {
            coordinator.cooldown_step();
        })
    }

    /// Run an arbitrary step every `tick`.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn with_step<F>(tick: Duration, step: F) -> std::io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run_loop(tick, stop_rx, step))?;

        tracing::info!(tick_ms = tick.as_millis() as u64, "boss alert cooldown thread started");
        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Signal the loop to end and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender disconnects the channel and wakes the loop.
        self.stop_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("cooldown thread terminated abnormally");
            }
        }
    }
}

impl Drop for CooldownScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop<F: FnMut()>(tick: Duration, stop_rx: mpsc::Receiver<()>, mut step: F) {
    loop {
        match stop_rx.recv_timeout(tick) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(&mut step)) {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(%reason, "cooldown tick failed, continuing");
        }
    }
    tracing::info!("boss alert cooldown thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        cond()
    }

    #[test]
    fn test_ticks_repeatedly() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let scheduler = CooldownScheduler::with_step(Duration::from_millis(5), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        assert!(wait_until(Duration::from_secs(2), || count.load(Ordering::SeqCst) >= 3));
        scheduler.stop();
    }

    #[test]
    fn test_panicking_tick_does_not_stop_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let scheduler = CooldownScheduler::with_step(Duration::from_millis(5), move || {
            let n = seen.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                panic!("first tick blows up");
            }
        })
        .unwrap();

        assert!(wait_until(Duration::from_secs(2), || count.load(Ordering::SeqCst) >= 3));
        assert!(scheduler.is_running());
        scheduler.stop();
    }

    #[test]
    fn test_stop_interrupts_long_tick() {
        let scheduler = CooldownScheduler::with_step(Duration::from_secs(3600), || {}).unwrap();
        assert!(scheduler.is_running());

        let started = Instant::now();
        scheduler.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_no_ticks_after_stop() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let scheduler = CooldownScheduler::with_step(Duration::from_millis(5), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        assert!(wait_until(Duration::from_secs(2), || count.load(Ordering::SeqCst) >= 1));

        drop(scheduler);
        let after_stop = count.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }
}
