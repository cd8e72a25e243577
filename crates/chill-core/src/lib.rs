//! # Chill Core Library
//!
//! Core state engine behind the Chill break server. A process holds one
//! [`StateCoordinator`] shared by every request handler; the CLI and any
//! transport layer are thin shells over it.
//!
//! ## Architecture
//!
//! - **State**: stress (pressure) and boss alert counters behind one lock,
//!   mutated by elapsed time, by breaks, and by a background cooldown thread
//! - **Config**: TOML-backed runtime configuration with CLI overrides
//! - **Catalog**: break kinds and their message pools
//! - **Format**: text rendering of break and status responses
//!
//! ## Key Components
//!
//! - [`StateCoordinator`]: atomic break protocol and snapshots
//! - [`CooldownScheduler`]: periodic alert decay
//! - [`RuntimeConfig`]: validated configuration

pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod state;

pub use catalog::BreakKind;
pub use config::RuntimeConfig;
pub use error::{BreakError, ConfigError, CoreError, Result};
pub use state::{
    BreakOutcome, Clock, CooldownScheduler, ManualClock, StateCoordinator, StateSnapshot,
    SystemClock, ALERT_MAX, PRESSURE_MAX,
};
