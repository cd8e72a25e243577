//! Shared stress/alert state engine.
//!
//! - [`PressureCounter`]: stress level, grows with idle time, shrinks on breaks
//! - [`AlertCounter`]: boss alert level, rises on breaks, decays on cooldown
//! - [`StateCoordinator`]: the single lock around both, plus the break protocol
//! - [`CooldownScheduler`]: background thread driving alert decay
//! - [`DelayGate`]: fixed wait applied at the alert ceiling

mod alert;
mod clock;
mod cooldown;
mod coordinator;
mod delay;
mod pressure;

pub use alert::{AlertCooldown, AlertCounter, AlertRaise, ALERT_MAX};
pub use clock::{Clock, ManualClock, SystemClock};
pub use cooldown::CooldownScheduler;
pub use coordinator::{BreakOutcome, StateCoordinator, StateSnapshot};
pub use delay::DelayGate;
pub use pressure::{PressureCounter, PressureIncrease, PressureReduction, PRESSURE_MAX};
