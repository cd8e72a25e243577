//! TOML-based runtime configuration.
//!
//! Holds the knobs of the state engine:
//! - Alert probability per break (percent)
//! - Cooldown period for the alert level
//! - Forced delay applied at the alert ceiling
//! - Scheduler tick and RNG seed
//!
//! Configuration is read from `~/.config/chill/config.toml` when present.
//! Command-line flags override file values, file values override defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Runtime configuration, immutable once handed to the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Chance (0-100) that a break raises the alert level.
    #[serde(default = "default_alert_probability")]
    pub alert_probability_percent: u32,
    /// Seconds that must pass before the alert level decays by one.
    #[serde(default = "default_cooldown_period")]
    pub cooldown_period_seconds: u64,
    /// Fixed wait imposed on a break taken at the alert ceiling.
    #[serde(default = "default_delay_millis")]
    pub delay_millis: u64,
    /// Cooldown scheduler tick in milliseconds.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
    /// RNG seed. `None` seeds from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_alert_probability() -> u32 {
    50
}
fn default_cooldown_period() -> u64 {
    300
}
fn default_delay_millis() -> u64 {
    20_000
}
fn default_tick_millis() -> u64 {
    1000
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            alert_probability_percent: default_alert_probability(),
            cooldown_period_seconds: default_cooldown_period(),
            delay_millis: default_delay_millis(),
            tick_millis: default_tick_millis(),
            seed: None,
        }
    }
}

impl RuntimeConfig {
    /// Config with the given alert probability and cooldown, defaults elsewhere.
    pub fn new(alert_probability_percent: u32, cooldown_period_seconds: u64) -> Self {
        Self {
            alert_probability_percent,
            cooldown_period_seconds,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_tick_millis(mut self, tick_millis: u64) -> Self {
        self.tick_millis = tick_millis;
        self
    }

    /// Check every field against its valid domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alert_probability_percent > 100 {
            return Err(ConfigError::invalid(
                "alert_probability_percent",
                format!(
                    "must be between 0 and 100, got {}",
                    self.alert_probability_percent
                ),
            ));
        }
        if self.tick_millis == 0 {
            return Err(ConfigError::invalid("tick_millis", "must be positive"));
        }
        Ok(())
    }

    /// Convert a signed cooldown (as typed by a user) into the stored form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for negative input.
    pub fn cooldown_from_signed(seconds: i64) -> Result<u64, ConfigError> {
        u64::try_from(seconds).map_err(|_| {
            ConfigError::invalid(
                "cooldown_period_seconds",
                format!("must be non-negative, got {seconds}"),
            )
        })
    }

    /// Convert a signed probability (as typed by a user) into the stored form.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] outside `0..=100`.
    pub fn probability_from_signed(percent: i64) -> Result<u32, ConfigError> {
        match u32::try_from(percent) {
            Ok(p) if p <= 100 => Ok(p),
            _ => Err(ConfigError::invalid(
                "alert_probability_percent",
                format!("must be between 0 and 100, got {percent}"),
            )),
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_millis)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }

    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        let base_dir = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));

        let env = std::env::var("CHILL_ENV").unwrap_or_else(|_| "production".to_string());
        let dir = if env == "dev" {
            base_dir.join("chill-dev")
        } else {
            base_dir.join("chill")
        };
        dir.join("config.toml")
    }

    /// Load from the default location, or defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit TOML file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg = Self::from_toml(&content)?;
        Ok(cfg)
    }

    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] or [`ConfigError::InvalidValue`].
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let cfg: RuntimeConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
