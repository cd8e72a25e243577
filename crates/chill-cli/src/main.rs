use std::path::PathBuf;

use chill_core::{ConfigError, CoreError, RuntimeConfig};
use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "chill", version, about = "Chill - break server for overworked agents")]
struct Cli {
    /// Boss alert probability per break (0-100 percent)
    #[arg(long, global = true, allow_negative_numbers = true)]
    alert_probability: Option<i64>,

    /// Boss alert cooldown in seconds
    #[arg(long, global = true, allow_negative_numbers = true)]
    cooldown_seconds: Option<i64>,

    /// Forced delay when the boss alert level is maxed, in seconds
    #[arg(long, global = true)]
    delay_seconds: Option<u64>,

    /// RNG seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Config file (defaults to ~/.config/chill/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to a daily file in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve break requests line by line from stdin
    ///
    /// The only mode that keeps stress and boss alert state across requests.
    Serve,
    /// Take a single break against fresh state
    ///
    /// Each invocation starts from zero stress and zero alert, so the alert
    /// ceiling and its forced delay are only reachable through `serve`.
    Take {
        /// Break kind, e.g. "coffee_mission" (see `chill list`)
        kind: String,
    },
    /// Show the status of a fresh state (always 0/0)
    ///
    /// Nothing persists between invocations; use `status` inside `serve` to
    /// inspect a live session.
    Status {
        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// List available break kinds
    List,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

impl Cli {
    /// File (or defaults) overlaid with command-line flags.
    fn runtime_config(&self) -> Result<RuntimeConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RuntimeConfig::load_from(path)?,
            None => RuntimeConfig::load()?,
        };

        if let Some(percent) = self.alert_probability {
            config.alert_probability_percent = RuntimeConfig::probability_from_signed(percent)?;
        }
        if let Some(seconds) = self.cooldown_seconds {
            config.cooldown_period_seconds = RuntimeConfig::cooldown_from_signed(seconds)?;
        }
        if let Some(seconds) = self.delay_seconds {
            config.delay_millis = seconds.saturating_mul(1000);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_dir.as_deref()) {
        eprintln!("error: failed to initialize logging: {e}");
        std::process::exit(1);
    }

    let result = cli
        .runtime_config()
        .map_err(CoreError::from)
        .and_then(|config| match cli.command {
            Commands::Serve => commands::serve::run(config),
            Commands::Take { kind } => commands::take::run(config, &kind),
            Commands::Status { json } => commands::status::run(config, json),
            Commands::List => commands::list::run(),
            Commands::Config { action } => commands::config::run(action, config),
        });

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
