//! Line-oriented break session.
//!
//! Each stdin line names a break kind (`coffee_mission`), or one of
//! `status`, `snapshot`, `list`, `quit`. Responses go to stdout separated by a
//! blank line. The cooldown scheduler runs for the whole session.

use std::io::{self, BufRead, Write};

use chill_core::format::{break_response, status_response};
use chill_core::{BreakKind, RuntimeConfig, StateCoordinator};

pub fn run(config: RuntimeConfig) -> chill_core::Result<()> {
    tracing::info!(
        alert_probability_percent = config.alert_probability_percent,
        cooldown_period_seconds = config.cooldown_period_seconds,
        "chill session starting"
    );
    let coordinator = StateCoordinator::new(config)?;
    let scheduler = coordinator.start_cooldown()?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        let request = line.trim();
        if request.is_empty() {
            continue;
        }
        if matches!(request, "quit" | "exit") {
            break;
        }

        let response = handle(&coordinator, request)?;
        writeln!(stdout, "{response}\n")?;
        stdout.flush()?;
    }

    scheduler.stop();
    tracing::info!("chill session complete");
    Ok(())
}

fn handle(coordinator: &StateCoordinator, request: &str) -> chill_core::Result<String> {
    match request {
        "status" => Ok(status_response(&coordinator.snapshot())),
        "snapshot" => Ok(serde_json::to_string(&coordinator.snapshot())?),
        "list" => Ok(BreakKind::ALL
            .iter()
            .map(|kind| kind.name())
            .collect::<Vec<_>>()
            .join("\n")),
        name => match BreakKind::parse(name) {
            Ok(kind) => {
                tracing::info!(kind = %kind, "break requested");
                let outcome = coordinator.perform_break(&kind.options())?;
                Ok(break_response(kind.emoji(), &outcome))
            }
            Err(e) => {
                tracing::warn!(request = name, "unknown request");
                Ok(format!("error: {e}"))
            }
        },
    }
}
