use chill_core::format::status_response;
use chill_core::{RuntimeConfig, StateCoordinator};

pub fn run(config: RuntimeConfig, json: bool) -> chill_core::Result<()> {
    let coordinator = StateCoordinator::new(config)?;
    let snapshot = coordinator.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", status_response(&snapshot));
    }
    Ok(())
}
