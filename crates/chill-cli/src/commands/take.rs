use chill_core::format::break_response;
use chill_core::{BreakKind, RuntimeConfig, StateCoordinator};

pub fn run(config: RuntimeConfig, kind: &str) -> chill_core::Result<()> {
    let kind = BreakKind::parse(kind)?;
    let coordinator = StateCoordinator::new(config)?;

    let outcome = coordinator.perform_break(&kind.options())?;
    println!("{}", break_response(kind.emoji(), &outcome));
    Ok(())
}
