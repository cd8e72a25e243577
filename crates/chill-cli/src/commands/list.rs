use chill_core::BreakKind;

pub fn run() -> chill_core::Result<()> {
    for kind in BreakKind::ALL {
        println!("{} {}", kind.emoji(), kind.name());
    }
    Ok(())
}
