use clap::Subcommand;
use chill_core::RuntimeConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration (file + flags) as JSON
    Show,
    /// Print the default config file location
    Path,
}

pub fn run(action: ConfigAction, config: RuntimeConfig) -> chill_core::Result<()> {
    match action {
        ConfigAction::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Path => {
            println!("{}", RuntimeConfig::default_path().display());
        }
    }
    Ok(())
}
