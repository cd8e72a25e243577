//! Tracing subscriber setup.
//!
//! Logs go to stderr by default so stdout carries only responses. With a log
//! directory, they go to `chill-YYYYMMDD.log` inside it instead.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "chill_core=info,chill=info";

pub fn init(log_dir: Option<&Path>) -> std::io::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_name = format!("chill-{}.log", chrono::Local::now().format("%Y%m%d"));
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(file_name))?;
            let installed = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
            report(installed);
        }
        None => {
            let installed = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
            report(installed);
        }
    }
    Ok(())
}

// A second init keeps the first subscriber.
fn report<E: std::fmt::Display>(installed: Result<(), E>) {
    match installed {
        Ok(()) => {}
        Err(e) => tracing::debug!(error = %e, "tracing subscriber already installed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        init(Some(dir.path())).unwrap();
        init(Some(dir.path())).unwrap();
        init(None).unwrap();

        let logs: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(logs.len(), 1);
    }
}
