//! File-backed tracing setup.
//!
//! The TUI owns the terminal, so diagnostics go to
//! `~/.config/mygrid/mygrid.log` instead of stderr. `MYGRID_LOG` selects
//! the filter (`info` by default). Headless runs use the same sink.

use std::fs::OpenOptions;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

fn log_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
    Some(base.join("mygrid").join("mygrid.log"))
}

/// Install the global subscriber. Failure to open the log file silently
/// disables logging rather than breaking startup.
pub fn init() {
    let Some(path) = log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let filter = EnvFilter::try_from_env("MYGRID_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .try_init();
}
