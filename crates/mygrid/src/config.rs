//! Runtime configuration.
//!
//! Defaults merged with `~/.config/mygrid/config.toml` when present; CLI
//! flags override both. Unknown keys are ignored so older builds accept
//! newer files.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_PORT: u16 = 8765;
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_FIFO: &str = "/tmp/mygrid.fifo";
const DEFAULT_COMMANDS_PER_FRAME: usize = 10;
const DEFAULT_FRAME_MS: u64 = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerSection,
    pub ui: UiSection,
}

#[derive(Debug, Clone)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    pub fifo_path: PathBuf,
    pub commands_per_frame: usize,
}

#[derive(Debug, Clone)]
pub struct UiSection {
    /// Minimum time between rendered frames; 50 ms caps at 20 FPS.
    pub frame_interval: Duration,
    pub scroll_margin: i64,
    pub fast_step: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerSection {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                fifo_path: PathBuf::from(DEFAULT_FIFO),
                commands_per_frame: DEFAULT_COMMANDS_PER_FRAME,
            },
            ui: UiSection {
                frame_interval: Duration::from_millis(DEFAULT_FRAME_MS),
                scroll_margin: 0,
                fast_step: 10,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    server: Option<RawServer>,
    ui: Option<RawUi>,
}

#[derive(Debug, Default, Deserialize)]
struct RawServer {
    host: Option<String>,
    port: Option<u16>,
    #[serde(alias = "fifo")]
    fifo_path: Option<PathBuf>,
    #[serde(alias = "commandsPerFrame")]
    commands_per_frame: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUi {
    #[serde(alias = "frameMs")]
    frame_ms: Option<u64>,
    scroll_margin: Option<i64>,
    fast_step: Option<i64>,
}

pub fn config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
    Some(base.join("mygrid").join("config.toml"))
}

/// Load the user config, falling back to defaults on any problem. A bad
/// config file must never stop the editor from starting.
pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let Ok(content) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    match toml::from_str::<RawConfig>(&content) {
        Ok(raw) => merge(raw),
        Err(err) => {
            tracing::warn!("ignoring invalid config {}: {err}", path.display());
            Config::default()
        }
    }
}

fn merge(raw: RawConfig) -> Config {
    let mut config = Config::default();
    if let Some(server) = raw.server {
        if let Some(host) = server.host {
            config.server.host = host;
        }
        if let Some(port) = server.port {
            config.server.port = port;
        }
        if let Some(path) = server.fifo_path {
            config.server.fifo_path = path;
        }
        if let Some(limit) = server.commands_per_frame {
            config.server.commands_per_frame = limit.max(1);
        }
    }
    if let Some(ui) = raw.ui {
        if let Some(ms) = ui.frame_ms {
            config.ui.frame_interval = Duration::from_millis(ms.max(10));
        }
        if let Some(margin) = ui.scroll_margin {
            config.ui.scroll_margin = margin.max(0);
        }
        if let Some(step) = ui.fast_step {
            config.ui.fast_step = step.max(1);
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let config = Config::default();
        assert_eq!(config.server.port, 8765);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.commands_per_frame, 10);
        assert_eq!(config.ui.frame_interval, Duration::from_millis(50));
    }

    #[test]
    fn merge_overrides_only_present_keys() {
        let raw: RawConfig = toml::from_str(
            r#"
            [server]
            port = 9000
            commandsPerFrame = 25
            "#,
        )
        .expect("parse");
        let config = merge(raw);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.commands_per_frame, 25);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let raw: RawConfig = toml::from_str(
            r#"
            shiny = true
            [ui]
            frameMs = 100
            theme = "dark"
            "#,
        )
        .expect("parse");
        let config = merge(raw);
        assert_eq!(config.ui.frame_interval, Duration::from_millis(100));
    }

    #[test]
    fn config_path_honors_xdg_config_home() {
        let _guard = crate::test_utils::env_lock();
        let previous = std::env::var_os("XDG_CONFIG_HOME");
        std::env::set_var("XDG_CONFIG_HOME", "/tmp/xdg-test");
        let path = config_path().expect("path");
        assert_eq!(
            path,
            PathBuf::from("/tmp/xdg-test").join("mygrid").join("config.toml")
        );
        match previous {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    #[test]
    fn zero_limits_are_clamped() {
        let raw: RawConfig = toml::from_str(
            r#"
            [server]
            commands_per_frame = 0
            [ui]
            frameMs = 0
            fast_step = 0
            "#,
        )
        .expect("parse");
        let config = merge(raw);
        assert_eq!(config.server.commands_per_frame, 1);
        assert_eq!(config.ui.frame_interval, Duration::from_millis(10));
        assert_eq!(config.ui.fast_step, 1);
    }
}
