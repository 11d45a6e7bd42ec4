//! Layout templates: named zone arrangements stored as YAML.
//!
//! Layouts live in `~/.config/mygrid/layouts/` (XDG-style) and carry the
//! same zone descriptors the project file uses, minus any runtime state.
//! Loading a layout into a running instance creates its zones one by one
//! and keeps going past individual failures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::project::ZoneDescriptor;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LayoutCursor {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Layout {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<LayoutCursor>,
    #[serde(default)]
    pub zones: Vec<ZoneDescriptor>,
}

#[derive(Debug)]
pub struct LayoutManager {
    dir: PathBuf,
}

/// `~/.config/mygrid/layouts`, honoring `XDG_CONFIG_HOME`.
pub fn default_layouts_dir() -> PathBuf {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("mygrid").join("layouts")
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '_')
        .collect::<String>()
        .to_lowercase()
}

impl LayoutManager {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn with_default_dir() -> Self {
        Self::new(default_layouts_dir())
    }

    fn layout_path(&self, name: &str) -> Result<PathBuf, String> {
        let safe = sanitize_name(name);
        if safe.is_empty() {
            return Err(format!("invalid layout name: {name}"));
        }
        Ok(self.dir.join(format!("{safe}.yaml")))
    }

    pub fn save(&self, layout: &Layout) -> Result<PathBuf, String> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|err| format!("cannot create {}: {err}", self.dir.display()))?;
        let path = self.layout_path(&layout.name)?;
        let yaml = serde_yaml::to_string(layout).map_err(|err| err.to_string())?;
        std::fs::write(&path, yaml)
            .map_err(|err| format!("cannot write {}: {err}", path.display()))?;
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<Layout, String> {
        let path = self.layout_path(name)?;
        let content = std::fs::read_to_string(&path)
            .map_err(|_| format!("layout '{name}' not found"))?;
        serde_yaml::from_str(&content).map_err(|err| format!("invalid layout '{name}': {err}"))
    }

    pub fn delete(&self, name: &str) -> Result<(), String> {
        let path = self.layout_path(name)?;
        if path.exists() {
            std::fs::remove_file(&path)
                .map_err(|err| format!("cannot delete {}: {err}", path.display()))
        } else {
            Err(format!("layout '{name}' not found"))
        }
    }

    /// `(name, description)` pairs for every layout on disk, sorted.
    pub fn list(&self) -> Vec<(String, String)> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut layouts = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("yaml") {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            if let Ok(layout) = serde_yaml::from_str::<Layout>(&content) {
                let name = if layout.name.is_empty() {
                    path.file_stem()
                        .map(|stem| stem.to_string_lossy().into_owned())
                        .unwrap_or_default()
                } else {
                    layout.name
                };
                layouts.push((name, layout.description));
            }
        }
        layouts.sort();
        layouts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ConfigDescriptor;
    use tempfile::TempDir;

    fn manager() -> (TempDir, LayoutManager) {
        let dir = TempDir::new().expect("temp dir");
        let manager = LayoutManager::new(dir.path().join("layouts"));
        (dir, manager)
    }

    fn sample_layout() -> Layout {
        Layout {
            name: "dashboard".to_string(),
            description: "status zones".to_string(),
            cursor: Some(LayoutCursor { x: 5, y: 5 }),
            zones: vec![
                ZoneDescriptor {
                    name: "clock".to_string(),
                    x: 0,
                    y: 0,
                    width: 30,
                    height: 5,
                    config: ConfigDescriptor::Watch {
                        command: "date".to_string(),
                        interval_secs: Some(1.0),
                        watch_path: None,
                        auto_scroll: true,
                        max_lines: 100,
                    },
                    bookmark: Some('c'),
                    description: String::new(),
                },
                ZoneDescriptor {
                    name: "notes".to_string(),
                    x: 0,
                    y: 6,
                    width: 30,
                    height: 10,
                    config: ConfigDescriptor::Static,
                    bookmark: None,
                    description: "scratch".to_string(),
                },
            ],
        }
    }

    #[test]
    fn save_load_round_trip() {
        let (_dir, manager) = manager();
        manager.save(&sample_layout()).expect("save");

        let loaded = manager.load("dashboard").expect("load");
        assert_eq!(loaded.name, "dashboard");
        assert_eq!(loaded.zones.len(), 2);
        assert_eq!(loaded.zones[0].name, "clock");
        assert_eq!(loaded.cursor.map(|c| (c.x, c.y)), Some((5, 5)));
        match &loaded.zones[0].config {
            ConfigDescriptor::Watch { interval_secs, .. } => {
                assert_eq!(*interval_secs, Some(1.0));
            }
            other => panic!("expected watch, got {other:?}"),
        }
    }

    #[test]
    fn list_and_delete() {
        let (_dir, manager) = manager();
        assert!(manager.list().is_empty());
        manager.save(&sample_layout()).expect("save");

        let listed = manager.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0, "dashboard");

        manager.delete("dashboard").expect("delete");
        assert!(manager.list().is_empty());
        assert!(manager.delete("dashboard").is_err());
    }

    #[test]
    fn names_are_sanitized_for_paths() {
        let (_dir, manager) = manager();
        let mut layout = sample_layout();
        layout.name = "My Dash/Board!".to_string();
        let path = manager.save(&layout).expect("save");
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("mydashboard.yaml"));
        assert!(manager.load("mydashboard").is_ok());
        assert!(manager.load("///").is_err());
    }

    #[test]
    fn missing_layout_is_an_error() {
        let (_dir, manager) = manager();
        assert!(manager.load("nope").is_err());
    }
}
