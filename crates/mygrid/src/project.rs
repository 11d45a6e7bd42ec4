//! Project persistence: JSON save/load plus plain-text export/import.
//!
//! The on-disk shape is a versioned document with canvas cells, viewport,
//! grid settings, bookmarks and zone descriptors. Loading is forgiving:
//! unknown fields are ignored and missing ones take defaults, so newer
//! files open in older builds. A parse failure returns an error without
//! touching the running state — the caller only applies a fully decoded
//! document.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bookmarks::Bookmarks;
use crate::canvas::{Canvas, Cell, Color, DEFAULT_COLOR};
use crate::grid::{GridLineMode, GridSettings};
use crate::viewport::{Viewport, YDirection};
use crate::zones::{
    PagerRenderer, WatchTrigger, Zone, ZoneConfig, ZoneRegistry, DEFAULT_MAX_LINES,
};

pub const PROJECT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProjectMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub modified: String,
}

impl ProjectMetadata {
    pub fn new(name: &str) -> Self {
        let now = chrono::Local::now().to_rfc3339();
        Self {
            name: name.to_string(),
            created: now.clone(),
            modified: now,
        }
    }

    pub fn touch(&mut self) {
        self.modified = chrono::Local::now().to_rfc3339();
    }
}

fn is_default_color(color: &Color) -> bool {
    *color == DEFAULT_COLOR
}

#[derive(Debug, Serialize, Deserialize)]
struct CellRecord {
    x: i64,
    y: i64,
    #[serde(rename = "char")]
    ch: char,
    #[serde(default = "default_color", skip_serializing_if = "is_default_color")]
    fg: Color,
    #[serde(default = "default_color", skip_serializing_if = "is_default_color")]
    bg: Color,
}

fn default_color() -> Color {
    DEFAULT_COLOR
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CanvasRecord {
    #[serde(default)]
    cells: Vec<CellRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PointRecord {
    #[serde(default)]
    x: i64,
    #[serde(default)]
    y: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ViewportRecord {
    #[serde(default)]
    x: i64,
    #[serde(default)]
    y: i64,
    #[serde(default)]
    cursor: PointRecord,
    #[serde(default)]
    origin: PointRecord,
    #[serde(default)]
    y_direction: Option<YDirection>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GridRecord {
    #[serde(default)]
    show_origin: Option<bool>,
    #[serde(default)]
    show_major_lines: Option<bool>,
    #[serde(default)]
    show_minor_lines: Option<bool>,
    #[serde(default)]
    major_interval: Option<i64>,
    #[serde(default)]
    minor_interval: Option<i64>,
    #[serde(default)]
    line_mode: Option<String>,
    #[serde(default, alias = "show_rulers")]
    rulers: Option<bool>,
    #[serde(default, alias = "show_labels")]
    labels: Option<bool>,
    #[serde(default)]
    label_interval: Option<i64>,
}

/// Persistent shape of a zone's configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConfigDescriptor {
    Static,
    Pipe {
        command: String,
        #[serde(default = "default_true")]
        auto_scroll: bool,
        #[serde(default = "default_max_lines")]
        max_lines: usize,
    },
    Watch {
        command: String,
        #[serde(default)]
        interval_secs: Option<f64>,
        #[serde(default)]
        watch_path: Option<PathBuf>,
        #[serde(default = "default_true")]
        auto_scroll: bool,
        #[serde(default = "default_max_lines")]
        max_lines: usize,
    },
    Pty {
        #[serde(default = "default_shell")]
        shell: String,
        #[serde(default = "default_max_lines")]
        max_lines: usize,
    },
    Fifo {
        path: PathBuf,
        #[serde(default = "default_true")]
        auto_scroll: bool,
        #[serde(default = "default_max_lines")]
        max_lines: usize,
    },
    Socket {
        port: u16,
        #[serde(default = "default_true")]
        auto_scroll: bool,
        #[serde(default = "default_max_lines")]
        max_lines: usize,
    },
    Pager {
        file: PathBuf,
        #[serde(default)]
        renderer: Option<String>,
    },
    Clipboard,
}

fn default_true() -> bool {
    true
}

fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES
}

fn default_shell() -> String {
    std::env::var("SHELL").unwrap_or_else(|_| "/bin/bash".to_string())
}

impl ConfigDescriptor {
    pub fn from_config(config: &ZoneConfig) -> Self {
        match config {
            ZoneConfig::Static => ConfigDescriptor::Static,
            ZoneConfig::Pipe {
                command,
                auto_scroll,
                max_lines,
            } => ConfigDescriptor::Pipe {
                command: command.clone(),
                auto_scroll: *auto_scroll,
                max_lines: *max_lines,
            },
            ZoneConfig::Watch {
                command,
                trigger,
                auto_scroll,
                max_lines,
            } => {
                let (interval_secs, watch_path) = match trigger {
                    WatchTrigger::Interval(duration) => (Some(duration.as_secs_f64()), None),
                    WatchTrigger::Path(path) => (None, Some(path.clone())),
                };
                ConfigDescriptor::Watch {
                    command: command.clone(),
                    interval_secs,
                    watch_path,
                    auto_scroll: *auto_scroll,
                    max_lines: *max_lines,
                }
            }
            ZoneConfig::Pty { shell, max_lines } => ConfigDescriptor::Pty {
                shell: shell.clone(),
                max_lines: *max_lines,
            },
            ZoneConfig::Fifo {
                path,
                auto_scroll,
                max_lines,
            } => ConfigDescriptor::Fifo {
                path: path.clone(),
                auto_scroll: *auto_scroll,
                max_lines: *max_lines,
            },
            ZoneConfig::Socket {
                port,
                auto_scroll,
                max_lines,
            } => ConfigDescriptor::Socket {
                port: *port,
                auto_scroll: *auto_scroll,
                max_lines: *max_lines,
            },
            ZoneConfig::Pager { path, renderer } => ConfigDescriptor::Pager {
                file: path.clone(),
                renderer: match renderer {
                    PagerRenderer::Plain => None,
                    PagerRenderer::Ansi => Some("ansi".to_string()),
                },
            },
            ZoneConfig::Clipboard => ConfigDescriptor::Clipboard,
        }
    }

    pub fn into_config(self) -> Result<ZoneConfig, String> {
        Ok(match self {
            ConfigDescriptor::Static => ZoneConfig::Static,
            ConfigDescriptor::Pipe {
                command,
                auto_scroll,
                max_lines,
            } => ZoneConfig::Pipe {
                command,
                auto_scroll,
                max_lines,
            },
            ConfigDescriptor::Watch {
                command,
                interval_secs,
                watch_path,
                auto_scroll,
                max_lines,
            } => {
                let trigger = match (interval_secs, watch_path) {
                    (_, Some(path)) => WatchTrigger::Path(path),
                    (Some(secs), None) if secs > 0.0 => {
                        WatchTrigger::Interval(std::time::Duration::from_secs_f64(secs))
                    }
                    _ => return Err("watch zone needs an interval or a watch path".to_string()),
                };
                ZoneConfig::Watch {
                    command,
                    trigger,
                    auto_scroll,
                    max_lines,
                }
            }
            ConfigDescriptor::Pty { shell, max_lines } => ZoneConfig::Pty { shell, max_lines },
            ConfigDescriptor::Fifo {
                path,
                auto_scroll,
                max_lines,
            } => ZoneConfig::Fifo {
                path,
                auto_scroll,
                max_lines,
            },
            ConfigDescriptor::Socket {
                port,
                auto_scroll,
                max_lines,
            } => ZoneConfig::Socket {
                port,
                auto_scroll,
                max_lines,
            },
            ConfigDescriptor::Pager { file, renderer } => ZoneConfig::Pager {
                path: file,
                renderer: match renderer.as_deref() {
                    Some("ansi") => PagerRenderer::Ansi,
                    _ => PagerRenderer::Plain,
                },
            },
            ConfigDescriptor::Clipboard => ZoneConfig::Clipboard,
        })
    }
}

/// Persistent shape of a zone, shared between projects and layouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneDescriptor {
    pub name: String,
    pub x: i64,
    pub y: i64,
    #[serde(rename = "w", alias = "width")]
    pub width: i64,
    #[serde(rename = "h", alias = "height")]
    pub height: i64,
    #[serde(default = "static_config")]
    pub config: ConfigDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<char>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

fn static_config() -> ConfigDescriptor {
    ConfigDescriptor::Static
}

impl ZoneDescriptor {
    pub fn from_zone(zone: &Zone) -> Self {
        Self {
            name: zone.name.clone(),
            x: zone.x,
            y: zone.y,
            width: zone.width,
            height: zone.height,
            config: ConfigDescriptor::from_config(&zone.config),
            bookmark: zone.bookmark,
            description: zone.description.clone(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ZonesRecord {
    #[serde(default)]
    zones: Vec<ZoneDescriptor>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ProjectFile {
    version: String,
    #[serde(default)]
    metadata: ProjectMetadata,
    #[serde(default)]
    canvas: CanvasRecord,
    #[serde(default)]
    viewport: Option<ViewportRecord>,
    #[serde(default)]
    grid: Option<GridRecord>,
    #[serde(default)]
    bookmarks: std::collections::BTreeMap<String, PointRecord>,
    #[serde(default)]
    zones: ZonesRecord,
}

/// A decoded project document, ready to be applied to live state.
#[derive(Debug)]
pub struct LoadedProject {
    pub metadata: ProjectMetadata,
    pub canvas: Canvas,
    pub viewport_pos: (i64, i64),
    pub cursor: (i64, i64),
    pub origin: (i64, i64),
    pub y_direction: YDirection,
    pub grid: GridSettings,
    pub bookmarks: Bookmarks,
    pub zones: Vec<ZoneDescriptor>,
}

/// Tracks the current file and unsaved-changes state.
#[derive(Debug, Default)]
pub struct Project {
    pub filepath: Option<PathBuf>,
    pub metadata: ProjectMetadata,
    dirty: bool,
}

impl Project {
    pub fn new() -> Self {
        Self {
            filepath: None,
            metadata: ProjectMetadata::new("Untitled"),
            dirty: false,
        }
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn filename(&self) -> String {
        self.filepath
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    pub fn display_name(&self) -> String {
        if self.dirty {
            format!("*{}", self.filename())
        } else {
            self.filename()
        }
    }

    /// Serialize the full state to a JSON project file.
    #[allow(clippy::too_many_arguments)]
    pub fn save(
        &mut self,
        path: &Path,
        canvas: &Canvas,
        viewport: &Viewport,
        grid: &GridSettings,
        bookmarks: &Bookmarks,
        zones: &ZoneRegistry,
    ) -> Result<(), String> {
        self.metadata.touch();
        if self.metadata.name.is_empty() || self.metadata.name == "Untitled" {
            if let Some(stem) = path.file_stem() {
                self.metadata.name = stem.to_string_lossy().into_owned();
            }
        }

        let mut cells: Vec<CellRecord> = canvas
            .cells()
            .map(|(x, y, cell)| CellRecord {
                x,
                y,
                ch: cell.ch,
                fg: cell.fg,
                bg: cell.bg,
            })
            .collect();
        cells.sort_by_key(|cell| (cell.y, cell.x));

        let file = ProjectFile {
            version: PROJECT_VERSION.to_string(),
            metadata: self.metadata.clone(),
            canvas: CanvasRecord { cells },
            viewport: Some(ViewportRecord {
                x: viewport.x,
                y: viewport.y,
                cursor: PointRecord {
                    x: viewport.cursor.x,
                    y: viewport.cursor.y,
                },
                origin: PointRecord {
                    x: viewport.origin.x,
                    y: viewport.origin.y,
                },
                y_direction: Some(viewport.y_direction),
            }),
            grid: Some(GridRecord {
                show_origin: Some(grid.show_origin),
                show_major_lines: Some(grid.show_major_lines),
                show_minor_lines: Some(grid.show_minor_lines),
                major_interval: Some(grid.major_interval),
                minor_interval: Some(grid.minor_interval),
                line_mode: Some(grid.line_mode.name().to_string()),
                rulers: Some(grid.show_rulers),
                labels: Some(grid.show_labels),
                label_interval: Some(grid.label_interval),
            }),
            bookmarks: bookmarks
                .list()
                .map(|(key, bm)| (key.to_string(), PointRecord { x: bm.x, y: bm.y }))
                .collect(),
            zones: ZonesRecord {
                zones: zones.iter().map(ZoneDescriptor::from_zone).collect(),
            },
        };

        let json = serde_json::to_string_pretty(&file).map_err(|err| err.to_string())?;
        std::fs::write(path, json + "\n")
            .map_err(|err| format!("cannot write {}: {err}", path.display()))?;
        self.filepath = Some(path.to_path_buf());
        self.mark_clean();
        Ok(())
    }

    /// Decode a project file without touching live state.
    pub fn load(path: &Path) -> Result<LoadedProject, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
        let file: ProjectFile = serde_json::from_str(&content)
            .map_err(|err| format!("invalid project file: {err}"))?;
        if !file.version.starts_with("1.") {
            return Err(format!("unsupported project version: {}", file.version));
        }

        let mut canvas = Canvas::new();
        for record in file.canvas.cells {
            canvas.set(
                record.x,
                record.y,
                Cell::styled(record.ch, record.fg, record.bg),
            );
        }

        let mut bookmarks = Bookmarks::new();
        for (key, point) in &file.bookmarks {
            if let Some(ch) = key.chars().next() {
                bookmarks.set(ch, point.x, point.y);
            }
        }

        let mut grid = GridSettings::default();
        if let Some(record) = file.grid {
            if let Some(value) = record.show_origin {
                grid.show_origin = value;
            }
            if let Some(value) = record.show_major_lines {
                grid.show_major_lines = value;
            }
            if let Some(value) = record.show_minor_lines {
                grid.show_minor_lines = value;
            }
            if let Some(value) = record.major_interval {
                grid.major_interval = value;
            }
            if let Some(value) = record.minor_interval {
                grid.minor_interval = value;
            }
            if let Some(mode) = record.line_mode.as_deref().and_then(GridLineMode::parse) {
                grid.line_mode = mode;
            }
            if let Some(value) = record.rulers {
                grid.show_rulers = value;
            }
            if let Some(value) = record.labels {
                grid.show_labels = value;
            }
            if let Some(value) = record.label_interval {
                grid.label_interval = value;
            }
        }

        let (viewport_pos, cursor, origin, y_direction) = match file.viewport {
            Some(record) => (
                (record.x, record.y),
                (record.cursor.x, record.cursor.y),
                (record.origin.x, record.origin.y),
                record.y_direction.unwrap_or_default(),
            ),
            None => ((0, 0), (0, 0), (0, 0), YDirection::default()),
        };

        Ok(LoadedProject {
            metadata: file.metadata,
            canvas,
            viewport_pos,
            cursor,
            origin,
            y_direction,
            grid,
            bookmarks,
            zones: file.zones.zones,
        })
    }
}

/// Export the canvas bounding box as plain text: right-trimmed lines,
/// trailing newline, no BOM.
pub fn export_text(canvas: &Canvas, path: &Path) -> Result<usize, String> {
    let mut lines: Vec<String> = Vec::new();
    if let Some(bbox) = canvas.bounding_box() {
        for y in bbox.min_y..=bbox.max_y {
            let line: String = (bbox.min_x..=bbox.max_x)
                .map(|x| canvas.get_char(x, y))
                .collect();
            lines.push(line.trim_end().to_string());
        }
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
    }
    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    std::fs::write(path, content).map_err(|err| format!("cannot write {}: {err}", path.display()))?;
    Ok(lines.len())
}

/// Import a text file at an offset, one line per row, skipping spaces.
pub fn import_text(canvas: &mut Canvas, path: &Path, x: i64, y: i64) -> Result<usize, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    let mut rows = 0usize;
    for (dy, line) in content.lines().enumerate() {
        for (dx, ch) in line.chars().enumerate() {
            if ch != ' ' {
                canvas.set_char(x + dx as i64, y + dy as i64, ch);
            }
        }
        rows += 1;
    }
    Ok(rows)
}

#[cfg(test)]
mod tests;
