//! Application state types and core data structures.
//!
//! `App` holds everything the single mutator thread owns: canvas,
//! viewport, zones, clipboard, mode machinery and the channels handlers
//! report through. Event handling lives in input.rs, drawing in
//! render.rs.

use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::bookmarks::Bookmarks;
use crate::border::BorderStyle;
use crate::canvas::{Canvas, Color, DEFAULT_COLOR};
use crate::clipboard::Clipboard;
use crate::config::Config;
use crate::events::AppEvent;
use crate::grid::GridSettings;
use crate::layouts::LayoutManager;
use crate::project::Project;
use crate::viewport::Viewport;
use crate::zones::ZoneRegistry;

/// How long zone handlers get to wind down on delete or exit.
pub const STOP_DEADLINE: Duration = Duration::from_secs(1);

/// Input-handling regime. Each mode owns the keys it consumes; Esc
/// always leads back toward Nav.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Nav,
    Pan,
    Edit,
    Command,
    MarkSet,
    MarkJump,
    Visual,
    Draw,
    /// A PTY (or pager) zone holds the input channel.
    PtyFocused,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Nav => "NAV",
            Mode::Pan => "PAN",
            Mode::Edit => "EDIT",
            Mode::Command => "COMMAND",
            Mode::MarkSet => "MARK_SET",
            Mode::MarkJump => "MARK_JUMP",
            Mode::Visual => "VISUAL",
            Mode::Draw => "DRAW",
            Mode::PtyFocused => "PTY",
        }
    }
}

/// Visual-mode selection: the anchor stays where the mode was entered,
/// the cursor is the opposite corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor_x: i64,
    pub anchor_y: i64,
}

impl Selection {
    /// Normalized rectangle `(x, y, w, h)` between anchor and cursor.
    /// Min/max on each axis keeps the rectangle valid when the cursor
    /// crosses the anchor.
    pub fn rect(&self, cursor_x: i64, cursor_y: i64) -> (i64, i64, i64, i64) {
        let min_x = self.anchor_x.min(cursor_x);
        let max_x = self.anchor_x.max(cursor_x);
        let min_y = self.anchor_y.min(cursor_y);
        let max_y = self.anchor_y.max(cursor_y);
        (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
    }

    pub fn contains(&self, cursor_x: i64, cursor_y: i64, cx: i64, cy: i64) -> bool {
        let (x, y, w, h) = self.rect(cursor_x, cursor_y);
        cx >= x && cx < x + w && cy >= y && cy < y + h
    }
}

/// Line editor for COMMAND mode, with history.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    pub text: String,
    pub cursor: usize,
    history: Vec<String>,
    history_index: Option<usize>,
}

impl CommandBuffer {
    pub fn insert(&mut self, ch: char) {
        let byte = self.byte_offset();
        self.text.insert(byte, ch);
        self.cursor += 1;
    }

    fn byte_offset(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len())
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let byte = self.byte_offset();
        self.text.remove(byte);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let byte = self.byte_offset();
            self.text.remove(byte);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.history_index = None;
    }

    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    /// Take the buffer contents, recording them in history.
    pub fn submit(&mut self) -> String {
        let line = std::mem::take(&mut self.text);
        if !line.is_empty() && self.history.last() != Some(&line) {
            self.history.push(line.clone());
        }
        self.cursor = 0;
        self.history_index = None;
        line
    }

    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next = match self.history_index {
            None => self.history.len() - 1,
            Some(0) => 0,
            Some(idx) => idx - 1,
        };
        self.history_index = Some(next);
        self.set(&self.history[next].clone());
    }

    pub fn history_next(&mut self) {
        match self.history_index {
            Some(idx) if idx + 1 < self.history.len() => {
                self.history_index = Some(idx + 1);
                self.set(&self.history[idx + 1].clone());
            }
            Some(_) => {
                self.history_index = None;
                self.text.clear();
                self.cursor = 0;
            }
            None => {}
        }
    }
}

/// Main application state container. The event loop is the only mutator.
pub struct App {
    pub canvas: Canvas,
    pub viewport: Viewport,
    pub grid: GridSettings,
    pub bookmarks: Bookmarks,
    pub clipboard: Clipboard,
    pub zones: ZoneRegistry,
    pub project: Project,
    pub layouts: LayoutManager,
    pub config: Config,

    pub mode: Mode,
    pub command_buffer: CommandBuffer,
    pub selection: Option<Selection>,
    pub border_style: BorderStyle,
    pub draw_fg: Color,
    pub draw_bg: Color,
    pub pen_down: bool,
    /// Zone currently holding the input channel (PTY or pager focus).
    pub focused_zone: Option<String>,

    pub message: Option<String>,
    pub should_quit: bool,
    pub headless: bool,
    pub server_port: Option<u16>,
    pub event_tx: Sender<AppEvent>,
}

impl App {
    pub fn new(config: Config, event_tx: Sender<AppEvent>, headless: bool) -> Self {
        Self {
            canvas: Canvas::new(),
            viewport: Viewport::default(),
            grid: GridSettings::default(),
            bookmarks: Bookmarks::new(),
            clipboard: Clipboard::new(),
            zones: ZoneRegistry::new(),
            project: Project::new(),
            layouts: LayoutManager::with_default_dir(),
            config,
            mode: Mode::Nav,
            command_buffer: CommandBuffer::default(),
            selection: None,
            border_style: BorderStyle::default(),
            draw_fg: DEFAULT_COLOR,
            draw_bg: DEFAULT_COLOR,
            pen_down: false,
            focused_zone: None,
            message: None,
            should_quit: false,
            headless,
            server_port: None,
            event_tx,
        }
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode == Mode::Command && mode != Mode::Command {
            self.command_buffer.clear();
        }
        if self.mode == Mode::Visual && mode != Mode::Visual {
            self.selection = None;
        }
        if self.mode == Mode::PtyFocused && mode != Mode::PtyFocused {
            self.focused_zone = None;
        }
        self.mode = mode;
    }

    pub fn show_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn scroll_margin(&self) -> i64 {
        self.config.ui.scroll_margin
    }

    pub fn fast_step(&self) -> i64 {
        self.config.ui.fast_step
    }

    /// Delete a zone and release its resources. The registry removal
    /// happens first so any in-flight events from the handler miss by
    /// name and are dropped.
    pub fn delete_zone(&mut self, name: &str) -> Result<(), String> {
        let mut zone = self
            .zones
            .remove(name)
            .ok_or_else(|| format!("Zone '{name}' not found"))?;
        if self
            .focused_zone
            .as_deref()
            .is_some_and(|focused| focused.eq_ignore_ascii_case(name))
        {
            self.focused_zone = None;
            if self.mode == Mode::PtyFocused {
                self.mode = Mode::Nav;
            }
        }
        zone.stop(STOP_DEADLINE);
        Ok(())
    }

    /// Stop every zone and the API ingress; used on quit.
    pub fn shutdown_zones(&mut self) {
        for mut zone in self.zones.drain() {
            zone.stop(STOP_DEADLINE);
        }
    }
}
