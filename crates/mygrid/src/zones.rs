//! Zones: named rectangular overlays whose content comes from handlers.
//!
//! A zone's rectangle is independent of canvas cells — zones are composed
//! over the canvas at render time. The registry preserves creation order,
//! which is also the z-order: later zones win overlapping cells.

use std::path::PathBuf;
use std::time::Duration;

pub mod ansi;
pub mod buffer;
pub mod fifo;
pub mod pager;
pub mod pipe;
pub mod pty;
pub mod socket;
pub mod watch;

pub use buffer::{Run, ZoneBuffer, ZoneLine};
pub use pty::PtySession;

/// What drives a WATCH zone: a fixed period or filesystem changes.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchTrigger {
    Interval(Duration),
    Path(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerRenderer {
    Plain,
    Ansi,
}

/// Per-type zone configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneConfig {
    Static,
    Pipe {
        command: String,
        auto_scroll: bool,
        max_lines: usize,
    },
    Watch {
        command: String,
        trigger: WatchTrigger,
        auto_scroll: bool,
        max_lines: usize,
    },
    Pty {
        shell: String,
        max_lines: usize,
    },
    Fifo {
        path: PathBuf,
        auto_scroll: bool,
        max_lines: usize,
    },
    Socket {
        port: u16,
        auto_scroll: bool,
        max_lines: usize,
    },
    Pager {
        path: PathBuf,
        renderer: PagerRenderer,
    },
    Clipboard,
}

pub const DEFAULT_MAX_LINES: usize = 1000;

impl ZoneConfig {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ZoneConfig::Static => "static",
            ZoneConfig::Pipe { .. } => "pipe",
            ZoneConfig::Watch { .. } => "watch",
            ZoneConfig::Pty { .. } => "pty",
            ZoneConfig::Fifo { .. } => "fifo",
            ZoneConfig::Socket { .. } => "socket",
            ZoneConfig::Pager { .. } => "pager",
            ZoneConfig::Clipboard => "clipboard",
        }
    }

    /// One-character tag shown in the zone border.
    pub fn tag(&self) -> char {
        match self {
            ZoneConfig::Static => 'S',
            ZoneConfig::Pipe { .. } => 'P',
            ZoneConfig::Watch { .. } => 'W',
            ZoneConfig::Pty { .. } => 'T',
            ZoneConfig::Pager { .. } => 'R',
            ZoneConfig::Fifo { .. } => 'F',
            ZoneConfig::Socket { .. } => 'N',
            ZoneConfig::Clipboard => 'C',
        }
    }

    pub fn max_lines(&self) -> usize {
        match self {
            ZoneConfig::Pipe { max_lines, .. }
            | ZoneConfig::Watch { max_lines, .. }
            | ZoneConfig::Pty { max_lines, .. }
            | ZoneConfig::Fifo { max_lines, .. }
            | ZoneConfig::Socket { max_lines, .. } => *max_lines,
            _ => DEFAULT_MAX_LINES,
        }
    }

    pub fn auto_scroll(&self) -> bool {
        match self {
            ZoneConfig::Pipe { auto_scroll, .. }
            | ZoneConfig::Watch { auto_scroll, .. }
            | ZoneConfig::Fifo { auto_scroll, .. }
            | ZoneConfig::Socket { auto_scroll, .. } => *auto_scroll,
            // A pager starts at the top of its file and scrolls manually.
            ZoneConfig::Pager { .. } => false,
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneState {
    Running,
    Paused,
    Stopped,
    Error(String),
}

impl ZoneState {
    pub fn label(&self) -> String {
        match self {
            ZoneState::Running => "running".to_string(),
            ZoneState::Paused => "paused".to_string(),
            ZoneState::Stopped => "stopped".to_string(),
            ZoneState::Error(msg) => format!("error: {msg}"),
        }
    }
}

/// Background resources a running zone owns.
pub enum ZoneRuntime {
    None,
    Handler(HandlerHandle),
    Pty(PtySession),
}

impl std::fmt::Debug for ZoneRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneRuntime::None => f.write_str("ZoneRuntime::None"),
            ZoneRuntime::Handler(_) => f.write_str("ZoneRuntime::Handler"),
            ZoneRuntime::Pty(_) => f.write_str("ZoneRuntime::Pty"),
        }
    }
}

/// Stop/pause controls plus the join handle for a handler thread.
pub struct HandlerHandle {
    stop: std::sync::Arc<std::sync::atomic::AtomicBool>,
    paused: std::sync::Arc<std::sync::atomic::AtomicBool>,
    wake: Option<Box<dyn Fn() + Send>>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl HandlerHandle {
    pub fn new(
        stop: std::sync::Arc<std::sync::atomic::AtomicBool>,
        paused: std::sync::Arc<std::sync::atomic::AtomicBool>,
        wake: Option<Box<dyn Fn() + Send>>,
        thread: std::thread::JoinHandle<()>,
    ) -> Self {
        Self {
            stop,
            paused,
            wake,
            thread: Some(thread),
        }
    }

    pub fn pause(&self) {
        self.paused.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused
            .store(false, std::sync::atomic::Ordering::SeqCst);
    }

    /// Signal the thread to stop and wait for it, up to `deadline`.
    /// Threads that stay blocked past the deadline are detached; their
    /// events are discarded once the zone is gone from the registry.
    pub fn stop(&mut self, deadline: Duration) {
        self.stop.store(true, std::sync::atomic::Ordering::SeqCst);
        if let Some(wake) = &self.wake {
            wake();
        }
        if let Some(thread) = self.thread.take() {
            let started = std::time::Instant::now();
            while !thread.is_finished() && started.elapsed() < deadline {
                std::thread::sleep(Duration::from_millis(10));
            }
            if thread.is_finished() {
                let _ = thread.join();
            } else {
                tracing::warn!("zone handler did not stop within deadline, detaching");
            }
        }
    }
}

#[derive(Debug)]
pub struct Zone {
    pub name: String,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub config: ZoneConfig,
    pub bookmark: Option<char>,
    pub description: String,
    pub buffer: ZoneBuffer,
    pub state: ZoneState,
    pub runtime: ZoneRuntime,
}

impl Zone {
    pub fn new(name: &str, x: i64, y: i64, width: i64, height: i64, config: ZoneConfig) -> Self {
        let buffer = ZoneBuffer::new(config.max_lines(), config.auto_scroll());
        Self {
            name: name.to_string(),
            x,
            y,
            width,
            height,
            config,
            bookmark: None,
            description: String::new(),
            buffer,
            state: ZoneState::Stopped,
            runtime: ZoneRuntime::None,
        }
    }

    /// Inner content area inside the one-cell border.
    pub fn inner_width(&self) -> u16 {
        (self.width - 2).clamp(0, u16::MAX as i64) as u16
    }

    pub fn inner_height(&self) -> u16 {
        (self.height - 2).clamp(0, u16::MAX as i64) as u16
    }

    pub fn contains(&self, cx: i64, cy: i64) -> bool {
        cx >= self.x && cx < self.x + self.width && cy >= self.y && cy < self.y + self.height
    }

    pub fn center(&self) -> (i64, i64) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn pty_session(&self) -> Option<&PtySession> {
        match &self.runtime {
            ZoneRuntime::Pty(session) => Some(session),
            _ => None,
        }
    }

    pub fn pty_session_mut(&mut self) -> Option<&mut PtySession> {
        match &mut self.runtime {
            ZoneRuntime::Pty(session) => Some(session),
            _ => None,
        }
    }

    /// Release background resources. Called on delete and on shutdown.
    pub fn stop(&mut self, deadline: Duration) {
        match std::mem::replace(&mut self.runtime, ZoneRuntime::None) {
            ZoneRuntime::None => {}
            ZoneRuntime::Handler(mut handle) => handle.stop(deadline),
            ZoneRuntime::Pty(mut session) => session.stop(deadline),
        }
        if !matches!(self.state, ZoneState::Error(_)) {
            self.state = ZoneState::Stopped;
        }
    }
}

/// Flat, name-indexed zone registry. Creation order is z-order.
#[derive(Debug, Default)]
pub struct ZoneRegistry {
    zones: Vec<Zone>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.zones
            .iter()
            .position(|zone| zone.name.eq_ignore_ascii_case(name))
    }

    pub fn insert(&mut self, zone: Zone) -> Result<(), String> {
        if self.index_of(&zone.name).is_some() {
            return Err(format!("Zone '{}' already exists", zone.name));
        }
        self.zones.push(zone);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Zone> {
        self.index_of(name).map(|i| &self.zones[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Zone> {
        self.index_of(name).map(move |i| &mut self.zones[i])
    }

    /// Remove a zone, returning it so the caller can release resources.
    pub fn remove(&mut self, name: &str) -> Option<Zone> {
        self.index_of(name).map(|i| self.zones.remove(i))
    }

    /// Topmost zone containing a canvas coordinate.
    pub fn find_at(&self, cx: i64, cy: i64) -> Option<&Zone> {
        self.zones.iter().rev().find(|zone| zone.contains(cx, cy))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.zones.iter().map(|zone| zone.name.clone()).collect()
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), String> {
        if self.index_of(new).is_some() && !old.eq_ignore_ascii_case(new) {
            return Err(format!("Zone '{new}' already exists"));
        }
        match self.get_mut(old) {
            Some(zone) => {
                zone.name = new.to_string();
                Ok(())
            }
            None => Err(format!("Zone '{old}' not found")),
        }
    }

    pub fn drain(&mut self) -> Vec<Zone> {
        std::mem::take(&mut self.zones)
    }
}

/// Replace `{file}` in a watch command with the changed path.
pub fn substitute_file(command: &str, path: &std::path::Path) -> String {
    command.replace("{file}", &path.to_string_lossy())
}

#[cfg(test)]
mod tests;
