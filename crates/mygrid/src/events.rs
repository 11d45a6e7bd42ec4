//! Application event types.
//!
//! One enum carries everything that reaches the main loop: foreground
//! terminal input, zone handler traffic, and resize notifications. Events
//! travel over an mpsc channel and are applied sequentially by the single
//! mutator thread; handler events arriving after their zone was deleted
//! are discarded by name.

use crate::zones::ZoneLine;

#[derive(Debug)]
pub enum AppEvent {
    /// A foreground terminal event (key, resize, paste).
    Input(crossterm::event::Event),
    /// Full-buffer content from a PIPE/WATCH/PAGER run.
    ZoneContent {
        zone: String,
        lines: Vec<ZoneLine>,
        replace: bool,
    },
    /// A single streamed line (FIFO, SOCKET).
    ZoneLine { zone: String, line: ZoneLine },
    /// Raw PTY output bytes, fed to the zone's terminal screen.
    ZoneBytes { zone: String, bytes: Vec<u8> },
    /// The zone's child process or stream ended.
    ZoneClosed { zone: String, message: String },
    /// A handler hit an error it could not recover from this tick.
    ZoneError { zone: String, message: String },
}
