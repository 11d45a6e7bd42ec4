//! Terminal emulation for PTY zones.
//!
//! The heavy lifting is delegated to the `vt100` crate; this module wraps
//! it behind the small surface the rest of the app needs (feed bytes,
//! styled lines, scrollback, cursor, resize) and translates key events
//! into the byte sequences a shell expects.

pub mod input;
pub mod screen;

pub use input::key_event_to_bytes;
pub use screen::TermScreen;
