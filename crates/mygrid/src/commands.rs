//! Command system for the `:command` interface.
//!
//! One parser and one executor serve both COMMAND-mode input and the
//! external API, so every surface gets identical semantics. The registry
//! holds names and help text; parsing validates the top-level name;
//! execution mutates the App and reports a `CommandResult`.

pub(crate) mod exec;
mod parse;
mod registry;

pub use exec::execute;
pub use parse::{parse_command, tail_after, CommandError, CommandMatch};
pub use registry::{help_lines, CommandSpec, COMMANDS, TOP_LEVEL_COMMANDS};

/// Result of command execution. Errors are results too: they surface on
/// the status line or as an API error response, never as a panic.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub ok: bool,
    pub message: String,
    /// Structured payload for API callers (e.g. `status`).
    pub data: Option<serde_json::Value>,
    pub quit: bool,
}

impl CommandResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            data: None,
            quit: false,
        }
    }

    pub fn ok_with_data(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            ok: true,
            message: message.into(),
            data: Some(data),
            quit: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            data: None,
            quit: false,
        }
    }

    pub fn quit() -> Self {
        Self {
            ok: true,
            message: String::new(),
            data: None,
            quit: true,
        }
    }
}
