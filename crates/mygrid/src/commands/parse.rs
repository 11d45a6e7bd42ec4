//! Command parsing.
//!
//! A command line is an optional `:`, a case-insensitive name, and
//! whitespace-separated arguments. The verbatim remainder after the name
//! is kept so rest-of-line commands (`text`, `zone send`) see exactly
//! what the user typed.

use super::registry::TOP_LEVEL_COMMANDS;

#[derive(Debug, Clone)]
pub struct CommandMatch {
    /// Lower-cased command name.
    pub name: String,
    pub args: Vec<String>,
    /// Everything after the name, untouched.
    pub rest: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn parse_command(input: &str) -> Result<CommandMatch, CommandError> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix(':').unwrap_or(trimmed).trim_start();
    if trimmed.is_empty() {
        return Err(CommandError::new("Empty command"));
    }

    let (name_token, rest) = match trimmed.find(char::is_whitespace) {
        Some(idx) => (&trimmed[..idx], trimmed[idx..].trim_start()),
        None => (trimmed, ""),
    };
    let name = name_token.to_ascii_lowercase();
    if !TOP_LEVEL_COMMANDS.contains(&name.as_str()) {
        return Err(CommandError::new(format!("Unknown command: {name}")));
    }

    Ok(CommandMatch {
        name,
        args: rest.split_whitespace().map(str::to_string).collect(),
        rest: rest.to_string(),
    })
}

/// The verbatim remainder of `rest` after skipping `n` whitespace-
/// delimited tokens. Used for commands whose final argument is free text.
pub fn tail_after(rest: &str, n: usize) -> &str {
    let mut remainder = rest.trim_start();
    for _ in 0..n {
        match remainder.find(char::is_whitespace) {
            Some(idx) => remainder = remainder[idx..].trim_start(),
            None => return "",
        }
    }
    remainder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_prefix_is_optional() {
        let with = parse_command(":goto 5 5").expect("parse");
        let without = parse_command("goto 5 5").expect("parse");
        assert_eq!(with.name, "goto");
        assert_eq!(without.name, "goto");
        assert_eq!(with.args, vec!["5", "5"]);
    }

    #[test]
    fn names_are_case_insensitive() {
        let parsed = parse_command(":GoTo 1 2").expect("parse");
        assert_eq!(parsed.name, "goto");
    }

    #[test]
    fn rest_preserves_internal_spacing() {
        let parsed = parse_command(":text two  spaces").expect("parse");
        assert_eq!(parsed.rest, "two  spaces");
        assert_eq!(parsed.args, vec!["two", "spaces"]);
    }

    #[test]
    fn unknown_and_empty_commands_are_errors() {
        assert!(parse_command(":frobnicate").is_err());
        assert!(parse_command("").is_err());
        assert!(parse_command(":").is_err());
    }

    #[test]
    fn tail_after_skips_tokens_verbatim() {
        let parsed = parse_command(":zone send shell ls  -la").expect("parse");
        assert_eq!(tail_after(&parsed.rest, 2), "ls  -la");
        assert_eq!(tail_after(&parsed.rest, 5), "");
    }
}
