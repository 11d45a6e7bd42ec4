//! Minimal ANSI handling for command output.
//!
//! Zone handlers capture raw process output which may carry escape
//! sequences. Depending on the caller we either strip everything or
//! interpret SGR color codes into runs; cursor movement and other CSI
//! sequences are always dropped (the PTY zone type exists for programs
//! that need real emulation).

use crate::canvas::{Color, DEFAULT_COLOR};

use super::buffer::{Run, ZoneLine};

/// Remove all escape sequences, returning bare text.
pub fn strip(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\x1b' {
            out.push(ch);
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                // CSI: parameters then a final byte in @..~
                for next in chars.by_ref() {
                    if ('@'..='~').contains(&next) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                // OSC: terminated by BEL or ST
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if next == '\x07' || (prev == '\x1b' && next == '\\') {
                        break;
                    }
                    prev = next;
                }
            }
            _ => {
                chars.next();
            }
        }
    }
    out
}

/// Interpret SGR color sequences into styled runs; every other escape is
/// dropped. Only the classic 30–37/40–47 palette plus bright variants,
/// 39/49 resets and a full reset (0) are understood.
pub fn to_line(input: &str) -> ZoneLine {
    let mut runs: Vec<Run> = Vec::new();
    let mut current = String::new();
    let mut fg = DEFAULT_COLOR;
    let mut bg = DEFAULT_COLOR;

    let mut flush = |text: &mut String, runs: &mut Vec<Run>, fg: Color, bg: Color| {
        if !text.is_empty() {
            runs.push(Run {
                text: std::mem::take(text),
                fg,
                bg,
            });
        }
    };

    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\x1b' {
            current.push(ch);
            continue;
        }
        if chars.peek() != Some(&'[') {
            chars.next();
            continue;
        }
        chars.next();
        let mut params = String::new();
        let mut final_byte = '\0';
        for next in chars.by_ref() {
            if ('@'..='~').contains(&next) {
                final_byte = next;
                break;
            }
            params.push(next);
        }
        if final_byte != 'm' {
            continue;
        }
        flush(&mut current, &mut runs, fg, bg);
        if params.is_empty() {
            fg = DEFAULT_COLOR;
            bg = DEFAULT_COLOR;
            continue;
        }
        for code in params.split(';') {
            match code.parse::<u16>() {
                Ok(0) => {
                    fg = DEFAULT_COLOR;
                    bg = DEFAULT_COLOR;
                }
                Ok(n @ 30..=37) => fg = (n - 30) as Color,
                Ok(n @ 90..=97) => fg = (n - 90) as Color,
                Ok(39) => fg = DEFAULT_COLOR,
                Ok(n @ 40..=47) => bg = (n - 40) as Color,
                Ok(n @ 100..=107) => bg = (n - 100) as Color,
                Ok(49) => bg = DEFAULT_COLOR,
                _ => {}
            }
        }
    }
    flush(&mut current, &mut runs, fg, bg);
    ZoneLine { runs }
}

/// Split decoded output into lines, trimming trailing blank lines the way
/// command capture does.
pub fn split_lines(output: &str) -> Vec<String> {
    let mut lines: Vec<String> = output.split('\n').map(|s| s.to_string()).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_removes_sgr_and_osc() {
        assert_eq!(strip("\x1b[31mred\x1b[0m plain"), "red plain");
        assert_eq!(strip("\x1b]0;title\x07text"), "text");
        assert_eq!(strip("no escapes"), "no escapes");
    }

    #[test]
    fn sgr_colors_become_runs() {
        let line = to_line("\x1b[32mok\x1b[0m rest");
        assert_eq!(line.runs.len(), 2);
        assert_eq!(line.runs[0].text, "ok");
        assert_eq!(line.runs[0].fg, 2);
        assert_eq!(line.runs[1].text, " rest");
        assert_eq!(line.runs[1].fg, -1);
    }

    #[test]
    fn bright_and_background_codes() {
        let line = to_line("\x1b[91;44mx\x1b[39m");
        assert_eq!(line.runs[0].fg, 1);
        assert_eq!(line.runs[0].bg, 4);
    }

    #[test]
    fn non_sgr_csi_is_dropped() {
        let line = to_line("a\x1b[2Jb");
        assert_eq!(line.to_plain(), "ab");
    }

    #[test]
    fn trailing_blank_lines_trimmed() {
        assert_eq!(split_lines("a\nb\n\n\n"), vec!["a", "b"]);
        assert_eq!(split_lines(""), Vec::<String>::new());
    }
}
