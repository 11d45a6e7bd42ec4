//! PIPE zones: one-shot command capture.
//!
//! The command runs through `sh -c`, stdout and stderr are captured
//! together, decoded as lossy UTF-8 and split into lines with SGR colors
//! interpreted. Execution happens on a short-lived thread so a slow
//! command never stalls the loop; the result arrives as a ZoneContent
//! event.

use std::process::Command;
use std::sync::mpsc::Sender;

use crate::events::AppEvent;

use super::ansi;
use super::ZoneLine;

/// Run a shell command and capture its combined output as zone lines.
/// Returns the lines plus a status suffix for the completion message.
pub fn capture(command: &str) -> Result<(Vec<ZoneLine>, String), String> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .map_err(|err| format!("spawn failed: {err}"))?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    if !output.stderr.is_empty() {
        if !combined.is_empty() {
            combined.push('\n');
        }
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
    }

    let lines = ansi::split_lines(&combined)
        .into_iter()
        .map(|line| ansi::to_line(&line))
        .collect();

    let status = match output.status.code() {
        Some(0) => "exit 0".to_string(),
        Some(code) => format!("exit {code}"),
        None => "killed by signal".to_string(),
    };
    Ok((lines, status))
}

/// Execute asynchronously; the zone's buffer is replaced when the event
/// is applied. Used at creation and on `:zone refresh`.
pub fn spawn(zone: String, command: String, events: Sender<AppEvent>) {
    std::thread::Builder::new()
        .name(format!("pipe-{zone}"))
        .spawn(move || match capture(&command) {
            Ok((lines, status)) => {
                let _ = events.send(AppEvent::ZoneContent {
                    zone: zone.clone(),
                    lines,
                    replace: true,
                });
                let _ = events.send(AppEvent::ZoneClosed {
                    zone,
                    message: status,
                });
            }
            Err(message) => {
                let _ = events.send(AppEvent::ZoneError { zone, message });
            }
        })
        .map(|_| ())
        .unwrap_or_else(|err| tracing::warn!("failed to spawn pipe thread: {err}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_combines_stdout_and_stderr() {
        let (lines, status) = capture("echo out; echo err 1>&2").expect("capture");
        let texts: Vec<String> = lines.iter().map(|l| l.to_plain()).collect();
        assert_eq!(texts, vec!["out", "err"]);
        assert_eq!(status, "exit 0");
    }

    #[test]
    fn capture_reports_exit_code() {
        let (lines, status) = capture("exit 3").expect("capture");
        assert!(lines.is_empty());
        assert_eq!(status, "exit 3");
    }

    #[test]
    fn capture_interprets_colors() {
        let (lines, _) = capture("printf '\\033[31mred\\033[0m\\n'").expect("capture");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].runs[0].fg, 1);
        assert_eq!(lines[0].to_plain(), "red");
    }
}
