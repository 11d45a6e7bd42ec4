//! PAGER zones: a scrollable view of a file.
//!
//! Content is read once at creation and again on explicit refresh. The
//! renderer hint decides whether SGR colors in the file are interpreted
//! or stripped.

use std::path::Path;

use super::{ansi, PagerRenderer, ZoneLine};

/// Load the file into zone lines.
pub fn load(path: &Path, renderer: PagerRenderer) -> Result<Vec<ZoneLine>, String> {
    let content = std::fs::read(path)
        .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    let text = String::from_utf8_lossy(&content);
    let lines = text
        .split('\n')
        .map(|line| {
            let line = line.trim_end_matches('\r');
            match renderer {
                PagerRenderer::Plain => ZoneLine::plain(ansi::strip(line)),
                PagerRenderer::Ansi => ansi::to_line(line),
            }
        })
        .collect::<Vec<_>>();
    // A trailing newline produces one empty tail line; drop it.
    let mut lines = lines;
    if lines.last().is_some_and(|line| line.runs.is_empty()) {
        lines.pop();
    }
    Ok(lines)
}
