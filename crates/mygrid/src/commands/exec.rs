//! Command execution.
//!
//! Every command mutates the App and returns a `CommandResult`. Errors
//! never terminate the loop; a failed command leaves observable state as
//! it was before the command ran.

pub mod layout;
pub mod zone;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use crate::app::App;
use crate::canvas::{color_name, parse_color, Cell, RectChars, DEFAULT_COLOR};
use crate::grid::GridLineMode;
use crate::project::{export_text, import_text};
use crate::viewport::YDirection;

use super::{parse_command, registry, CommandResult};

/// Parse and execute one command line.
pub fn execute(app: &mut App, line: &str) -> CommandResult {
    let parsed = match parse_command(line) {
        Ok(parsed) => parsed,
        Err(err) => return CommandResult::error(err.message),
    };
    let args: Vec<&str> = parsed.args.iter().map(String::as_str).collect();

    match parsed.name.as_str() {
        "quit" | "q" => CommandResult::quit(),
        "write" | "w" => cmd_write(app, &args, false),
        "wq" => cmd_write(app, &args, true),
        "goto" | "g" => cmd_goto(app, &args),
        "origin" => cmd_origin(app, &args),
        "pan" => cmd_pan(app, &args),
        "clear" => {
            app.canvas.clear_all();
            app.project.mark_dirty();
            CommandResult::ok("Canvas cleared")
        }
        "rect" => cmd_rect(app, &args),
        "line" => cmd_line(app, &args),
        "text" => cmd_text(app, &parsed.rest),
        "fill" => cmd_fill(app, &args),
        "grid" => cmd_grid(app, &args),
        "mark" => cmd_mark(app, &args),
        "delmark" => cmd_delmark(app, &args),
        "delmarks" => {
            app.bookmarks.clear();
            CommandResult::ok("All marks deleted")
        }
        "marks" => cmd_marks(app),
        "export" => cmd_export(app, &args),
        "import" => cmd_import(app, &args),
        "ydir" => cmd_ydir(app, &args),
        "yank" => cmd_yank(app, &args),
        "paste" => cmd_paste(app, &args),
        "clipboard" => cmd_clipboard(app, &args),
        "color" => cmd_color(app, &args),
        "palette" => CommandResult::ok(
            "Colors: black(0) red(1) green(2) yellow(3) blue(4) magenta(5) cyan(6) white(7)",
        ),
        "border" => cmd_border(app, &args),
        "search" => cmd_search(app, &parsed.rest),
        "zone" => zone::run(app, &args, &parsed.rest),
        "zones" => zone::list(app),
        "layout" => layout::run(app, &args, &parsed.rest),
        "status" => cmd_status(app),
        "help" => CommandResult::ok(registry::help_lines().join("\n")),
        other => CommandResult::error(format!("Unknown command: {other}")),
    }
}

fn parse_i64(token: &str, what: &str) -> Result<i64, CommandResult> {
    token
        .parse()
        .map_err(|_| CommandResult::error(format!("Invalid {what}: {token}")))
}

fn cmd_write(app: &mut App, args: &[&str], quit_after: bool) -> CommandResult {
    let path = match args.first() {
        Some(name) => {
            let mut path = PathBuf::from(name);
            if path.extension().is_none() {
                path.set_extension("json");
            }
            path
        }
        None => match &app.project.filepath {
            Some(path) => path.clone(),
            None => return CommandResult::error("No file name (use :write FILE)"),
        },
    };

    let App {
        project,
        canvas,
        viewport,
        grid,
        bookmarks,
        zones,
        ..
    } = app;
    match project.save(&path, canvas, viewport, grid, bookmarks, zones) {
        Ok(()) => {
            let mut result = CommandResult::ok(format!("Saved: {}", path.display()));
            result.quit = quit_after;
            result
        }
        Err(err) => CommandResult::error(format!("Save error: {err}")),
    }
}

fn cmd_goto(app: &mut App, args: &[&str]) -> CommandResult {
    let (Some(x), Some(y)) = (args.first(), args.get(1)) else {
        return CommandResult::error("Usage: goto X Y");
    };
    let x = match parse_i64(x, "coordinate") {
        Ok(value) => value,
        Err(err) => return err,
    };
    let y = match parse_i64(y, "coordinate") {
        Ok(value) => value,
        Err(err) => return err,
    };
    app.viewport.set_cursor(x, y);
    app.viewport.ensure_cursor_visible(app.scroll_margin());
    CommandResult::ok(format!("Moved to ({x}, {y})"))
}

fn cmd_origin(app: &mut App, args: &[&str]) -> CommandResult {
    let (x, y) = match args {
        [] | ["here"] => (app.viewport.cursor.x, app.viewport.cursor.y),
        [x, y, ..] => {
            let x = match parse_i64(x, "coordinate") {
                Ok(value) => value,
                Err(err) => return err,
            };
            let y = match parse_i64(y, "coordinate") {
                Ok(value) => value,
                Err(err) => return err,
            };
            (x, y)
        }
        _ => return CommandResult::error("Usage: origin [X Y | here]"),
    };
    app.viewport.origin.x = x;
    app.viewport.origin.y = y;
    CommandResult::ok(format!("Origin set to ({x}, {y})"))
}

fn cmd_pan(app: &mut App, args: &[&str]) -> CommandResult {
    let (Some(dx), Some(dy)) = (args.first(), args.get(1)) else {
        return CommandResult::error("Usage: pan X Y");
    };
    let dx = match parse_i64(dx, "delta") {
        Ok(value) => value,
        Err(err) => return err,
    };
    let dy = match parse_i64(dy, "delta") {
        Ok(value) => value,
        Err(err) => return err,
    };
    app.viewport.pan(dx, dy);
    CommandResult::ok(format!("Panned by ({dx}, {dy})"))
}

fn cmd_rect(app: &mut App, args: &[&str]) -> CommandResult {
    let (Some(w), Some(h)) = (args.first(), args.get(1)) else {
        return CommandResult::error("Usage: rect W H [glyph]");
    };
    let w = match parse_i64(w, "width") {
        Ok(value) if value > 0 => value,
        Ok(_) => return CommandResult::error("Width must be positive"),
        Err(err) => return err,
    };
    let h = match parse_i64(h, "height") {
        Ok(value) if value > 0 => value,
        Ok(_) => return CommandResult::error("Height must be positive"),
        Err(err) => return err,
    };
    let chars = match args.get(2).and_then(|arg| arg.chars().next()) {
        Some(glyph) => RectChars::uniform(glyph),
        None => app.border_style.rect_chars(),
    };
    let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
    app.canvas
        .draw_rect(cx, cy, w, h, chars, app.draw_fg, app.draw_bg);
    app.project.mark_dirty();
    CommandResult::ok(format!("Drew {w}x{h} rectangle"))
}

fn cmd_line(app: &mut App, args: &[&str]) -> CommandResult {
    let (Some(x2), Some(y2)) = (args.first(), args.get(1)) else {
        return CommandResult::error("Usage: line X2 Y2 [glyph]");
    };
    let x2 = match parse_i64(x2, "coordinate") {
        Ok(value) => value,
        Err(err) => return err,
    };
    let y2 = match parse_i64(y2, "coordinate") {
        Ok(value) => value,
        Err(err) => return err,
    };
    let glyph = args.get(2).and_then(|arg| arg.chars().next()).unwrap_or('*');
    let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
    app.canvas.draw_line(
        cx,
        cy,
        x2,
        y2,
        Cell::styled(glyph, app.draw_fg, app.draw_bg),
    );
    app.project.mark_dirty();
    CommandResult::ok(format!("Drew line to ({x2}, {y2})"))
}

fn cmd_text(app: &mut App, rest: &str) -> CommandResult {
    if rest.is_empty() {
        return CommandResult::error("Usage: text MESSAGE");
    }
    let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
    app.canvas
        .write_text(cx, cy, rest, app.draw_fg, app.draw_bg);
    app.project.mark_dirty();
    CommandResult::ok(format!("Wrote {} characters", rest.chars().count()))
}

fn cmd_fill(app: &mut App, args: &[&str]) -> CommandResult {
    let (x, y, w, h, glyph) = match args {
        [x, y, w, h, glyph] => {
            let x = match parse_i64(x, "coordinate") {
                Ok(value) => value,
                Err(err) => return err,
            };
            let y = match parse_i64(y, "coordinate") {
                Ok(value) => value,
                Err(err) => return err,
            };
            (x, y, *w, *h, *glyph)
        }
        [w, h, glyph] => (
            app.viewport.cursor.x,
            app.viewport.cursor.y,
            *w,
            *h,
            *glyph,
        ),
        _ => return CommandResult::error("Usage: fill [X Y] W H CHAR"),
    };
    let w = match parse_i64(w, "width") {
        Ok(value) if value > 0 => value,
        _ => return CommandResult::error("Usage: fill [X Y] W H CHAR"),
    };
    let h = match parse_i64(h, "height") {
        Ok(value) if value > 0 => value,
        _ => return CommandResult::error("Usage: fill [X Y] W H CHAR"),
    };
    let glyph = glyph.chars().next().unwrap_or(' ');
    app.canvas.fill_rect(
        x,
        y,
        w,
        h,
        Cell::styled(glyph, app.draw_fg, app.draw_bg),
    );
    app.project.mark_dirty();
    CommandResult::ok(format!("Filled {w}x{h} region with '{glyph}'"))
}

fn cmd_grid(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(arg) = args.first() else {
        return CommandResult::ok(format!(
            "Grid: mode={} major={} minor={} rulers={} labels={}",
            app.grid.line_mode.name(),
            app.grid.major_interval,
            app.grid.minor_interval,
            if app.grid.show_rulers { "ON" } else { "OFF" },
            if app.grid.show_labels { "ON" } else { "OFF" },
        ));
    };

    match arg.to_ascii_lowercase().as_str() {
        "major" => {
            app.grid.show_major_lines = !app.grid.show_major_lines;
            CommandResult::ok(format!(
                "Major grid: {}",
                if app.grid.show_major_lines { "ON" } else { "OFF" }
            ))
        }
        "minor" => {
            app.grid.show_minor_lines = !app.grid.show_minor_lines;
            CommandResult::ok(format!(
                "Minor grid: {}",
                if app.grid.show_minor_lines { "ON" } else { "OFF" }
            ))
        }
        "lines" | "markers" | "dots" | "off" => {
            let mode = GridLineMode::parse(arg).unwrap_or(GridLineMode::Off);
            app.grid.line_mode = mode;
            CommandResult::ok(format!("Grid mode: {}", mode.name()))
        }
        "rulers" => {
            let enabled = match args.get(1).map(|a| a.to_ascii_lowercase()) {
                Some(value) if value == "on" => true,
                Some(value) if value == "off" => false,
                Some(_) => return CommandResult::error("Usage: grid rulers on|off"),
                None => !app.grid.show_rulers,
            };
            app.grid.show_rulers = enabled;
            CommandResult::ok(format!("Rulers: {}", if enabled { "ON" } else { "OFF" }))
        }
        "labels" => {
            let enabled = match args.get(1).map(|a| a.to_ascii_lowercase()) {
                Some(value) if value == "on" => true,
                Some(value) if value == "off" => false,
                Some(_) => return CommandResult::error("Usage: grid labels on|off"),
                None => !app.grid.show_labels,
            };
            app.grid.show_labels = enabled;
            CommandResult::ok(format!("Labels: {}", if enabled { "ON" } else { "OFF" }))
        }
        "interval" => {
            let Some(major) = args.get(1) else {
                return CommandResult::ok(format!(
                    "Interval: major={} minor={}",
                    app.grid.major_interval, app.grid.minor_interval
                ));
            };
            let major = match parse_i64(major, "interval") {
                Ok(value) if value > 0 => value,
                _ => return CommandResult::error("Usage: grid interval MAJOR [MINOR]"),
            };
            let minor = match args.get(2) {
                Some(token) => match parse_i64(token, "interval") {
                    Ok(value) if value > 0 => value,
                    _ => return CommandResult::error("Usage: grid interval MAJOR [MINOR]"),
                },
                None => (major / 2).max(1),
            };
            app.grid.major_interval = major;
            app.grid.minor_interval = minor;
            CommandResult::ok(format!("Grid interval: major={major} minor={minor}"))
        }
        other => match other.parse::<i64>() {
            Ok(interval) if interval > 0 => {
                app.grid.major_interval = interval;
                CommandResult::ok(format!("Major interval: {interval}"))
            }
            _ => CommandResult::error(
                "Usage: grid [major|minor|N|lines|markers|dots|off|rulers|labels|interval MAJOR [MINOR]]",
            ),
        },
    }
}

fn cmd_mark(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(key) = args.first() else {
        return CommandResult::error("Usage: mark KEY [X Y]");
    };
    let Some(key) = crate::bookmarks::valid_key(key) else {
        return CommandResult::error("Mark key must be a-z or 0-9");
    };
    let (x, y) = match (args.get(1), args.get(2)) {
        (Some(x), Some(y)) => {
            let x = match parse_i64(x, "coordinate") {
                Ok(value) => value,
                Err(err) => return err,
            };
            let y = match parse_i64(y, "coordinate") {
                Ok(value) => value,
                Err(err) => return err,
            };
            (x, y)
        }
        _ => (app.viewport.cursor.x, app.viewport.cursor.y),
    };
    app.bookmarks.set(key, x, y);
    CommandResult::ok(format!("Mark '{key}' set at ({x}, {y})"))
}

fn cmd_delmark(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(key) = args.first().and_then(|arg| crate::bookmarks::valid_key(arg)) else {
        return CommandResult::error("Usage: delmark KEY");
    };
    if app.bookmarks.delete(key) {
        CommandResult::ok(format!("Mark '{key}' deleted"))
    } else {
        CommandResult::error(format!("Mark '{key}' not found"))
    }
}

fn cmd_marks(app: &App) -> CommandResult {
    if app.bookmarks.is_empty() {
        return CommandResult::ok("No marks set");
    }
    let entries: Vec<String> = app
        .bookmarks
        .list()
        .map(|(key, bm)| format!("{key}:({},{})", bm.x, bm.y))
        .collect();
    CommandResult::ok(format!("Marks: {}", entries.join(" ")))
}

fn cmd_export(app: &mut App, args: &[&str]) -> CommandResult {
    let path = match args.first() {
        Some(name) => PathBuf::from(name),
        None => match &app.project.filepath {
            Some(project_path) => project_path.with_extension("txt"),
            None => PathBuf::from("export.txt"),
        },
    };
    match export_text(&app.canvas, &path) {
        Ok(lines) => CommandResult::ok(format!("Exported {lines} lines to {}", path.display())),
        Err(err) => CommandResult::error(format!("Export error: {err}")),
    }
}

fn cmd_import(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return CommandResult::error("Usage: import FILE");
    };
    let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
    match import_text(&mut app.canvas, Path::new(name), cx, cy) {
        Ok(rows) => {
            app.project.mark_dirty();
            CommandResult::ok(format!("Imported {rows} lines at ({cx}, {cy})"))
        }
        Err(err) => CommandResult::error(format!("Import error: {err}")),
    }
}

fn cmd_ydir(app: &mut App, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        Some("up") => {
            app.viewport.y_direction = YDirection::Up;
            CommandResult::ok("Y direction: UP (mathematical)")
        }
        Some("down") => {
            app.viewport.y_direction = YDirection::Down;
            CommandResult::ok("Y direction: DOWN (screen)")
        }
        Some(_) => CommandResult::error("Usage: ydir up|down"),
        None => CommandResult::ok(format!(
            "Y direction: {}",
            match app.viewport.y_direction {
                YDirection::Up => "UP",
                YDirection::Down => "DOWN",
            }
        )),
    }
}

fn cmd_yank(app: &mut App, args: &[&str]) -> CommandResult {
    let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None => {
            app.clipboard.yank_region(&app.canvas, cx, cy, 1, 1);
            CommandResult::ok(format!("Yanked: '{}'", app.canvas.get_char(cx, cy)))
        }
        Some("zone") => {
            let Some(name) = args.get(1) else {
                return CommandResult::error("Usage: yank zone NAME");
            };
            let App {
                zones, clipboard, ..
            } = app;
            match zones.get(name) {
                Some(zone) => {
                    let lines = clipboard.yank_zone(zone);
                    CommandResult::ok(format!("Yanked {lines} lines from zone '{}'", zone.name))
                }
                None => CommandResult::error(format!("Zone '{name}' not found")),
            }
        }
        Some("system") => match app.clipboard.from_system() {
            Ok(lines) => CommandResult::ok(format!("Yanked {lines} lines from system clipboard")),
            Err(err) => CommandResult::error(format!("System clipboard: {err}")),
        },
        Some(w) => {
            let w = match parse_i64(w, "width") {
                Ok(value) if value > 0 => value,
                _ => return CommandResult::error("Usage: yank W H | yank zone NAME | yank system"),
            };
            let h = match args.get(1) {
                Some(token) => match parse_i64(token, "height") {
                    Ok(value) if value > 0 => value,
                    _ => {
                        return CommandResult::error(
                            "Usage: yank W H | yank zone NAME | yank system",
                        )
                    }
                },
                None => 1,
            };
            app.clipboard.yank_region(&app.canvas, cx, cy, w, h);
            CommandResult::ok(format!("Yanked {w}x{h} region"))
        }
    }
}

fn cmd_paste(app: &mut App, args: &[&str]) -> CommandResult {
    let option = args.first().map(|arg| arg.to_ascii_lowercase());
    if option.as_deref() == Some("system") {
        return match app.clipboard.to_system() {
            Ok(()) => CommandResult::ok("Copied to system clipboard"),
            Err(err) => CommandResult::error(format!("System clipboard: {err}")),
        };
    }
    if app.clipboard.is_empty() {
        return CommandResult::error("Clipboard is empty");
    }
    let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
    let (w, h) = if option.as_deref() == Some("opaque") {
        app.clipboard.paste_opaque(&mut app.canvas, cx, cy)
    } else {
        app.clipboard.paste(&mut app.canvas, cx, cy)
    };
    app.project.mark_dirty();
    CommandResult::ok(format!("Pasted {w}x{h} from {}", app.clipboard.source()))
}

fn cmd_clipboard(app: &mut App, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None => {
            if app.clipboard.is_empty() {
                CommandResult::ok("Clipboard is empty")
            } else {
                CommandResult::ok(format!(
                    "Clipboard: {} lines, max width {} (from: {})",
                    app.clipboard.line_count(),
                    app.clipboard.width(),
                    app.clipboard.source()
                ))
            }
        }
        Some("clear") => {
            app.clipboard.clear();
            CommandResult::ok("Clipboard cleared")
        }
        Some("zone") => {
            let name = args.get(1).copied().unwrap_or("CLIPBOARD");
            let w = args
                .get(2)
                .and_then(|token| token.parse::<i64>().ok())
                .unwrap_or(40);
            let h = args
                .get(3)
                .and_then(|token| token.parse::<i64>().ok())
                .unwrap_or(10);
            let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
            match zone::create_zone(
                app,
                name,
                cx,
                cy,
                w,
                h,
                crate::zones::ZoneConfig::Clipboard,
                None,
                String::new(),
            ) {
                Ok(()) => CommandResult::ok(format!("Created clipboard zone '{name}'")),
                Err(err) => CommandResult::error(err),
            }
        }
        Some(_) => CommandResult::error("Usage: clipboard [clear | zone [NAME [W H]]]"),
    }
}

fn cmd_color(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(first) = args.first() else {
        return CommandResult::ok(format!(
            "Color: fg={} bg={}",
            color_name(app.draw_fg),
            color_name(app.draw_bg)
        ));
    };

    match first.to_ascii_lowercase().as_str() {
        "off" | "reset" => {
            app.draw_fg = DEFAULT_COLOR;
            app.draw_bg = DEFAULT_COLOR;
            CommandResult::ok("Color reset to default")
        }
        "apply" => {
            let (Some(w), Some(h)) = (args.get(1), args.get(2)) else {
                return CommandResult::error("Usage: color apply W H");
            };
            let w = match parse_i64(w, "width") {
                Ok(value) if value > 0 => value,
                _ => return CommandResult::error("Usage: color apply W H"),
            };
            let h = match parse_i64(h, "height") {
                Ok(value) if value > 0 => value,
                _ => return CommandResult::error("Usage: color apply W H"),
            };
            let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
            for y in cy..cy + h {
                for x in cx..cx + w {
                    app.canvas.set_color(x, y, app.draw_fg, app.draw_bg);
                }
            }
            app.project.mark_dirty();
            CommandResult::ok(format!("Applied color to {w}x{h} region"))
        }
        _ => {
            let Some(fg) = parse_color(first) else {
                return CommandResult::error(format!(
                    "Unknown color: {first}. Use: black,red,green,yellow,blue,magenta,cyan,white"
                ));
            };
            let bg = match args.get(1) {
                Some(token) => match parse_color(token) {
                    Some(color) => color,
                    None => return CommandResult::error(format!("Unknown color: {token}")),
                },
                None => DEFAULT_COLOR,
            };
            app.draw_fg = fg;
            app.draw_bg = bg;
            CommandResult::ok(format!(
                "Color set: fg={} bg={}",
                color_name(fg),
                color_name(bg)
            ))
        }
    }
}

fn cmd_border(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return CommandResult::ok(format!(
            "Border style: {} (available: {})",
            app.border_style.name(),
            crate::border::BorderStyle::all_names().join(", ")
        ));
    };
    match crate::border::BorderStyle::parse(name) {
        Some(style) => {
            app.border_style = style;
            CommandResult::ok(format!("Border style: {}", style.name()))
        }
        None => CommandResult::error(format!(
            "Unknown border style: {name} (available: {})",
            crate::border::BorderStyle::all_names().join(", ")
        )),
    }
}

fn cmd_search(app: &mut App, rest: &str) -> CommandResult {
    if rest.is_empty() {
        return CommandResult::error("Usage: search PATTERN");
    }
    let matches = app.canvas.search_text(rest, false);
    if matches.is_empty() {
        return CommandResult::error(format!("No matches for '{rest}'"));
    }
    let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
    // First match strictly after the cursor in row-major order, wrapping.
    let next = matches
        .iter()
        .find(|(x, y, _)| (*y, *x) > (cy, cx))
        .or_else(|| matches.first())
        .copied();
    let (x, y, _) = next.unwrap_or(matches[0]);
    app.viewport.set_cursor(x, y);
    app.viewport.ensure_cursor_visible(app.scroll_margin());
    CommandResult::ok(format!("{} matches; jumped to ({x}, {y})", matches.len()))
}

fn cmd_status(app: &App) -> CommandResult {
    let zones: Vec<serde_json::Value> = app
        .zones
        .iter()
        .map(|zone| {
            serde_json::json!({
                "name": zone.name,
                "type": zone.config.kind_name(),
                "x": zone.x,
                "y": zone.y,
                "w": zone.width,
                "h": zone.height,
                "state": zone.state.label(),
                "lines": zone.buffer.len(),
            })
        })
        .collect();
    let data = serde_json::json!({
        "cursor": {"x": app.viewport.cursor.x, "y": app.viewport.cursor.y},
        "viewport": {
            "x": app.viewport.x,
            "y": app.viewport.y,
            "width": app.viewport.width,
            "height": app.viewport.height,
        },
        "mode": app.mode.name(),
        "cells": app.canvas.cell_count(),
        "dirty": app.project.dirty(),
        "file": app.project.filename(),
        "server": app.server_port,
        "zones": zones,
    });
    let message = data.to_string();
    CommandResult::ok_with_data(message, data)
}
