//! `:zone` subcommands and the shared zone-creation path.
//!
//! Creation validates arguments, starts the type's background handler,
//! and only then inserts the zone into the registry, so a failed spawn
//! never leaves a half-built zone behind. Layout loading goes through
//! the same `create_zone` entry point.

use std::path::PathBuf;

use crate::app::{App, Mode};
use crate::commands::{tail_after, CommandResult};
use crate::zones::{
    fifo, pager, pipe, socket, watch, PagerRenderer, PtySession, Zone, ZoneConfig, ZoneRuntime,
    ZoneState, DEFAULT_MAX_LINES,
};

/// Create a zone and start its handler. Shared by commands and layouts.
#[allow(clippy::too_many_arguments)]
pub fn create_zone(
    app: &mut App,
    name: &str,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    config: ZoneConfig,
    bookmark: Option<char>,
    description: String,
) -> Result<(), String> {
    if name.is_empty() {
        return Err("Zone name must not be empty".to_string());
    }
    if width < 3 || height < 3 {
        return Err("Zone must be at least 3x3".to_string());
    }
    if app.zones.get(name).is_some() {
        return Err(format!("Zone '{name}' already exists"));
    }

    let mut zone = Zone::new(name, x, y, width, height, config.clone());
    zone.bookmark = bookmark;
    zone.description = description;

    match &config {
        ZoneConfig::Static | ZoneConfig::Clipboard => {
            zone.state = ZoneState::Running;
        }
        ZoneConfig::Pipe { command, .. } => {
            zone.state = ZoneState::Running;
            pipe::spawn(zone.name.clone(), command.clone(), app.event_tx.clone());
        }
        ZoneConfig::Watch {
            command, trigger, ..
        } => {
            let handle = watch::spawn(
                zone.name.clone(),
                command.clone(),
                trigger.clone(),
                app.event_tx.clone(),
            )?;
            zone.runtime = ZoneRuntime::Handler(handle);
            zone.state = ZoneState::Running;
        }
        ZoneConfig::Pty { shell, max_lines } => {
            let session = PtySession::spawn(
                &zone.name,
                shell,
                zone.inner_height(),
                zone.inner_width(),
                *max_lines,
                app.event_tx.clone(),
            )?;
            zone.runtime = ZoneRuntime::Pty(session);
            zone.state = ZoneState::Running;
        }
        ZoneConfig::Fifo { path, .. } => {
            let handle = fifo::spawn(zone.name.clone(), path.clone(), app.event_tx.clone())?;
            zone.runtime = ZoneRuntime::Handler(handle);
            zone.state = ZoneState::Running;
        }
        ZoneConfig::Socket { port, .. } => {
            let handle = socket::spawn(zone.name.clone(), *port, app.event_tx.clone())?;
            zone.runtime = ZoneRuntime::Handler(handle);
            zone.state = ZoneState::Running;
        }
        ZoneConfig::Pager { path, renderer } => {
            let lines = pager::load(path, *renderer)?;
            zone.buffer.replace(lines);
            zone.buffer.scroll_to_top(zone.inner_height().max(1) as usize);
            zone.state = ZoneState::Running;
        }
    }

    if let Some(key) = bookmark {
        app.bookmarks.set(key, x, y);
    }
    app.zones.insert(zone)?;
    app.project.mark_dirty();
    Ok(())
}

pub fn run(app: &mut App, args: &[&str], rest: &str) -> CommandResult {
    let Some(subcmd) = args.first() else {
        return CommandResult::error(
            "Usage: zone create|pipe|watch|pty|fifo|socket|pager|delete|goto|info|...",
        );
    };
    let args = &args[1..];
    match subcmd.to_ascii_lowercase().as_str() {
        "create" => cmd_create(app, args),
        "pipe" => cmd_pipe(app, args, rest),
        "watch" => cmd_watch(app, args, rest),
        "pty" => cmd_pty(app, args, rest),
        "fifo" => cmd_fifo(app, args),
        "socket" => cmd_socket(app, args),
        "pager" => cmd_pager(app, args),
        "delete" => cmd_delete(app, args),
        "goto" => cmd_goto(app, args),
        "info" => cmd_info(app, args),
        "refresh" => cmd_refresh(app, args),
        "pause" => cmd_pause(app, args, true),
        "resume" => cmd_pause(app, args, false),
        "send" => cmd_send(app, args, rest),
        "focus" => cmd_focus(app, args),
        "rename" => cmd_rename(app, args),
        "resize" => cmd_resize(app, args),
        "move" => cmd_move(app, args),
        "link" => cmd_link(app, args),
        "export" => cmd_export(app, args),
        other => CommandResult::error(format!("Unknown zone subcommand: {other}")),
    }
}

fn parse_i64(token: &str) -> Option<i64> {
    token.parse().ok()
}

fn cursor(app: &App) -> (i64, i64) {
    (app.viewport.cursor.x, app.viewport.cursor.y)
}

fn cmd_create(app: &mut App, args: &[&str]) -> CommandResult {
    // zone create NAME (X Y | here) W H [desc]
    let Some(name) = args.first() else {
        return CommandResult::error("Usage: zone create NAME (X Y | here) W H [desc]");
    };
    let (x, y, w, h, desc_start) = if args.get(1).map(|a| a.to_ascii_lowercase()).as_deref()
        == Some("here")
    {
        let (Some(w), Some(h)) = (
            args.get(2).and_then(|a| parse_i64(a)),
            args.get(3).and_then(|a| parse_i64(a)),
        ) else {
            return CommandResult::error("Usage: zone create NAME here W H [desc]");
        };
        let (cx, cy) = cursor(app);
        (cx, cy, w, h, 4)
    } else {
        let (Some(x), Some(y), Some(w), Some(h)) = (
            args.get(1).and_then(|a| parse_i64(a)),
            args.get(2).and_then(|a| parse_i64(a)),
            args.get(3).and_then(|a| parse_i64(a)),
            args.get(4).and_then(|a| parse_i64(a)),
        ) else {
            return CommandResult::error("Usage: zone create NAME (X Y | here) W H [desc]");
        };
        (x, y, w, h, 5)
    };
    let description = args.get(desc_start..).unwrap_or_default().join(" ");
    match create_zone(app, name, x, y, w, h, ZoneConfig::Static, None, description) {
        Ok(()) => CommandResult::ok(format!("Created zone '{name}' at ({x},{y}) {w}x{h}")),
        Err(err) => CommandResult::error(err),
    }
}

fn cmd_pipe(app: &mut App, args: &[&str], rest: &str) -> CommandResult {
    // zone pipe NAME W H CMD...
    let (Some(name), Some(w), Some(h)) = (
        args.first(),
        args.get(1).and_then(|a| parse_i64(a)),
        args.get(2).and_then(|a| parse_i64(a)),
    ) else {
        return CommandResult::error("Usage: zone pipe NAME W H COMMAND");
    };
    let command = tail_after(rest, 4).to_string();
    if command.is_empty() {
        return CommandResult::error("Usage: zone pipe NAME W H COMMAND");
    }
    let (x, y) = cursor(app);
    let config = ZoneConfig::Pipe {
        command,
        auto_scroll: true,
        max_lines: DEFAULT_MAX_LINES,
    };
    match create_zone(app, name, x, y, w, h, config, None, String::new()) {
        Ok(()) => CommandResult::ok(format!("Created pipe zone '{name}'")),
        Err(err) => CommandResult::error(err),
    }
}

fn cmd_watch(app: &mut App, args: &[&str], rest: &str) -> CommandResult {
    // zone watch NAME W H (INTERVAL | watch:PATH) CMD...
    let (Some(name), Some(w), Some(h), Some(spec)) = (
        args.first(),
        args.get(1).and_then(|a| parse_i64(a)),
        args.get(2).and_then(|a| parse_i64(a)),
        args.get(3),
    ) else {
        return CommandResult::error("Usage: zone watch NAME W H (INTERVAL|watch:PATH) COMMAND");
    };
    let command = tail_after(rest, 5).to_string();
    if command.is_empty() {
        return CommandResult::error("Usage: zone watch NAME W H (INTERVAL|watch:PATH) COMMAND");
    }
    let trigger = match watch::parse_trigger(spec) {
        Ok(trigger) => trigger,
        Err(err) => return CommandResult::error(err),
    };
    let detail = match &trigger {
        crate::zones::WatchTrigger::Interval(interval) => {
            format!("refresh: {:.1}s", interval.as_secs_f64())
        }
        crate::zones::WatchTrigger::Path(path) => format!("watching: {}", path.display()),
    };
    let (x, y) = cursor(app);
    let config = ZoneConfig::Watch {
        command,
        trigger,
        auto_scroll: true,
        max_lines: DEFAULT_MAX_LINES,
    };
    match create_zone(app, name, x, y, w, h, config, None, String::new()) {
        Ok(()) => CommandResult::ok(format!("Created watch zone '{name}' ({detail})")),
        Err(err) => CommandResult::error(err),
    }
}

fn cmd_pty(app: &mut App, args: &[&str], rest: &str) -> CommandResult {
    // zone pty NAME W H [SHELL...]
    let (Some(name), Some(w), Some(h)) = (
        args.first(),
        args.get(1).and_then(|a| parse_i64(a)),
        args.get(2).and_then(|a| parse_i64(a)),
    ) else {
        return CommandResult::error("Usage: zone pty NAME W H [SHELL]");
    };
    let shell = {
        let tail = tail_after(rest, 4);
        if tail.is_empty() {
            std::env::var("SHELL").unwrap_or_else(|_| "/bin/bash".to_string())
        } else {
            tail.to_string()
        }
    };
    let (x, y) = cursor(app);
    let config = ZoneConfig::Pty {
        shell,
        max_lines: DEFAULT_MAX_LINES,
    };
    match create_zone(app, name, x, y, w, h, config, None, String::new()) {
        Ok(()) => CommandResult::ok(format!(
            "Created PTY zone '{name}' - :zone focus {name} to type into it"
        )),
        Err(err) => CommandResult::error(format!("Failed to create PTY zone: {err}")),
    }
}

fn cmd_fifo(app: &mut App, args: &[&str]) -> CommandResult {
    // zone fifo NAME W H PATH
    let (Some(name), Some(w), Some(h), Some(path)) = (
        args.first(),
        args.get(1).and_then(|a| parse_i64(a)),
        args.get(2).and_then(|a| parse_i64(a)),
        args.get(3),
    ) else {
        return CommandResult::error("Usage: zone fifo NAME W H PATH");
    };
    let path = PathBuf::from(path);
    let (x, y) = cursor(app);
    let description = format!("FIFO: {}", path.display());
    let config = ZoneConfig::Fifo {
        path: path.clone(),
        auto_scroll: true,
        max_lines: DEFAULT_MAX_LINES,
    };
    match create_zone(app, name, x, y, w, h, config, None, description) {
        Ok(()) => CommandResult::ok(format!(
            "Created FIFO zone '{name}' listening on {}",
            path.display()
        )),
        Err(err) => CommandResult::error(err),
    }
}

fn cmd_socket(app: &mut App, args: &[&str]) -> CommandResult {
    // zone socket NAME W H PORT
    let (Some(name), Some(w), Some(h), Some(port)) = (
        args.first(),
        args.get(1).and_then(|a| parse_i64(a)),
        args.get(2).and_then(|a| parse_i64(a)),
        args.get(3),
    ) else {
        return CommandResult::error("Usage: zone socket NAME W H PORT");
    };
    let Ok(port) = port.parse::<u16>() else {
        return CommandResult::error("Invalid port");
    };
    let (x, y) = cursor(app);
    let config = ZoneConfig::Socket {
        port,
        auto_scroll: true,
        max_lines: DEFAULT_MAX_LINES,
    };
    let description = format!("Socket: port {port}");
    match create_zone(app, name, x, y, w, h, config, None, description) {
        Ok(()) => CommandResult::ok(format!(
            "Created socket zone '{name}' listening on port {port}"
        )),
        Err(err) => CommandResult::error(err),
    }
}

fn cmd_pager(app: &mut App, args: &[&str]) -> CommandResult {
    // zone pager NAME W H FILE [--renderer plain|ansi]
    let (Some(name), Some(w), Some(h), Some(file)) = (
        args.first(),
        args.get(1).and_then(|a| parse_i64(a)),
        args.get(2).and_then(|a| parse_i64(a)),
        args.get(3),
    ) else {
        return CommandResult::error("Usage: zone pager NAME W H FILE [--renderer plain|ansi]");
    };
    let renderer = match args.iter().position(|a| *a == "--renderer") {
        Some(idx) => match args.get(idx + 1).map(|a| a.to_ascii_lowercase()).as_deref() {
            Some("ansi") => PagerRenderer::Ansi,
            Some("plain") | None => PagerRenderer::Plain,
            Some(other) => {
                return CommandResult::error(format!("Unknown renderer: {other}"));
            }
        },
        None => PagerRenderer::Plain,
    };
    let mut path = PathBuf::from(file);
    if !path.is_absolute() {
        if let Ok(cwd) = std::env::current_dir() {
            path = cwd.join(path);
        }
    }
    let (x, y) = cursor(app);
    let description = format!(
        "Pager: {}",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    );
    let config = ZoneConfig::Pager {
        path,
        renderer,
    };
    match create_zone(app, name, x, y, w, h, config, None, description) {
        Ok(()) => {
            let lines = app.zones.get(name).map(|z| z.buffer.len()).unwrap_or(0);
            CommandResult::ok(format!("Created pager zone '{name}' - {lines} lines"))
        }
        Err(err) => CommandResult::error(err),
    }
}

fn cmd_delete(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return CommandResult::error("Usage: zone delete NAME");
    };
    match app.delete_zone(name) {
        Ok(()) => {
            app.project.mark_dirty();
            CommandResult::ok(format!("Deleted zone '{name}'"))
        }
        Err(err) => CommandResult::error(err),
    }
}

fn cmd_goto(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return CommandResult::error("Usage: zone goto NAME");
    };
    let Some(zone) = app.zones.get(name) else {
        return CommandResult::error(format!("Zone '{name}' not found"));
    };
    let (cx, cy) = zone.center();
    let label = zone.name.clone();
    app.viewport.set_cursor(cx, cy);
    app.viewport.center_on_cursor();
    CommandResult::ok(format!("Jumped to zone '{label}'"))
}

fn cmd_info(app: &App, args: &[&str]) -> CommandResult {
    let zone = match args.first() {
        Some(name) => app.zones.get(name),
        None => {
            let (cx, cy) = cursor(app);
            app.zones.find_at(cx, cy)
        }
    };
    let Some(zone) = zone else {
        return CommandResult::error(match args.first() {
            Some(name) => format!("Zone '{name}' not found"),
            None => "Not in any zone".to_string(),
        });
    };
    let mut info = format!(
        "'{}' ({},{}) {}x{} [{}] {} | {} lines",
        zone.name,
        zone.x,
        zone.y,
        zone.width,
        zone.height,
        zone.config.tag(),
        zone.state.label(),
        zone.buffer.len(),
    );
    if let Some(key) = zone.bookmark {
        info.push_str(&format!(" [mark:{key}]"));
    }
    if !zone.description.is_empty() {
        info.push_str(" - ");
        info.push_str(&zone.description);
    }
    CommandResult::ok(info)
}

fn cmd_refresh(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return CommandResult::error("Usage: zone refresh NAME");
    };
    let event_tx = app.event_tx.clone();
    let Some(zone) = app.zones.get_mut(name) else {
        return CommandResult::error(format!("Zone '{name}' not found"));
    };
    match &zone.config {
        ZoneConfig::Pipe { command, .. } | ZoneConfig::Watch { command, .. } => {
            pipe::spawn(zone.name.clone(), command.clone(), event_tx);
            CommandResult::ok(format!("Refreshing '{}'", zone.name))
        }
        ZoneConfig::Pager { path, renderer } => match pager::load(path, *renderer) {
            Ok(lines) => {
                let count = lines.len();
                let height = zone.inner_height().max(1) as usize;
                zone.buffer.replace(lines);
                zone.buffer.scroll_to_top(height);
                CommandResult::ok(format!("Reloaded '{}' - {count} lines", zone.name))
            }
            Err(err) => CommandResult::error(err),
        },
        _ => CommandResult::error(format!("Zone '{name}' is not refreshable")),
    }
}

fn cmd_pause(app: &mut App, args: &[&str], pause: bool) -> CommandResult {
    let verb = if pause { "pause" } else { "resume" };
    let Some(name) = args.first() else {
        return CommandResult::error(format!("Usage: zone {verb} NAME"));
    };
    let Some(zone) = app.zones.get_mut(name) else {
        return CommandResult::error(format!("Zone '{name}' not found"));
    };
    match &zone.runtime {
        ZoneRuntime::Handler(handle) => {
            if pause {
                handle.pause();
                zone.state = ZoneState::Paused;
                CommandResult::ok(format!("Paused zone '{}'", zone.name))
            } else {
                handle.resume();
                zone.state = ZoneState::Running;
                CommandResult::ok(format!("Resumed zone '{}'", zone.name))
            }
        }
        _ => CommandResult::error(format!("Zone '{name}' cannot be {verb}d")),
    }
}

fn cmd_send(app: &mut App, args: &[&str], rest: &str) -> CommandResult {
    let Some(name) = args.first() else {
        return CommandResult::error("Usage: zone send NAME TEXT");
    };
    let text = tail_after(rest, 2);
    if text.is_empty() {
        return CommandResult::error("Usage: zone send NAME TEXT");
    }
    let payload = text.replace("\\n", "\n").replace("\\t", "\t");
    let Some(zone) = app.zones.get_mut(name) else {
        return CommandResult::error(format!("Zone '{name}' not found"));
    };
    let label = zone.name.clone();
    match zone.pty_session_mut() {
        Some(session) if session.is_running() => match session.send(payload.as_bytes()) {
            Ok(()) => CommandResult::ok(format!("Sent to '{label}'")),
            Err(err) => CommandResult::error(format!("Send failed: {err}")),
        },
        _ => CommandResult::error(format!("Zone '{name}' is not an active PTY")),
    }
}

enum FocusTarget {
    Pty { active: bool },
    Pager,
    Other,
}

fn cmd_focus(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return CommandResult::error("Usage: zone focus NAME");
    };
    let Some(zone) = app.zones.get(name) else {
        return CommandResult::error(format!("Zone '{name}' not found"));
    };
    let label = zone.name.clone();
    let target = match &zone.config {
        ZoneConfig::Pty { .. } => FocusTarget::Pty {
            active: zone.pty_session().map_or(false, |s| s.is_running()),
        },
        ZoneConfig::Pager { .. } => FocusTarget::Pager,
        _ => FocusTarget::Other,
    };
    match target {
        FocusTarget::Pty { active: false } => {
            CommandResult::error(format!("PTY for zone '{name}' is not active"))
        }
        FocusTarget::Pty { active: true } => {
            app.set_mode(Mode::PtyFocused);
            app.focused_zone = Some(label.clone());
            CommandResult::ok(format!("Focused '{label}' (Esc to leave)"))
        }
        FocusTarget::Pager => {
            app.set_mode(Mode::PtyFocused);
            app.focused_zone = Some(label.clone());
            CommandResult::ok(format!("Focused pager '{label}' (Esc to leave)"))
        }
        FocusTarget::Other => {
            CommandResult::error(format!("Zone '{name}' is not a PTY or pager zone"))
        }
    }
}

fn cmd_rename(app: &mut App, args: &[&str]) -> CommandResult {
    let (Some(old), Some(new)) = (args.first(), args.get(1)) else {
        return CommandResult::error("Usage: zone rename OLD NEW");
    };
    match app.zones.rename(old, new) {
        Ok(()) => {
            app.project.mark_dirty();
            CommandResult::ok(format!("Renamed '{old}' to '{new}'"))
        }
        Err(err) => CommandResult::error(err),
    }
}

fn cmd_resize(app: &mut App, args: &[&str]) -> CommandResult {
    let (Some(name), Some(w), Some(h)) = (
        args.first(),
        args.get(1).and_then(|a| parse_i64(a)),
        args.get(2).and_then(|a| parse_i64(a)),
    ) else {
        return CommandResult::error("Usage: zone resize NAME W H");
    };
    if w < 3 || h < 3 {
        return CommandResult::error("Zone must be at least 3x3");
    }
    let Some(zone) = app.zones.get_mut(name) else {
        return CommandResult::error(format!("Zone '{name}' not found"));
    };
    zone.width = w;
    zone.height = h;
    let (rows, cols) = (zone.inner_height(), zone.inner_width());
    if let Some(session) = zone.pty_session_mut() {
        if let Err(err) = session.resize(rows, cols) {
            return CommandResult::error(format!("Resize failed: {err}"));
        }
    }
    app.project.mark_dirty();
    CommandResult::ok(format!("Resized '{name}' to {w}x{h}"))
}

fn cmd_move(app: &mut App, args: &[&str]) -> CommandResult {
    let (Some(name), Some(x), Some(y)) = (
        args.first(),
        args.get(1).and_then(|a| parse_i64(a)),
        args.get(2).and_then(|a| parse_i64(a)),
    ) else {
        return CommandResult::error("Usage: zone move NAME X Y");
    };
    let Some(zone) = app.zones.get_mut(name) else {
        return CommandResult::error(format!("Zone '{name}' not found"));
    };
    zone.x = x;
    zone.y = y;
    app.project.mark_dirty();
    CommandResult::ok(format!("Moved '{name}' to ({x},{y})"))
}

fn cmd_link(app: &mut App, args: &[&str]) -> CommandResult {
    let (Some(name), Some(key)) = (args.first(), args.get(1)) else {
        return CommandResult::error("Usage: zone link NAME KEY|none");
    };
    let bookmark = if key.eq_ignore_ascii_case("none") {
        None
    } else {
        match crate::bookmarks::valid_key(key) {
            Some(key) => Some(key),
            None => return CommandResult::error("Mark key must be a-z or 0-9"),
        }
    };
    let Some(zone) = app.zones.get_mut(name) else {
        return CommandResult::error(format!("Zone '{name}' not found"));
    };
    zone.bookmark = bookmark;
    let (zx, zy) = (zone.x, zone.y);
    if let Some(key) = bookmark {
        app.bookmarks.set(key, zx, zy);
        app.project.mark_dirty();
        CommandResult::ok(format!("Linked '{name}' to mark '{key}'"))
    } else {
        app.project.mark_dirty();
        CommandResult::ok(format!("Unlinked mark from '{name}'"))
    }
}

fn cmd_export(app: &mut App, args: &[&str]) -> CommandResult {
    let Some(name) = args.first() else {
        return CommandResult::error("Usage: zone export NAME [FILE]");
    };
    let Some(zone) = app.zones.get(name) else {
        return CommandResult::error(format!("Zone '{name}' not found"));
    };
    if zone.buffer.is_empty() {
        return CommandResult::error(format!("Zone '{name}' buffer is empty"));
    }
    let path = match args.get(1) {
        Some(file) => PathBuf::from(file),
        None => {
            let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
            PathBuf::from(format!("{}_{stamp}.txt", zone.name.to_lowercase()))
        }
    };
    let mut content: String = zone
        .buffer
        .iter()
        .map(|line| line.to_plain())
        .collect::<Vec<_>>()
        .join("\n");
    content.push('\n');
    match std::fs::write(&path, content) {
        Ok(()) => CommandResult::ok(format!(
            "Exported {} lines to {}",
            zone.buffer.len(),
            path.display()
        )),
        Err(err) => CommandResult::error(format!("Export error: {err}")),
    }
}

pub fn list(app: &App) -> CommandResult {
    if app.zones.is_empty() {
        return CommandResult::ok("No zones");
    }
    let lines: Vec<String> = app
        .zones
        .iter()
        .map(|zone| {
            format!(
                "[{}] {} ({},{}) {}x{} {}",
                zone.config.tag(),
                zone.name,
                zone.x,
                zone.y,
                zone.width,
                zone.height,
                zone.state.label(),
            )
        })
        .collect();
    CommandResult::ok(lines.join("\n"))
}
