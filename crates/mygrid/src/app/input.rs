//! Event handling: keystrokes, zone traffic, API commands.
//!
//! Everything funnels through `handle_event` on the loop thread. Key
//! dispatch is per-mode; zone events update buffers and states, dropping
//! anything addressed to a zone that no longer exists.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::border;
use crate::canvas::Cell;
use crate::commands::{self, CommandResult};
use crate::events::AppEvent;
use crate::server::{ApiRequest, ApiResponse};
use crate::term::key_event_to_bytes;
use crate::zones::{ZoneConfig, ZoneState};

use super::state::{App, Mode, Selection};

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Input(Event::Key(key)) => {
            if key.kind != KeyEventKind::Release {
                handle_key(app, key);
            }
        }
        AppEvent::Input(Event::Resize(width, height)) => {
            // Status line takes the bottom row.
            app.viewport.resize(width, height.saturating_sub(1));
        }
        AppEvent::Input(Event::Paste(text)) => handle_paste(app, &text),
        AppEvent::Input(_) => {}
        AppEvent::ZoneContent {
            zone,
            lines,
            replace,
        } => {
            if let Some(zone) = app.zones.get_mut(&zone) {
                if replace {
                    zone.buffer.replace(lines);
                } else {
                    for line in lines {
                        zone.buffer.append(line);
                    }
                }
                // A successful run clears a previous tick's error.
                if matches!(zone.state, ZoneState::Error(_)) {
                    zone.state = ZoneState::Running;
                }
            }
        }
        AppEvent::ZoneLine { zone, line } => {
            if let Some(zone) = app.zones.get_mut(&zone) {
                zone.buffer.append(line);
            }
        }
        AppEvent::ZoneBytes { zone, bytes } => {
            if let Some(zone) = app.zones.get_mut(&zone) {
                if let Some(session) = zone.pty_session_mut() {
                    session.feed(&bytes);
                }
            }
        }
        AppEvent::ZoneClosed { zone, message } => {
            let mut announce = false;
            if let Some(entry) = app.zones.get_mut(&zone) {
                if let Some(session) = entry.pty_session_mut() {
                    session.mark_exited();
                    entry.state = ZoneState::Stopped;
                } else if matches!(entry.config, ZoneConfig::Pipe { .. }) {
                    entry.state = ZoneState::Stopped;
                    announce = true;
                }
                tracing::debug!(%zone, %message, "zone closed");
            }
            if announce {
                app.show_message(format!("Zone '{zone}': {message}"));
            }
        }
        AppEvent::ZoneError { zone, message } => {
            if let Some(entry) = app.zones.get_mut(&zone) {
                entry.state = ZoneState::Error(message.clone());
            }
            tracing::warn!(%zone, %message, "zone error");
            app.show_message(format!("Zone '{zone}': {message}"));
        }
    }
}

/// Execute one external API command and route the response back.
pub fn handle_api_request(app: &mut App, request: ApiRequest) {
    let result = commands::execute(app, &request.line);
    if result.quit {
        app.should_quit = true;
    }
    if !result.message.is_empty() {
        app.show_message(result.message.clone());
    }
    if let Some(respond) = request.respond {
        let response = if result.ok {
            ApiResponse::ok(
                if result.message.is_empty() {
                    "OK".to_string()
                } else {
                    result.message
                },
                result.data,
            )
        } else {
            ApiResponse::error(result.message)
        };
        let _ = respond.send(response);
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match app.mode {
        Mode::Nav => handle_nav(app, key),
        Mode::Pan => handle_pan(app, key),
        Mode::Edit => handle_edit(app, key),
        Mode::Command => handle_command(app, key),
        Mode::MarkSet => handle_mark(app, key, true),
        Mode::MarkJump => handle_mark(app, key, false),
        Mode::Visual => handle_visual(app, key),
        Mode::Draw => handle_draw(app, key),
        Mode::PtyFocused => handle_pty_focused(app, key),
    }
}

/// Bracketed paste becomes a burst of printable events in EDIT mode.
fn handle_paste(app: &mut App, text: &str) {
    if app.mode != Mode::Edit {
        return;
    }
    for ch in text.chars() {
        if ch == '\n' {
            app.viewport.cursor.y += 1;
            app.viewport.cursor.x = app.viewport.origin.x;
        } else if !ch.is_control() {
            type_char(app, ch);
        }
    }
    app.viewport.ensure_cursor_visible(app.scroll_margin());
}

/// Movement delta for arrows and wasd. Shift (or uppercase) steps fast.
fn movement(app: &App, key: &KeyEvent) -> Option<(i64, i64)> {
    let fast = app.fast_step();
    let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
    let step = if shifted { fast } else { 1 };
    match key.code {
        KeyCode::Up => Some((0, -step)),
        KeyCode::Down => Some((0, step)),
        KeyCode::Left => Some((-step, 0)),
        KeyCode::Right => Some((step, 0)),
        KeyCode::Char('w') => Some((0, -1)),
        KeyCode::Char('s') => Some((0, 1)),
        KeyCode::Char('a') => Some((-1, 0)),
        KeyCode::Char('d') => Some((1, 0)),
        KeyCode::Char('W') => Some((0, -fast)),
        KeyCode::Char('S') => Some((0, fast)),
        KeyCode::Char('A') => Some((-fast, 0)),
        // 'D' is the DRAW-mode entry in NAV; callers that allow letter
        // movement but not mode entry still get the fast step.
        _ => None,
    }
}

fn handle_nav(app: &mut App, key: KeyEvent) {
    if let Some((dx, dy)) = movement(app, &key) {
        app.viewport.move_cursor(dx, dy);
        app.viewport.ensure_cursor_visible(app.scroll_margin());
        return;
    }
    match key.code {
        KeyCode::Char('i') => {
            app.set_mode(Mode::Edit);
            app.show_message("-- EDIT --");
        }
        KeyCode::Char('p') => {
            app.set_mode(Mode::Pan);
            app.show_message("-- PAN --");
        }
        KeyCode::Char('v') => {
            app.selection = Some(Selection {
                anchor_x: app.viewport.cursor.x,
                anchor_y: app.viewport.cursor.y,
            });
            app.set_mode(Mode::Visual);
            app.show_message("-- VISUAL -- y:yank d:delete f:fill");
        }
        KeyCode::Char('D') => {
            app.pen_down = true;
            app.set_mode(Mode::Draw);
            app.show_message("-- DRAW -- pen DOWN (space lifts)");
        }
        KeyCode::Char(':') | KeyCode::Char('/') => {
            app.set_mode(Mode::Command);
        }
        KeyCode::Char('m') => {
            app.set_mode(Mode::MarkSet);
            app.show_message("Set mark: press a-z or 0-9");
        }
        KeyCode::Char('\'') => {
            app.set_mode(Mode::MarkJump);
            app.show_message("Jump to mark: press a-z or 0-9");
        }
        KeyCode::Enter => {
            // Entering a PTY or pager zone under the cursor focuses it.
            let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
            let target = app
                .zones
                .find_at(cx, cy)
                .filter(|zone| {
                    matches!(
                        zone.config,
                        ZoneConfig::Pty { .. } | ZoneConfig::Pager { .. }
                    )
                })
                .map(|zone| zone.name.clone());
            if let Some(name) = target {
                let result = commands::execute(app, &format!("zone focus {name}"));
                app.show_message(result.message);
            }
        }
        KeyCode::F(1) => {
            let result = commands::execute(app, "help");
            app.show_message(result.message);
        }
        KeyCode::Esc => {}
        _ => {}
    }
}

fn handle_pan(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.set_mode(Mode::Nav);
        app.show_message("");
        return;
    }
    if let Some((dx, dy)) = movement(app, &key) {
        // Cursor rides along so it keeps its screen position.
        app.viewport.pan(dx, dy);
        app.viewport.move_cursor(dx, dy);
    }
}

fn type_char(app: &mut App, ch: char) {
    let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
    app.canvas
        .set(cx, cy, Cell::styled(ch, app.draw_fg, app.draw_bg));
    app.viewport.move_cursor(1, 0);
    app.project.mark_dirty();
}

fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.set_mode(Mode::Nav);
            app.show_message("");
            return;
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            type_char(app, ch);
            app.viewport.ensure_cursor_visible(app.scroll_margin());
            return;
        }
        KeyCode::Backspace => {
            app.viewport.move_cursor(-1, 0);
            let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
            app.canvas.clear(cx, cy);
            app.project.mark_dirty();
            app.viewport.ensure_cursor_visible(app.scroll_margin());
            return;
        }
        KeyCode::Delete => {
            let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
            app.canvas.clear(cx, cy);
            app.project.mark_dirty();
            return;
        }
        KeyCode::Enter => {
            app.viewport.cursor.y += 1;
            app.viewport.cursor.x = app.viewport.origin.x;
            app.viewport.ensure_cursor_visible(app.scroll_margin());
            return;
        }
        _ => {}
    }
    // Arrows still navigate while editing.
    let arrow = matches!(
        key.code,
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right
    );
    if arrow {
        if let Some((dx, dy)) = movement(app, &key) {
            app.viewport.move_cursor(dx, dy);
            app.viewport.ensure_cursor_visible(app.scroll_margin());
        }
    }
}

fn handle_command(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.set_mode(Mode::Nav);
        }
        KeyCode::Enter => {
            let line = app.command_buffer.submit();
            app.set_mode(Mode::Nav);
            if line.trim().is_empty() {
                return;
            }
            let result = commands::execute(app, &line);
            apply_result(app, result);
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_buffer.insert(ch);
        }
        KeyCode::Backspace => app.command_buffer.backspace(),
        KeyCode::Delete => app.command_buffer.delete(),
        KeyCode::Left => app.command_buffer.move_left(),
        KeyCode::Right => app.command_buffer.move_right(),
        KeyCode::Home => app.command_buffer.move_start(),
        KeyCode::End => app.command_buffer.move_end(),
        KeyCode::Up => app.command_buffer.history_prev(),
        KeyCode::Down => app.command_buffer.history_next(),
        _ => {}
    }
}

fn apply_result(app: &mut App, result: CommandResult) {
    if result.quit {
        app.should_quit = true;
    }
    if !result.message.is_empty() {
        app.show_message(result.message);
    }
}

fn handle_mark(app: &mut App, key: KeyEvent, set: bool) {
    let outcome = match key.code {
        KeyCode::Char(ch) if ch.is_ascii_alphanumeric() => {
            let ch = ch.to_ascii_lowercase();
            if set {
                let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
                app.bookmarks.set(ch, cx, cy);
                format!("Mark '{ch}' set at ({cx}, {cy})")
            } else {
                match app.bookmarks.get(ch) {
                    Some(bm) => {
                        app.viewport.set_cursor(bm.x, bm.y);
                        app.viewport.ensure_cursor_visible(app.scroll_margin());
                        format!("Jumped to mark '{ch}' ({}, {})", bm.x, bm.y)
                    }
                    None => format!("Mark '{ch}' not set"),
                }
            }
        }
        _ => "Cancelled".to_string(),
    };
    app.set_mode(Mode::Nav);
    app.show_message(outcome);
}

fn handle_visual(app: &mut App, key: KeyEvent) {
    let Some(selection) = app.selection else {
        app.set_mode(Mode::Nav);
        return;
    };
    let (cx, cy) = (app.viewport.cursor.x, app.viewport.cursor.y);
    let (x, y, w, h) = selection.rect(cx, cy);
    // Action keys take precedence over letter movement, so `d` deletes
    // here; the selection extends with the remaining letters and arrows.
    match key.code {
        KeyCode::Esc => {
            app.set_mode(Mode::Nav);
            app.show_message("");
            return;
        }
        KeyCode::Char('y') => {
            app.clipboard.yank_region(&app.canvas, x, y, w, h);
            app.set_mode(Mode::Nav);
            app.show_message(format!("Yanked {w}x{h} region"));
            return;
        }
        KeyCode::Char('d') => {
            app.canvas.clear_region(x, y, w, h);
            app.project.mark_dirty();
            app.set_mode(Mode::Nav);
            app.show_message(format!("Cleared {w}x{h} region"));
            return;
        }
        KeyCode::Char('f') => {
            // Hand off to the command line with the region prefilled; the
            // user finishes the line with the fill glyph.
            app.viewport.set_cursor(x, y);
            app.set_mode(Mode::Command);
            app.command_buffer.set(&format!("fill {w} {h} "));
            return;
        }
        _ => {}
    }
    if let Some((dx, dy)) = movement(app, &key) {
        app.viewport.move_cursor(dx, dy);
        app.viewport.ensure_cursor_visible(app.scroll_margin());
    }
}

fn handle_draw(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.set_mode(Mode::Nav);
            app.show_message("");
            return;
        }
        KeyCode::Char(' ') => {
            app.pen_down = !app.pen_down;
            app.show_message(if app.pen_down {
                "-- DRAW -- pen DOWN"
            } else {
                "-- DRAW -- pen UP"
            });
            return;
        }
        _ => {}
    }
    let Some((dx, dy)) = movement(app, &key) else {
        return;
    };
    // Fast steps draw one cell at a time so runs stay connected.
    let steps = dx.abs().max(dy.abs());
    let unit = (dx.signum(), dy.signum());
    for _ in 0..steps {
        let from = (app.viewport.cursor.x, app.viewport.cursor.y);
        app.viewport.move_cursor(unit.0, unit.1);
        if app.pen_down {
            draw_segment(app, from, unit);
        }
    }
    app.viewport.ensure_cursor_visible(app.scroll_margin());
}

/// Draw one step of a line, merging connections with whatever border
/// glyphs already occupy both endpoints.
fn draw_segment(app: &mut App, from: (i64, i64), unit: (i64, i64)) {
    let style = app.border_style;
    let bit = border::direction_bit(unit.0, unit.1);
    if bit == 0 {
        return;
    }
    let to = (from.0 + unit.0, from.1 + unit.1);

    let from_existing = style
        .connections_of(app.canvas.get_char(from.0, from.1))
        .unwrap_or(0);
    let from_glyph = style.glyph_for(from_existing | bit);
    app.canvas.set(
        from.0,
        from.1,
        Cell::styled(from_glyph, app.draw_fg, app.draw_bg),
    );

    let to_existing = style
        .connections_of(app.canvas.get_char(to.0, to.1))
        .unwrap_or(0);
    let to_glyph = style.glyph_for(to_existing | border::opposite(bit));
    app.canvas.set(
        to.0,
        to.1,
        Cell::styled(to_glyph, app.draw_fg, app.draw_bg),
    );
    app.project.mark_dirty();
}

fn handle_pty_focused(app: &mut App, key: KeyEvent) {
    let Some(name) = app.focused_zone.clone() else {
        app.set_mode(Mode::Nav);
        return;
    };

    if key.code == KeyCode::Esc {
        app.set_mode(Mode::Nav);
        app.show_message("Zone unfocused");
        return;
    }

    // Shift+paging is scrollback, intercepted before forwarding.
    let shifted = key.modifiers.contains(KeyModifiers::SHIFT);
    let mut pending_message = None;
    {
        let Some(zone) = app.zones.get_mut(&name) else {
            app.set_mode(Mode::Nav);
            return;
        };
        let page = zone.inner_height().max(1) as isize;

        if let Some(session) = zone.pty_session_mut() {
            if shifted {
                let screen = session.screen_mut();
                match key.code {
                    KeyCode::PageUp => {
                        screen.scroll_by(page);
                        return;
                    }
                    KeyCode::PageDown => {
                        screen.scroll_by(-page);
                        return;
                    }
                    KeyCode::Home => {
                        screen.scroll_to_top();
                        return;
                    }
                    KeyCode::End => {
                        screen.scroll_to_bottom();
                        return;
                    }
                    _ => {}
                }
            }
            if !session.is_running() {
                return;
            }
            if let Some(bytes) = key_event_to_bytes(&key) {
                if let Err(err) = session.send(&bytes) {
                    pending_message = Some(format!("Zone '{name}': send failed: {err}"));
                }
            }
        } else {
            // Pager focus: plain arrows and paging scroll the buffer.
            let height = zone.inner_height().max(1) as usize;
            match key.code {
                KeyCode::Up => zone.buffer.scroll_by(1, height),
                KeyCode::Down => zone.buffer.scroll_by(-1, height),
                KeyCode::PageUp => zone.buffer.scroll_by(page, height),
                KeyCode::PageDown => zone.buffer.scroll_by(-page, height),
                KeyCode::Home => zone.buffer.scroll_to_top(height),
                KeyCode::End => zone.buffer.scroll_to_bottom(),
                _ => {}
            }
        }
    }
    if let Some(message) = pending_message {
        app.show_message(message);
    }
}
