use std::sync::mpsc;

use tempfile::TempDir;

use crate::app::{App, Mode};
use crate::config::Config;
use crate::layouts::LayoutManager;

use super::execute;

fn test_app() -> App {
    let (tx, _rx) = mpsc::channel();
    App::new(Config::default(), tx, true)
}

fn run_ok(app: &mut App, line: &str) -> String {
    let result = execute(app, line);
    assert!(result.ok, "command '{line}' failed: {}", result.message);
    result.message
}

#[test]
fn box_and_label() {
    let mut app = test_app();
    run_ok(&mut app, ":goto 3 2");
    run_ok(&mut app, ":rect 5 3");
    run_ok(&mut app, ":goto 4 3");
    run_ok(&mut app, ":text Hi");

    let row = |y: i64| -> String { (3..8).map(|x| app.canvas.get_char(x, y)).collect() };
    assert_eq!(row(2), "+---+");
    assert_eq!(row(3), "|Hi |");
    assert_eq!(row(4), "+---+");

    let bbox = app.canvas.bounding_box().expect("bbox");
    assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (3, 2, 7, 4));
}

#[test]
fn unknown_command_is_error_not_panic() {
    let mut app = test_app();
    let result = execute(&mut app, ":frobnicate 1 2");
    assert!(!result.ok);
    assert!(result.message.contains("Unknown command"));
}

#[test]
fn goto_requires_numbers() {
    let mut app = test_app();
    let result = execute(&mut app, ":goto five six");
    assert!(!result.ok);
    assert_eq!(app.viewport.cursor.x, 0);
}

#[test]
fn origin_here_uses_cursor() {
    let mut app = test_app();
    run_ok(&mut app, ":goto 7 9");
    run_ok(&mut app, ":origin here");
    assert_eq!((app.viewport.origin.x, app.viewport.origin.y), (7, 9));
    run_ok(&mut app, ":origin -3 4");
    assert_eq!((app.viewport.origin.x, app.viewport.origin.y), (-3, 4));
}

#[test]
fn marks_set_jump_and_delete() {
    let mut app = test_app();
    run_ok(&mut app, ":goto 10 20");
    run_ok(&mut app, ":mark a");
    run_ok(&mut app, ":mark b 100 200");

    let listing = run_ok(&mut app, ":marks");
    assert!(listing.contains("a:(10,20)"));
    assert!(listing.contains("b:(100,200)"));

    run_ok(&mut app, ":delmark a");
    let result = execute(&mut app, ":delmark a");
    assert!(!result.ok);

    run_ok(&mut app, ":delmarks");
    assert_eq!(run_ok(&mut app, ":marks"), "No marks set");

    let bad = execute(&mut app, ":mark !!");
    assert!(!bad.ok);
}

#[test]
fn text_preserves_internal_spacing() {
    let mut app = test_app();
    run_ok(&mut app, ":text a  b");
    assert_eq!(app.canvas.get_char(0, 0), 'a');
    assert!(app.canvas.is_empty_at(1, 0));
    assert!(app.canvas.is_empty_at(2, 0));
    assert_eq!(app.canvas.get_char(3, 0), 'b');
}

#[test]
fn line_draws_from_cursor() {
    let mut app = test_app();
    run_ok(&mut app, ":goto 0 0");
    run_ok(&mut app, ":line 3 0 #");
    for x in 0..=3 {
        assert_eq!(app.canvas.get_char(x, 0), '#');
    }
    // Zero-length line writes the endpoint.
    run_ok(&mut app, ":goto 9 9");
    run_ok(&mut app, ":line 9 9");
    assert_eq!(app.canvas.get_char(9, 9), '*');
}

#[test]
fn fill_at_cursor_and_explicit() {
    let mut app = test_app();
    run_ok(&mut app, ":goto 2 2");
    run_ok(&mut app, ":fill 2 2 x");
    assert_eq!(app.canvas.get_char(3, 3), 'x');
    run_ok(&mut app, ":fill 10 10 1 1 z");
    assert_eq!(app.canvas.get_char(10, 10), 'z');
}

#[test]
fn yank_clear_paste_restores_region() {
    let mut app = test_app();
    run_ok(&mut app, ":goto 0 0");
    run_ok(&mut app, ":text ABCD");
    run_ok(&mut app, ":yank 4 1");
    run_ok(&mut app, ":clear");
    assert_eq!(app.canvas.cell_count(), 0);
    run_ok(&mut app, ":goto 0 2");
    run_ok(&mut app, ":paste");
    let pasted: String = (0..4).map(|x| app.canvas.get_char(x, 2)).collect();
    assert_eq!(pasted, "ABCD");
}

#[test]
fn paste_empty_clipboard_is_error() {
    let mut app = test_app();
    let result = execute(&mut app, ":paste");
    assert!(!result.ok);
}

#[test]
fn color_set_apply_and_reset() {
    let mut app = test_app();
    run_ok(&mut app, ":color red blue");
    assert_eq!((app.draw_fg, app.draw_bg), (1, 4));

    run_ok(&mut app, ":text X");
    assert_eq!(app.canvas.get(0, 0).fg, 1);
    assert_eq!(app.canvas.get(0, 0).bg, 4);

    run_ok(&mut app, ":goto 0 0");
    run_ok(&mut app, ":color off");
    run_ok(&mut app, ":color green");
    run_ok(&mut app, ":color apply 1 1");
    assert_eq!(app.canvas.get(0, 0).fg, 2);

    let bad = execute(&mut app, ":color chartreuse");
    assert!(!bad.ok);
}

#[test]
fn border_style_changes_rect_glyphs() {
    let mut app = test_app();
    run_ok(&mut app, ":border double");
    assert_eq!(app.border_style, crate::border::BorderStyle::Double);
    run_ok(&mut app, ":rect 3 3");
    assert_eq!(app.canvas.get_char(0, 0), '╔');
    assert_eq!(app.canvas.get_char(1, 0), '═');

    let bad = execute(&mut app, ":border dotted");
    assert!(!bad.ok);
}

#[test]
fn opaque_paste_erases_gaps() {
    let mut app = test_app();
    run_ok(&mut app, ":text A C");
    run_ok(&mut app, ":yank 3 1");
    run_ok(&mut app, ":goto 0 2");
    run_ok(&mut app, ":text xyz");
    run_ok(&mut app, ":paste opaque");
    assert!(app.canvas.is_empty_at(1, 2));
    assert_eq!(app.canvas.get_char(0, 2), 'A');
}

#[test]
fn ydir_flips_display_only() {
    let mut app = test_app();
    run_ok(&mut app, ":text flat");
    let before = app.canvas.cell_count();
    run_ok(&mut app, ":ydir up");
    assert_eq!(app.viewport.y_direction, crate::viewport::YDirection::Up);
    assert_eq!(app.canvas.cell_count(), before);
    run_ok(&mut app, ":ydir down");
    let bad = execute(&mut app, ":ydir sideways");
    assert!(!bad.ok);
}

#[test]
fn grid_commands_mutate_settings() {
    let mut app = test_app();
    run_ok(&mut app, ":grid lines");
    assert_eq!(app.grid.line_mode, crate::grid::GridLineMode::Lines);
    run_ok(&mut app, ":grid interval 20 4");
    assert_eq!((app.grid.major_interval, app.grid.minor_interval), (20, 4));
    run_ok(&mut app, ":grid 8");
    assert_eq!(app.grid.major_interval, 8);
    run_ok(&mut app, ":grid rulers on");
    assert!(app.grid.show_rulers);
    run_ok(&mut app, ":grid labels off");
    assert!(!app.grid.show_labels);
    run_ok(&mut app, ":grid off");
    assert_eq!(app.grid.line_mode, crate::grid::GridLineMode::Off);
}

#[test]
fn search_jumps_to_next_match_and_wraps() {
    let mut app = test_app();
    run_ok(&mut app, ":goto 0 0");
    run_ok(&mut app, ":text alpha");
    run_ok(&mut app, ":goto 0 5");
    run_ok(&mut app, ":text alpha again");

    run_ok(&mut app, ":goto 0 0");
    run_ok(&mut app, ":search alpha");
    assert_eq!((app.viewport.cursor.x, app.viewport.cursor.y), (0, 5));
    run_ok(&mut app, ":search alpha");
    // Wraps back to the first match.
    assert_eq!((app.viewport.cursor.x, app.viewport.cursor.y), (0, 0));

    let miss = execute(&mut app, ":search zebra");
    assert!(!miss.ok);
}

#[test]
fn status_reports_structured_state() {
    let mut app = test_app();
    run_ok(&mut app, ":goto 5 5");
    run_ok(&mut app, ":rect 4 2");
    let result = execute(&mut app, "status");
    assert!(result.ok);
    let data = result.data.expect("status data");
    assert_eq!(data["cursor"]["x"], 5);
    assert_eq!(data["cursor"]["y"], 5);
    assert_eq!(data["mode"], "NAV");
    assert!(data["cells"].as_u64().expect("cells") >= 8);
    assert_eq!(data["dirty"], true);
}

#[test]
fn quit_and_wq_set_quit_flag() {
    let mut app = test_app();
    assert!(execute(&mut app, ":q").quit);
    assert!(execute(&mut app, "quit").quit);

    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("out.json");
    let result = execute(&mut app, &format!(":wq {}", path.display()));
    assert!(result.ok);
    assert!(result.quit);
    assert!(path.exists());
}

#[test]
fn write_without_filename_errors_on_fresh_project() {
    let mut app = test_app();
    let result = execute(&mut app, ":w");
    assert!(!result.ok);
}

#[test]
fn export_import_round_trip_via_commands() {
    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("art.txt");

    let mut app = test_app();
    run_ok(&mut app, ":goto 0 0");
    run_ok(&mut app, ":rect 4 3");
    run_ok(&mut app, &format!(":export {}", file.display()));

    let mut other = test_app();
    run_ok(&mut other, ":goto 0 0");
    run_ok(&mut other, &format!(":import {}", file.display()));
    assert_eq!(other.canvas.cell_count(), app.canvas.cell_count());
    assert_eq!(other.canvas.get_char(0, 0), '+');
}

#[test]
fn static_zone_lifecycle() {
    let mut app = test_app();
    run_ok(&mut app, ":zone create notes 5 5 20 6 scratch space");
    assert_eq!(app.zones.len(), 1);
    let zone = app.zones.get("notes").expect("zone");
    assert_eq!(zone.description, "scratch space");

    let dup = execute(&mut app, ":zone create NOTES 0 0 10 4");
    assert!(!dup.ok);

    let info = run_ok(&mut app, ":zone info notes");
    assert!(info.contains("'notes'"));
    assert!(info.contains("[S]"));

    run_ok(&mut app, ":zone goto notes");
    assert_eq!((app.viewport.cursor.x, app.viewport.cursor.y), (15, 8));

    run_ok(&mut app, ":zone rename notes scratch");
    run_ok(&mut app, ":zone resize scratch 30 8");
    run_ok(&mut app, ":zone move scratch 0 0");
    let zone = app.zones.get("scratch").expect("zone");
    assert_eq!((zone.x, zone.y, zone.width, zone.height), (0, 0, 30, 8));

    run_ok(&mut app, ":zone link scratch s");
    assert!(app.bookmarks.get('s').is_some());

    run_ok(&mut app, ":zone delete scratch");
    assert!(app.zones.is_empty());
    let gone = execute(&mut app, ":zone delete scratch");
    assert!(!gone.ok);
}

#[test]
fn zone_create_rejects_tiny_rectangles() {
    let mut app = test_app();
    let result = execute(&mut app, ":zone create tiny 0 0 2 2");
    assert!(!result.ok);
}

#[test]
fn zone_create_here_uses_cursor() {
    let mut app = test_app();
    run_ok(&mut app, ":goto 30 40");
    run_ok(&mut app, ":zone create here-zone here 10 5");
    let zone = app.zones.get("here-zone").expect("zone");
    assert_eq!((zone.x, zone.y), (30, 40));
}

#[test]
fn clipboard_zone_projects_buffer() {
    let mut app = test_app();
    run_ok(&mut app, ":text hello");
    run_ok(&mut app, ":yank 5 1");
    run_ok(&mut app, ":clipboard zone");
    let zone = app.zones.get("CLIPBOARD").expect("zone");
    assert_eq!(zone.config, crate::zones::ZoneConfig::Clipboard);
}

#[test]
fn layout_save_load_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let mut app = test_app();
    app.layouts = LayoutManager::new(dir.path().join("layouts"));

    run_ok(&mut app, ":zone create left 0 0 20 10");
    run_ok(&mut app, ":zone create right 25 0 20 10");
    run_ok(&mut app, ":goto 3 3");
    run_ok(&mut app, ":layout save split two columns");

    let listing = run_ok(&mut app, ":layout list");
    assert!(listing.contains("split"));
    assert!(listing.contains("two columns"));

    run_ok(&mut app, ":zone delete left");
    run_ok(&mut app, ":zone delete right");
    run_ok(&mut app, ":goto 0 0");
    assert!(app.zones.is_empty());

    let loaded = run_ok(&mut app, ":layout load split");
    assert!(loaded.contains("2 zones"));
    assert_eq!(app.zones.len(), 2);
    assert_eq!((app.viewport.cursor.x, app.viewport.cursor.y), (3, 3));

    // Loading again without --clear collides on names.
    let again = run_ok(&mut app, ":layout load split");
    assert!(again.contains("failed"));
    // With --clear the zones are replaced.
    let cleared = run_ok(&mut app, ":layout load split --clear");
    assert!(!cleared.contains("failed"));
    assert_eq!(app.zones.len(), 2);

    run_ok(&mut app, ":layout delete split");
    let missing = execute(&mut app, ":layout load split");
    assert!(!missing.ok);
}

#[test]
fn command_mode_contract_returns_to_nav() {
    // The input layer owns the mode flip; commands themselves must not
    // leave the app in COMMAND mode.
    let mut app = test_app();
    app.set_mode(Mode::Command);
    let _ = execute(&mut app, ":goto 1 1");
    let _ = execute(&mut app, ":bogus");
    assert_eq!(app.mode, Mode::Command);
}

#[test]
fn pipe_zone_runs_command() {
    let (tx, rx) = mpsc::channel();
    let mut app = App::new(Config::default(), tx, true);
    run_ok(&mut app, ":zone pipe out 20 5 printf 'a\\nb\\n'");
    assert!(app.zones.get("out").is_some());

    // The handler reports content through the event channel.
    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
    let mut got_content = false;
    while std::time::Instant::now() < deadline && !got_content {
        match rx.recv_timeout(std::time::Duration::from_millis(200)) {
            Ok(crate::events::AppEvent::ZoneContent { zone, lines, .. }) => {
                assert_eq!(zone, "out");
                assert_eq!(lines.len(), 2);
                got_content = true;
            }
            Ok(_) => {}
            Err(_) => break,
        }
    }
    assert!(got_content, "pipe zone never reported content");
}
