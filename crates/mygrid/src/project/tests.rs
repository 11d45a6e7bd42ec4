use super::*;
use crate::canvas::Cell;
use crate::grid::GridLineMode;
use tempfile::TempDir;

fn sample_state() -> (Canvas, Viewport, GridSettings, Bookmarks, ZoneRegistry) {
    let mut canvas = Canvas::new();
    canvas.set(3, 2, Cell::styled('H', 1, -1));
    canvas.set(4, 2, Cell::new('i'));
    canvas.set(-5, -5, Cell::styled(' ', -1, 4));

    let mut viewport = Viewport::default();
    viewport.pan_to(-10, -10);
    viewport.set_cursor(4, 2);
    viewport.origin.x = 1;
    viewport.origin.y = 1;
    viewport.y_direction = YDirection::Up;

    let mut grid = GridSettings::default();
    grid.line_mode = GridLineMode::Lines;
    grid.major_interval = 8;
    grid.show_rulers = true;

    let mut bookmarks = Bookmarks::new();
    bookmarks.set('a', 10, 20);
    bookmarks.set('b', 100, 200);

    let mut zones = ZoneRegistry::new();
    let mut zone = Zone::new(
        "monitor",
        5,
        5,
        40,
        8,
        ZoneConfig::Watch {
            command: "date".to_string(),
            trigger: WatchTrigger::Interval(std::time::Duration::from_secs_f64(2.5)),
            auto_scroll: true,
            max_lines: 200,
        },
    );
    zone.bookmark = Some('m');
    zone.description = "clock".to_string();
    zones.insert(zone).expect("insert");

    (canvas, viewport, grid, bookmarks, zones)
}

#[test]
fn save_load_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("project.json");
    let (canvas, viewport, grid, bookmarks, zones) = sample_state();

    let mut project = Project::new();
    project.mark_dirty();
    project
        .save(&path, &canvas, &viewport, &grid, &bookmarks, &zones)
        .expect("save");
    assert!(!project.dirty());

    let loaded = Project::load(&path).expect("load");
    assert_eq!(loaded.canvas.cell_count(), canvas.cell_count());
    assert_eq!(loaded.canvas.get(3, 2), Cell::styled('H', 1, -1));
    assert_eq!(loaded.canvas.get(-5, -5), Cell::styled(' ', -1, 4));
    assert_eq!(loaded.viewport_pos, (-10, -10));
    assert_eq!(loaded.cursor, (4, 2));
    assert_eq!(loaded.origin, (1, 1));
    assert_eq!(loaded.y_direction, YDirection::Up);
    assert_eq!(loaded.grid.line_mode, GridLineMode::Lines);
    assert_eq!(loaded.grid.major_interval, 8);
    assert!(loaded.grid.show_rulers);
    assert_eq!(
        loaded.bookmarks.get('b'),
        Some(crate::bookmarks::Bookmark { x: 100, y: 200 })
    );
    assert_eq!(loaded.zones.len(), 1);
    let descriptor = &loaded.zones[0];
    assert_eq!(descriptor.name, "monitor");
    assert_eq!(descriptor.bookmark, Some('m'));
    match descriptor.config.clone().into_config().expect("config") {
        ZoneConfig::Watch { trigger, max_lines, .. } => {
            assert_eq!(
                trigger,
                WatchTrigger::Interval(std::time::Duration::from_secs_f64(2.5))
            );
            assert_eq!(max_lines, 200);
        }
        other => panic!("expected watch config, got {other:?}"),
    }
}

#[test]
fn unknown_fields_are_ignored() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("future.json");
    std::fs::write(
        &path,
        r#"{
            "version": "1.7",
            "flux_capacitor": true,
            "canvas": {"cells": [{"x": 0, "y": 0, "char": "A", "shiny": 1}]},
            "viewport": {"x": 2, "y": 3, "warp": 9}
        }"#,
    )
    .expect("write");

    let loaded = Project::load(&path).expect("load");
    assert_eq!(loaded.canvas.get_char(0, 0), 'A');
    assert_eq!(loaded.viewport_pos, (2, 3));
}

#[test]
fn malformed_file_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").expect("write");
    assert!(Project::load(&path).is_err());

    std::fs::write(&path, r#"{"version": "2.0"}"#).expect("write");
    assert!(Project::load(&path).is_err());
}

#[test]
fn export_import_round_trip_modulo_trailing_whitespace() {
    let dir = TempDir::new().expect("temp dir");
    let source = dir.path().join("in.txt");
    let exported = dir.path().join("out.txt");
    std::fs::write(&source, "+--+\n|ab|   \n+--+\n").expect("write");

    let mut canvas = Canvas::new();
    import_text(&mut canvas, &source, 0, 0).expect("import");
    export_text(&canvas, &exported).expect("export");

    let round_tripped = std::fs::read_to_string(&exported).expect("read");
    assert_eq!(round_tripped, "+--+\n|ab|\n+--+\n");
}

#[test]
fn export_empty_canvas_writes_empty_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("empty.txt");
    let canvas = Canvas::new();
    assert_eq!(export_text(&canvas, &path).expect("export"), 0);
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "");
}

#[test]
fn import_at_offset() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("art.txt");
    std::fs::write(&path, "ab\ncd\n").expect("write");

    let mut canvas = Canvas::new();
    import_text(&mut canvas, &path, 10, 20).expect("import");
    assert_eq!(canvas.get_char(10, 20), 'a');
    assert_eq!(canvas.get_char(11, 21), 'd');
}

#[test]
fn display_name_carries_dirty_marker() {
    let mut project = Project::new();
    assert_eq!(project.display_name(), "Untitled");
    project.mark_dirty();
    assert_eq!(project.display_name(), "*Untitled");
}
