use super::*;

fn static_zone(name: &str, x: i64, y: i64) -> Zone {
    Zone::new(name, x, y, 10, 4, ZoneConfig::Static)
}

#[test]
fn names_are_unique_case_insensitive() {
    let mut registry = ZoneRegistry::new();
    registry.insert(static_zone("Inbox", 0, 0)).expect("insert");
    assert!(registry.insert(static_zone("INBOX", 5, 5)).is_err());
    assert!(registry.get("inbox").is_some());
}

#[test]
fn find_at_returns_topmost_overlap() {
    let mut registry = ZoneRegistry::new();
    registry.insert(static_zone("under", 0, 0)).expect("insert");
    registry.insert(static_zone("over", 5, 0)).expect("insert");
    // (6, 1) is inside both; the later-created zone wins.
    assert_eq!(registry.find_at(6, 1).map(|z| z.name.as_str()), Some("over"));
    assert_eq!(registry.find_at(2, 1).map(|z| z.name.as_str()), Some("under"));
    assert!(registry.find_at(50, 50).is_none());
}

#[test]
fn remove_returns_zone_for_cleanup() {
    let mut registry = ZoneRegistry::new();
    registry.insert(static_zone("gone", 0, 0)).expect("insert");
    let zone = registry.remove("GONE").expect("remove");
    assert_eq!(zone.name, "gone");
    assert!(registry.get("gone").is_none());
    assert!(registry.remove("gone").is_none());
}

#[test]
fn rename_rejects_collisions() {
    let mut registry = ZoneRegistry::new();
    registry.insert(static_zone("a", 0, 0)).expect("insert");
    registry.insert(static_zone("b", 20, 0)).expect("insert");
    assert!(registry.rename("a", "B").is_err());
    registry.rename("a", "c").expect("rename");
    assert!(registry.get("c").is_some());
    assert!(registry.get("a").is_none());
}

#[test]
fn inner_dimensions_account_for_border() {
    let zone = Zone::new("z", 0, 0, 40, 10, ZoneConfig::Static);
    assert_eq!(zone.inner_width(), 38);
    assert_eq!(zone.inner_height(), 8);

    let tiny = Zone::new("t", 0, 0, 1, 1, ZoneConfig::Static);
    assert_eq!(tiny.inner_width(), 0);
    assert_eq!(tiny.inner_height(), 0);
}

#[test]
fn type_tags_match_border_letters() {
    let cases: Vec<(ZoneConfig, char)> = vec![
        (ZoneConfig::Static, 'S'),
        (
            ZoneConfig::Pipe {
                command: "ls".into(),
                auto_scroll: true,
                max_lines: 100,
            },
            'P',
        ),
        (
            ZoneConfig::Watch {
                command: "date".into(),
                trigger: WatchTrigger::Interval(Duration::from_secs(5)),
                auto_scroll: true,
                max_lines: 100,
            },
            'W',
        ),
        (
            ZoneConfig::Pty {
                shell: "bash".into(),
                max_lines: 100,
            },
            'T',
        ),
        (
            ZoneConfig::Fifo {
                path: "/tmp/x".into(),
                auto_scroll: true,
                max_lines: 100,
            },
            'F',
        ),
        (
            ZoneConfig::Socket {
                port: 9000,
                auto_scroll: true,
                max_lines: 100,
            },
            'N',
        ),
        (
            ZoneConfig::Pager {
                path: "/tmp/y".into(),
                renderer: PagerRenderer::Plain,
            },
            'R',
        ),
        (ZoneConfig::Clipboard, 'C'),
    ];
    for (config, tag) in cases {
        assert_eq!(config.tag(), tag, "{}", config.kind_name());
    }
}

#[test]
fn substitute_file_replaces_placeholder() {
    let cmd = substitute_file("wc -l {file}", std::path::Path::new("/tmp/data.csv"));
    assert_eq!(cmd, "wc -l /tmp/data.csv");
    let untouched = substitute_file("date", std::path::Path::new("/tmp/data.csv"));
    assert_eq!(untouched, "date");
}
