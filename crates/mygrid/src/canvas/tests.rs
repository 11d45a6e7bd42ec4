use super::*;

#[test]
fn empty_cells_are_not_stored() {
    let mut canvas = Canvas::new();
    canvas.set_char(5, 5, 'x');
    assert_eq!(canvas.cell_count(), 1);

    canvas.set_char(5, 5, ' ');
    assert_eq!(canvas.cell_count(), 0);
    assert!(canvas.is_empty_at(5, 5));
}

#[test]
fn colored_blank_is_kept() {
    let mut canvas = Canvas::new();
    canvas.set(0, 0, Cell::styled(' ', -1, 4));
    assert_eq!(canvas.cell_count(), 1);
    assert_eq!(canvas.get(0, 0).bg, 4);

    // Resetting colors on a blank removes the key again.
    canvas.set_color(0, 0, -1, -1);
    assert_eq!(canvas.cell_count(), 0);
}

#[test]
fn negative_coordinates_work() {
    let mut canvas = Canvas::new();
    canvas.set_char(-1_000_000, -2_000_000, '@');
    assert_eq!(canvas.get_char(-1_000_000, -2_000_000), '@');
    assert_eq!(canvas.cell_count(), 1);
}

#[test]
fn cell_count_matches_non_empty_cells() {
    let mut canvas = Canvas::new();
    canvas.write_text(0, 0, "hello", -1, -1);
    canvas.write_text(0, 1, "a b", -1, -1);
    // "a b" stores only two cells: the space is dropped.
    assert_eq!(canvas.cell_count(), 7);

    canvas.clear_region(0, 0, 5, 1);
    assert_eq!(canvas.cell_count(), 2);
}

#[test]
fn bounding_box_covers_extremes() {
    let mut canvas = Canvas::new();
    assert!(canvas.bounding_box().is_none());

    canvas.set_char(-3, 2, 'a');
    canvas.set_char(10, -7, 'b');
    let bbox = canvas.bounding_box().expect("bbox");
    assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (-3, -7, 10, 2));
    assert_eq!(bbox.width(), 14);
    assert_eq!(bbox.height(), 10);
}

#[test]
fn draw_line_zero_length_writes_endpoint() {
    let mut canvas = Canvas::new();
    canvas.draw_line(4, 4, 4, 4, Cell::new('*'));
    assert_eq!(canvas.cell_count(), 1);
    assert_eq!(canvas.get_char(4, 4), '*');
}

#[test]
fn draw_line_diagonal() {
    let mut canvas = Canvas::new();
    canvas.draw_line(0, 0, 3, 3, Cell::new('*'));
    for i in 0..=3 {
        assert_eq!(canvas.get_char(i, i), '*');
    }
    assert_eq!(canvas.cell_count(), 4);
}

#[test]
fn draw_rect_ascii_outline() {
    let mut canvas = Canvas::new();
    let chars = RectChars {
        horizontal: '-',
        vertical: '|',
        tl: '+',
        tr: '+',
        bl: '+',
        br: '+',
    };
    canvas.draw_rect(3, 2, 5, 3, chars, -1, -1);
    let row = |y: i64| -> String { (3..8).map(|x| canvas.get_char(x, y)).collect() };
    assert_eq!(row(2), "+---+");
    assert_eq!(row(3), "|   |");
    assert_eq!(row(4), "+---+");
}

#[test]
fn search_text_finds_matches_in_order() {
    let mut canvas = Canvas::new();
    canvas.write_text(5, 0, "abcabc", -1, -1);
    canvas.write_text(-2, 3, "ABC", -1, -1);

    let matches = canvas.search_text("abc", false);
    assert_eq!(matches, vec![(5, 0, 3), (8, 0, 3), (-2, 3, 3)]);

    let exact = canvas.search_text("abc", true);
    assert_eq!(exact, vec![(5, 0, 3), (8, 0, 3)]);
}

#[test]
fn parse_color_names_and_numbers() {
    assert_eq!(parse_color("red"), Some(1));
    assert_eq!(parse_color("WHITE"), Some(7));
    assert_eq!(parse_color("default"), Some(-1));
    assert_eq!(parse_color("42"), Some(42));
    assert_eq!(parse_color("256"), None);
    assert_eq!(parse_color("teal"), None);
}
