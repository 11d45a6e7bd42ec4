//! vt100-backed screen state for a PTY zone.
//!
//! The screen renders to the same color-run lines zone buffers use, so
//! the zone renderer has a single path. Scrollback position lives inside
//! the vt100 screen; offset 0 follows live output.

use vt100::Parser;

use crate::canvas::{Color, DEFAULT_COLOR};
use crate::zones::buffer::{Run, ZoneLine};

pub struct TermScreen {
    parser: Parser,
    rows: u16,
    cols: u16,
    /// History length observed the last time scrollback moved.
    known_history: usize,
}

fn map_color(color: vt100::Color, bold: bool) -> Color {
    match color {
        vt100::Color::Default => DEFAULT_COLOR,
        vt100::Color::Idx(idx) => {
            // Bold brightens the basic palette, which indexed colors can
            // express directly.
            if bold && idx < 8 {
                (idx + 8) as Color
            } else {
                idx as Color
            }
        }
        vt100::Color::Rgb(r, g, b) => nearest_basic(r, g, b),
    }
}

/// Nearest of the 16 basic colors for RGB output from richer programs.
fn nearest_basic(r: u8, g: u8, b: u8) -> Color {
    const PALETTE: [(u8, u8, u8); 16] = [
        (0, 0, 0),
        (205, 0, 0),
        (0, 205, 0),
        (205, 205, 0),
        (0, 0, 238),
        (205, 0, 205),
        (0, 205, 205),
        (229, 229, 229),
        (127, 127, 127),
        (255, 0, 0),
        (0, 255, 0),
        (255, 255, 0),
        (92, 92, 255),
        (255, 0, 255),
        (0, 255, 255),
        (255, 255, 255),
    ];
    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (i, (pr, pg, pb)) in PALETTE.iter().enumerate() {
        let dist = (i32::from(r) - i32::from(*pr)).pow(2) as u32
            + (i32::from(g) - i32::from(*pg)).pow(2) as u32
            + (i32::from(b) - i32::from(*pb)).pow(2) as u32;
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best as Color
}

impl TermScreen {
    pub fn new(rows: u16, cols: u16, scrollback: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            parser: Parser::new(rows, cols, scrollback),
            rows,
            cols,
            known_history: 0,
        }
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.parser.process(bytes);
    }

    pub fn resize(&mut self, rows: u16, cols: u16) {
        self.rows = rows.max(1);
        self.cols = cols.max(1);
        self.parser.set_size(self.rows, self.cols);
    }

    /// Lines scrolled back from live output; 0 = following.
    pub fn scrollback(&self) -> usize {
        self.parser.screen().scrollback()
    }

    /// Total lines available above the live screen, as of the last scroll.
    pub fn history_len(&self) -> usize {
        self.known_history
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let current = self.parser.screen().scrollback() as isize;
        let target = (current + delta).max(0) as usize;
        // vt100 clamps to the history it actually holds.
        self.parser.set_scrollback(target);
        let clamped = self.parser.screen().scrollback();
        if clamped > self.known_history {
            self.known_history = clamped;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.parser.set_scrollback(usize::MAX);
        self.known_history = self.parser.screen().scrollback();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.parser.set_scrollback(0);
    }

    /// Cursor position (row, col), present only while following live
    /// output with a visible cursor.
    pub fn cursor_position(&self) -> Option<(u16, u16)> {
        let screen = self.parser.screen();
        if screen.hide_cursor() || screen.scrollback() != 0 {
            None
        } else {
            Some(screen.cursor_position())
        }
    }

    /// The currently displayed lines (live screen or scrolled-back view)
    /// as color runs. Wide-character continuation cells are skipped.
    pub fn styled_lines(&self) -> Vec<ZoneLine> {
        let screen = self.parser.screen();
        let mut lines = Vec::with_capacity(self.rows as usize);
        for row in 0..self.rows {
            let mut runs: Vec<Run> = Vec::new();
            let mut text = String::new();
            let mut fg = DEFAULT_COLOR;
            let mut bg = DEFAULT_COLOR;
            let mut started = false;
            for col in 0..self.cols {
                let Some(cell) = screen.cell(row, col) else {
                    continue;
                };
                if cell.is_wide_continuation() {
                    continue;
                }
                let bold = cell.bold();
                let (mut cell_fg, mut cell_bg) =
                    (map_color(cell.fgcolor(), bold), map_color(cell.bgcolor(), false));
                if cell.inverse() {
                    // Reverse video with defaults resolves to white-on-black
                    // swapped, the common terminal behavior.
                    let shown_fg = if cell_fg == DEFAULT_COLOR { 7 } else { cell_fg };
                    let shown_bg = if cell_bg == DEFAULT_COLOR { 0 } else { cell_bg };
                    cell_fg = shown_bg;
                    cell_bg = shown_fg;
                }
                let contents = cell.contents();
                let glyph = if contents.is_empty() {
                    " ".to_string()
                } else {
                    contents.to_string()
                };
                if !started || cell_fg != fg || cell_bg != bg {
                    if started && !text.is_empty() {
                        runs.push(Run {
                            text: std::mem::take(&mut text),
                            fg,
                            bg,
                        });
                    }
                    fg = cell_fg;
                    bg = cell_bg;
                    started = true;
                }
                text.push_str(&glyph);
            }
            if started && !text.is_empty() {
                runs.push(Run { text, fg, bg });
            }
            lines.push(ZoneLine { runs });
        }
        lines
    }
}

impl std::fmt::Debug for TermScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermScreen")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_lines(screen: &TermScreen) -> Vec<String> {
        screen
            .styled_lines()
            .iter()
            .map(|line| line.to_plain().trim_end().to_string())
            .collect()
    }

    #[test]
    fn printable_bytes_land_on_screen() {
        let mut screen = TermScreen::new(4, 20, 100);
        screen.feed(b"hello\r\nworld");
        let lines = plain_lines(&screen);
        assert_eq!(lines[0], "hello");
        assert_eq!(lines[1], "world");
        assert_eq!(screen.cursor_position(), Some((1, 5)));
    }

    #[test]
    fn carriage_return_and_backspace() {
        let mut screen = TermScreen::new(2, 20, 100);
        screen.feed(b"abc\x08X");
        assert_eq!(plain_lines(&screen)[0], "abX");
        screen.feed(b"\roverwrite");
        assert_eq!(plain_lines(&screen)[0], "overwrite");
    }

    #[test]
    fn erase_line_and_cursor_positioning() {
        let mut screen = TermScreen::new(3, 20, 100);
        screen.feed(b"line one\r\nline two");
        // Home the cursor and clear to end of screen.
        screen.feed(b"\x1b[H\x1b[J");
        let lines = plain_lines(&screen);
        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "");
        // Absolute positioning writes where directed.
        screen.feed(b"\x1b[2;3Hok");
        assert_eq!(plain_lines(&screen)[1], "  ok");
    }

    #[test]
    fn sgr_colors_become_runs() {
        let mut screen = TermScreen::new(2, 20, 100);
        screen.feed(b"\x1b[31mred\x1b[0m end");
        let line = &screen.styled_lines()[0];
        assert_eq!(line.runs[0].text, "red");
        assert_eq!(line.runs[0].fg, 1);
    }

    #[test]
    fn bold_maps_to_bright_palette() {
        let mut screen = TermScreen::new(2, 20, 100);
        screen.feed(b"\x1b[1;32mok\x1b[0m");
        assert_eq!(screen.styled_lines()[0].runs[0].fg, 10);
    }

    #[test]
    fn scrollback_reveals_history() {
        let mut screen = TermScreen::new(3, 20, 100);
        for i in 0..10 {
            screen.feed(format!("line{i}\r\n").as_bytes());
        }
        // Live view shows the tail.
        assert!(plain_lines(&screen)[0].starts_with("line"));
        screen.scroll_by(5);
        assert_eq!(screen.scrollback(), 5);
        let back = plain_lines(&screen);
        assert_eq!(back[0], "line3");
        // Cursor is hidden while scrolled back.
        assert_eq!(screen.cursor_position(), None);
        screen.scroll_to_bottom();
        assert_eq!(screen.scrollback(), 0);
    }

    #[test]
    fn scroll_clamps_to_available_history() {
        let mut screen = TermScreen::new(3, 20, 100);
        screen.feed(b"one\r\ntwo\r\nthree\r\nfour\r\n");
        screen.scroll_by(1000);
        assert!(screen.scrollback() <= 100);
        assert_eq!(screen.scrollback(), screen.history_len());
    }

    #[test]
    fn resize_changes_dimensions() {
        let mut screen = TermScreen::new(4, 10, 100);
        screen.resize(6, 30);
        assert_eq!((screen.rows(), screen.cols()), (6, 30));
        screen.feed(b"after resize");
        assert_eq!(plain_lines(&screen)[0], "after resize");
    }
}
