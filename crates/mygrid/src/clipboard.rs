//! Rectangular clipboard with transparent paste.
//!
//! Yanked cells keep their colors. Paste skips empty cells so content
//! beneath transparent positions survives; the opaque variant exists for
//! callers that want a true blit. System clipboard exchange goes through
//! arboard as plain text.

use crate::canvas::{Canvas, Cell};
use crate::zones::Zone;

#[derive(Debug, Default)]
pub struct Clipboard {
    rows: Vec<Vec<Cell>>,
    source: String,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.source.clear();
    }

    pub fn line_count(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn source(&self) -> &str {
        if self.source.is_empty() {
            "canvas"
        } else {
            &self.source
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Copy a rectangle of cells, colors included.
    pub fn yank_region(&mut self, canvas: &Canvas, x: i64, y: i64, width: i64, height: i64) {
        let mut rows = Vec::with_capacity(height.max(0) as usize);
        for cy in y..y + height {
            let row: Vec<Cell> = (x..x + width).map(|cx| canvas.get(cx, cy)).collect();
            rows.push(row);
        }
        self.rows = rows;
        self.source = format!("region {width}x{height} at ({x},{y})");
    }

    /// Copy a zone's buffer as plain cells.
    pub fn yank_zone(&mut self, zone: &Zone) -> usize {
        let mut rows = Vec::with_capacity(zone.buffer.len());
        for line in zone.buffer.iter() {
            let row: Vec<Cell> = line
                .cells()
                .map(|(ch, fg, bg)| Cell::styled(ch, fg, bg))
                .collect();
            rows.push(row);
        }
        let count = rows.len();
        self.rows = rows;
        self.source = format!("zone '{}'", zone.name);
        count
    }

    /// Paste at a position, skipping empty cells. Returns `(w, h)` of the
    /// pasted block.
    pub fn paste(&self, canvas: &mut Canvas, x: i64, y: i64) -> (i64, i64) {
        self.paste_inner(canvas, x, y, true)
    }

    /// Paste including empty cells, erasing what they cover.
    pub fn paste_opaque(&self, canvas: &mut Canvas, x: i64, y: i64) -> (i64, i64) {
        self.paste_inner(canvas, x, y, false)
    }

    fn paste_inner(&self, canvas: &mut Canvas, x: i64, y: i64, transparent: bool) -> (i64, i64) {
        let mut max_width = 0i64;
        for (dy, row) in self.rows.iter().enumerate() {
            max_width = max_width.max(row.len() as i64);
            for (dx, cell) in row.iter().enumerate() {
                if transparent && cell.is_empty() {
                    continue;
                }
                canvas.set(x + dx as i64, y + dy as i64, *cell);
            }
        }
        (max_width, self.rows.len() as i64)
    }

    /// Load plain text, one row per line.
    pub fn set_text(&mut self, text: &str, source: &str) {
        self.rows = text
            .lines()
            .map(|line| line.chars().map(Cell::new).collect())
            .collect();
        self.source = source.to_string();
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let line: String = row.iter().map(|cell| cell.ch).collect();
            out.push_str(line.trim_end());
        }
        out
    }

    /// Read the OS clipboard into the buffer.
    pub fn from_system(&mut self) -> Result<usize, String> {
        let mut handle = arboard::Clipboard::new().map_err(|err| err.to_string())?;
        let text = handle.get_text().map_err(|err| err.to_string())?;
        self.set_text(&text, "system clipboard");
        Ok(self.rows.len())
    }

    /// Write the buffer to the OS clipboard as text.
    pub fn to_system(&self) -> Result<(), String> {
        let mut handle = arboard::Clipboard::new().map_err(|err| err.to_string())?;
        handle.set_text(self.to_text()).map_err(|err| err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Cell;

    #[test]
    fn yank_paste_round_trip_preserves_cells() {
        let mut canvas = Canvas::new();
        canvas.set(1, 1, Cell::styled('A', 1, -1));
        canvas.set(2, 1, Cell::styled('B', -1, 4));
        canvas.set(1, 2, Cell::new('C'));

        let mut clip = Clipboard::new();
        clip.yank_region(&canvas, 1, 1, 2, 2);

        canvas.clear_all();
        clip.paste(&mut canvas, 1, 1);

        assert_eq!(canvas.get(1, 1), Cell::styled('A', 1, -1));
        assert_eq!(canvas.get(2, 1), Cell::styled('B', -1, 4));
        assert_eq!(canvas.get(1, 2), Cell::new('C'));
        // The empty corner stays empty.
        assert!(canvas.is_empty_at(2, 2));
        assert_eq!(canvas.cell_count(), 3);
    }

    #[test]
    fn transparent_paste_preserves_underlying_content() {
        let mut canvas = Canvas::new();
        canvas.write_text(0, 0, "A C", -1, -1);

        let mut clip = Clipboard::new();
        clip.yank_region(&canvas, 0, 0, 3, 1);

        canvas.write_text(0, 2, "xyz", -1, -1);
        clip.paste(&mut canvas, 0, 2);

        // 'y' survives under the yanked gap.
        assert_eq!(canvas.get_char(0, 2), 'A');
        assert_eq!(canvas.get_char(1, 2), 'y');
        assert_eq!(canvas.get_char(2, 2), 'C');
    }

    #[test]
    fn opaque_paste_erases_under_gaps() {
        let mut canvas = Canvas::new();
        let mut clip = Clipboard::new();
        canvas.write_text(0, 0, "A C", -1, -1);
        clip.yank_region(&canvas, 0, 0, 3, 1);

        canvas.write_text(0, 2, "xyz", -1, -1);
        clip.paste_opaque(&mut canvas, 0, 2);
        assert!(canvas.is_empty_at(1, 2));
    }

    #[test]
    fn text_round_trip() {
        let mut clip = Clipboard::new();
        clip.set_text("ab\ncd", "test");
        assert_eq!(clip.height(), 2);
        assert_eq!(clip.width(), 2);
        assert_eq!(clip.to_text(), "ab\ncd");
        assert_eq!(clip.source(), "test");
    }

    #[test]
    fn empty_clipboard_pastes_nothing() {
        let mut canvas = Canvas::new();
        let clip = Clipboard::new();
        assert_eq!(clip.paste(&mut canvas, 0, 0), (0, 0));
        assert_eq!(canvas.cell_count(), 0);
    }
}
