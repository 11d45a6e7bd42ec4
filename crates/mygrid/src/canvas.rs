//! Sparse canvas storage.
//!
//! The canvas is a map keyed by `(x, y)` — only non-empty cells consume
//! memory, so coordinates can be any `i64` without allocation cost.
//! Drawing primitives (lines, rectangles, text) all bottom out in
//! [`Canvas::set`], which removes the key again when a cell goes back
//! to an uncolored blank.

use std::collections::HashMap;

/// Color code for a cell: `-1` means "terminal default", `0..=7` the
/// basic ANSI palette, `8..=255` the extended indexed palette.
pub type Color = i16;

pub const DEFAULT_COLOR: Color = -1;

const COLOR_NAMES: &[(&str, Color)] = &[
    ("black", 0),
    ("red", 1),
    ("green", 2),
    ("yellow", 3),
    ("blue", 4),
    ("magenta", 5),
    ("cyan", 6),
    ("white", 7),
    ("default", -1),
];

/// Parse a color argument: a well-known name or a number in `-1..=255`.
pub fn parse_color(input: &str) -> Option<Color> {
    let lowered = input.trim().to_ascii_lowercase();
    if let Some((_, code)) = COLOR_NAMES.iter().find(|(name, _)| *name == lowered) {
        return Some(*code);
    }
    match lowered.parse::<i16>() {
        Ok(num) if (-1..=255).contains(&num) => Some(num),
        _ => None,
    }
}

/// Display name for a color code, falling back to the bare number.
pub fn color_name(code: Color) -> String {
    COLOR_NAMES
        .iter()
        .find(|(_, c)| *c == code)
        .map(|(name, _)| (*name).to_string())
        .unwrap_or_else(|| code.to_string())
}

/// A single cell: one glyph plus foreground/background color codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: DEFAULT_COLOR,
            bg: DEFAULT_COLOR,
        }
    }
}

impl Cell {
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            fg: DEFAULT_COLOR,
            bg: DEFAULT_COLOR,
        }
    }

    pub fn styled(ch: char, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }

    pub fn is_blank(&self) -> bool {
        self.ch == ' '
    }

    pub fn has_color(&self) -> bool {
        self.fg != DEFAULT_COLOR || self.bg != DEFAULT_COLOR
    }

    /// Empty means "nothing stored": a blank glyph with default colors.
    pub fn is_empty(&self) -> bool {
        self.is_blank() && !self.has_color()
    }
}

/// Axis-aligned bounding box of non-empty content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl BoundingBox {
    pub fn width(&self) -> i64 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> i64 {
        self.max_y - self.min_y + 1
    }
}

/// Sparse, unbounded canvas. Absent keys read as the empty cell.
#[derive(Debug, Default)]
pub struct Canvas {
    cells: HashMap<(i64, i64), Cell>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, x: i64, y: i64) -> Cell {
        self.cells.get(&(x, y)).copied().unwrap_or_default()
    }

    pub fn get_char(&self, x: i64, y: i64) -> char {
        self.get(x, y).ch
    }

    /// Set a cell. A blank glyph with default colors removes the key; a
    /// blank glyph with colors is kept as a colored blank.
    pub fn set(&mut self, x: i64, y: i64, cell: Cell) {
        if cell.is_empty() {
            self.cells.remove(&(x, y));
        } else {
            self.cells.insert((x, y), cell);
        }
    }

    pub fn set_char(&mut self, x: i64, y: i64, ch: char) {
        self.set(x, y, Cell::new(ch));
    }

    /// Re-color a cell without touching its glyph. Resetting both colors on
    /// a blank cell removes it.
    pub fn set_color(&mut self, x: i64, y: i64, fg: Color, bg: Color) {
        let current = self.get(x, y);
        self.set(x, y, Cell::styled(current.ch, fg, bg));
    }

    pub fn clear(&mut self, x: i64, y: i64) {
        self.cells.remove(&(x, y));
    }

    pub fn clear_all(&mut self) {
        self.cells.clear();
    }

    pub fn clear_region(&mut self, x: i64, y: i64, width: i64, height: i64) {
        for cy in y..y + height {
            for cx in x..x + width {
                self.cells.remove(&(cx, cy));
            }
        }
    }

    pub fn is_empty_at(&self, x: i64, y: i64) -> bool {
        !self.cells.contains_key(&(x, y))
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = (i64, i64, Cell)> + '_ {
        self.cells.iter().map(|(&(x, y), &cell)| (x, y, cell))
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut iter = self.cells.keys();
        let &(first_x, first_y) = iter.next()?;
        let mut bbox = BoundingBox {
            min_x: first_x,
            min_y: first_y,
            max_x: first_x,
            max_y: first_y,
        };
        for &(x, y) in iter {
            bbox.min_x = bbox.min_x.min(x);
            bbox.min_y = bbox.min_y.min(y);
            bbox.max_x = bbox.max_x.max(x);
            bbox.max_y = bbox.max_y.max(y);
        }
        Some(bbox)
    }

    /// Draw a line with Bresenham's algorithm. A zero-length line writes a
    /// single cell at the endpoint.
    pub fn draw_line(&mut self, x1: i64, y1: i64, x2: i64, y2: i64, cell: Cell) {
        let dx = (x2 - x1).abs();
        let dy = (y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx - dy;
        let (mut x, mut y) = (x1, y1);
        loop {
            self.set(x, y, cell);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw a rectangle outline from a character set. Degenerate sizes
    /// (width or height < 2) collapse to the cells that exist.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_rect(
        &mut self,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        chars: RectChars,
        fg: Color,
        bg: Color,
    ) {
        if width <= 0 || height <= 0 {
            return;
        }
        let right = x + width - 1;
        let bottom = y + height - 1;
        self.set(x, y, Cell::styled(chars.tl, fg, bg));
        self.set(right, y, Cell::styled(chars.tr, fg, bg));
        self.set(x, bottom, Cell::styled(chars.bl, fg, bg));
        self.set(right, bottom, Cell::styled(chars.br, fg, bg));
        for cx in x + 1..right {
            self.set(cx, y, Cell::styled(chars.horizontal, fg, bg));
            self.set(cx, bottom, Cell::styled(chars.horizontal, fg, bg));
        }
        for cy in y + 1..bottom {
            self.set(x, cy, Cell::styled(chars.vertical, fg, bg));
            self.set(right, cy, Cell::styled(chars.vertical, fg, bg));
        }
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, width: i64, height: i64, cell: Cell) {
        for cy in y..y + height {
            for cx in x..x + width {
                self.set(cx, cy, cell);
            }
        }
    }

    /// Write text left to right, one cell per char.
    pub fn write_text(&mut self, x: i64, y: i64, text: &str, fg: Color, bg: Color) {
        for (i, ch) in text.chars().enumerate() {
            self.set(x + i as i64, y, Cell::styled(ch, fg, bg));
        }
    }

    /// Search for a horizontal run of characters matching `pattern`.
    /// Returns `(x, y, len)` matches ordered top-to-bottom, left-to-right.
    pub fn search_text(&self, pattern: &str, case_sensitive: bool) -> Vec<(i64, i64, usize)> {
        if pattern.is_empty() {
            return Vec::new();
        }
        let Some(bbox) = self.bounding_box() else {
            return Vec::new();
        };
        let needle = if case_sensitive {
            pattern.to_string()
        } else {
            pattern.to_lowercase()
        };
        let mut matches = Vec::new();
        for row in bbox.min_y..=bbox.max_y {
            let row_str: String = (bbox.min_x..=bbox.max_x)
                .map(|col| self.get_char(col, row))
                .collect();
            let haystack = if case_sensitive {
                row_str
            } else {
                row_str.to_lowercase()
            };
            let step = needle.chars().next().map_or(1, char::len_utf8);
            let mut start = 0;
            while let Some(idx) = haystack[start..].find(&needle) {
                let char_offset = haystack[..start + idx].chars().count() as i64;
                matches.push((bbox.min_x + char_offset, row, pattern.chars().count()));
                start += idx + step;
            }
        }
        matches
    }
}

/// Character set used by [`Canvas::draw_rect`].
#[derive(Debug, Clone, Copy)]
pub struct RectChars {
    pub horizontal: char,
    pub vertical: char,
    pub tl: char,
    pub tr: char,
    pub bl: char,
    pub br: char,
}

impl RectChars {
    /// Every edge and corner drawn with one glyph.
    pub fn uniform(ch: char) -> Self {
        Self {
            horizontal: ch,
            vertical: ch,
            tl: ch,
            tr: ch,
            bl: ch,
            br: ch,
        }
    }
}

#[cfg(test)]
mod tests;
