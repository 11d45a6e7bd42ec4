//! Grid overlay settings and glyph selection.
//!
//! The overlay is computed relative to the origin marker, not the viewport,
//! so panning never shifts the grid against the content. Selection is a
//! pure function over settings and relative coordinates; the renderer only
//! queries empty cells.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLineMode {
    Off,
    /// Intersection markers only (default).
    Markers,
    /// Full grid lines with box-drawing characters.
    Lines,
    /// Dots along grid lines.
    Dots,
}

impl GridLineMode {
    pub fn name(&self) -> &'static str {
        match self {
            GridLineMode::Off => "off",
            GridLineMode::Markers => "markers",
            GridLineMode::Lines => "lines",
            GridLineMode::Dots => "dots",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "off" => Some(GridLineMode::Off),
            "markers" => Some(GridLineMode::Markers),
            "lines" => Some(GridLineMode::Lines),
            "dots" => Some(GridLineMode::Dots),
            _ => None,
        }
    }
}

/// Whether a grid glyph belongs to the major or minor lattice. The
/// renderer picks color/dim attributes from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridTone {
    Major,
    Minor,
}

#[derive(Debug, Clone)]
pub struct GridSettings {
    pub show_origin: bool,
    pub show_major_lines: bool,
    pub show_minor_lines: bool,
    pub major_interval: i64,
    pub minor_interval: i64,
    pub line_mode: GridLineMode,
    pub show_rulers: bool,
    pub show_labels: bool,
    pub label_interval: i64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            show_origin: true,
            show_major_lines: false,
            show_minor_lines: false,
            major_interval: 10,
            minor_interval: 5,
            line_mode: GridLineMode::Markers,
            show_rulers: false,
            show_labels: false,
            label_interval: 50,
        }
    }
}

const ORIGIN_CHAR: char = '+';
const MAJOR_MARK: char = '+';
const MINOR_MARK: char = '·';
const LINE_H: char = '─';
const LINE_V: char = '│';
const LINE_CROSS: char = '┼';
const MAJOR_H: char = '═';
const MAJOR_V: char = '║';
const MAJOR_CROSS: char = '╬';

impl GridSettings {
    pub fn origin_char(&self) -> char {
        ORIGIN_CHAR
    }

    /// Grid glyph for a cell at `(rel_x, rel_y)` relative to the origin
    /// marker, or `None` when nothing is drawn there. Major lattice beats
    /// minor; intersections beat edges.
    pub fn glyph_at(&self, rel_x: i64, rel_y: i64) -> Option<(char, GridTone)> {
        if self.line_mode == GridLineMode::Off {
            return None;
        }

        let on = |value: i64, interval: i64| interval > 0 && value.rem_euclid(interval) == 0;
        let on_major_x = on(rel_x, self.major_interval);
        let on_major_y = on(rel_y, self.major_interval);
        let on_minor_x = on(rel_x, self.minor_interval);
        let on_minor_y = on(rel_y, self.minor_interval);

        let major_cross = on_major_x && on_major_y;
        let minor_cross = on_minor_x && on_minor_y;

        match self.line_mode {
            GridLineMode::Off => None,
            GridLineMode::Markers => {
                if self.show_major_lines && major_cross {
                    return Some((MAJOR_MARK, GridTone::Major));
                }
                if self.show_minor_lines && minor_cross && !(major_cross && self.show_major_lines)
                {
                    return Some((MINOR_MARK, GridTone::Minor));
                }
                None
            }
            GridLineMode::Lines => {
                if self.show_major_lines {
                    if major_cross {
                        return Some((MAJOR_CROSS, GridTone::Major));
                    }
                    if on_major_y && !on_major_x {
                        return Some((MAJOR_H, GridTone::Major));
                    }
                    if on_major_x && !on_major_y {
                        return Some((MAJOR_V, GridTone::Major));
                    }
                }
                if self.show_minor_lines {
                    if minor_cross && !(major_cross && self.show_major_lines) {
                        return Some((LINE_CROSS, GridTone::Minor));
                    }
                    if on_minor_y && !(on_major_y && self.show_major_lines) {
                        return Some((LINE_H, GridTone::Minor));
                    }
                    if on_minor_x && !(on_major_x && self.show_major_lines) {
                        return Some((LINE_V, GridTone::Minor));
                    }
                }
                None
            }
            GridLineMode::Dots => {
                let on_major = on_major_x || on_major_y;
                if self.show_major_lines && on_major {
                    return Some(('•', GridTone::Major));
                }
                if self.show_minor_lines
                    && (on_minor_x || on_minor_y)
                    && !(on_major && self.show_major_lines)
                {
                    return Some(('·', GridTone::Minor));
                }
                None
            }
        }
    }
}
