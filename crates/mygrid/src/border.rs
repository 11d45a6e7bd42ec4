//! Border styles and connectivity-aware glyph selection.
//!
//! DRAW mode and `:rect` draw with a named style. Each style maps a set of
//! edge connections (up/down/left/right) to one glyph, which is how corner
//! and junction characters are picked: when a new segment lands on a cell
//! that already holds a drawn glyph, the connection sets are merged and the
//! combined glyph replaces it.

use crate::canvas::RectChars;

/// Bit flags for the four cardinal connections of a drawn cell.
pub const UP: u8 = 0b0001;
pub const DOWN: u8 = 0b0010;
pub const LEFT: u8 = 0b0100;
pub const RIGHT: u8 = 0b1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    Ascii,
    Unicode,
    Rounded,
    Double,
    Heavy,
}

impl Default for BorderStyle {
    fn default() -> Self {
        BorderStyle::Ascii
    }
}

impl BorderStyle {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ascii" => Some(BorderStyle::Ascii),
            "unicode" | "single" => Some(BorderStyle::Unicode),
            "rounded" => Some(BorderStyle::Rounded),
            "double" => Some(BorderStyle::Double),
            "heavy" | "bold" => Some(BorderStyle::Heavy),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BorderStyle::Ascii => "ascii",
            BorderStyle::Unicode => "unicode",
            BorderStyle::Rounded => "rounded",
            BorderStyle::Double => "double",
            BorderStyle::Heavy => "heavy",
        }
    }

    pub fn all_names() -> &'static [&'static str] {
        &["ascii", "unicode", "rounded", "double", "heavy"]
    }

    /// Characters for rectangle outlines in this style.
    pub fn rect_chars(&self) -> RectChars {
        match self {
            BorderStyle::Ascii => RectChars {
                horizontal: '-',
                vertical: '|',
                tl: '+',
                tr: '+',
                bl: '+',
                br: '+',
            },
            BorderStyle::Unicode => RectChars {
                horizontal: '─',
                vertical: '│',
                tl: '┌',
                tr: '┐',
                bl: '└',
                br: '┘',
            },
            BorderStyle::Rounded => RectChars {
                horizontal: '─',
                vertical: '│',
                tl: '╭',
                tr: '╮',
                bl: '╰',
                br: '╯',
            },
            BorderStyle::Double => RectChars {
                horizontal: '═',
                vertical: '║',
                tl: '╔',
                tr: '╗',
                bl: '╚',
                br: '╝',
            },
            BorderStyle::Heavy => RectChars {
                horizontal: '━',
                vertical: '┃',
                tl: '┏',
                tr: '┓',
                bl: '┗',
                br: '┛',
            },
        }
    }

    fn table(&self) -> &'static [(u8, char)] {
        match self {
            // ASCII has no junction variety: anything that is not a pure
            // run becomes '+'.
            BorderStyle::Ascii => &[
                (LEFT | RIGHT, '-'),
                (LEFT, '-'),
                (RIGHT, '-'),
                (UP | DOWN, '|'),
                (UP, '|'),
                (DOWN, '|'),
            ],
            BorderStyle::Unicode => UNICODE_TABLE,
            // Rounded shares edges and junctions with the single-line set;
            // only the pure corners differ.
            BorderStyle::Rounded => &[
                (LEFT | RIGHT, '─'),
                (LEFT, '─'),
                (RIGHT, '─'),
                (UP | DOWN, '│'),
                (UP, '│'),
                (DOWN, '│'),
                (DOWN | RIGHT, '╭'),
                (DOWN | LEFT, '╮'),
                (UP | RIGHT, '╰'),
                (UP | LEFT, '╯'),
                (UP | DOWN | RIGHT, '├'),
                (UP | DOWN | LEFT, '┤'),
                (DOWN | LEFT | RIGHT, '┬'),
                (UP | LEFT | RIGHT, '┴'),
                (UP | DOWN | LEFT | RIGHT, '┼'),
            ],
            BorderStyle::Double => &[
                (LEFT | RIGHT, '═'),
                (LEFT, '═'),
                (RIGHT, '═'),
                (UP | DOWN, '║'),
                (UP, '║'),
                (DOWN, '║'),
                (DOWN | RIGHT, '╔'),
                (DOWN | LEFT, '╗'),
                (UP | RIGHT, '╚'),
                (UP | LEFT, '╝'),
                (UP | DOWN | RIGHT, '╠'),
                (UP | DOWN | LEFT, '╣'),
                (DOWN | LEFT | RIGHT, '╦'),
                (UP | LEFT | RIGHT, '╩'),
                (UP | DOWN | LEFT | RIGHT, '╬'),
            ],
            BorderStyle::Heavy => &[
                (LEFT | RIGHT, '━'),
                (LEFT, '━'),
                (RIGHT, '━'),
                (UP | DOWN, '┃'),
                (UP, '┃'),
                (DOWN, '┃'),
                (DOWN | RIGHT, '┏'),
                (DOWN | LEFT, '┓'),
                (UP | RIGHT, '┗'),
                (UP | LEFT, '┛'),
                (UP | DOWN | RIGHT, '┣'),
                (UP | DOWN | LEFT, '┫'),
                (DOWN | LEFT | RIGHT, '┳'),
                (UP | LEFT | RIGHT, '┻'),
                (UP | DOWN | LEFT | RIGHT, '╋'),
            ],
        }
    }

    /// Glyph for a connection set. Unknown/empty sets fall back to the
    /// horizontal run character; ASCII falls back to '+'.
    pub fn glyph_for(&self, connections: u8) -> char {
        if let Some((_, ch)) = self
            .table()
            .iter()
            .find(|(mask, _)| *mask == connections & 0b1111)
        {
            return *ch;
        }
        match self {
            BorderStyle::Ascii => {
                if connections == 0 {
                    '-'
                } else {
                    '+'
                }
            }
            _ => self.rect_chars().horizontal,
        }
    }

    /// Connection set for a glyph drawn in this style (any style's glyphs
    /// are recognized so lines can join rectangles drawn earlier).
    pub fn connections_of(&self, ch: char) -> Option<u8> {
        for style in [
            BorderStyle::Unicode,
            BorderStyle::Rounded,
            BorderStyle::Double,
            BorderStyle::Heavy,
        ] {
            if let Some((mask, _)) = style.table().iter().find(|(_, glyph)| *glyph == ch) {
                return Some(*mask);
            }
        }
        match ch {
            '-' => Some(LEFT | RIGHT),
            '|' => Some(UP | DOWN),
            '+' => Some(UP | DOWN | LEFT | RIGHT),
            _ => None,
        }
    }
}

const UNICODE_TABLE: &[(u8, char)] = &[
    (LEFT | RIGHT, '─'),
    (LEFT, '─'),
    (RIGHT, '─'),
    (UP | DOWN, '│'),
    (UP, '│'),
    (DOWN, '│'),
    (DOWN | RIGHT, '┌'),
    (DOWN | LEFT, '┐'),
    (UP | RIGHT, '└'),
    (UP | LEFT, '┘'),
    (UP | DOWN | RIGHT, '├'),
    (UP | DOWN | LEFT, '┤'),
    (DOWN | LEFT | RIGHT, '┬'),
    (UP | LEFT | RIGHT, '┴'),
    (UP | DOWN | LEFT | RIGHT, '┼'),
];

/// Connection bit pointing from a cell toward the given step.
pub fn direction_bit(dx: i64, dy: i64) -> u8 {
    match (dx.signum(), dy.signum()) {
        (0, -1) => UP,
        (0, 1) => DOWN,
        (-1, 0) => LEFT,
        (1, 0) => RIGHT,
        _ => 0,
    }
}

/// The opposite connection bit, used for the cell being entered.
pub fn opposite(bit: u8) -> u8 {
    match bit {
        UP => DOWN,
        DOWN => UP,
        LEFT => RIGHT,
        RIGHT => LEFT,
        _ => 0,
    }
}
