//! Bounded, color-aware line buffer for zone content.
//!
//! Lines are stored as runs of same-styled text. Capacity eviction drops
//! the oldest line; with auto-scroll the visible window stays pinned to
//! the tail on every append.

use std::collections::VecDeque;

use crate::canvas::{Color, DEFAULT_COLOR};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub fg: Color,
    pub bg: Color,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneLine {
    pub runs: Vec<Run>,
}

impl ZoneLine {
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::default();
        }
        Self {
            runs: vec![Run {
                text,
                fg: DEFAULT_COLOR,
                bg: DEFAULT_COLOR,
            }],
        }
    }

    pub fn width(&self) -> usize {
        self.runs.iter().map(|run| run.text.chars().count()).sum()
    }

    pub fn to_plain(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Iterate the line's glyphs with their colors.
    pub fn cells(&self) -> impl Iterator<Item = (char, Color, Color)> + '_ {
        self.runs
            .iter()
            .flat_map(|run| run.text.chars().map(move |ch| (ch, run.fg, run.bg)))
    }
}

#[derive(Debug)]
pub struct ZoneBuffer {
    lines: VecDeque<ZoneLine>,
    max_lines: usize,
    /// Lines scrolled back from the tail; 0 = pinned to the newest line.
    pub scroll_offset: usize,
    pub auto_scroll: bool,
}

impl ZoneBuffer {
    pub fn new(max_lines: usize, auto_scroll: bool) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
            scroll_offset: 0,
            auto_scroll,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn append(&mut self, line: ZoneLine) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
        if self.auto_scroll {
            self.scroll_offset = 0;
        }
    }

    /// Replace the whole content (WATCH refresh semantics), keeping the
    /// most recent lines when over capacity.
    pub fn replace(&mut self, lines: Vec<ZoneLine>) {
        self.lines.clear();
        let skip = lines.len().saturating_sub(self.max_lines);
        self.lines.extend(lines.into_iter().skip(skip));
        if self.auto_scroll {
            self.scroll_offset = 0;
        }
        self.clamp_scroll(1);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll_offset = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = &ZoneLine> {
        self.lines.iter()
    }

    /// The `height`-line window ending `scroll_offset` lines above the
    /// tail. Shorter buffers return everything.
    pub fn visible(&self, height: usize) -> Vec<&ZoneLine> {
        if height == 0 || self.lines.is_empty() {
            return Vec::new();
        }
        let total = self.lines.len();
        let end = total.saturating_sub(self.scroll_offset.min(total));
        let start = end.saturating_sub(height);
        self.lines.range(start..end).collect()
    }

    pub fn scroll_by(&mut self, delta: isize, height: usize) {
        let new_offset = self.scroll_offset as isize + delta;
        self.scroll_offset = new_offset.max(0) as usize;
        self.clamp_scroll(height);
    }

    pub fn scroll_to_top(&mut self, height: usize) {
        self.scroll_offset = self.lines.len();
        self.clamp_scroll(height);
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    fn clamp_scroll(&mut self, height: usize) {
        let max_offset = self.lines.len().saturating_sub(height.max(1));
        if self.scroll_offset > max_offset {
            self.scroll_offset = max_offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(buffer: &ZoneBuffer, height: usize) -> Vec<String> {
        buffer
            .visible(height)
            .iter()
            .map(|line| line.to_plain())
            .collect()
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let mut buffer = ZoneBuffer::new(3, true);
        for i in 0..5 {
            buffer.append(ZoneLine::plain(format!("line{i}")));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(plain(&buffer, 3), vec!["line2", "line3", "line4"]);
    }

    #[test]
    fn length_is_min_of_cap_and_appended() {
        let mut buffer = ZoneBuffer::new(10, true);
        for i in 0..4 {
            buffer.append(ZoneLine::plain(format!("{i}")));
        }
        assert_eq!(buffer.len(), 4);
        for i in 4..25 {
            buffer.append(ZoneLine::plain(format!("{i}")));
        }
        assert_eq!(buffer.len(), 10);
    }

    #[test]
    fn auto_scroll_pins_to_tail() {
        let mut buffer = ZoneBuffer::new(100, true);
        for i in 0..10 {
            buffer.append(ZoneLine::plain(format!("{i}")));
        }
        buffer.scroll_by(5, 3);
        assert_eq!(buffer.scroll_offset, 5);
        buffer.append(ZoneLine::plain("new"));
        assert_eq!(buffer.scroll_offset, 0);
        assert_eq!(plain(&buffer, 2), vec!["9", "new"]);
    }

    #[test]
    fn manual_scroll_without_auto() {
        let mut buffer = ZoneBuffer::new(100, false);
        for i in 0..10 {
            buffer.append(ZoneLine::plain(format!("{i}")));
        }
        buffer.scroll_by(4, 3);
        buffer.append(ZoneLine::plain("tail"));
        assert_eq!(buffer.scroll_offset, 4);
        // Window of 3 ending 4 lines above the tail of 11.
        assert_eq!(plain(&buffer, 3), vec!["4", "5", "6"]);
    }

    #[test]
    fn scroll_clamps_at_top_and_bottom() {
        let mut buffer = ZoneBuffer::new(100, false);
        for i in 0..5 {
            buffer.append(ZoneLine::plain(format!("{i}")));
        }
        buffer.scroll_by(100, 2);
        assert_eq!(buffer.scroll_offset, 3);
        buffer.scroll_by(-100, 2);
        assert_eq!(buffer.scroll_offset, 0);
        buffer.scroll_to_top(2);
        assert_eq!(buffer.scroll_offset, 3);
        buffer.scroll_to_bottom();
        assert_eq!(buffer.scroll_offset, 0);
    }

    #[test]
    fn replace_keeps_most_recent_over_cap() {
        let mut buffer = ZoneBuffer::new(2, true);
        buffer.replace(vec![
            ZoneLine::plain("a"),
            ZoneLine::plain("b"),
            ZoneLine::plain("c"),
        ]);
        assert_eq!(plain(&buffer, 5), vec!["b", "c"]);
    }

    #[test]
    fn line_cells_carry_colors() {
        let line = ZoneLine {
            runs: vec![
                Run {
                    text: "ab".to_string(),
                    fg: 1,
                    bg: -1,
                },
                Run {
                    text: "c".to_string(),
                    fg: 2,
                    bg: 4,
                },
            ],
        };
        let cells: Vec<_> = line.cells().collect();
        assert_eq!(cells, vec![('a', 1, -1), ('b', 1, -1), ('c', 2, 4)]);
        assert_eq!(line.width(), 3);
        assert_eq!(line.to_plain(), "abc");
    }
}
