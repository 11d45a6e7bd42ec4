//! Viewport: the window from canvas space onto the terminal.
//!
//! Screen coordinates have (0,0) at the top-left with Y growing down.
//! Canvas coordinates are unbounded and their Y direction is configurable;
//! the Y flag affects only the transform, never storage.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum YDirection {
    /// Screen convention: Y increases downward.
    Down,
    /// Mathematical convention: Y increases upward.
    Up,
}

impl Default for YDirection {
    fn default() -> Self {
        YDirection::Down
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Origin {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone)]
pub struct Viewport {
    /// Top-left corner in canvas space (after the Y transform).
    pub x: i64,
    pub y: i64,
    pub width: u16,
    pub height: u16,
    pub cursor: Cursor,
    pub origin: Origin,
    pub y_direction: YDirection,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 80,
            height: 24,
            cursor: Cursor::default(),
            origin: Origin::default(),
            y_direction: YDirection::Down,
        }
    }
}

impl Viewport {
    fn transform_y(&self, cy: i64) -> i64 {
        match self.y_direction {
            YDirection::Down => cy,
            YDirection::Up => -cy,
        }
    }

    /// Canvas to screen. `None` when the point is outside the window.
    pub fn canvas_to_screen(&self, cx: i64, cy: i64) -> Option<(u16, u16)> {
        let sy = self.transform_y(cy) - self.y;
        let sx = cx - self.x;
        if sx >= 0 && sx < i64::from(self.width) && sy >= 0 && sy < i64::from(self.height) {
            Some((sx as u16, sy as u16))
        } else {
            None
        }
    }

    pub fn screen_to_canvas(&self, sx: u16, sy: u16) -> (i64, i64) {
        let cx = i64::from(sx) + self.x;
        let cy = i64::from(sy) + self.y;
        (cx, self.transform_y(cy))
    }

    pub fn pan(&mut self, dx: i64, dy: i64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn pan_to(&mut self, x: i64, y: i64) {
        self.x = x;
        self.y = y;
    }

    pub fn center_on(&mut self, cx: i64, cy: i64) {
        let ty = self.transform_y(cy);
        self.x = cx - i64::from(self.width) / 2;
        self.y = ty - i64::from(self.height) / 2;
    }

    pub fn center_on_cursor(&mut self) {
        self.center_on(self.cursor.x, self.cursor.y);
    }

    pub fn move_cursor(&mut self, dx: i64, dy: i64) {
        self.cursor.x += dx;
        self.cursor.y += dy;
    }

    pub fn set_cursor(&mut self, x: i64, y: i64) {
        self.cursor.x = x;
        self.cursor.y = y;
    }

    /// Scroll the window so the cursor stays visible, keeping `margin`
    /// cells between the cursor and the edge where possible.
    pub fn ensure_cursor_visible(&mut self, margin: i64) {
        let cx = self.cursor.x;
        let ty = self.transform_y(self.cursor.y);
        let width = i64::from(self.width);
        let height = i64::from(self.height);

        if cx < self.x + margin {
            self.x = cx - margin;
        } else if cx >= self.x + width - margin {
            self.x = cx - width + margin + 1;
        }

        if ty < self.y + margin {
            self.y = ty - margin;
        } else if ty >= self.y + height - margin {
            self.y = ty - height + margin + 1;
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width.max(1);
        self.height = height.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        let mut vp = Viewport::default();
        vp.resize(40, 10);
        vp
    }

    #[test]
    fn transform_round_trip_y_down() {
        let mut vp = viewport();
        vp.pan_to(-17, 23);
        for cy in 23..33 {
            for cx in -17..23 {
                let (sx, sy) = vp.canvas_to_screen(cx, cy).expect("visible");
                assert_eq!(vp.screen_to_canvas(sx, sy), (cx, cy));
            }
        }
    }

    #[test]
    fn transform_round_trip_y_up() {
        let mut vp = viewport();
        vp.y_direction = YDirection::Up;
        vp.pan_to(0, -5);
        for sy in 0..vp.height {
            for sx in 0..vp.width {
                let (cx, cy) = vp.screen_to_canvas(sx, sy);
                assert_eq!(vp.canvas_to_screen(cx, cy), Some((sx, sy)));
            }
        }
    }

    #[test]
    fn points_outside_window_are_none() {
        let vp = viewport();
        assert_eq!(vp.canvas_to_screen(40, 0), None);
        assert_eq!(vp.canvas_to_screen(-1, 0), None);
        assert_eq!(vp.canvas_to_screen(0, 10), None);
    }

    #[test]
    fn cursor_scrolls_viewport_flush_to_edge() {
        let mut vp = viewport();
        vp.set_cursor(45, 3);
        vp.ensure_cursor_visible(0);
        // Cursor lands on the last visible column.
        assert_eq!(vp.canvas_to_screen(45, 3), Some((39, 3)));

        vp.set_cursor(-2, 3);
        vp.ensure_cursor_visible(0);
        assert_eq!(vp.canvas_to_screen(-2, 3), Some((0, 3)));
    }

    #[test]
    fn pan_does_not_move_cursor() {
        let mut vp = viewport();
        vp.set_cursor(5, 5);
        vp.pan(10, 10);
        assert_eq!(vp.cursor, Cursor { x: 5, y: 5 });
    }

    #[test]
    fn resize_clamps_to_one() {
        let mut vp = viewport();
        vp.resize(0, 0);
        assert_eq!((vp.width, vp.height), (1, 1));
    }
}
