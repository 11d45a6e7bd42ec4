//! Frame composition and drawing.
//!
//! Composition happens in screen-cell space so it can be tested without a
//! terminal: grid under canvas cells, zones over both in creation order,
//! then selection, cursor and the origin marker. The ratatui layer only
//! batches the finished matrix into styled spans.

use ratatui::layout::Rect;
use ratatui::style::{Color as TermColor, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::border::BorderStyle;
use crate::canvas::{Color, DEFAULT_COLOR};
use crate::grid::GridTone;
use crate::zones::{Zone, ZoneConfig, ZoneState};

use super::state::{App, Mode};

/// One composed screen cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub dim: bool,
    pub bold: bool,
    pub reversed: bool,
}

impl Default for ScreenCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: DEFAULT_COLOR,
            bg: DEFAULT_COLOR,
            dim: false,
            bold: false,
            reversed: false,
        }
    }
}

pub struct ScreenMatrix {
    pub width: u16,
    pub height: u16,
    cells: Vec<ScreenCell>,
}

impl ScreenMatrix {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![ScreenCell::default(); usize::from(width) * usize::from(height)],
        }
    }

    fn index(&self, sx: u16, sy: u16) -> Option<usize> {
        if sx < self.width && sy < self.height {
            Some(usize::from(sy) * usize::from(self.width) + usize::from(sx))
        } else {
            None
        }
    }

    pub fn get(&self, sx: u16, sy: u16) -> ScreenCell {
        self.index(sx, sy)
            .map(|idx| self.cells[idx])
            .unwrap_or_default()
    }

    fn put(&mut self, sx: u16, sy: u16, cell: ScreenCell) {
        if let Some(idx) = self.index(sx, sy) {
            self.cells[idx] = cell;
        }
    }

    fn update(&mut self, sx: u16, sy: u16, change: impl FnOnce(&mut ScreenCell)) {
        if let Some(idx) = self.index(sx, sy) {
            change(&mut self.cells[idx]);
        }
    }

    /// Plain text of one row, for tests.
    #[cfg(test)]
    pub fn row_text(&self, sy: u16) -> String {
        (0..self.width).map(|sx| self.get(sx, sy).ch).collect()
    }
}

/// Compose the full visible frame (excluding the status line).
pub fn compose(app: &App) -> ScreenMatrix {
    let width = app.viewport.width;
    let height = app.viewport.height;
    let mut matrix = ScreenMatrix::new(width, height);

    paint_canvas_and_grid(app, &mut matrix);
    for zone in app.zones.iter() {
        paint_zone(app, zone, &mut matrix);
    }
    paint_selection(app, &mut matrix);
    paint_cursor(app, &mut matrix);
    if app.grid.show_rulers {
        paint_rulers(app, &mut matrix);
    }
    if app.grid.show_labels {
        paint_labels(app, &mut matrix);
    }
    matrix
}

fn paint_canvas_and_grid(app: &App, matrix: &mut ScreenMatrix) {
    for sy in 0..matrix.height {
        for sx in 0..matrix.width {
            let (cx, cy) = app.viewport.screen_to_canvas(sx, sy);
            let cell = app.canvas.get(cx, cy);
            let mut screen = ScreenCell {
                ch: cell.ch,
                fg: cell.fg,
                bg: cell.bg,
                ..ScreenCell::default()
            };

            // Origin marker shows through empty cells.
            if app.grid.show_origin
                && cx == app.viewport.origin.x
                && cy == app.viewport.origin.y
            {
                if screen.ch == ' ' {
                    screen.ch = app.grid.origin_char();
                }
                screen.fg = 3;
                screen.bold = true;
            } else if cell.is_empty() {
                let rel_x = cx - app.viewport.origin.x;
                let rel_y = cy - app.viewport.origin.y;
                if let Some((glyph, tone)) = app.grid.glyph_at(rel_x, rel_y) {
                    screen.ch = glyph;
                    screen.dim = true;
                    screen.fg = match tone {
                        GridTone::Major => 4,
                        GridTone::Minor => 8,
                    };
                }
            }
            matrix.put(sx, sy, screen);
        }
    }
}

fn zone_border_style(zone: &Zone) -> (Color, bool) {
    match zone.state {
        ZoneState::Error(_) => (1, false),
        ZoneState::Paused => (3, true),
        _ => (8, false),
    }
}

fn paint_zone(app: &App, zone: &Zone, matrix: &mut ScreenMatrix) {
    if zone.width < 2 || zone.height < 2 {
        return;
    }
    let chars = BorderStyle::Unicode.rect_chars();
    let (border_fg, border_dim) = zone_border_style(zone);
    let right = zone.x + zone.width - 1;
    let bottom = zone.y + zone.height - 1;

    let mut put_border = |cx: i64, cy: i64, ch: char| {
        if let Some((sx, sy)) = app.viewport.canvas_to_screen(cx, cy) {
            matrix.put(
                sx,
                sy,
                ScreenCell {
                    ch,
                    fg: border_fg,
                    dim: border_dim,
                    ..ScreenCell::default()
                },
            );
        }
    };

    put_border(zone.x, zone.y, chars.tl);
    put_border(right, zone.y, chars.tr);
    put_border(zone.x, bottom, chars.bl);
    put_border(right, bottom, chars.br);
    for cx in zone.x + 1..right {
        put_border(cx, zone.y, chars.horizontal);
        put_border(cx, bottom, chars.horizontal);
    }
    for cy in zone.y + 1..bottom {
        put_border(zone.x, cy, chars.vertical);
        put_border(right, cy, chars.vertical);
    }

    // Title: type tag and name along the top border.
    let title: String = format!("[{}] {}", zone.config.tag(), zone.name)
        .chars()
        .take((zone.width - 2).max(0) as usize)
        .collect();
    for (i, ch) in title.chars().enumerate() {
        if let Some((sx, sy)) = app
            .viewport
            .canvas_to_screen(zone.x + 1 + i as i64, zone.y)
        {
            matrix.put(
                sx,
                sy,
                ScreenCell {
                    ch,
                    fg: border_fg,
                    bold: true,
                    ..ScreenCell::default()
                },
            );
        }
    }

    paint_zone_content(app, zone, matrix);
}

fn paint_zone_content(app: &App, zone: &Zone, matrix: &mut ScreenMatrix) {
    let inner_w = zone.inner_width() as usize;
    let inner_h = zone.inner_height() as usize;
    if inner_w == 0 || inner_h == 0 {
        return;
    }

    let mut put_content = |row: usize, col: usize, ch: char, fg: Color, bg: Color| {
        if col >= inner_w || row >= inner_h {
            return;
        }
        let cx = zone.x + 1 + col as i64;
        let cy = zone.y + 1 + row as i64;
        if let Some((sx, sy)) = app.viewport.canvas_to_screen(cx, cy) {
            matrix.put(
                sx,
                sy,
                ScreenCell {
                    ch,
                    fg,
                    bg,
                    ..ScreenCell::default()
                },
            );
        }
    };

    // Clear the interior first so stale canvas content never shows
    // through a zone.
    for row in 0..inner_h {
        for col in 0..inner_w {
            put_content(row, col, ' ', DEFAULT_COLOR, DEFAULT_COLOR);
        }
    }

    match &zone.config {
        ZoneConfig::Pty { .. } => {
            let Some(session) = zone.pty_session() else {
                return;
            };
            let screen = session.screen();
            let lines = screen.styled_lines();
            for (row, line) in lines.iter().enumerate().take(inner_h) {
                let mut col = 0usize;
                for (ch, fg, bg) in line.cells() {
                    put_content(row, col, ch, fg, bg);
                    col += 1;
                }
            }
            // Terminal cursor, while following live output.
            let focused = app
                .focused_zone
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(&zone.name));
            if focused {
                if let Some((cur_row, cur_col)) = screen.cursor_position() {
                    let cx = zone.x + 1 + i64::from(cur_col);
                    let cy = zone.y + 1 + i64::from(cur_row);
                    if let Some((sx, sy)) = app.viewport.canvas_to_screen(cx, cy) {
                        matrix.update(sx, sy, |cell| cell.reversed = true);
                    }
                }
            }
        }
        ZoneConfig::Clipboard => {
            for (row, line) in app.clipboard.rows().iter().enumerate().take(inner_h) {
                for (col, cell) in line.iter().enumerate() {
                    put_content(row, col, cell.ch, cell.fg, cell.bg);
                }
            }
        }
        _ => {
            for (row, line) in zone.buffer.visible(inner_h).iter().enumerate() {
                let mut col = 0usize;
                for (ch, fg, bg) in line.cells() {
                    put_content(row, col, ch, fg, bg);
                    col += 1;
                }
            }
        }
    }
}

fn paint_selection(app: &App, matrix: &mut ScreenMatrix) {
    if app.mode != Mode::Visual {
        return;
    }
    let Some(selection) = app.selection else {
        return;
    };
    let (x, y, w, h) = selection.rect(app.viewport.cursor.x, app.viewport.cursor.y);
    for cy in y..y + h {
        for cx in x..x + w {
            if let Some((sx, sy)) = app.viewport.canvas_to_screen(cx, cy) {
                matrix.update(sx, sy, |cell| {
                    cell.fg = 0;
                    cell.bg = 6;
                });
            }
        }
    }
}

fn paint_cursor(app: &App, matrix: &mut ScreenMatrix) {
    if app.mode == Mode::PtyFocused {
        return;
    }
    if let Some((sx, sy)) = app
        .viewport
        .canvas_to_screen(app.viewport.cursor.x, app.viewport.cursor.y)
    {
        matrix.update(sx, sy, |cell| {
            cell.reversed = true;
            cell.bold = true;
        });
    }
}

fn paint_rulers(app: &App, matrix: &mut ScreenMatrix) {
    // Tick marks along the top row and left column at minor intervals,
    // drawn over whatever is beneath.
    let interval = app.grid.minor_interval.max(1);
    for sx in 0..matrix.width {
        let (cx, _) = app.viewport.screen_to_canvas(sx, 0);
        let ch = if (cx - app.viewport.origin.x).rem_euclid(interval) == 0 {
            '+'
        } else {
            '-'
        };
        matrix.put(
            sx,
            0,
            ScreenCell {
                ch,
                fg: 8,
                dim: true,
                ..ScreenCell::default()
            },
        );
    }
    for sy in 0..matrix.height {
        let (_, cy) = app.viewport.screen_to_canvas(0, sy);
        let ch = if (cy - app.viewport.origin.y).rem_euclid(interval) == 0 {
            '+'
        } else {
            '|'
        };
        matrix.put(
            0,
            sy,
            ScreenCell {
                ch,
                fg: 8,
                dim: true,
                ..ScreenCell::default()
            },
        );
    }
}

fn paint_labels(app: &App, matrix: &mut ScreenMatrix) {
    let interval = app.grid.label_interval.max(1);
    for sy in 0..matrix.height {
        for sx in 0..matrix.width {
            let (cx, cy) = app.viewport.screen_to_canvas(sx, sy);
            let rel_x = cx - app.viewport.origin.x;
            let rel_y = cy - app.viewport.origin.y;
            if rel_x.rem_euclid(interval) != 0 || rel_y.rem_euclid(interval) != 0 {
                continue;
            }
            let label = format!("({cx},{cy})");
            for (i, ch) in label.chars().enumerate() {
                matrix.put(
                    sx + i as u16,
                    sy,
                    ScreenCell {
                        ch,
                        fg: 8,
                        dim: true,
                        ..ScreenCell::default()
                    },
                );
            }
        }
    }
}

/// Status line text: mode, cursor relative to the origin marker, cell and
/// zone counts, file name, transient message.
pub fn status_line(app: &App) -> String {
    let rel_x = app.viewport.cursor.x - app.viewport.origin.x;
    let rel_y = app.viewport.cursor.y - app.viewport.origin.y;
    let mut parts = vec![
        format!("-- {} --", app.mode.name()),
        format!("({rel_x},{rel_y})"),
        format!("cells:{}", app.canvas.cell_count()),
    ];
    if !app.zones.is_empty() {
        parts.push(format!("zones:{}", app.zones.len()));
    }
    if let Some(port) = app.server_port {
        parts.push(format!("api:{port}"));
    }
    if let Some(name) = &app.focused_zone {
        if let Some(zone) = app.zones.get(name) {
            if let Some(session) = zone.pty_session() {
                let screen = session.screen();
                let offset = screen.scrollback();
                if offset == 0 {
                    parts.push("scroll:auto".to_string());
                } else {
                    parts.push(format!("scroll:{offset}/{}", screen.history_len()));
                }
            }
        }
    }
    parts.push(app.project.display_name());
    if app.mode == Mode::Command {
        parts.push(format!(":{}", app.command_buffer.text));
    } else if let Some(message) = &app.message {
        if !message.is_empty() {
            parts.push(message.clone());
        }
    }
    parts.join("  ")
}

fn term_color(color: Color) -> TermColor {
    if color < 0 {
        TermColor::Reset
    } else {
        TermColor::Indexed(color as u8)
    }
}

fn cell_style(cell: &ScreenCell) -> Style {
    let mut style = Style::default()
        .fg(term_color(cell.fg))
        .bg(term_color(cell.bg));
    if cell.dim {
        style = style.add_modifier(Modifier::DIM);
    }
    if cell.bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if cell.reversed {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

/// Batch a composed matrix into styled lines, merging adjacent cells
/// with identical styles into single spans.
fn matrix_to_lines(matrix: &ScreenMatrix) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(matrix.height as usize);
    for sy in 0..matrix.height {
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut text = String::new();
        let mut style = Style::default();
        let mut started = false;
        for sx in 0..matrix.width {
            let cell = matrix.get(sx, sy);
            let cell_style = cell_style(&cell);
            if !started {
                style = cell_style;
                started = true;
            } else if cell_style != style {
                spans.push(Span::styled(std::mem::take(&mut text), style));
                style = cell_style;
            }
            text.push(cell.ch);
        }
        if !text.is_empty() {
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// Draw one frame: composed canvas area plus the status line.
pub fn render(app: &App, frame: &mut Frame) {
    let area = frame.area();
    if area.height == 0 {
        return;
    }
    let canvas_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height: area.height.saturating_sub(1),
    };
    let status_area = Rect {
        x: area.x,
        y: area.y + area.height - 1,
        width: area.width,
        height: 1,
    };

    let matrix = compose(app);
    frame.render_widget(Paragraph::new(matrix_to_lines(&matrix)), canvas_area);

    let status = status_line(app);
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(TermColor::Green)),
        status_area,
    );
}
