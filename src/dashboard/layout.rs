use crate::colors::Rgb;
use crate::terminal::Terminal;
use crossterm::style::Color;

// Box drawing characters (rounded)
pub const BOX_TL: char = '╭';
pub const BOX_TR: char = '╮';
pub const BOX_BL: char = '╰';
pub const BOX_BR: char = '╯';
pub const BOX_H: char = '─';
pub const BOX_V: char = '│';
pub const BOX_TITLE_L: char = '┤';
pub const BOX_TITLE_R: char = '├';

/// A screen region in cells
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Area inside a one-cell border
    pub fn inner(&self) -> Rect {
        Rect {
            x: self.x + 1,
            y: self.y + 1,
            width: self.width.saturating_sub(2),
            height: self.height.saturating_sub(2),
        }
    }

    /// Split into a left part of `left` cells and the remainder
    pub fn split_h(&self, left: u16) -> (Rect, Rect) {
        let left = left.min(self.width);
        (
            Rect::new(self.x, self.y, left, self.height),
            Rect::new(self.x + left as i32, self.y, self.width - left, self.height),
        )
    }

    /// Split into a top part of `top` rows and the remainder
    pub fn split_v(&self, top: u16) -> (Rect, Rect) {
        let top = top.min(self.height);
        (
            Rect::new(self.x, self.y, self.width, top),
            Rect::new(self.x, self.y + top as i32, self.width, self.height - top),
        )
    }

    /// `n` equal columns; the last one absorbs the remainder
    pub fn columns(&self, n: u16) -> Vec<Rect> {
        if n == 0 {
            return Vec::new();
        }
        let w = self.width / n;
        (0..n)
            .map(|i| {
                let width = if i == n - 1 { self.width - w * (n - 1) } else { w };
                Rect::new(self.x + (w * i) as i32, self.y, width, self.height)
            })
            .collect()
    }
}

/// A bordered panel with title (btop-style)
pub struct Panel<'a> {
    pub area: Rect,
    pub title: &'a str,
    pub title_color: Color,
    pub border_color: Color,
    pub background: Option<Rgb>,
}

impl<'a> Panel<'a> {
    pub fn new(area: Rect, title: &'a str) -> Self {
        Self {
            area,
            title,
            title_color: Color::White,
            border_color: Color::DarkGrey,
            background: None,
        }
    }

    pub fn background(mut self, bg: Rgb) -> Self {
        self.background = Some(bg);
        self
    }

    /// Draw border and title, returning the content area
    pub fn draw(&self, term: &mut Terminal) -> Rect {
        let r = self.area;
        if r.width < 2 || r.height < 2 {
            return Rect::default();
        }
        if let Some(bg) = self.background {
            term.fill_bg(r.x, r.y, r.width, r.height, bg.into());
        }

        let bc = Some(self.border_color);
        let right = r.right() - 1;
        let bottom = r.bottom() - 1;

        term.set(r.x, r.y, BOX_TL, bc, false);
        term.set(right, r.y, BOX_TR, bc, false);
        term.set(r.x, bottom, BOX_BL, bc, false);
        term.set(right, bottom, BOX_BR, bc, false);
        for x in r.x + 1..right {
            term.set(x, r.y, BOX_H, bc, false);
            term.set(x, bottom, BOX_H, bc, false);
        }
        for y in r.y + 1..bottom {
            term.set(r.x, y, BOX_V, bc, false);
            term.set(right, y, BOX_V, bc, false);
        }

        let title_len = self.title.chars().count() as i32;
        if title_len > 0 && title_len + 6 <= r.width as i32 {
            let tx = r.x + 2;
            term.set(tx, r.y, BOX_TITLE_L, bc, false);
            term.set(tx + 1, r.y, ' ', None, false);
            term.set_str(tx + 2, r.y, self.title, Some(self.title_color), true);
            term.set(tx + 2 + title_len, r.y, ' ', None, false);
            term.set(tx + 3 + title_len, r.y, BOX_TITLE_R, bc, false);
        }

        r.inner()
    }
}

/// Bordered panel showing one large counter
pub fn draw_stat(term: &mut Terminal, area: Rect, title: &str, value: &str, color: Color, bg: Rgb) {
    let inner = Panel::new(area, title).background(bg).draw(term);
    if inner.is_empty() {
        return;
    }
    let text = truncate(value, inner.width.saturating_sub(1) as usize);
    term.set_str(inner.x + 1, inner.y, &text, Some(color), true);
}

/// Format a count with thousands separators (1278 -> "1,278")
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Cut `s` to at most `max` characters
pub fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
