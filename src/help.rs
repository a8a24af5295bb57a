use crate::terminal::Terminal;
use crossterm::style::Color;

/// Render a centered overlay box with the provided text.
///
/// Used for the `?` help screen and the lane speed menu.
pub fn render_overlay(term: &mut Terminal, text: &str) {
    if text.is_empty() {
        return;
    }
    let (width, height) = term.size();

    let lines: Vec<&str> = text.lines().collect();
    let max_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4; // 2 chars padding each side
    let box_height = lines.len() + 2; // border top/bottom

    let start_x = ((width as usize).saturating_sub(box_width) / 2) as i32;
    let start_y = ((height as usize).saturating_sub(box_height) / 2) as i32;
    let right = start_x + box_width as i32 - 1;
    let bottom = start_y + box_height as i32 - 1;

    let border = Some(Color::White);
    let text_color = Some(Color::Grey);

    term.fill_bg(start_x, start_y, box_width as u16, box_height as u16, Color::Black);

    term.set(start_x, start_y, '┌', border, false);
    term.set(right, start_y, '┐', border, false);
    term.set(start_x, bottom, '└', border, false);
    term.set(right, bottom, '┘', border, false);
    for x in start_x + 1..right {
        term.set(x, start_y, '─', border, false);
        term.set(x, bottom, '─', border, false);
    }

    for (i, line) in lines.iter().enumerate() {
        let y = start_y + 1 + i as i32;
        term.set(start_x, y, '│', border, false);
        term.set_str(start_x + 2, y, line, text_color, false);
        term.set(right, y, '│', border, false);
    }
}
