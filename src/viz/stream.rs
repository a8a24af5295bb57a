//! Data stream panel: newest observations first

use crate::colors::{classification_color, Rgb};
use crate::dashboard::layout::Rect;
use crate::observation::{Observation, RollingWindow};
use crate::terminal::Terminal;
use crossterm::style::Color;

const BADGE_TEXT: Color = Color::Black;
const TIME_COLOR: Color = Color::DarkGrey;
const COUNTRY_COLOR: Color = Color::Cyan;
const COORD_COLOR: Color = Color::Grey;

/// One formatted stream row
#[derive(Debug, Clone, PartialEq)]
pub struct StreamLine {
    pub time: String,
    pub badge: &'static str,
    pub badge_color: Rgb,
    pub country: &'static str,
    pub coords: String,
}

impl StreamLine {
    pub fn from_observation(obs: &Observation) -> Self {
        Self {
            time: obs.timestamp.get(11..19).unwrap_or_default().to_string(),
            badge: obs.classification.label(),
            badge_color: classification_color(obs.classification),
            country: obs.country,
            coords: format!("[{:.4}, {:.4}]", obs.coordinates.lat, obs.coordinates.long),
        }
    }

    /// Plain text form used by `stream` output
    pub fn to_plain(&self) -> String {
        format!("{} {} {} {}", self.time, self.badge, self.country, self.coords)
    }
}

/// Draw the window newest-first into `area`, one observation per row
pub fn render(term: &mut Terminal, area: Rect, window: &RollingWindow) {
    if area.is_empty() {
        return;
    }

    for (row, obs) in window.iter_recent_first().take(area.height as usize).enumerate() {
        let line = StreamLine::from_observation(obs);
        let y = area.y + row as i32;
        let mut x = area.x;
        let right = area.right();

        let put = |term: &mut Terminal, x: &mut i32, text: &str, fg: Color, bg: Option<Color>| {
            for ch in text.chars() {
                if *x >= right {
                    return;
                }
                term.set(*x, y, ch, Some(fg), false);
                if let Some(bg) = bg {
                    term.set_bg(*x, y, bg);
                }
                *x += 1;
            }
        };

        put(term, &mut x, &line.time, TIME_COLOR, None);
        put(term, &mut x, " ", TIME_COLOR, None);
        put(term, &mut x, &format!(" {} ", line.badge), BADGE_TEXT, Some(line.badge_color.into()));
        put(term, &mut x, " ", TIME_COLOR, None);
        put(term, &mut x, line.country, COUNTRY_COLOR, None);
        put(term, &mut x, " ", TIME_COLOR, None);
        put(term, &mut x, &line.coords, COORD_COLOR, None);
    }
}
