use crate::observation::Classification;
use crossterm::style::Color;

/// Background of the activity canvas (#060809)
pub const CANVAS_BG: Rgb = Rgb::new(0x06, 0x08, 0x09);

/// Panel background used by the dashboard pages (#111827)
pub const PANEL_BG: Rgb = Rgb::new(0x11, 0x18, 0x27);

/// Globe fill when no texture is available (#888888)
pub const GLOBE_FALLBACK: Rgb = Rgb::new(0x88, 0x88, 0x88);

/// Lane colors for the data-independent spawn policy
pub const BRIGHT_PALETTE: [Rgb; 8] = [
    Rgb::new(0x00, 0xFF, 0xFF), // cyan
    Rgb::new(0xFF, 0x00, 0xFF), // magenta
    Rgb::new(0xFF, 0xFF, 0x00), // yellow
    Rgb::new(0x00, 0xFF, 0x66), // spring green
    Rgb::new(0xFF, 0x66, 0x00), // orange
    Rgb::new(0x66, 0x99, 0xFF), // sky blue
    Rgb::new(0xFF, 0x33, 0x99), // pink
    Rgb::new(0xCC, 0xFF, 0x33), // lime
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Scale every channel toward black
    pub fn dim(self, factor: f32) -> Self {
        let f = factor.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * f).round() as u8,
            g: (self.g as f32 * f).round() as u8,
            b: (self.b as f32 * f).round() as u8,
        }
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb { r: c.r, g: c.g, b: c.b }
    }
}

/// Badge and lane color for a classification
pub fn classification_color(class: Classification) -> Rgb {
    match class {
        Classification::Cui => Rgb::new(0xFF, 0xB8, 0x00),
        Classification::Secret => Rgb::new(0xFF, 0x44, 0x44),
        Classification::TopSecret => Rgb::new(0xFF, 0x00, 0x00),
        Classification::Unclassified => Rgb::new(0x44, 0xFF, 0x44),
    }
}

/// Blend from white (intensity 0) to `base` (intensity 1).
///
/// Each channel is `255 - (255 - base) * intensity`, rounded.
pub fn interpolate_from_white(base: Rgb, intensity: f32) -> Rgb {
    let t = intensity.clamp(0.0, 1.0);
    let channel = |c: u8| (255.0 - (255.0 - c as f32) * t).round() as u8;
    Rgb {
        r: channel(base.r),
        g: channel(base.g),
        b: channel(base.b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_total_and_stable() {
        let expected = [
            (Classification::Cui, Rgb::new(255, 184, 0)),
            (Classification::Secret, Rgb::new(255, 68, 68)),
            (Classification::TopSecret, Rgb::new(255, 0, 0)),
            (Classification::Unclassified, Rgb::new(68, 255, 68)),
        ];
        for class in Classification::ALL {
            let (_, want) = expected.iter().find(|(c, _)| *c == class).copied().unwrap();
            assert_eq!(classification_color(class), want);
            assert_eq!(classification_color(class), classification_color(class));
        }
    }

    #[test]
    fn interpolation_endpoints() {
        let base = Rgb::new(255, 68, 68);
        assert_eq!(interpolate_from_white(base, 1.0), base);
        assert_eq!(interpolate_from_white(base, 0.0), Rgb::new(255, 255, 255));
        // 255 - (255 - 68) * 0.5 = 161.5
        assert_eq!(interpolate_from_white(base, 0.5), Rgb::new(255, 162, 162));
    }

    #[test]
    fn interpolation_clamps_intensity() {
        let base = Rgb::new(0, 0, 0);
        assert_eq!(interpolate_from_white(base, 2.0), base);
        assert_eq!(interpolate_from_white(base, -1.0), Rgb::new(255, 255, 255));
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgb::from_hex("#FFB800"), Some(Rgb::new(255, 184, 0)));
        assert_eq!(Rgb::from_hex("44ff44"), Some(Rgb::new(68, 255, 68)));
        assert_eq!(Rgb::from_hex("#FFF"), None);
        assert_eq!(Rgb::from_hex("#GGGGGG"), None);
    }
}
