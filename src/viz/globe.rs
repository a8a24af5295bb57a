//! Rotating globe rendered with braille dots
//!
//! The sphere surface is shaded through cell backgrounds (texture or flat
//! fill). Country borders and observation markers are braille dots on top.

use crate::asset::{Asset, AssetLoader};
use crate::colors::{classification_color, Rgb};
use crate::dashboard::layout::Rect;
use crate::geo::BoundarySet;
use crate::observation::{Classification, RollingWindow};
use crate::texture::Texture;
use crate::terminal::Terminal;
use crossterm::style::Color;
use std::f64::consts::TAU;

/// Sphere radius in scene units
pub const RADIUS: f64 = 2.0;

/// Borders sit just above the surface
pub const BORDER_RADIUS: f64 = RADIUS + 0.001;

/// Default rotation per frame, radians about the vertical axis
pub const ROTATION_STEP: f64 = 0.0025;

/// Share of the smaller area dimension covered by the globe
const FILL: f64 = 0.92;

const BORDER_COLOR: Color = Color::White;

// Dot layers, higher wins when a cell mixes them
const DOT_NONE: u8 = 0;
const DOT_BORDER: u8 = 1;
const DOT_MARKER: u8 = 2; // + classification index

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Rotate about the vertical (y) axis
    pub fn rotate_y(self, angle: f64) -> Vec3 {
        let (sin, cos) = angle.sin_cos();
        Vec3 {
            x: self.x * cos + self.z * sin,
            y: self.y,
            z: -self.x * sin + self.z * cos,
        }
    }
}

/// Point on a sphere of radius `r` for a latitude/longitude in degrees
pub fn sphere_point(lat: f64, lon: f64, r: f64) -> Vec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (lon + 180.0).to_radians();
    Vec3 {
        x: -r * phi.sin() * theta.cos(),
        y: r * phi.cos(),
        z: r * phi.sin() * theta.sin(),
    }
}

/// Inverse of `sphere_point`: (lat, lon) in degrees, lon in [-180, 180)
pub fn lat_lon_of(p: Vec3) -> (f64, f64) {
    let r = (p.x * p.x + p.y * p.y + p.z * p.z).sqrt();
    if r == 0.0 {
        return (0.0, 0.0);
    }
    let phi = (p.y / r).clamp(-1.0, 1.0).acos();
    let theta = p.z.atan2(-p.x);
    let lat = 90.0 - phi.to_degrees();
    let lon = theta.to_degrees().rem_euclid(360.0) - 180.0;
    (lat, lon)
}

/// Braille raster sized to a drawing area
struct DotGrid {
    w: usize,
    h: usize,
    dots: Vec<u8>,
}

impl DotGrid {
    fn new() -> Self {
        Self { w: 0, h: 0, dots: Vec::new() }
    }

    fn reset(&mut self, cells_w: u16, cells_h: u16) {
        self.w = cells_w as usize * 2;
        self.h = cells_h as usize * 4;
        self.dots.clear();
        self.dots.resize(self.w * self.h, DOT_NONE);
    }

    fn plot(&mut self, x: i32, y: i32, layer: u8) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            let cell = &mut self.dots[y as usize * self.w + x as usize];
            *cell = (*cell).max(layer);
        }
    }

    fn line(&mut self, (x0, y0): (i32, i32), (x1, y1): (i32, i32), layer: u8) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y) = (x0, y0);
        let mut err = dx + dy;
        loop {
            self.plot(x, y, layer);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn get(&self, x: usize, y: usize) -> u8 {
        self.dots[y * self.w + x]
    }
}

/// Orthographic view of the rotated sphere inside a dot raster
#[derive(Clone, Copy)]
struct Projection {
    cx: f64,
    cy: f64,
    /// Dots per scene unit
    scale: f64,
}

impl Projection {
    fn for_area(area: Rect) -> Self {
        let dots_w = area.width as f64 * 2.0;
        let dots_h = area.height as f64 * 4.0;
        Self {
            cx: dots_w / 2.0,
            cy: dots_h / 2.0,
            scale: dots_w.min(dots_h) * FILL / 2.0 / RADIUS,
        }
    }

    /// Dot position of a rotated point, None when on the far side
    fn to_dot(&self, p: Vec3) -> Option<(i32, i32)> {
        if p.z <= 0.0 {
            return None;
        }
        Some((
            (self.cx + p.x * self.scale).floor() as i32,
            (self.cy - p.y * self.scale).floor() as i32,
        ))
    }
}

pub struct GlobeRenderer {
    rotation: f64,
    step: f64,
    fallback: Rgb,
    texture: AssetLoader<Texture>,
    borders: AssetLoader<BoundarySet>,
    /// Border rings on the unrotated sphere, built once borders load
    rings: Vec<Vec<Vec3>>,
    rings_built: bool,
    grid: DotGrid,
}

impl GlobeRenderer {
    pub fn new(
        step: f64,
        fallback: Rgb,
        texture: AssetLoader<Texture>,
        borders: AssetLoader<BoundarySet>,
    ) -> Self {
        Self {
            rotation: 0.0,
            step,
            fallback,
            texture,
            borders,
            rings: Vec::new(),
            rings_built: false,
            grid: DotGrid::new(),
        }
    }

    #[cfg(test)]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    #[cfg(test)]
    pub fn border_ring_count(&self) -> usize {
        self.rings.len()
    }

    #[cfg(test)]
    pub fn has_texture(&self) -> bool {
        self.texture.state().get().is_some()
    }

    /// True while the texture or the borders are still being fetched
    pub fn loading(&self) -> bool {
        self.texture.state().is_pending() || !self.rings_built
    }

    /// Advance rotation one frame and pick up finished asset loads
    pub fn frame(&mut self) {
        self.rotation = (self.rotation + self.step).rem_euclid(TAU);
        self.texture.poll();

        if !self.rings_built {
            match self.borders.poll() {
                Asset::Loaded(set) => {
                    self.rings = set
                        .rings()
                        .iter()
                        .map(|ring| {
                            ring.iter()
                                .map(|[lon, lat]| sphere_point(*lat, *lon, BORDER_RADIUS))
                                .collect()
                        })
                        .collect();
                    self.rings_built = true;
                }
                Asset::Unavailable => self.rings_built = true,
                Asset::Pending => {}
            }
        }
    }

    fn surface_color(&self, lat: f64, lon: f64) -> Rgb {
        match self.texture.state() {
            Asset::Loaded(tex) => tex.sample(lat, lon),
            _ => self.fallback,
        }
    }

    pub fn render(&mut self, term: &mut Terminal, area: Rect, window: &RollingWindow) {
        if area.is_empty() {
            return;
        }
        let proj = Projection::for_area(area);
        let radius_dots = RADIUS * proj.scale;

        // Surface
        for cy in 0..area.height {
            for cx in 0..area.width {
                let dx = (cx as f64 * 2.0 + 1.0 - proj.cx) / radius_dots;
                let dy = (proj.cy - (cy as f64 * 4.0 + 2.0)) / radius_dots;
                let d2 = dx * dx + dy * dy;
                if d2 > 1.0 {
                    continue;
                }
                let view = Vec3 { x: dx * RADIUS, y: dy * RADIUS, z: (1.0 - d2).sqrt() * RADIUS };
                let (lat, lon) = lat_lon_of(view.rotate_y(-self.rotation));
                let color = self.surface_color(lat, lon);
                term.set_bg(area.x + cx as i32, area.y + cy as i32, color.into());
            }
        }

        self.grid.reset(area.width, area.height);

        // Borders: closed loops, segments drawn only when both ends face us
        for ring in &self.rings {
            let dots: Vec<Option<(i32, i32)>> = ring
                .iter()
                .map(|p| proj.to_dot(p.rotate_y(self.rotation)))
                .collect();
            for i in 0..dots.len() {
                let next = (i + 1) % dots.len();
                if let (Some(a), Some(b)) = (dots[i], dots[next]) {
                    self.grid.line(a, b, DOT_BORDER);
                }
            }
        }

        // Observation markers
        for obs in window.iter() {
            let p = sphere_point(obs.coordinates.lat, obs.coordinates.long, RADIUS).rotate_y(self.rotation);
            if let Some((x, y)) = proj.to_dot(p) {
                let layer = DOT_MARKER + obs.classification.index() as u8;
                for (ox, oy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    self.grid.plot(x + ox, y + oy, layer);
                }
            }
        }

        self.compose(term, area);
    }

    /// Fold the dot raster into braille characters
    fn compose(&self, term: &mut Terminal, area: Rect) {
        const DOT_BITS: [(usize, usize, u8); 8] = [
            (0, 0, 0x01), (0, 1, 0x02), (0, 2, 0x04), (1, 0, 0x08),
            (1, 1, 0x10), (1, 2, 0x20), (0, 3, 0x40), (1, 3, 0x80),
        ];

        for cy in 0..area.height as usize {
            for cx in 0..area.width as usize {
                let mut bits: u8 = 0;
                let mut top = DOT_NONE;
                for (ox, oy, bit) in DOT_BITS {
                    let v = self.grid.get(cx * 2 + ox, cy * 4 + oy);
                    if v != DOT_NONE {
                        bits |= bit;
                        top = top.max(v);
                    }
                }
                if bits == 0 {
                    continue;
                }
                let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
                let (fg, bold) = if top >= DOT_MARKER {
                    let class = Classification::ALL[(top - DOT_MARKER) as usize];
                    (classification_color(class).into(), true)
                } else {
                    (BORDER_COLOR, false)
                };
                term.set(area.x + cx as i32, area.y + cy as i32, ch, Some(fg), bold);
            }
        }
    }
}
