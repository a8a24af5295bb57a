//! Equirectangular globe texture

use crate::asset::fetch_bytes;
use crate::colors::Rgb;
use crate::error::AssetError;
use image::RgbImage;

/// Where the globe image is looked up when nothing is configured
pub const DEFAULT_TEXTURE: &str = "images/globe-night.jpeg";

pub struct Texture {
    pixels: RgbImage,
}

impl Texture {
    pub fn from_image(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    pub fn load(source: &str) -> Result<Self, AssetError> {
        let bytes = fetch_bytes(source)?;
        let decoded = image::load_from_memory(&bytes)?;
        log::debug!("texture {source}: {}x{}", decoded.width(), decoded.height());
        Ok(Self::from_image(decoded.to_rgb8()))
    }

    /// Color at a latitude/longitude in degrees.
    ///
    /// Column 0 is longitude -180, row 0 is latitude +90.
    pub fn sample(&self, lat: f64, lon: f64) -> Rgb {
        let (w, h) = self.pixels.dimensions();
        if w == 0 || h == 0 {
            return Rgb::new(0, 0, 0);
        }
        let u = ((lon + 180.0) / 360.0).rem_euclid(1.0);
        let v = ((90.0 - lat) / 180.0).clamp(0.0, 1.0);
        let x = ((u * w as f64) as u32).min(w - 1);
        let y = ((v * h as f64) as u32).min(h - 1);
        let [r, g, b] = self.pixels.get_pixel(x, y).0;
        Rgb::new(r, g, b)
    }
}
