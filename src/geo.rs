//! Country boundary rings from a GeoJSON FeatureCollection

use crate::asset::fetch_bytes;
use crate::error::AssetError;
use serde::Deserialize;

/// Where boundary data is looked up when nothing is configured
pub const DEFAULT_BORDERS: &str = "geo/world.json";

/// One closed ring of `[longitude, latitude]` pairs in degrees
pub type Ring = Vec<[f64; 2]>;

/// Ring as it appears on the wire: positions may carry an altitude
type RawRing = Vec<Vec<f64>>;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<RawRing> },
    MultiPolygon { coordinates: Vec<Vec<RawRing>> },
    #[serde(other)]
    Unsupported,
}

/// All boundary rings of a dataset, flattened
#[derive(Debug, Default)]
pub struct BoundarySet {
    rings: Vec<Ring>,
}

impl BoundarySet {
    pub fn from_json(text: &str) -> Result<Self, AssetError> {
        let collection: FeatureCollection = serde_json::from_str(text)?;
        let mut raw: Vec<RawRing> = Vec::new();

        for geometry in collection.features.into_iter().filter_map(|f| f.geometry) {
            match geometry {
                Geometry::Polygon { coordinates } => raw.extend(coordinates),
                Geometry::MultiPolygon { coordinates } => {
                    raw.extend(coordinates.into_iter().flatten());
                }
                Geometry::Unsupported => {}
            }
        }

        let rings = raw
            .into_iter()
            .map(|ring| {
                ring.into_iter()
                    .filter_map(|pos| match pos[..] {
                        [lon, lat, ..] => Some([lon, lat]),
                        _ => None,
                    })
                    .collect::<Ring>()
            })
            // A ring needs at least two points to draw anything
            .filter(|r| r.len() >= 2)
            .collect();
        Ok(Self { rings })
    }

    /// Load from a file path or URL
    pub fn load(source: &str) -> Result<Self, AssetError> {
        let bytes = fetch_bytes(source)?;
        let text = String::from_utf8_lossy(&bytes);
        let set = Self::from_json(&text)?;
        log::debug!("{} boundary rings from {source}", set.rings.len());
        Ok(set)
    }

    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}
