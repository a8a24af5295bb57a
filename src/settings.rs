use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub globe: GlobeSettings,
    #[serde(default)]
    pub lanes: LaneSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct GlobeSettings {
    pub borders: Option<String>,        // GeoJSON path or URL
    pub texture: Option<String>,        // equirectangular image path or URL
    pub fallback_color: Option<String>, // "#RRGGBB" when no texture loads
    pub rotation: Option<f64>,          // radians per frame
}

#[derive(Debug, Default, Deserialize)]
pub struct LaneSettings {
    pub policy: Option<String>, // "classification" or "random"
    pub speed: Option<f32>,     // 0.5, 1 or 2
}

#[derive(Debug, Default, Deserialize)]
pub struct LogSettings {
    pub file: Option<PathBuf>,
    pub level: Option<String>,
}

impl Settings {
    /// Read the config file. A missing or unreadable file gives defaults;
    /// a file that does not parse is reported so it can be logged.
    pub fn load() -> Result<Self, toml::de::Error> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("termintel")
            .join("config.toml")
    }

    pub fn default_log_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("termintel")
            .join("termintel.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let s = Settings::parse("").unwrap();
        assert!(s.globe.borders.is_none());
        assert!(s.lanes.speed.is_none());
        assert!(s.log.file.is_none());
    }

    #[test]
    fn reads_every_section() {
        let s = Settings::parse(
            r##"
            [globe]
            borders = "/data/world.json"
            fallback_color = "#334455"
            rotation = 0.01

            [lanes]
            policy = "random"
            speed = 2.0

            [log]
            file = "/tmp/termintel.log"
            level = "debug"
            "##,
        )
        .unwrap();
        assert_eq!(s.globe.borders.as_deref(), Some("/data/world.json"));
        assert_eq!(s.globe.fallback_color.as_deref(), Some("#334455"));
        assert_eq!(s.globe.rotation, Some(0.01));
        assert_eq!(s.lanes.policy.as_deref(), Some("random"));
        assert_eq!(s.lanes.speed, Some(2.0));
        assert_eq!(s.log.level.as_deref(), Some("debug"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Settings::parse("[globe\nborders = 3").is_err());
    }
}
