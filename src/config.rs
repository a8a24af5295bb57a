use crate::colors::{Rgb, GLOBE_FALLBACK};
use crate::settings::Settings;
use crate::viz::globe::ROTATION_STEP;
use crate::viz::lanes::{SpawnPolicy, SpeedMultiplier};
use rand::prelude::*;
use std::time::Duration;

/// Observation generation period
pub const DEFAULT_TICK: Duration = Duration::from_millis(1000);

/// Frame time bounds in seconds
pub const MIN_FRAME: f32 = 0.001;
pub const MAX_FRAME: f32 = 5.0;
const DEFAULT_FRAME: f32 = 0.033;

/// Mock counter refresh period
pub const STATS_TICK: Duration = Duration::from_millis(1000);

/// Which dashboard layout is mounted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    Overview, // globe, stream and classification counts
    Feed,     // activity lanes, stream and report counters
}

impl PageKind {
    pub fn other(self) -> Self {
        match self {
            PageKind::Overview => PageKind::Feed,
            PageKind::Feed => PageKind::Overview,
        }
    }
}

/// Configuration for a dashboard session
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub page: PageKind,
    pub time_step: f32,
    pub tick: Duration,
    pub stats_tick: Duration,
    pub seed: Option<u64>,
    pub policy: SpawnPolicy,
    pub speed: SpeedMultiplier,
    pub rotation_step: f64,
    /// Boundary dataset; None disables borders
    pub borders: Option<String>,
    /// Globe image; None uses the flat fill
    pub texture: Option<String>,
    pub globe_fill: Rgb,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            page: PageKind::Overview,
            time_step: DEFAULT_FRAME,
            tick: DEFAULT_TICK,
            stats_tick: STATS_TICK,
            seed: None,
            policy: SpawnPolicy::Classification,
            speed: SpeedMultiplier::Normal,
            rotation_step: ROTATION_STEP,
            borders: Some(crate::geo::DEFAULT_BORDERS.to_string()),
            texture: Some(crate::texture::DEFAULT_TEXTURE.to_string()),
            globe_fill: GLOBE_FALLBACK,
        }
    }
}

impl DashboardConfig {
    /// Independent generator for one consumer; `salt` keeps seeded streams apart
    pub fn rng(&self, salt: u64) -> StdRng {
        match self.seed {
            Some(s) => StdRng::seed_from_u64(s.wrapping_add(salt)),
            None => StdRng::from_entropy(),
        }
    }

    /// Fold config-file values in; CLI flags are applied afterwards
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        if let Some(step) = settings.globe.rotation {
            self.rotation_step = step;
        }
        if let Some(hex) = &settings.globe.fallback_color {
            match Rgb::from_hex(hex) {
                Some(c) => self.globe_fill = c,
                None => log::warn!("ignoring fallback_color {hex:?}"),
            }
        }
        if let Some(name) = &settings.lanes.policy {
            match SpawnPolicy::parse(name) {
                Some(p) => self.policy = p,
                None => log::warn!("ignoring lane policy {name:?}"),
            }
        }
        if let Some(factor) = settings.lanes.speed {
            match SpeedMultiplier::from_factor(factor) {
                Some(s) => self.speed = s,
                None => log::warn!("ignoring lane speed {factor}"),
            }
        }
        if let Some(src) = &settings.globe.borders {
            self.borders = asset_source(src.clone());
        }
        if let Some(src) = &settings.globe.texture {
            self.texture = asset_source(src.clone());
        }
        self
    }
}

/// Clamp a requested frame time; non-finite input falls back to the default
pub fn frame_time(secs: f32) -> f32 {
    if secs.is_finite() {
        secs.clamp(MIN_FRAME, MAX_FRAME)
    } else {
        DEFAULT_FRAME
    }
}

/// "none" (any case) switches an optional asset off
pub fn asset_source(src: String) -> Option<String> {
    if src.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_streams_are_reproducible_and_distinct() {
        let config = DashboardConfig {
            seed: Some(99),
            ..DashboardConfig::default()
        };
        let a: u64 = config.rng(1).gen();
        let b: u64 = config.rng(1).gen();
        let c: u64 = config.rng(2).gen();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn settings_override_defaults() {
        let settings = Settings::parse(
            r##"
            [globe]
            texture = "none"
            fallback_color = "#102030"
            rotation = 0.01

            [lanes]
            policy = "random"
            speed = 2.0
            "##,
        )
        .unwrap();
        let config = DashboardConfig::default().with_settings(&settings);
        assert_eq!(config.texture, None);
        assert_eq!(config.borders.as_deref(), Some(crate::geo::DEFAULT_BORDERS));
        assert_eq!(config.globe_fill, Rgb::new(0x10, 0x20, 0x30));
        assert_eq!(config.rotation_step, 0.01);
        assert_eq!(config.policy, SpawnPolicy::RANDOM);
        assert_eq!(config.speed, SpeedMultiplier::Double);
    }

    #[test]
    fn bad_settings_values_keep_defaults() {
        let settings = Settings::parse("[lanes]\npolicy = \"sideways\"\nspeed = 3.0\n").unwrap();
        let config = DashboardConfig::default().with_settings(&settings);
        assert_eq!(config.policy, SpawnPolicy::Classification);
        assert_eq!(config.speed, SpeedMultiplier::Normal);
    }

    #[test]
    fn frame_time_is_bounded() {
        assert_eq!(frame_time(0.033), 0.033);
        assert_eq!(frame_time(0.0), MIN_FRAME);
        assert_eq!(frame_time(-3.0), MIN_FRAME);
        assert_eq!(frame_time(1e39_f64 as f32), DEFAULT_FRAME);
        assert_eq!(frame_time(1e30), MAX_FRAME);
        assert_eq!(frame_time(f32::INFINITY), DEFAULT_FRAME);
        assert_eq!(frame_time(f32::NAN), DEFAULT_FRAME);
    }

    #[test]
    fn page_toggle() {
        assert_eq!(PageKind::Overview.other(), PageKind::Feed);
        assert_eq!(PageKind::Feed.other().other(), PageKind::Feed);
    }
}
