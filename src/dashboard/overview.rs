//! Overview page: globe, data stream and per-classification counts

use super::layout::{draw_stat, format_count, Panel, Rect};
use super::{build_help, ObservationFeed, Page};
use crate::asset::AssetLoader;
use crate::colors::{classification_color, Rgb, PANEL_BG};
use crate::config::DashboardConfig;
use crate::geo::BoundarySet;
use crate::observation::{Classification, ObservationGenerator};
use crate::terminal::Terminal;
use crate::texture::Texture;
use crate::timer::Interval;
use crate::viz::globe::GlobeRenderer;
use crate::viz::stream;
use crossterm::style::Color;
use rand::prelude::*;
use std::time::Instant;

const PAGE_BG: Rgb = Rgb::new(0x0A, 0x0F, 0x1F);
const HEADER_ROWS: u16 = 3;
const FOOTER_ROWS: u16 = 3;

const CYAN: Color = Color::Rgb { r: 0x22, g: 0xD3, b: 0xEE };
const PURPLE: Color = Color::Rgb { r: 0xC0, g: 0x84, b: 0xFC };
const EMERALD: Color = Color::Rgb { r: 0x34, g: 0xD3, b: 0x99 };

/// Header counters, drifting on their own timer
#[derive(Clone, Copy, Debug, PartialEq)]
struct OverviewStats {
    connections: u64,
    processed: u64,
    users: u64,
}

impl OverviewStats {
    fn initial() -> Self {
        Self {
            connections: 1_278,
            processed: 3_094_109,
            users: 3_049,
        }
    }

    fn refresh(&mut self, rng: &mut StdRng) {
        self.connections = self.connections.saturating_add_signed(rng.gen_range(-25..=25));
        self.processed += rng.gen_range(500..1500);
        self.users = self.users.saturating_add_signed(rng.gen_range(-15..=15));
    }
}

pub struct Overview {
    feed: ObservationFeed,
    stats: OverviewStats,
    stats_timer: Interval,
    stats_rng: StdRng,
    globe: GlobeRenderer,
}

impl Overview {
    pub fn new(config: &DashboardConfig, now: Instant) -> Self {
        let texture = match &config.texture {
            Some(src) => {
                let src = src.clone();
                AssetLoader::spawn("globe texture", move || Texture::load(&src))
            }
            None => AssetLoader::unavailable("globe texture"),
        };
        let borders = match &config.borders {
            Some(src) => {
                let src = src.clone();
                AssetLoader::spawn("country borders", move || BoundarySet::load(&src))
            }
            None => AssetLoader::unavailable("country borders"),
        };

        Self {
            feed: ObservationFeed::new(ObservationGenerator::new(config.rng(0)), config.tick, now),
            stats: OverviewStats::initial(),
            stats_timer: Interval::new(config.stats_tick, now),
            stats_rng: config.rng(2),
            globe: GlobeRenderer::new(config.rotation_step, config.globe_fill, texture, borders),
        }
    }

    fn draw_footer(&self, term: &mut Terminal, area: Rect) {
        let window = self.feed.window();
        for (col, class) in area.columns(4).into_iter().zip(Classification::ALL) {
            let color: Color = classification_color(class).into();
            let title = match class {
                Classification::Cui => "CUI Data",
                Classification::Secret => "Secret Data",
                Classification::TopSecret => "Top Secret Data",
                Classification::Unclassified => "Unclassified Data",
            };
            draw_stat(term, col, title, &window.count(class).to_string(), color, PANEL_BG);
            let inner = col.inner();
            if inner.width > 2 && inner.height > 0 {
                term.set(inner.right() - 2, inner.y, '●', Some(color), false);
            }
        }
    }
}

impl Page for Overview {
    fn update(&mut self, now: Instant) {
        self.feed.update(now);
        for _ in 0..self.stats_timer.poll(now) {
            self.stats.refresh(&mut self.stats_rng);
        }
        self.globe.frame();
    }

    fn draw(&mut self, term: &mut Terminal) {
        let (w, h) = term.size();
        let full = Rect::new(0, 0, w, h);
        term.fill_bg(0, 0, w, h, PAGE_BG.into());

        let (header, rest) = full.split_v(HEADER_ROWS);
        let (body, footer) = rest.split_v(rest.height.saturating_sub(FOOTER_ROWS));

        let counters = [
            ("Active Connections", self.stats.connections, CYAN),
            ("Data Points Processed", self.stats.processed, PURPLE),
            ("Active Users", self.stats.users, EMERALD),
        ];
        for (col, (title, value, color)) in header.columns(3).into_iter().zip(counters) {
            draw_stat(term, col, title, &format_count(value), color, PANEL_BG);
        }

        let (globe_area, stream_area) = body.split_h(body.width * 2 / 3);
        let title = if self.globe.loading() { "Global Activity (loading)" } else { "Global Activity" };
        let globe_inner = Panel::new(globe_area, title).background(PANEL_BG).draw(term);
        self.globe.render(term, globe_inner, self.feed.window());

        let stream_inner = Panel::new(stream_area, "Data Stream").background(PANEL_BG).draw(term);
        stream::render(term, stream_inner, self.feed.window());

        self.draw_footer(term, footer);
    }

    fn resume(&mut self, now: Instant) {
        self.feed.resume(now);
        self.stats_timer.reset(now);
    }

    fn help(&self) -> String {
        build_help("OVERVIEW", "Globe rotates on its own;\nborders load from geo/world.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> DashboardConfig {
        DashboardConfig {
            seed: Some(21),
            borders: None,
            texture: None,
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn stats_refresh_once_per_second() {
        let start = Instant::now();
        let mut page = Overview::new(&config(), start);
        let before = page.stats;
        page.update(start + Duration::from_millis(999));
        assert_eq!(page.stats, before);
        page.update(start + Duration::from_millis(1000));
        assert!(page.stats.processed > before.processed);
    }

    #[test]
    fn footer_counts_match_window() {
        let start = Instant::now();
        let mut page = Overview::new(&config(), start);
        page.update(start + Duration::from_secs(20));
        assert_eq!(page.feed.window().len(), 20);

        let mut term = Terminal::headless(120, 40);
        page.draw(&mut term);
        let footer_row: String = (0..120).map(|x| term.cell(x, 38).unwrap().ch).collect();
        let total: usize = footer_row
            .split(|c: char| !c.is_ascii_digit())
            .filter_map(|n| n.parse::<usize>().ok())
            .sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn header_shows_formatted_counters() {
        let start = Instant::now();
        let mut page = Overview::new(&config(), start);
        let mut term = Terminal::headless(120, 40);
        page.draw(&mut term);
        let header: String = (0..120).map(|x| term.cell(x, 1).unwrap().ch).collect();
        assert!(header.contains("1,278"));
        assert!(header.contains("3,094,109"));
    }
}
