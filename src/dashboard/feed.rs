//! Feed page: report counters, activity lanes and the data stream

use super::layout::{draw_stat, format_count, Panel, Rect};
use super::{build_help, ObservationFeed, Page};
use crate::colors::{Rgb, CANVAS_BG};
use crate::config::DashboardConfig;
use crate::help::render_overlay;
use crate::observation::ObservationGenerator;
use crate::terminal::Terminal;
use crate::timer::Interval;
use crate::viz::lanes::{LaneAnimator, SpawnPolicy, SpeedMenu};
use crate::viz::stream;
use crossterm::event::KeyCode;
use crossterm::style::Color;
use rand::prelude::*;
use std::time::Instant;

const ACTIVITY_BARS: usize = 60;
const ACTIVITY_GREEN: Rgb = Rgb::new(0x16, 0xA3, 0x4A);
const PANEL: Rgb = Rgb::new(0x0D, 0x11, 0x14);

const LEFT_COLS: u16 = 24;
const STREAM_COLS: u16 = 56;
const COUNTER_ROWS: u16 = 3;
const BOTTOM_ROWS: u16 = 3;

const ORANGE: Color = Color::Rgb { r: 0xFB, g: 0x92, b: 0x3C };

/// Mock report counters, regenerated wholesale every refresh
#[derive(Clone, Debug, PartialEq)]
struct FeedStats {
    reports_last_hour: u64,
    total_reports: u64,
    verified: u64,
    activity: [f32; ACTIVITY_BARS],
}

impl FeedStats {
    fn generate(rng: &mut StdRng) -> Self {
        let mut activity = [0.0; ACTIVITY_BARS];
        for bar in &mut activity {
            *bar = rng.gen_range(0.1..0.6);
        }
        Self {
            reports_last_hour: rng.gen_range(200..1200),
            total_reports: rng.gen_range(0..100_000),
            verified: rng.gen_range(1000..6000),
            activity,
        }
    }
}

pub struct Feed {
    feed: ObservationFeed,
    stats: FeedStats,
    stats_timer: Interval,
    stats_rng: StdRng,
    lanes: LaneAnimator,
    menu: SpeedMenu,
}

impl Feed {
    pub fn new(config: &DashboardConfig, now: Instant) -> Self {
        let mut stats_rng = config.rng(2);
        Self {
            feed: ObservationFeed::new(ObservationGenerator::new(config.rng(0)), config.tick, now),
            stats: FeedStats::generate(&mut stats_rng),
            stats_timer: Interval::new(config.stats_tick, now),
            stats_rng,
            lanes: LaneAnimator::new(config.policy, config.speed, config.rng(1)),
            menu: SpeedMenu::default(),
        }
    }

    fn draw_activity_strip(&self, term: &mut Terminal, area: Rect) {
        let inner = Panel::new(area, "Activity").background(PANEL).draw(term);
        if inner.is_empty() {
            return;
        }
        let w = inner.width as usize;
        for (i, opacity) in self.stats.activity.iter().enumerate() {
            let from = i * w / ACTIVITY_BARS;
            let to = ((i + 1) * w / ACTIVITY_BARS).max(from + 1).min(w);
            let color = ACTIVITY_GREEN.dim(*opacity);
            for x in from..to {
                for y in 0..inner.height as i32 {
                    term.set(inner.x + x as i32, inner.y + y, '█', Some(color.into()), false);
                }
            }
        }
    }
}

impl Page for Feed {
    fn update(&mut self, now: Instant) {
        self.feed.update(now);
        if self.stats_timer.poll(now) > 0 {
            self.stats = FeedStats::generate(&mut self.stats_rng);
        }
        self.lanes.observe(self.feed.window());
        self.lanes.frame();
    }

    fn draw(&mut self, term: &mut Terminal) {
        let (w, h) = term.size();
        let full = Rect::new(0, 0, w, h);
        term.fill_bg(0, 0, w, h, CANVAS_BG.into());

        let (top, bottom) = full.split_v(h.saturating_sub(BOTTOM_ROWS));
        let (left, rest) = top.split_h(LEFT_COLS.min(w / 4));
        let stream_cols = STREAM_COLS.min(rest.width / 2);
        let (center, right) = rest.split_h(rest.width - stream_cols);

        let (hour_area, _) = left.split_v(COUNTER_ROWS);
        draw_stat(
            term,
            hour_area,
            "Reports Last Hour",
            &format_count(self.stats.reports_last_hour),
            Color::White,
            PANEL,
        );

        let (total_area, lanes_area) = center.split_v(COUNTER_ROWS);
        draw_stat(term, total_area, "Total Reports", &format_count(self.stats.total_reports), Color::White, PANEL);

        let source = match self.lanes.policy() {
            SpawnPolicy::Classification => "by class",
            SpawnPolicy::Random { .. } => "random",
        };
        let title = format!("Activity {source} {}", self.lanes.speed().label());
        let canvas = Panel::new(lanes_area, &title).draw(term);
        self.lanes.resize(canvas.height);
        self.lanes.render(term, canvas);

        let stream_inner = Panel::new(right, "Data Stream").background(PANEL).draw(term);
        stream::render(term, stream_inner, self.feed.window());

        let (verified_area, strip_area) = bottom.split_h(bottom.width / 3);
        draw_stat(term, verified_area, "Reports Verified", &format_count(self.stats.verified), ORANGE, PANEL);
        self.draw_activity_strip(term, strip_area);

        if self.menu.is_open() {
            render_overlay(term, &self.menu.text(self.lanes.speed()));
        }
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.menu.handle_key(code, &mut self.lanes) {
            return true;
        }
        if code == KeyCode::Char('m') {
            self.menu.toggle();
            return true;
        }
        false
    }

    fn resume(&mut self, now: Instant) {
        self.feed.resume(now);
        self.stats_timer.reset(now);
    }

    fn help(&self) -> String {
        build_help("FEED", "m      Lane speed menu\n1/2/3  0.5x / 1x / 2x (in menu)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::lanes::SpeedMultiplier;
    use std::time::Duration;

    fn config(policy: SpawnPolicy) -> DashboardConfig {
        DashboardConfig {
            seed: Some(8),
            borders: None,
            texture: None,
            policy,
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn stats_stay_in_mock_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let s = FeedStats::generate(&mut rng);
            assert!((200..1200).contains(&s.reports_last_hour));
            assert!(s.total_reports < 100_000);
            assert!((1000..6000).contains(&s.verified));
            assert!(s.activity.iter().all(|o| (0.1..0.6).contains(o)));
        }
    }

    #[test]
    fn observations_feed_the_lanes() {
        let start = Instant::now();
        let mut page = Feed::new(&config(SpawnPolicy::Classification), start);
        let mut term = Terminal::headless(140, 40);
        page.draw(&mut term);
        page.update(start + Duration::from_millis(1000));
        assert_eq!(page.feed.window().len(), 1);
        assert_eq!(page.lanes.segment_count(), 1);
    }

    #[test]
    fn speed_menu_keys() {
        let start = Instant::now();
        let mut page = Feed::new(&config(SpawnPolicy::Classification), start);
        assert!(!page.handle_key(KeyCode::Char('3')));
        assert!(page.handle_key(KeyCode::Char('m')));
        assert!(page.handle_key(KeyCode::Char('1')));
        assert_eq!(page.lanes.speed(), SpeedMultiplier::Half);
        assert!(!page.handle_key(KeyCode::Char('q')));

        // Global keys reach the render loop while the menu is open
        assert!(page.handle_key(KeyCode::Char('m')));
        assert!(page.menu.is_open());
        assert!(!page.handle_key(KeyCode::Char('q')));
        assert!(!page.handle_key(KeyCode::Tab));
    }

    #[test]
    fn random_policy_animates_without_data() {
        let start = Instant::now();
        let mut page = Feed::new(&config(SpawnPolicy::RANDOM), start);
        let mut term = Terminal::headless(140, 40);
        page.draw(&mut term);
        for frame in 1..30u64 {
            page.update(start + Duration::from_millis(frame * 10));
        }
        assert!(page.feed.window().is_empty());
        assert!(page.lanes.segment_count() > 0);
    }
}
