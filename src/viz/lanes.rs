//! Activity lanes: decaying colored bars, one column per lane

use crate::colors::{classification_color, interpolate_from_white, Rgb, BRIGHT_PALETTE, CANVAS_BG};
use crate::dashboard::layout::Rect;
use crate::observation::{Classification, RollingWindow};
use crate::terminal::Terminal;
use crossterm::event::KeyCode;
use rand::prelude::*;

/// Segments at or below this intensity are dropped
pub const INTENSITY_FLOOR: f32 = 0.1;

/// Virtual canvas pixels per terminal row
pub const ROW_PX: f32 = 10.0;

/// Fraction of a lane's width covered by its segments
const SEGMENT_WIDTH: f32 = 0.4;

// Segment height in canvas pixels: 1 to 4 rows
const HEIGHT_MIN: f32 = ROW_PX;
const HEIGHT_MAX: f32 = 4.0 * ROW_PX;
const INTENSITY_MIN: f32 = 0.5;
const FADE_MIN: f32 = 0.02;
const FADE_MAX: f32 = 0.05;

/// Glow strength relative to the segment color
const GLOW: f32 = 0.45;

/// How segments come into existence
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnPolicy {
    /// One lane per classification; each arriving observation spawns one segment
    Classification,
    /// Data-independent: every frame each lane spawns with `chance`
    Random {
        lanes: usize,
        chance: f64,
        max_segments: usize,
    },
}

impl SpawnPolicy {
    pub const RANDOM: SpawnPolicy = SpawnPolicy::Random {
        lanes: 8,
        chance: 0.2,
        max_segments: 200,
    };

    pub fn lane_count(&self) -> usize {
        match self {
            SpawnPolicy::Classification => Classification::ALL.len(),
            SpawnPolicy::Random { lanes, .. } => *lanes,
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "classification" | "data" => Some(SpawnPolicy::Classification),
            "random" => Some(SpawnPolicy::RANDOM),
            _ => None,
        }
    }

    fn lane_color(&self, lane: usize) -> Rgb {
        match self {
            SpawnPolicy::Classification => Classification::ALL
                .get(lane)
                .map(|c| classification_color(*c))
                .unwrap_or(BRIGHT_PALETTE[0]),
            SpawnPolicy::Random { .. } => BRIGHT_PALETTE[lane % BRIGHT_PALETTE.len()],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SpeedMultiplier {
    Half,
    #[default]
    Normal,
    Double,
}

impl SpeedMultiplier {
    pub const ALL: [SpeedMultiplier; 3] = [SpeedMultiplier::Half, SpeedMultiplier::Normal, SpeedMultiplier::Double];

    pub fn factor(self) -> f32 {
        match self {
            SpeedMultiplier::Half => 0.5,
            SpeedMultiplier::Normal => 1.0,
            SpeedMultiplier::Double => 2.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpeedMultiplier::Half => "0.5x",
            SpeedMultiplier::Normal => "1x",
            SpeedMultiplier::Double => "2x",
        }
    }

    pub fn from_factor(factor: f32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| (s.factor() - factor).abs() < f32::EPSILON)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Top edge in canvas pixels
    pub y: f32,
    pub height: f32,
    pub intensity: f32,
    pub base: Rgb,
    pub fade_speed: f32,
}

impl Segment {
    /// One frame of movement and decay
    fn advance(&mut self, speed: f32, canvas_height: f32) {
        self.y = if canvas_height > 0.0 {
            (self.y + speed).rem_euclid(canvas_height)
        } else {
            0.0
        };
        self.intensity -= self.fade_speed * speed;
    }

    pub fn color(&self) -> Rgb {
        interpolate_from_white(self.base, self.intensity)
    }
}

pub struct LaneAnimator {
    policy: SpawnPolicy,
    speed: SpeedMultiplier,
    lanes: Vec<Vec<Segment>>,
    canvas_height: f32,
    rng: StdRng,
    seen: u64,
}

impl LaneAnimator {
    pub fn new(policy: SpawnPolicy, speed: SpeedMultiplier, rng: StdRng) -> Self {
        Self {
            policy,
            speed,
            lanes: vec![Vec::new(); policy.lane_count()],
            canvas_height: 0.0,
            rng,
            seen: 0,
        }
    }

    pub fn policy(&self) -> SpawnPolicy {
        self.policy
    }

    pub fn speed(&self) -> SpeedMultiplier {
        self.speed
    }

    pub fn set_speed(&mut self, speed: SpeedMultiplier) {
        self.speed = speed;
    }

    #[cfg(test)]
    pub fn lanes(&self) -> &[Vec<Segment>] {
        &self.lanes
    }

    pub fn segment_count(&self) -> usize {
        self.lanes.iter().map(Vec::len).sum()
    }

    /// Match the canvas to a drawing area of `rows` terminal rows
    pub fn resize(&mut self, rows: u16) {
        let height = rows as f32 * ROW_PX;
        if (height - self.canvas_height).abs() > f32::EPSILON {
            self.canvas_height = height;
            for seg in self.lanes.iter_mut().flatten() {
                seg.y = if height > 0.0 { seg.y.rem_euclid(height) } else { 0.0 };
            }
        }
    }

    /// Spawn segments for observations that arrived since the last call.
    ///
    /// Only the classification policy reacts to data.
    pub fn observe(&mut self, window: &RollingWindow) {
        if self.policy == SpawnPolicy::Classification {
            let arrived: Vec<Classification> = window
                .arrived_since(self.seen)
                .map(|o| o.classification)
                .collect();
            for class in arrived {
                let base = classification_color(class);
                self.spawn(class.index(), base);
            }
        }
        self.seen = window.total_pushed();
    }

    /// One animation frame: random spawns, then move, fade and expire
    pub fn frame(&mut self) {
        if let SpawnPolicy::Random { chance, max_segments, .. } = self.policy {
            for lane in 0..self.lanes.len() {
                if self.segment_count() >= max_segments {
                    break;
                }
                if self.rng.gen_bool(chance.clamp(0.0, 1.0)) {
                    let base = self.policy.lane_color(lane);
                    self.spawn(lane, base);
                }
            }
        }

        let speed = self.speed.factor();
        let height = self.canvas_height;
        for lane in &mut self.lanes {
            for seg in lane.iter_mut() {
                seg.advance(speed, height);
            }
            lane.retain(|s| s.intensity > INTENSITY_FLOOR);
        }
    }

    fn spawn(&mut self, lane: usize, base: Rgb) {
        let y = if self.canvas_height > 0.0 {
            self.rng.gen_range(0.0..self.canvas_height)
        } else {
            0.0
        };
        let segment = Segment {
            y,
            height: self.rng.gen_range(HEIGHT_MIN..HEIGHT_MAX),
            intensity: self.rng.gen_range(INTENSITY_MIN..1.0),
            base,
            fade_speed: self.rng.gen_range(FADE_MIN..FADE_MAX),
        };
        self.push_segment(lane, segment);
    }

    pub fn push_segment(&mut self, lane: usize, segment: Segment) {
        if let Some(l) = self.lanes.get_mut(lane) {
            l.push(segment);
        }
    }

    /// Paint the canvas background and every live segment.
    ///
    /// An empty area means there is nothing to draw on.
    pub fn render(&self, term: &mut Terminal, area: Rect) {
        if area.is_empty() {
            return;
        }
        term.fill_bg(area.x, area.y, area.width, area.height, CANVAS_BG.into());

        let columns = area.columns(self.lanes.len() as u16);
        for (lane, col) in self.lanes.iter().zip(columns) {
            if col.is_empty() {
                continue;
            }
            let seg_w = ((col.width as f32 * SEGMENT_WIDTH).round() as u16).clamp(1, col.width);
            let x0 = col.x + ((col.width - seg_w) / 2) as i32;

            for seg in lane {
                let color = seg.color();
                let glow = color.dim(GLOW * seg.intensity);
                let top = (seg.y / ROW_PX).floor() as i32;
                let bottom = ((seg.y + seg.height) / ROW_PX).ceil() as i32;

                for row in top..bottom.max(top + 1) {
                    if row >= area.height as i32 {
                        break;
                    }
                    let y = area.y + row;
                    for dx in 0..seg_w as i32 {
                        term.set(x0 + dx, y, '█', Some(color.into()), false);
                    }
                    if x0 > col.x {
                        term.set(x0 - 1, y, '░', Some(glow.into()), false);
                    }
                    let right = x0 + seg_w as i32;
                    if right < col.right() {
                        term.set(right, y, '░', Some(glow.into()), false);
                    }
                }
            }
        }
    }
}

/// Popup for picking the lane speed
#[derive(Default)]
pub struct SpeedMenu {
    open: bool,
}

impl SpeedMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Handle a key while the menu is open; returns true if consumed.
    ///
    /// Only speed keys, `m` and `Esc` are consumed.
    pub fn handle_key(&mut self, code: KeyCode, animator: &mut LaneAnimator) -> bool {
        if !self.open {
            return false;
        }
        let speed = match code {
            KeyCode::Char('1') => SpeedMultiplier::Half,
            KeyCode::Char('2') => SpeedMultiplier::Normal,
            KeyCode::Char('3') => SpeedMultiplier::Double,
            KeyCode::Esc | KeyCode::Char('m') => {
                self.open = false;
                return true;
            }
            // Everything else stays with the global controls
            _ => return false,
        };
        animator.set_speed(speed);
        self.open = false;
        log::debug!("lane speed set to {}", speed.label());
        true
    }

    pub fn text(&self, current: SpeedMultiplier) -> String {
        let mut out = String::from("LANE SPEED\n──────────");
        for (i, speed) in SpeedMultiplier::ALL.iter().enumerate() {
            let mark = if *speed == current { '>' } else { ' ' };
            out.push_str(&format!("\n{mark} {}  {}", i + 1, speed.label()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::ObservationGenerator;

    fn animator(policy: SpawnPolicy) -> LaneAnimator {
        let mut a = LaneAnimator::new(policy, SpeedMultiplier::Normal, StdRng::seed_from_u64(1));
        a.resize(30);
        a
    }

    fn segment(y: f32, intensity: f32, fade_speed: f32) -> Segment {
        Segment {
            y,
            height: 10.0,
            intensity,
            base: Rgb::new(255, 184, 0),
            fade_speed,
        }
    }

    #[test]
    fn lane_counts_per_policy() {
        assert_eq!(animator(SpawnPolicy::Classification).lanes().len(), 4);
        assert_eq!(animator(SpawnPolicy::RANDOM).lanes().len(), 8);
    }

    #[test]
    fn each_observation_spawns_once_in_its_lane() {
        let mut a = animator(SpawnPolicy::Classification);
        let mut gen = ObservationGenerator::seeded(Some(4));
        let mut window = RollingWindow::new();
        for _ in 0..10 {
            window.push(gen.generate());
        }
        a.observe(&window);
        assert_eq!(a.segment_count(), 10);
        for class in Classification::ALL {
            let lane = &a.lanes()[class.index()];
            assert_eq!(lane.len(), window.count(class));
            assert!(lane.iter().all(|s| s.base == classification_color(class)));
        }

        // Nothing new arrived, nothing spawned
        a.observe(&window);
        assert_eq!(a.segment_count(), 10);
    }

    #[test]
    fn classification_policy_never_spawns_without_data() {
        let mut a = animator(SpawnPolicy::Classification);
        for _ in 0..100 {
            a.frame();
        }
        assert_eq!(a.segment_count(), 0);
    }

    #[test]
    fn random_policy_respects_cap() {
        let mut a = animator(SpawnPolicy::Random {
            lanes: 8,
            chance: 1.0,
            max_segments: 5,
        });
        a.frame();
        assert!(a.segment_count() <= 5);
    }

    #[test]
    fn random_policy_ignores_observations() {
        let mut a = animator(SpawnPolicy::Random {
            lanes: 8,
            chance: 0.0,
            max_segments: 200,
        });
        let mut gen = ObservationGenerator::seeded(Some(4));
        let mut window = RollingWindow::new();
        window.push(gen.generate());
        a.observe(&window);
        a.frame();
        assert_eq!(a.segment_count(), 0);
    }

    #[test]
    fn intensity_never_increases_and_floor_expires() {
        let mut a = animator(SpawnPolicy::Classification);
        a.push_segment(0, segment(0.0, 0.5, 0.03));
        let mut last = 0.5;
        let mut frames = 0;
        while a.segment_count() > 0 {
            a.frame();
            frames += 1;
            for s in a.lanes().iter().flatten() {
                assert!(s.intensity <= last);
                assert!(s.intensity > INTENSITY_FLOOR);
                last = s.intensity;
            }
            assert!(frames < 100);
        }
        // (0.5 - 0.1) / 0.03 = 13.3 frames
        assert_eq!(frames, 14);
    }

    #[test]
    fn segment_at_floor_is_removed_next_frame() {
        let mut a = animator(SpawnPolicy::Classification);
        a.push_segment(1, segment(0.0, 0.105, 0.01));
        a.frame();
        assert_eq!(a.segment_count(), 0);
    }

    #[test]
    fn double_speed_is_exactly_twice_normal() {
        let mut normal = animator(SpawnPolicy::Classification);
        let mut double = animator(SpawnPolicy::Classification);
        double.set_speed(SpeedMultiplier::Double);
        normal.push_segment(0, segment(10.0, 1.0, 0.02));
        double.push_segment(0, segment(10.0, 1.0, 0.02));

        normal.frame();
        double.frame();
        let n = normal.lanes()[0][0];
        let d = double.lanes()[0][0];
        assert!(((d.y - 10.0) - 2.0 * (n.y - 10.0)).abs() < 1e-5);
        assert!(((1.0 - d.intensity) - 2.0 * (1.0 - n.intensity)).abs() < 1e-5);
    }

    #[test]
    fn position_wraps_at_canvas_height() {
        let mut a = animator(SpawnPolicy::Classification);
        a.push_segment(0, segment(299.5, 1.0, 0.0));
        a.frame();
        assert!((a.lanes()[0][0].y - 0.5).abs() < 1e-4);
    }

    #[test]
    fn render_paints_background_and_segment() {
        let mut a = animator(SpawnPolicy::Classification);
        a.resize(10);
        a.push_segment(2, segment(0.0, 1.0, 0.0));
        let mut term = Terminal::headless(40, 10);
        a.render(&mut term, Rect::new(0, 0, 40, 10));

        let bg: crossterm::style::Color = CANVAS_BG.into();
        assert_eq!(term.cell(0, 9).unwrap().bg, Some(bg));

        // lane 2 spans x 20..30, segment is 4 wide starting at 23
        let cell = term.cell(24, 0).unwrap();
        assert_eq!(cell.ch, '█');
        assert_eq!(cell.fg, Some(crossterm::style::Color::Rgb { r: 255, g: 184, b: 0 }));
        assert_eq!(term.cell(22, 0).unwrap().ch, '░');
    }

    #[test]
    fn render_without_canvas_is_noop() {
        let mut a = animator(SpawnPolicy::Classification);
        a.push_segment(0, segment(0.0, 1.0, 0.0));
        let mut term = Terminal::headless(10, 4);
        a.render(&mut term, Rect::new(0, 0, 0, 0));
        assert_eq!(term.cell(0, 0).unwrap().bg, None);
    }

    #[test]
    fn speed_menu_selects_and_closes() {
        let mut a = animator(SpawnPolicy::Classification);
        let mut menu = SpeedMenu::default();
        assert!(!menu.handle_key(KeyCode::Char('3'), &mut a));
        menu.toggle();
        assert!(menu.text(a.speed()).contains("> 2  1x"));
        assert!(menu.handle_key(KeyCode::Char('3'), &mut a));
        assert_eq!(a.speed(), SpeedMultiplier::Double);
        assert!(!menu.is_open());
    }

    #[test]
    fn open_menu_passes_global_keys_through() {
        let mut a = animator(SpawnPolicy::Classification);
        let mut menu = SpeedMenu::default();
        menu.toggle();
        for code in [KeyCode::Char('q'), KeyCode::Tab, KeyCode::Char(' '), KeyCode::Char('?')] {
            assert!(!menu.handle_key(code, &mut a));
            assert!(menu.is_open());
        }
        assert!(menu.handle_key(KeyCode::Esc, &mut a));
        assert!(!menu.is_open());
        assert_eq!(a.speed(), SpeedMultiplier::Normal);
    }

    #[test]
    fn spawned_segments_span_one_to_four_rows() {
        let mut a = animator(SpawnPolicy::Random {
            lanes: 8,
            chance: 1.0,
            max_segments: 200,
        });
        a.frame();
        assert!(a.segment_count() > 0);
        for s in a.lanes().iter().flatten() {
            assert!(s.height >= ROW_PX && s.height < 4.0 * ROW_PX, "height {}", s.height);
            assert!(s.intensity >= 0.5 - s.fade_speed && s.intensity < 1.0);
        }
    }

    #[test]
    fn speed_parsing() {
        assert_eq!(SpeedMultiplier::from_factor(0.5), Some(SpeedMultiplier::Half));
        assert_eq!(SpeedMultiplier::from_factor(2.0), Some(SpeedMultiplier::Double));
        assert_eq!(SpeedMultiplier::from_factor(3.0), None);
        assert_eq!(SpawnPolicy::parse("Random"), Some(SpawnPolicy::RANDOM));
        assert_eq!(SpawnPolicy::parse("bogus"), None);
    }
}
