//! Dashboard pages and the render loop that drives them

pub mod feed;
pub mod layout;
pub mod overview;

use crate::config::{DashboardConfig, PageKind};
use crate::help::render_overlay;
use crate::observation::{ObservationGenerator, RollingWindow};
use crate::terminal::Terminal;
use crate::timer::Interval;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::terminal::size;
use std::io;
use std::time::{Duration, Instant};

/// Global help section appended to every page's help text
pub const GLOBAL_HELP: &str = "\
───────────────────────
 GLOBAL CONTROLS
 Tab     Switch page
 Space   Pause/resume
 q/Esc   Quit
 ?       Close help
───────────────────────";

/// Build page help text from a title and optional extra lines
pub fn build_help(title: &str, extra: &str) -> String {
    if extra.is_empty() {
        format!("{title}\n─────────────────\n{GLOBAL_HELP}")
    } else {
        format!("{title}\n─────────────────\n{extra}\n{GLOBAL_HELP}")
    }
}

/// A mounted dashboard layout. Dropping it releases its timers.
pub trait Page {
    /// Advance timers and animation state to `now`
    fn update(&mut self, now: Instant);

    /// Draw the whole page into the buffer
    fn draw(&mut self, term: &mut Terminal);

    /// Page-specific keys; returns true if the key was consumed
    fn handle_key(&mut self, _code: KeyCode) -> bool {
        false
    }

    /// Restart timers after a pause so no burst of ticks follows
    fn resume(&mut self, now: Instant);

    fn help(&self) -> String;
}

/// Generator, rolling window and the timer that connects them
pub struct ObservationFeed {
    generator: ObservationGenerator,
    window: RollingWindow,
    timer: Interval,
}

impl ObservationFeed {
    pub fn new(generator: ObservationGenerator, period: Duration, now: Instant) -> Self {
        Self {
            generator,
            window: RollingWindow::new(),
            timer: Interval::new(period, now),
        }
    }

    /// Generate one observation per elapsed period; returns how many
    pub fn update(&mut self, now: Instant) -> u32 {
        let ticks = self.timer.poll(now);
        for _ in 0..ticks {
            self.window.push(self.generator.generate());
        }
        if let Some(obs) = self.window.latest().filter(|_| ticks > 0) {
            log::debug!("observation {} {} {}", obs.id, obs.classification, obs.country);
        }
        ticks
    }

    pub fn resume(&mut self, now: Instant) {
        self.timer.reset(now);
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }
}

pub fn mount(kind: PageKind, config: &DashboardConfig, now: Instant) -> Box<dyn Page> {
    log::info!("mounting {kind:?} page");
    match kind {
        PageKind::Overview => Box::new(overview::Overview::new(config, now)),
        PageKind::Feed => Box::new(feed::Feed::new(config, now)),
    }
}

/// Run the dashboard until the user quits.
///
/// Each pass is one frame: input, update, draw, present.
pub fn run(config: DashboardConfig) -> io::Result<()> {
    let mut term = Terminal::new(true)?;
    let mut kind = config.page;
    let mut page = mount(kind, &config, Instant::now());
    let mut paused = false;
    let mut show_help = false;

    loop {
        if let Some((code, mods)) = term.check_key()? {
            if !page.handle_key(code) {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c') if mods.contains(KeyModifiers::CONTROL) => break,
                    KeyCode::Char('?') => show_help = !show_help,
                    KeyCode::Char(' ') => {
                        paused = !paused;
                        if !paused {
                            page.resume(Instant::now());
                        }
                    }
                    KeyCode::Tab => {
                        kind = kind.other();
                        // Old page and its timers go away before the new one starts
                        drop(page);
                        page = mount(kind, &config, Instant::now());
                        term.clear_screen()?;
                    }
                    _ => {}
                }
            }
        }

        if let Ok((new_w, new_h)) = size() {
            if (new_w, new_h) != term.size() {
                term.resize(new_w, new_h);
                term.clear_screen()?;
            }
        }

        if !paused {
            page.update(Instant::now());
        }

        term.clear();
        page.draw(&mut term);
        if show_help {
            render_overlay(&mut term, &page.help());
        }
        term.present()?;
        term.sleep(config.time_step);
    }

    log::info!("dashboard closed");
    Ok(())
}
