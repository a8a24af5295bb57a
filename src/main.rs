mod asset;
mod colors;
mod config;
mod dashboard;
mod error;
mod geo;
mod help;
mod logging;
mod observation;
mod settings;
mod terminal;
mod texture;
mod timer;
mod viz;

use clap::{Args, Parser, Subcommand};
use config::{asset_source, frame_time, DashboardConfig, PageKind};
use logging::LogTarget;
use observation::ObservationGenerator;
use settings::Settings;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use viz::lanes::{SpawnPolicy, SpeedMultiplier};
use viz::stream::StreamLine;

#[derive(Parser)]
#[command(name = "termintel")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Terminal intel dashboard: rotating globe, activity lanes and a live data stream", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by both dashboard pages
#[derive(Args)]
struct PageArgs {
    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Frame time in seconds
    #[arg(short, long, default_value = "0.033")]
    frame: f32,

    /// Observation period in milliseconds
    #[arg(long, default_value = "1000")]
    tick_ms: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Globe overview with data stream and classification counts
    Globe {
        #[command(flatten)]
        page: PageArgs,

        /// Country boundary GeoJSON (path or URL); "none" disables borders
        #[arg(short, long)]
        borders: Option<String>,

        /// Equirectangular globe image (path or URL); "none" uses a flat fill
        #[arg(short = 'T', long)]
        texture: Option<String>,

        /// Rotation per frame in radians
        #[arg(short, long)]
        rotation: Option<f64>,
    },

    /// Report feed with activity lanes
    Feed {
        #[command(flatten)]
        page: PageArgs,

        /// Lane spawn policy: classification or random
        #[arg(short, long)]
        policy: Option<String>,

        /// Lane speed multiplier: 0.5, 1 or 2
        #[arg(short = 'S', long)]
        speed: Option<f32>,
    },

    /// Print generated observations to stdout
    Stream {
        /// Number of observations to print
        #[arg(short, long, default_value = "10")]
        count: usize,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print JSON lines instead of stream lines
        #[arg(short, long)]
        json: bool,

        /// Wait one tick between observations
        #[arg(short, long)]
        follow: bool,

        /// Tick in milliseconds when following
        #[arg(long, default_value = "1000")]
        tick_ms: u64,
    },
}

fn page_config(kind: PageKind, args: PageArgs, settings: &Settings) -> DashboardConfig {
    DashboardConfig {
        page: kind,
        time_step: frame_time(args.frame),
        tick: Duration::from_millis(args.tick_ms.max(1)),
        seed: args.seed,
        ..DashboardConfig::default()
    }
    .with_settings(settings)
}

fn run_stream(count: usize, seed: Option<u64>, json: bool, follow: bool, tick: Duration) -> io::Result<()> {
    let mut generator = ObservationGenerator::seeded(seed);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for i in 0..count {
        if follow && i > 0 {
            thread::sleep(tick);
        }
        let obs = generator.generate();
        if json {
            let line = serde_json::to_string(&obs).map_err(io::Error::other)?;
            writeln!(out, "{line}")?;
        } else {
            writeln!(out, "{}", StreamLine::from_observation(&obs).to_plain())?;
        }
        if follow {
            out.flush()?;
        }
    }
    log::debug!("printed {count} observations");
    Ok(())
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let (settings, settings_error) = match Settings::load() {
        Ok(s) => (s, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    let level = settings.log.level.as_deref();
    let log_path = settings.log.file.clone().unwrap_or_else(Settings::default_log_path);

    match &cli.command {
        Commands::Stream { .. } => logging::init(LogTarget::Stderr, level),
        _ => logging::init(LogTarget::File(&log_path), level),
    }
    if let Some(e) = settings_error {
        log::warn!("ignoring malformed {}: {e}", Settings::config_path().display());
    }

    match cli.command {
        Commands::Globe {
            page,
            borders,
            texture,
            rotation,
        } => {
            let mut config = page_config(PageKind::Overview, page, &settings);
            if let Some(src) = borders {
                config.borders = asset_source(src);
            }
            if let Some(src) = texture {
                config.texture = asset_source(src);
            }
            if let Some(step) = rotation {
                config.rotation_step = step;
            }
            dashboard::run(config)
        }

        Commands::Feed { page, policy, speed } => {
            let mut config = page_config(PageKind::Feed, page, &settings);
            if let Some(name) = policy {
                match SpawnPolicy::parse(&name) {
                    Some(p) => config.policy = p,
                    None => log::warn!("unknown lane policy {name:?}, keeping {:?}", config.policy),
                }
            }
            if let Some(factor) = speed {
                match SpeedMultiplier::from_factor(factor) {
                    Some(s) => config.speed = s,
                    None => log::warn!("unsupported lane speed {factor}, keeping {}", config.speed.label()),
                }
            }
            dashboard::run(config)
        }

        Commands::Stream {
            count,
            seed,
            json,
            follow,
            tick_ms,
        } => run_stream(count, seed, json, follow, Duration::from_millis(tick_ms.max(1))),
    }
}
