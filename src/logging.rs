use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::path::Path;

const DEFAULT_LEVEL: &str = "warn";

/// Where log records go
pub enum LogTarget<'a> {
    /// Non-interactive commands
    Stderr,
    /// Full-screen dashboards, where stderr is the display
    File(&'a Path),
}

/// Install the global logger. `RUST_LOG` wins over `level`.
pub fn init(target: LogTarget<'_>, level: Option<&str>) {
    let env = Env::default().default_filter_or(level.unwrap_or(DEFAULT_LEVEL));
    let mut builder = Builder::from_env(env);

    match target {
        LogTarget::Stderr => {
            builder.target(Target::Stderr);
        }
        LogTarget::File(path) => {
            if let Some(dir) = path.parent() {
                let _ = fs::create_dir_all(dir);
            }
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => {
                    builder.target(Target::Pipe(Box::new(file)));
                }
                // No usable file: stay silent rather than draw over the screen
                Err(_) => {
                    builder.filter_level(log::LevelFilter::Off);
                }
            }
        }
    }

    let _ = builder.try_init();
}
