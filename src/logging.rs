//! Logging through `tracing`.
//!
//! The terminal belongs to the UI, so log output only ever goes to a file.
//! Without a file nothing is installed and the `tracing` macros are no-ops.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            file: None,
        }
    }
}

impl LogConfig {
    /// Map repeated `-v` flags: 0 = warn, 1 = info, 2 = debug, 3+ = trace
    pub fn from_verbosity(verbosity: u8, file: Option<PathBuf>) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self { level, file }
    }
}

/// Install the global subscriber. Returns `Ok(false)` when there is no log
/// file to write to.
pub fn init_logging(config: &LogConfig) -> io::Result<bool> {
    let Some(path) = config.file.as_ref() else {
        return Ok(false);
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(LevelFilter::from_level(config.level))
        .with(layer)
        .try_init()
        .map_err(io::Error::other)?;
    Ok(true)
}
