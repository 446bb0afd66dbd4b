use clap::{Parser, ValueEnum};
use log::LevelFilter;

use doku::config::RenderConfig;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser, Debug)]
#[command(name = "doku")]
#[command(about = "Real-time ray marcher for a power-8 spherical fractal")]
pub struct Args {
    /// Optional TOML file with renderer settings
    #[arg(short, long, help = "TOML file with renderer settings")]
    pub config: Option<String>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Output surface width in pixels
    #[arg(long, default_value = "800", allow_negative_numbers = true, help = "Output surface width in pixels")]
    pub width: i32,

    /// Output surface height in pixels
    #[arg(long, default_value = "600", allow_negative_numbers = true, help = "Output surface height in pixels")]
    pub height: i32,

    /// Number of frames to animate
    #[arg(long, short = 'n', default_value = "60", help = "Number of frames to animate")]
    pub frames: u32,

    /// Side of the square render target (overrides the config file)
    #[arg(long, help = "Side of the square render target in pixels")]
    pub target_size: Option<u32>,

    /// Worker threads for the pixel loop (overrides the config file)
    #[arg(long, short = 'j', help = "Worker threads for the pixel loop, 0 for one per core")]
    pub threads: Option<usize>,

    /// Send frames to TEV for real-time visualization
    #[arg(long, help = "Send every frame to TEV for real-time visualization")]
    pub tev: bool,

    /// TEV client IP address and port (automatically enables --tev)
    #[arg(long, help = "TEV client IP address and port (automatically enables --tev)")]
    pub tev_address: Option<String>,

    /// Output file for the last frame (.png surface or .exr linear target)
    #[arg(short, long, help = "Output file for the last frame (.png for the surface, .exr for the linear render target)")]
    pub output: Option<String>,
}

impl Args {
    /// Apply command line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut RenderConfig) {
        if let Some(size) = self.target_size {
            config.target_size = size;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
    }
}
