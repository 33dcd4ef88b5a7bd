//! CLI arguments and subcommands for bp-tracker.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "bp-tracker",
    about = "Track blood pressure readings",
    version,
    after_help = "Examples:\n  \
                  bp-tracker 120 80 72          # Log reading via command line\n  \
                  bp-tracker                    # Interactive mode\n  \
                  bp-tracker list -n 10         # Show the last ten readings\n  \
                  bp-tracker export > bp.json   # Chart data for plotting\n  \
                  bp-tracker config --show      # Show configuration"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Systolic pressure (mmHg)
    pub systolic: Option<i32>,

    /// Diastolic pressure (mmHg)
    pub diastolic: Option<i32>,

    /// Heart rate (beats per minute)
    pub bpm: Option<i32>,

    /// Path to config file (default: ~/.config/bp-tracker/config.yaml)
    #[arg(long, global = true, env = "BP_TRACKER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG when set
    #[arg(long, global = true, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// Subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Manage blood pressure tracker configuration
    Config(ConfigArgs),

    /// List recorded readings, oldest first
    List {
        /// Only show the most recent N readings
        #[arg(short = 'n', long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Print readings and severity bands as JSON for charting
    Export,
}

/// Arguments of the `config` subcommand
#[derive(ClapArgs, Debug, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long, conflicts_with = "csv_path")]
    pub show: bool,

    /// Set CSV file path
    #[arg(long, value_name = "PATH")]
    pub csv_path: Option<PathBuf>,
}

/// What the top-level positional values ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingMode {
    /// All three values were given
    Direct { systolic: i32, diastolic: i32, bpm: i32 },
    /// No values were given
    Interactive,
    /// Some but not all values were given
    Incomplete,
}

impl Args {
    /// Decide between direct entry and interactive prompting
    pub fn reading_mode(&self) -> ReadingMode {
        match (self.systolic, self.diastolic, self.bpm) {
            (Some(systolic), Some(diastolic), Some(bpm)) => ReadingMode::Direct {
                systolic,
                diastolic,
                bpm,
            },
            (None, None, None) => ReadingMode::Interactive,
            _ => ReadingMode::Incomplete,
        }
    }
}
