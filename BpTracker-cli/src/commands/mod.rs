// Command handlers
// Each handler writes to a caller-supplied writer so it can be tested
// against in-memory buffers.

pub mod config;
pub mod history;
pub mod record;

use std::io;

use tracing::debug;

use bp_tracker_data::{AppConfig, CsvStore, SettingsStore};

use crate::cli::{Args, Commands, ReadingMode};
use crate::error::CliError;

pub use config::run_config;
pub use history::{export_chart, list_readings};
pub use record::{record_direct, record_interactive, save_reading};

/// Dispatch parsed arguments against the real terminal
pub fn run(args: Args) -> Result<(), CliError> {
    let mode = args.reading_mode();
    let settings = SettingsStore::with_defaults(args.config)?;
    debug!("Using config file {}", settings.config_path().display());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Some(Commands::Config(config_args)) => run_config(&settings, &config_args, &mut out),
        Some(Commands::List { limit }) => {
            let (_, store) = open_store(&settings)?;
            list_readings(&store, limit, &mut out)
        }
        Some(Commands::Export) => {
            let (_, store) = open_store(&settings)?;
            export_chart(&store, &mut out)
        }
        None => match mode {
            ReadingMode::Direct {
                systolic,
                diastolic,
                bpm,
            } => {
                let (config, store) = open_store(&settings)?;
                record_direct(&store, &config.csv_path, systolic, diastolic, bpm, &mut out)
            }
            ReadingMode::Interactive => {
                let (config, store) = open_store(&settings)?;
                let stdin = io::stdin();
                record_interactive(&store, &config.csv_path, &mut stdin.lock(), &mut out)
            }
            ReadingMode::Incomplete => Err(CliError::IncompleteReading),
        },
    }
}

fn open_store(settings: &SettingsStore) -> Result<(AppConfig, CsvStore), CliError> {
    let config = AppConfig::resolve(settings)?;
    let store = CsvStore::new(&config.csv_path);
    Ok((config, store))
}
