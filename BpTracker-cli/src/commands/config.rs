//! The `config` subcommand.

use std::io::Write;
use std::path::{self, Path};

use bp_tracker_data::settings::expand_home;
use bp_tracker_data::{AppConfig, SettingsStore};

use crate::cli::ConfigArgs;
use crate::error::CliError;

/// Show, change or initialize the configuration
pub fn run_config<W: Write>(settings: &SettingsStore, args: &ConfigArgs, out: &mut W) -> Result<(), CliError> {
    if args.show {
        show_config(settings, out)
    } else if let Some(csv_path) = &args.csv_path {
        set_csv_path(settings, csv_path, out)
    } else {
        initialize_config(settings, out)
    }
}

fn show_config<W: Write>(settings: &SettingsStore, out: &mut W) -> Result<(), CliError> {
    let config = AppConfig::resolve(settings)?;

    writeln!(out, "Configuration:")?;
    writeln!(out, "  Config file: {}", config.config_path.display())?;
    writeln!(out, "  CSV file: {}", config.csv_path.display())?;
    writeln!(out, "  CSV exists: {}", config.csv_path.exists())?;
    Ok(())
}

fn set_csv_path<W: Write>(settings: &SettingsStore, csv_path: &Path, out: &mut W) -> Result<(), CliError> {
    let new_path = path::absolute(expand_home(csv_path))?;
    settings.set_csv_path(&new_path)?;

    writeln!(out, "CSV path updated to: {}", new_path.display())?;
    Ok(())
}

fn initialize_config<W: Write>(settings: &SettingsStore, out: &mut W) -> Result<(), CliError> {
    let config_path = settings.config_path().display();

    if settings.initialize_default()? {
        writeln!(out, "Configuration initialized at: {}", config_path)?;
    } else {
        writeln!(out, "Configuration already exists at: {}", config_path)?;
    }
    Ok(())
}
