use clap::Parser;
use dotenv::dotenv;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bp_tracker_cli::{run, Args};

/// The main entry point for the bp-tracker command
///
/// This function:
/// 1. Loads environment variables from a .env file, if any
/// 2. Parses the command line
/// 3. Sets up tracing on stderr so stdout stays clean for command output
/// 4. Runs the command and maps failures to an exit code
fn main() {
    dotenv().ok();

    let args = Args::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level.as_directive()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    debug!("Starting bp-tracker {}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = run(args) {
        eprintln!("{}", err);
        std::process::exit(err.exit_code());
    }
}
