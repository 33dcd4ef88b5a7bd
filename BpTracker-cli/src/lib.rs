// BP Tracker CLI
// Argument parsing, command handlers and user-facing errors

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::Args;
pub use commands::run;
pub use error::CliError;
