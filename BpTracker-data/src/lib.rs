// BP Tracker Data
// This crate handles persistence of readings and application settings

// Reading store implementations
pub mod repository;

// Data storage models
pub mod models;

// Settings file management
pub mod settings;

// Re-export commonly used types
pub use repository::{CsvStore, ReadingStore, StorageError};
pub use settings::{AppConfig, ConfigError, Settings, SettingsStore};
