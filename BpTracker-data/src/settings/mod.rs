//! Settings module for the BP Tracker application
//!
//! Settings live in a small YAML file. The only setting today is the path of
//! the reading file; everything is resolved once at startup into an
//! [`AppConfig`] that is passed to the layers that need it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Directory name used under the platform config and data directories
pub const APP_DIR_NAME: &str = "bp-tracker";

/// File name of the settings file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// File name of the default reading file
pub const CSV_FILE_NAME: &str = "blood_pressure.csv";

/// Configuration error
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file exists but could not be read
    #[error("Failed to load config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The settings file is not valid YAML for [`Settings`]
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The settings file could not be written
    #[error("Failed to save config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Settings could not be turned into YAML
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[source] serde_yaml::Error),

    /// No platform directory to derive a default location from
    #[error("Could not determine the {0} directory for default paths")]
    NoPlatformDir(&'static str),
}

/// Contents of the settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Path of the reading file; `~` is expanded when resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csv_file_path: Option<PathBuf>,
}

/// Default settings file location, `~/.config/bp-tracker/config.yaml` on Linux
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::NoPlatformDir("config"))
}

/// Default reading file location, `~/.local/share/bp-tracker/blood_pressure.csv` on Linux
pub fn default_csv_path() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join(CSV_FILE_NAME))
        .ok_or(ConfigError::NoPlatformDir("data"))
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Loads and saves [`Settings`] at a fixed location
#[derive(Debug, Clone)]
pub struct SettingsStore {
    config_path: PathBuf,
    default_csv_path: PathBuf,
}

impl SettingsStore {
    /// Create a settings store with explicit locations
    pub fn new(config_path: impl Into<PathBuf>, default_csv_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            default_csv_path: default_csv_path.into(),
        }
    }

    /// Create a settings store using the platform defaults for anything not
    /// given explicitly
    pub fn with_defaults(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_path = match config_path {
            Some(path) => expand_home(&path),
            None => default_config_path()?,
        };
        Ok(Self::new(config_path, default_csv_path()?))
    }

    /// Location of the settings file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Settings written by [`SettingsStore::initialize_default`]
    pub fn default_settings(&self) -> Settings {
        Settings {
            csv_file_path: Some(self.default_csv_path.clone()),
        }
    }

    /// Load settings, falling back to the defaults when no file exists
    pub fn load(&self) -> Result<Settings, ConfigError> {
        if !self.config_path.exists() {
            debug!("No config file at {}, using defaults", self.config_path.display());
            return Ok(self.default_settings());
        }

        let contents = fs::read_to_string(&self.config_path).map_err(|source| ConfigError::Read {
            path: self.config_path.clone(),
            source,
        })?;

        if contents.trim().is_empty() {
            return Ok(Settings::default());
        }

        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: self.config_path.clone(),
            source,
        })
    }

    /// Save settings, creating the config directory if needed
    pub fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        let write_error = |source: io::Error| ConfigError::Write {
            path: self.config_path.clone(),
            source,
        };

        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let yaml = serde_yaml::to_string(settings).map_err(ConfigError::Serialize)?;
        fs::write(&self.config_path, yaml).map_err(write_error)?;

        debug!("Saved configuration to {}", self.config_path.display());
        Ok(())
    }

    /// Path of the reading file from settings, or the default location
    pub fn csv_path(&self) -> Result<PathBuf, ConfigError> {
        let settings = self.load()?;
        Ok(settings
            .csv_file_path
            .map(|path| expand_home(&path))
            .unwrap_or_else(|| self.default_csv_path.clone()))
    }

    /// Persist a new reading file location
    pub fn set_csv_path(&self, csv_path: &Path) -> Result<(), ConfigError> {
        let mut settings = self.load()?;
        settings.csv_file_path = Some(csv_path.to_path_buf());
        self.save(&settings)?;

        info!("CSV path set to {}", csv_path.display());
        Ok(())
    }

    /// Write the default settings unless a settings file already exists.
    /// Returns whether a file was created.
    pub fn initialize_default(&self) -> Result<bool, ConfigError> {
        if self.config_path.exists() {
            return Ok(false);
        }

        self.save(&self.default_settings())?;
        info!("Initialized configuration at {}", self.config_path.display());
        Ok(true)
    }
}

/// Locations resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Settings file in use
    pub config_path: PathBuf,
    /// Reading file in use
    pub csv_path: PathBuf,
}

impl AppConfig {
    /// Resolve the reading file location through the settings store
    pub fn resolve(settings: &SettingsStore) -> Result<Self, ConfigError> {
        let csv_path = settings.csv_path()?;
        debug!("Using reading file {}", csv_path.display());

        Ok(Self {
            config_path: settings.config_path().to_path_buf(),
            csv_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp_dir: &TempDir) -> SettingsStore {
        SettingsStore::new(
            temp_dir.path().join("config").join(CONFIG_FILE_NAME),
            temp_dir.path().join("data").join(CSV_FILE_NAME),
        )
    }

    #[test]
    fn test_load_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        let settings = store.load().unwrap();
        assert_eq!(settings, store.default_settings());
        assert_eq!(store.csv_path().unwrap(), temp_dir.path().join("data").join(CSV_FILE_NAME));
    }

    #[test]
    fn test_set_csv_path_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let custom = temp_dir.path().join("elsewhere.csv");

        store.set_csv_path(&custom).unwrap();

        assert!(store.config_path().exists());
        assert_eq!(store.csv_path().unwrap(), custom);
    }

    #[test]
    fn test_empty_file_falls_back_to_default_path() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.config_path().parent().unwrap()).unwrap();
        fs::write(store.config_path(), "\n").unwrap();

        assert_eq!(store.load().unwrap(), Settings::default());
        assert_eq!(store.csv_path().unwrap(), temp_dir.path().join("data").join(CSV_FILE_NAME));
    }

    #[test]
    fn test_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        fs::create_dir_all(store.config_path().parent().unwrap()).unwrap();
        fs::write(store.config_path(), "csv_file_path: [unclosed").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("Failed to parse config file"));
    }

    #[test]
    fn test_initialize_default_only_once() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        assert!(store.initialize_default().unwrap());
        let written = fs::read_to_string(store.config_path()).unwrap();
        assert!(written.contains("csv_file_path"));

        store.set_csv_path(Path::new("/tmp/custom.csv")).unwrap();
        assert!(!store.initialize_default().unwrap());
        assert_eq!(store.csv_path().unwrap(), PathBuf::from("/tmp/custom.csv"));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home(Path::new("/var/data.csv")), PathBuf::from("/var/data.csv"));
        assert_eq!(expand_home(Path::new("data.csv")), PathBuf::from("data.csv"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/bp/data.csv")), home.join("bp").join("data.csv"));
        }
    }

    #[test]
    fn test_app_config_resolve() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let custom = temp_dir.path().join("custom.csv");
        store.set_csv_path(&custom).unwrap();

        let config = AppConfig::resolve(&store).unwrap();
        assert_eq!(config.csv_path, custom);
        assert_eq!(config.config_path, store.config_path());
    }
}
