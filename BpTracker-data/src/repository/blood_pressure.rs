use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use bp_tracker_domain::{BloodPressureReading, ReadingRecord};

use crate::models::reading_row::SchemaVersion;
use super::errors::StorageError;
use super::storage::CsvFile;

/// Store trait for blood pressure readings
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ReadingStore {
    /// Append one reading to the end of the store
    fn append(&self, reading: &BloodPressureReading) -> Result<(), StorageError>;

    /// Read every stored reading, oldest first, with categories populated
    fn read_all(&self) -> Result<Vec<ReadingRecord>, StorageError>;

    /// Check whether the store location can be written. Never fails.
    fn verify_writable(&self) -> bool;
}

/// Append-only store backed by a single comma-separated file.
///
/// Reads accept both the legacy five-column layout and the current layout
/// with a `Category` column; writes always use the current layout.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Create a store for an already-resolved file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with the current header if it does not exist yet.
    /// Safe to call any number of times.
    pub fn ensure_initialized(&self) -> Result<(), StorageError> {
        let uninitialized =
            CsvFile::is_uninitialized(&self.path).map_err(|e| StorageError::write(&self.path, e))?;

        if uninitialized {
            debug!("Initializing reading file: {}", self.path.display());
            CsvFile::write_header(&self.path).map_err(|e| StorageError::write(&self.path, e))?;
        }
        Ok(())
    }

    /// Upgrade a legacy header in place. Failure only costs the cosmetic
    /// upgrade, since reads backfill categories either way.
    fn migrate_header_if_needed(&self) {
        let result = CsvFile::schema_version(&self.path).and_then(|version| match version {
            SchemaVersion::Current => Ok(false),
            SchemaVersion::Legacy => CsvFile::rewrite_header(&self.path).map(|_| true),
        });

        match result {
            Ok(true) => debug!("Migrated header of {} to include Category", self.path.display()),
            Ok(false) => {}
            Err(e) => warn!(
                "Could not migrate header of {}: {}; continuing with legacy header",
                self.path.display(),
                e
            ),
        }
    }
}

impl ReadingStore for CsvStore {
    fn append(&self, reading: &BloodPressureReading) -> Result<(), StorageError> {
        debug!(
            "Appending reading {}/{} {} to {}",
            reading.systolic(),
            reading.diastolic(),
            reading.pulse(),
            self.path.display()
        );

        self.ensure_initialized()?;
        self.migrate_header_if_needed();

        CsvFile::ensure_trailing_newline(&self.path).map_err(|e| StorageError::write(&self.path, e))?;
        CsvFile::append_row(&self.path, &reading.to_record()).map_err(|e| StorageError::write(&self.path, e))
    }

    fn read_all(&self) -> Result<Vec<ReadingRecord>, StorageError> {
        if !self.path.exists() {
            debug!("Reading file {} does not exist yet", self.path.display());
            return Ok(Vec::new());
        }

        let records = CsvFile::read_records(&self.path).map_err(|e| StorageError::read(&self.path, e))?;
        debug!("Read {} readings from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn verify_writable(&self) -> bool {
        CsvFile::is_writable(&self.path).unwrap_or(false)
    }
}
