//! On-disk shape of the reading file.
//!
//! The header row doubles as the schema version: files written before the
//! category column existed have the five-column header, current files have
//! six columns.

use chrono::NaiveDateTime;
use csv::StringRecord;
use tracing::warn;

use bp_tracker_domain::entities::blood_pressure::{DATE_FORMAT, TIME_FORMAT};
use bp_tracker_domain::{classify, BloodPressureCategory, ReadingRecord};

use crate::repository::errors::ReadFailure;

pub const DATE_COLUMN: &str = "Date";
pub const TIME_COLUMN: &str = "Time";
pub const SYSTOLIC_COLUMN: &str = "Systolic";
pub const DIASTOLIC_COLUMN: &str = "Diastolic";
pub const BPM_COLUMN: &str = "BPM";
pub const CATEGORY_COLUMN: &str = "Category";

/// Header of files written before categories were stored
pub const LEGACY_HEADERS: [&str; 5] = [
    DATE_COLUMN,
    TIME_COLUMN,
    SYSTOLIC_COLUMN,
    DIASTOLIC_COLUMN,
    BPM_COLUMN,
];

/// Header written for every new file
pub const HEADERS: [&str; 6] = [
    DATE_COLUMN,
    TIME_COLUMN,
    SYSTOLIC_COLUMN,
    DIASTOLIC_COLUMN,
    BPM_COLUMN,
    CATEGORY_COLUMN,
];

/// Schema generation detected from a header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// No `Category` column
    Legacy,
    /// `Category` column present
    Current,
}

impl SchemaVersion {
    /// Detect the schema from a header row
    pub fn detect(headers: &StringRecord) -> Self {
        if headers.iter().any(|name| name.trim() == CATEGORY_COLUMN) {
            SchemaVersion::Current
        } else {
            SchemaVersion::Legacy
        }
    }
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    date: usize,
    time: usize,
    systolic: usize,
    diastolic: usize,
    bpm: usize,
    category: Option<usize>,
}

impl ColumnLayout {
    /// Resolve column positions, failing if a required column is absent
    pub fn from_headers(headers: &StringRecord) -> Result<Self, ReadFailure> {
        let position = |name: &'static str| {
            headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or(ReadFailure::MissingColumn(name))
        };

        Ok(Self {
            date: position(DATE_COLUMN)?,
            time: position(TIME_COLUMN)?,
            systolic: position(SYSTOLIC_COLUMN)?,
            diastolic: position(DIASTOLIC_COLUMN)?,
            bpm: position(BPM_COLUMN)?,
            category: position(CATEGORY_COLUMN).ok(),
        })
    }

    /// Schema generation this layout belongs to
    pub fn version(&self) -> SchemaVersion {
        match self.category {
            Some(_) => SchemaVersion::Current,
            None => SchemaVersion::Legacy,
        }
    }

    /// Parse one data row into a record, backfilling the category when the
    /// row does not carry a usable one.
    ///
    /// Rows shorter than the header are accepted as long as every required
    /// column is present, which is how legacy rows look once the header has
    /// been migrated.
    pub fn parse_row(&self, row: &StringRecord, line: u64) -> Result<ReadingRecord, ReadFailure> {
        let date = required(row, self.date, DATE_COLUMN, line)?;
        let time = required(row, self.time, TIME_COLUMN, line)?;
        let systolic = number(row, self.systolic, SYSTOLIC_COLUMN, line)?;
        let diastolic = number(row, self.diastolic, DIASTOLIC_COLUMN, line)?;
        let pulse = number(row, self.bpm, BPM_COLUMN, line)?;

        let stamp = format!("{} {}", date, time);
        let recorded_at = NaiveDateTime::parse_from_str(&stamp, &format!("{} {}", DATE_FORMAT, TIME_FORMAT))
            .map_err(|_| ReadFailure::InvalidTimestamp { line, value: stamp })?;

        let stored = self
            .category
            .and_then(|index| row.get(index))
            .map(str::trim)
            .filter(|value| !value.is_empty());

        let category = match stored {
            Some(text) => BloodPressureCategory::from_abbreviation(text).unwrap_or_else(|err| {
                warn!("line {}: {}, recomputing from pressures", line, err);
                classify(systolic, diastolic)
            }),
            None => classify(systolic, diastolic),
        };

        Ok(ReadingRecord {
            recorded_at,
            systolic,
            diastolic,
            pulse,
            category,
        })
    }
}

fn required<'r>(
    row: &'r StringRecord,
    index: usize,
    column: &'static str,
    line: u64,
) -> Result<&'r str, ReadFailure> {
    row.get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ReadFailure::MissingField { line, column })
}

fn number(row: &StringRecord, index: usize, column: &'static str, line: u64) -> Result<i32, ReadFailure> {
    let value = required(row, index, column, line)?;
    value.parse::<i32>().map_err(|_| ReadFailure::InvalidNumber {
        line,
        column,
        value: value.to_string(),
    })
}
