use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::entities::category::BloodPressureCategory;
use crate::services::classification::classify;

/// Date format of the `Date` column
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time format of the `Time` column
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A single blood pressure measurement.
///
/// Readings are immutable once created. The category is never stored on the
/// reading itself; it is always derived from the two pressure values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloodPressureReading {
    systolic: i32,
    diastolic: i32,
    pulse: i32,
    recorded_at: NaiveDateTime,
}

impl BloodPressureReading {
    /// Create a reading, stamping it with the current local time when no
    /// timestamp is supplied.
    ///
    /// No range checks happen here; callers validate input first.
    pub fn create(
        systolic: i32,
        diastolic: i32,
        pulse: i32,
        recorded_at: Option<NaiveDateTime>,
    ) -> Self {
        let recorded_at = recorded_at.unwrap_or_else(|| Local::now().naive_local());

        Self {
            systolic,
            diastolic,
            pulse,
            recorded_at: truncate_to_seconds(recorded_at),
        }
    }

    /// Systolic blood pressure (the higher number)
    pub fn systolic(&self) -> i32 {
        self.systolic
    }

    /// Diastolic blood pressure (the lower number)
    pub fn diastolic(&self) -> i32 {
        self.diastolic
    }

    /// Pulse rate in beats per minute
    pub fn pulse(&self) -> i32 {
        self.pulse
    }

    /// When the reading was taken
    pub fn recorded_at(&self) -> NaiveDateTime {
        self.recorded_at
    }

    /// Severity category derived from systolic and diastolic
    pub fn category(&self) -> BloodPressureCategory {
        classify(self.systolic, self.diastolic)
    }

    /// Date part formatted as `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.recorded_at.format(DATE_FORMAT).to_string()
    }

    /// Time part formatted as `HH:MM:SS`
    pub fn time_string(&self) -> String {
        self.recorded_at.format(TIME_FORMAT).to_string()
    }

    /// Convert to the persisted record shape, category included
    pub fn to_record(&self) -> ReadingRecord {
        ReadingRecord {
            recorded_at: self.recorded_at,
            systolic: self.systolic,
            diastolic: self.diastolic,
            pulse: self.pulse,
            category: self.category(),
        }
    }
}

/// One stored row of the reading file.
///
/// `category` is always populated: rows written before the category column
/// existed get it computed when they are read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingRecord {
    /// When the reading was taken
    pub recorded_at: NaiveDateTime,

    /// Systolic blood pressure in mmHg
    pub systolic: i32,

    /// Diastolic blood pressure in mmHg
    pub diastolic: i32,

    /// Pulse rate in beats per minute
    pub pulse: i32,

    /// Severity category, stored or backfilled
    pub category: BloodPressureCategory,
}

impl ReadingRecord {
    /// Date part formatted as `YYYY-MM-DD`
    pub fn date_string(&self) -> String {
        self.recorded_at.format(DATE_FORMAT).to_string()
    }

    /// Time part formatted as `HH:MM:SS`
    pub fn time_string(&self) -> String {
        self.recorded_at.format(TIME_FORMAT).to_string()
    }

    /// The six fields of a row in column order:
    /// Date, Time, Systolic, Diastolic, BPM, Category
    pub fn to_fields(&self) -> [String; 6] {
        [
            self.date_string(),
            self.time_string(),
            self.systolic.to_string(),
            self.diastolic.to_string(),
            self.pulse.to_string(),
            self.category.abbreviation().to_string(),
        ]
    }
}

fn truncate_to_seconds(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp.with_nanosecond(0).unwrap_or(timestamp)
}
