use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::entities::blood_pressure::ReadingRecord;
use crate::entities::category::BloodPressureCategory;
use crate::services::classification::all_categories;

/// One plotted point of the reading history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// When the reading was taken
    pub recorded_at: NaiveDateTime,
    /// Systolic blood pressure in mmHg
    pub systolic: i32,
    /// Diastolic blood pressure in mmHg
    pub diastolic: i32,
    /// Pulse rate in beats per minute
    pub pulse: i32,
    /// Severity rank, 1 to 6
    pub category_rank: u8,
}

/// A fixed horizontal band drawn behind the series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityBand {
    pub rank: u8,
    pub abbreviation: String,
    pub name: String,
    pub color: String,
}

impl From<BloodPressureCategory> for SeverityBand {
    fn from(category: BloodPressureCategory) -> Self {
        Self {
            rank: category.rank(),
            abbreviation: category.abbreviation().to_string(),
            name: category.name().to_string(),
            color: category.color().to_string(),
        }
    }
}

impl From<&ReadingRecord> for ChartPoint {
    fn from(record: &ReadingRecord) -> Self {
        Self {
            recorded_at: record.recorded_at,
            systolic: record.systolic,
            diastolic: record.diastolic,
            pulse: record.pulse,
            category_rank: record.category.rank(),
        }
    }
}

/// Everything a plotting tool needs to draw the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartData {
    pub points: Vec<ChartPoint>,
    pub bands: Vec<SeverityBand>,
}

/// Build chart points from stored records, keeping their order
pub fn chart_series(records: &[ReadingRecord]) -> Vec<ChartPoint> {
    records.iter().map(ChartPoint::from).collect()
}

/// Severity bands in ascending rank
pub fn severity_bands() -> Vec<SeverityBand> {
    all_categories().into_iter().map(SeverityBand::from).collect()
}

/// Chart points plus the band table
pub fn chart_data(records: &[ReadingRecord]) -> ChartData {
    ChartData {
        points: chart_series(records),
        bands: severity_bands(),
    }
}
