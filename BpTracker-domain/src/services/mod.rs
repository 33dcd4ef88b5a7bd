pub mod chart;
pub mod classification;
pub mod validation;

// Domain services
// Pure business rules: classification, input validation and chart data.

// Re-export the functions callers use most
pub use chart::{chart_data, chart_series, severity_bands, ChartData, ChartPoint, SeverityBand};
pub use classification::{all_categories, category_from_abbreviation, classify};
pub use validation::{validate_reading, ReadingInput, ValidationError};
