// Domain entities and value objects
pub mod blood_pressure;
pub mod category;

// Re-export common types for easier imports
pub use blood_pressure::{BloodPressureReading, ReadingRecord};
pub use category::{BloodPressureCategory, UnknownCategory};
