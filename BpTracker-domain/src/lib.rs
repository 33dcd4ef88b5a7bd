// BP Tracker Domain
// This crate contains the business rules for the BP Tracker application

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Re-export common types for convenience
pub use entities::{BloodPressureCategory, BloodPressureReading, ReadingRecord, UnknownCategory};
pub use services::{all_categories, category_from_abbreviation, classify, validate_reading, ValidationError};
