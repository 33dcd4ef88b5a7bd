// Storage models for the reading file
pub mod reading_row;

pub use reading_row::{ColumnLayout, SchemaVersion, HEADERS, LEGACY_HEADERS};
