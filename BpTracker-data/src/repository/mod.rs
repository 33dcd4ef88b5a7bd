// Repository module structure
pub mod errors;
mod blood_pressure;
mod storage;

// Re-export commonly used types
pub use errors::{ReadFailure, StorageError};
pub use blood_pressure::{CsvStore, ReadingStore};

// Mock store for tests in dependent crates
#[cfg(feature = "mock")]
pub use blood_pressure::MockReadingStore;
