//! Dataset layer
//!
//! - **types**: Record structs for the three datasets
//! - **loader**: CSV decoding with schema checks
//! - **error**: Load error types
//!
//! Datasets are loaded once and never written afterwards, so they are
//! shared behind an `Arc` without locking.

pub mod error;
pub mod loader;
pub mod types;

pub use error::{DataError, DataResult};
pub use loader::{load_csv, read_records, CsvRecord, DatasetPaths, Datasets};
pub use types::{DatasetKind, JobRecord, ListingRecord, SalesRecord, COMPLETED_STAGE};
