//! Dataset loading error types
//!
//! Every variant is fatal: a dashboard never starts on a partial dataset.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a dataset
#[derive(Error, Debug)]
pub enum DataError {
    /// The file could not be opened or read
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be decoded into the dataset schema
    #[error("CSV error in {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row lacks required columns
    #[error("{path:?} is missing required columns: {}", missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    /// A decoded value violates the dataset invariants
    #[error("Invalid value in {path:?} at line {line}: {message}")]
    InvalidValue {
        path: PathBuf,
        line: u64,
        message: String,
    },

    /// A key column that must be unique repeats
    #[error("Duplicate {column} '{value}' in {path:?} at line {line}")]
    DuplicateKey {
        path: PathBuf,
        column: &'static str,
        value: String,
        line: u64,
    },
}

impl DataError {
    /// Path of the dataset file that failed to load
    pub fn path(&self) -> &PathBuf {
        match self {
            DataError::Io { path, .. }
            | DataError::Csv { path, .. }
            | DataError::MissingColumns { path, .. }
            | DataError::InvalidValue { path, .. }
            | DataError::DuplicateKey { path, .. } => path,
        }
    }
}

/// Result type alias for dataset operations
pub type DataResult<T> = Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataError::MissingColumns {
            path: PathBuf::from("sales.csv"),
            missing: vec!["item".to_string(), "quantity".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "\"sales.csv\" is missing required columns: item, quantity"
        );

        let err = DataError::DuplicateKey {
            path: PathBuf::from("jobs.csv"),
            column: "job_id",
            value: "J-1".to_string(),
            line: 4,
        };
        assert!(err.to_string().contains("Duplicate job_id 'J-1'"));
        assert_eq!(err.path(), &PathBuf::from("jobs.csv"));
    }
}
