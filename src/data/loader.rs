//! CSV Loader
//!
//! Reads the dashboard datasets into memory. Loading happens once per
//! process; any schema mismatch aborts the load.

use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::error::{DataError, DataResult};
use super::types::{DatasetKind, JobRecord, ListingRecord, SalesRecord};

/// A row type that can be decoded from a dataset file
pub trait CsvRecord: DeserializeOwned {
    /// Header names that must be present (extra columns are ignored)
    const REQUIRED_COLUMNS: &'static [&'static str];

    /// Column whose values must be unique, if any
    const KEY_COLUMN: Option<&'static str> = None;

    /// Value of the key column for this row
    fn key(&self) -> Option<&str> {
        None
    }

    /// Check value-level invariants after decoding
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Called with the 1-based data row number after validation
    fn assign_row_number(&mut self, _row: usize) {}
}

impl CsvRecord for SalesRecord {
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "date",
        "location",
        "item",
        "category",
        "quantity",
        "total_sales",
        "labor_cost",
    ];

    fn validate(&self) -> Result<(), String> {
        non_negative("total_sales", self.total_sales)?;
        non_negative("labor_cost", self.labor_cost)
    }
}

impl CsvRecord for JobRecord {
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "job_id",
        "job_type",
        "stage",
        "start_date",
        "revenue",
        "labor_cost",
        "material_cost",
    ];

    const KEY_COLUMN: Option<&'static str> = Some("job_id");

    fn key(&self) -> Option<&str> {
        Some(&self.job_id)
    }

    fn validate(&self) -> Result<(), String> {
        if self.job_id.is_empty() {
            return Err("job_id cannot be empty".to_string());
        }
        non_negative("revenue", self.revenue)?;
        non_negative("labor_cost", self.labor_cost)?;
        non_negative("material_cost", self.material_cost)
    }
}

impl CsvRecord for ListingRecord {
    const REQUIRED_COLUMNS: &'static [&'static str] = &[
        "stage",
        "agent",
        "lead_source",
        "listing_price",
        "commission",
    ];

    fn validate(&self) -> Result<(), String> {
        non_negative("listing_price", self.listing_price)?;
        non_negative("commission", self.commission)
    }

    fn assign_row_number(&mut self, row: usize) {
        if self.listing_id.is_empty() {
            self.listing_id = row.to_string();
        }
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} must be a finite number, got {}", field, value));
    }
    if value < 0.0 {
        return Err(format!("{} cannot be negative, got {}", field, value));
    }
    Ok(())
}

/// Load every row of a dataset file
pub fn load_csv<T: CsvRecord>(path: &Path) -> DataResult<Vec<T>> {
    let file = std::fs::File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    read_records(file, path)
}

/// Decode rows from any reader; `path` labels errors
pub fn read_records<T: CsvRecord, R: Read>(reader: R, path: &Path) -> DataResult<Vec<T>> {
    let csv_err = |source: csv::Error| DataError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_err)?.clone();

    let missing: Vec<String> = T::REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }

    let mut rows: Vec<T> = Vec::new();
    let mut seen_keys = HashSet::new();

    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let mut row: T = record.deserialize(Some(&headers)).map_err(csv_err)?;

        row.validate().map_err(|message| DataError::InvalidValue {
            path: path.to_path_buf(),
            line,
            message,
        })?;

        if let (Some(column), Some(key)) = (T::KEY_COLUMN, row.key()) {
            if !seen_keys.insert(key.to_string()) {
                return Err(DataError::DuplicateKey {
                    path: path.to_path_buf(),
                    column,
                    value: key.to_string(),
                    line,
                });
            }
        }

        row.assign_row_number(rows.len() + 1);
        rows.push(row);
    }

    Ok(rows)
}

/// Locations of the three dataset files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub restaurant: PathBuf,
    pub construction: PathBuf,
    pub real_estate: PathBuf,
}

impl DatasetPaths {
    /// Default file names resolved against a directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            restaurant: dir.join(DatasetKind::Restaurant.default_file_name()),
            construction: dir.join(DatasetKind::Construction.default_file_name()),
            real_estate: dir.join(DatasetKind::RealEstate.default_file_name()),
        }
    }

    /// Path of one dataset
    pub fn get(&self, kind: DatasetKind) -> &Path {
        match kind {
            DatasetKind::Restaurant => &self.restaurant,
            DatasetKind::Construction => &self.construction,
            DatasetKind::RealEstate => &self.real_estate,
        }
    }
}

/// The three immutable datasets behind the dashboard
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub restaurant: Vec<SalesRecord>,
    pub construction: Vec<JobRecord>,
    pub real_estate: Vec<ListingRecord>,
}

impl Datasets {
    /// Build from rows already in memory
    pub fn new(
        restaurant: Vec<SalesRecord>,
        construction: Vec<JobRecord>,
        real_estate: Vec<ListingRecord>,
    ) -> Self {
        Self {
            restaurant,
            construction,
            real_estate,
        }
    }

    /// Load all three files, failing on the first error
    pub fn load(paths: &DatasetPaths) -> DataResult<Self> {
        let start = Instant::now();

        let restaurant = load_csv::<SalesRecord>(&paths.restaurant)?;
        tracing::info!(path = ?paths.restaurant, rows = restaurant.len(), "Loaded restaurant sales");

        let construction = load_csv::<JobRecord>(&paths.construction)?;
        tracing::info!(path = ?paths.construction, rows = construction.len(), "Loaded construction jobs");

        let real_estate = load_csv::<ListingRecord>(&paths.real_estate)?;
        tracing::info!(path = ?paths.real_estate, rows = real_estate.len(), "Loaded real-estate listings");

        tracing::debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Datasets loaded");

        Ok(Self::new(restaurant, construction, real_estate))
    }

    /// Number of rows in one dataset
    pub fn row_count(&self, kind: DatasetKind) -> usize {
        match kind {
            DatasetKind::Restaurant => self.restaurant.len(),
            DatasetKind::Construction => self.construction.len(),
            DatasetKind::RealEstate => self.real_estate.len(),
        }
    }
}
