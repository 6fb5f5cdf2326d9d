//! Record types for the three dashboard datasets
//!
//! - `SalesRecord`: one restaurant order line
//! - `JobRecord`: one construction job
//! - `ListingRecord`: one real-estate listing
//!
//! Records are read-only snapshots. Nothing derived is stored on them;
//! derived attributes such as job profit are computed on demand.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stage label that marks a construction job as finished
pub const COMPLETED_STAGE: &str = "Completed";

/// A single restaurant sale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SalesRecord {
    /// Business date of the order
    pub date: NaiveDate,
    /// Restaurant location
    pub location: String,
    /// Menu item
    pub item: String,
    /// Menu category of the item
    pub category: String,
    /// Units sold
    pub quantity: u32,
    /// Order revenue
    pub total_sales: f64,
    /// Labor cost attributed to the order (may exceed `total_sales`)
    pub labor_cost: f64,
}

impl SalesRecord {
    /// Labor cost as a fraction of sales, clamped to 1.0
    ///
    /// Zero sales with positive labor is the limit of the ratio and clamps
    /// to 1.0. Zero sales with zero labor carries no ratio at all.
    pub fn labor_ratio(&self) -> Option<f64> {
        if self.total_sales > 0.0 {
            Some((self.labor_cost / self.total_sales).clamp(0.0, 1.0))
        } else if self.labor_cost > 0.0 {
            Some(1.0)
        } else {
            None
        }
    }
}

/// A single construction job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobRecord {
    /// Unique job identifier
    pub job_id: String,
    /// Kind of work (roofing, remodel, ...)
    pub job_type: String,
    /// Pipeline stage; `COMPLETED_STAGE` marks finished work
    pub stage: String,
    /// Day work started
    pub start_date: NaiveDate,
    pub revenue: f64,
    pub labor_cost: f64,
    pub material_cost: f64,
}

impl JobRecord {
    /// Revenue minus labor and material cost
    pub fn profit(&self) -> f64 {
        self.revenue - self.labor_cost - self.material_cost
    }

    /// Whether the job sits in the given completed stage (exact match)
    pub fn is_completed(&self, completed_stage: &str) -> bool {
        self.stage == completed_stage
    }

    /// Whole days between `start_date` and `today`
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.start_date).num_days()
    }
}

/// A single real-estate listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListingRecord {
    /// Listing identifier; the loader assigns the row number when the file
    /// has no `listing_id` column
    #[serde(default)]
    pub listing_id: String,
    /// Pipeline stage
    pub stage: String,
    /// Listing agent
    pub agent: String,
    /// Where the lead came from
    pub lead_source: String,
    pub listing_price: f64,
    pub commission: f64,
}

/// Which dataset a panel is built from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Restaurant,
    Construction,
    RealEstate,
}

impl DatasetKind {
    /// Get all dataset kinds for iteration
    pub fn all() -> &'static [DatasetKind] {
        &[
            DatasetKind::Restaurant,
            DatasetKind::Construction,
            DatasetKind::RealEstate,
        ]
    }

    /// Default file name of the dataset
    pub fn default_file_name(&self) -> &'static str {
        match self {
            DatasetKind::Restaurant => "Restaurant_Sales_Data.csv",
            DatasetKind::Construction => "Construction_Jobs_Data.csv",
            DatasetKind::RealEstate => "Real_Estate_Listings_Data.csv",
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetKind::Restaurant => write!(f, "restaurant"),
            DatasetKind::Construction => write!(f, "construction"),
            DatasetKind::RealEstate => write!(f, "real-estate"),
        }
    }
}

impl std::str::FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "restaurant" => Ok(DatasetKind::Restaurant),
            "construction" => Ok(DatasetKind::Construction),
            "real-estate" | "realestate" => Ok(DatasetKind::RealEstate),
            _ => Err(format!(
                "Unknown panel: {}. Use restaurant, construction, or real-estate",
                s
            )),
        }
    }
}
