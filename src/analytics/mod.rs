//! Analytics
//!
//! Filtering and aggregation for the three panels:
//!
//! - **filter**: `Selection` and row filtering
//! - **aggregate**: Group-by and reduction helpers
//! - **restaurant**, **construction**, **real_estate**: Per-panel reports
//!
//! # Pipeline
//!
//! ```text
//! Rows → Selection::apply → Report::from_rows → Presenter
//! ```
//!
//! Reports are recomputed from scratch for every filter state; nothing is
//! cached between renders.

pub mod aggregate;
pub mod construction;
pub mod filter;
pub mod real_estate;
pub mod restaurant;

pub use aggregate::{mean, sum, GroupCount, GroupTotal};
pub use construction::{ActiveJob, ConstructionKpis, ConstructionReport, JobProfit};
pub use filter::{Selection, ALL_CHOICE};
pub use real_estate::{RealEstateKpis, RealEstateReport};
pub use restaurant::{DailyValue, ItemSummary, RestaurantKpis, RestaurantReport};
