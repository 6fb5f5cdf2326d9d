//! Data Transfer Objects
//!
//! Query parameters and response bodies of the HTTP API.

use chrono::NaiveDate;
use serde::Serialize;

use super::error::{ApiError, ApiResult};
use crate::analytics::Selection;
use crate::dashboard::FilterState;
use crate::data::DatasetKind;

// ============================================
// DASHBOARD QUERY
// ============================================

/// Filter state and reference date parsed from a query string
///
/// Keys: `location`, `stage` (repeatable), `listing_stage`, `as_of`.
/// Any `stage` key switches the stage control to an explicit selection,
/// so `stage=` alone selects no stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardQuery {
    pub state: FilterState,
    pub as_of: Option<NaiveDate>,
}

impl DashboardQuery {
    pub fn from_pairs(pairs: &[(String, String)]) -> ApiResult<Self> {
        let mut query = DashboardQuery::default();
        let mut stages: Option<Vec<&str>> = None;

        for (key, value) in pairs {
            match key.as_str() {
                "location" => query.state.location = Selection::choice(value.as_str()),
                "listing_stage" => query.state.listing_stage = Selection::choice(value.as_str()),
                "stage" => stages.get_or_insert_with(Vec::new).push(value.as_str()),
                "as_of" if !value.trim().is_empty() => {
                    let date = value.trim().parse::<NaiveDate>().map_err(|e| {
                        ApiError::Validation(format!("as_of must be YYYY-MM-DD: {}", e))
                    })?;
                    query.as_of = Some(date);
                }
                _ => {}
            }
        }

        if let Some(stages) = stages {
            query.state.stages = Selection::many(stages);
        }
        Ok(query)
    }
}

// ============================================
// DATASET DTOs
// ============================================

/// One dataset and its filter choices
#[derive(Debug, Serialize)]
pub struct DatasetSummary {
    pub name: DatasetKind,
    pub rows: usize,
    /// Query parameter of the panel's filter control
    pub filter_param: String,
    pub options: Vec<String>,
}

/// Dataset list response
#[derive(Debug, Serialize)]
pub struct DatasetListResponse {
    pub datasets: Vec<DatasetSummary>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,
    /// Rows loaded per dataset
    pub datasets: Vec<DatasetSummary>,
    /// Open WebSocket sessions
    pub active_sessions: usize,
    /// Session limit; new WebSocket upgrades are refused at this count
    pub max_sessions: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
