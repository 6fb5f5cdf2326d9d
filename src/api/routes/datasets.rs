//! Dataset Routes
//!
//! - GET /api/v1/datasets - Row counts and filter choices

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{DatasetListResponse, DatasetSummary};
use crate::api::state::AppState;
use crate::dashboard::Dashboard;
use crate::data::DatasetKind;

/// GET /api/v1/datasets
pub async fn list_datasets(State(state): State<Arc<AppState>>) -> Json<DatasetListResponse> {
    Json(DatasetListResponse {
        datasets: summaries(&state.dashboard),
    })
}

/// One summary per dataset, in panel order
pub(crate) fn summaries(dashboard: &Dashboard) -> Vec<DatasetSummary> {
    DatasetKind::all()
        .iter()
        .map(|kind| {
            let filter = dashboard.filter_options(*kind);
            DatasetSummary {
                name: *kind,
                rows: dashboard.datasets().row_count(*kind),
                filter_param: filter.param.to_string(),
                options: filter.options,
            }
        })
        .collect()
}
