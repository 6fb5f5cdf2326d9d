//! Dashboard Routes
//!
//! - GET /api/v1/dashboard - Every panel
//! - GET /api/v1/panels/:panel - One panel (restaurant, construction, real-estate)
//!
//! Both accept the filter query parameters described on `DashboardQuery`.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::DashboardQuery;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::data::DatasetKind;
use crate::present::{DashboardView, PanelView};

/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<DashboardView>> {
    let query = DashboardQuery::from_pairs(&params)?;
    let dashboard = &state.dashboard;
    let today = query.as_of.unwrap_or_else(|| dashboard.reference_date());

    Ok(Json(dashboard.recompute_at(&query.state, today)))
}

/// GET /api/v1/panels/:panel
pub async fn get_panel(
    State(state): State<Arc<AppState>>,
    Path(panel): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<PanelView>> {
    let kind: DatasetKind = panel
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Unknown panel '{}'", panel)))?;
    let query = DashboardQuery::from_pairs(&params)?;
    let dashboard = &state.dashboard;
    let today = query.as_of.unwrap_or_else(|| dashboard.reference_date());

    Ok(Json(dashboard.render_panel_at(kind, &query.state, today)))
}
