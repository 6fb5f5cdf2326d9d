//! Page Route
//!
//! - GET / - Server-rendered dashboard; the panel forms submit back here

use axum::{
    extract::{Query, State},
    response::Html,
};
use std::sync::Arc;

use crate::api::dto::DashboardQuery;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::present::html::render_page;

/// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Html<String>> {
    let query = DashboardQuery::from_pairs(&params)?;
    let dashboard = &state.dashboard;
    let today = query.as_of.unwrap_or_else(|| dashboard.reference_date());

    let view = dashboard.recompute_at(&query.state, today);
    Ok(Html(render_page(&view)))
}
