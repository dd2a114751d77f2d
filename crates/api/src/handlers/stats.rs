//! Handlers for dashboard statistics.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use stockroom_db::models::stats::{PopularItemsParams, TrendParams};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/stats/overview
///
/// Item counts by stock state plus open and overdue borrows as of today (UTC).
pub async fn overview(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let today = chrono::Utc::now().date_naive();
    let stats = state.engine.reports.overview(today).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/stats/by-category
pub async fn by_category(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = state.engine.reports.stock_by_category().await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/stats/trends
///
/// Daily inbound and outbound series for the last `days` days (default 30).
pub async fn trends(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TrendParams>,
) -> AppResult<impl IntoResponse> {
    let today = chrono::Utc::now().date_naive();
    let trends = state.engine.reports.movement_trends(&params, today).await?;
    Ok(Json(DataResponse { data: trends }))
}

/// GET /api/v1/stats/popular-items
pub async fn popular_items(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PopularItemsParams>,
) -> AppResult<impl IntoResponse> {
    let items = state.engine.reports.popular_items(&params).await?;
    Ok(Json(DataResponse { data: items }))
}
