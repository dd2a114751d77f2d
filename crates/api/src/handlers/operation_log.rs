//! Handlers for browsing the operation log.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use stockroom_core::types::DbId;
use stockroom_db::models::operation_log::{OperationLogQuery, OperationStatsParams};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/logs
///
/// Filter by `operation_type`, `operator_id`, `target_type` and a
/// `from` / `to` time range; newest first.
pub async fn list_logs(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<OperationLogQuery>,
) -> AppResult<impl IntoResponse> {
    let page = state.engine.reports.list_logs(&params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/logs/target/{target_type}/{target_id}
pub async fn target_history(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path((target_type, target_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let logs = state
        .engine
        .reports
        .target_history(&target_type, target_id)
        .await?;
    Ok(Json(DataResponse { data: logs }))
}

/// GET /api/v1/logs/statistics
///
/// Counts by day and operation type, and by operator, within an optional
/// `from` / `to` date window (inclusive, UTC days).
pub async fn statistics(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<OperationStatsParams>,
) -> AppResult<impl IntoResponse> {
    let stats = state.engine.reports.operation_statistics(&params).await?;
    Ok(Json(DataResponse { data: stats }))
}
