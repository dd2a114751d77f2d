//! Handlers for inbound movements and returns.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stockroom_core::inventory::StockIn;
use stockroom_core::types::DbId;
use stockroom_db::models::inbound::InboundListParams;
use stockroom_db::models::outbound::BatchReturnRequest;

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/inbound
pub async fn list_inbound(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<InboundListParams>,
) -> AppResult<impl IntoResponse> {
    let page = state.engine.inbound.list(&params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/inbound
///
/// Stock in, or return a borrow when `inbound_type` is `return`.
pub async fn record_inbound(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<StockIn>,
) -> AppResult<impl IntoResponse> {
    let receipt = state.engine.inbound.record(&auth.actor(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}

/// GET /api/v1/inbound/{id}
pub async fn get_inbound(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = state.engine.inbound.get(id).await?;
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/inbound/batch-return
///
/// Returns 200 with per-element outcomes even when some elements failed.
pub async fn batch_return(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<BatchReturnRequest>,
) -> AppResult<impl IntoResponse> {
    let report = state
        .engine
        .inbound
        .batch_return(&auth.actor(), &input.outbound_ids, input.remarks.as_deref())
        .await?;
    Ok(Json(DataResponse { data: report }))
}
