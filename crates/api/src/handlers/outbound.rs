//! Handlers for outbound movements and borrow queries.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stockroom_core::inventory::StockOut;
use stockroom_core::types::DbId;
use stockroom_db::models::outbound::OutboundListParams;

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/outbound
pub async fn list_outbound(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<OutboundListParams>,
) -> AppResult<impl IntoResponse> {
    let page = state.engine.outbound.list(&params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/outbound
pub async fn record_outbound(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<StockOut>,
) -> AppResult<impl IntoResponse> {
    let receipt = state.engine.outbound.record(&auth.actor(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}

/// GET /api/v1/outbound/{id}
pub async fn get_outbound(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = state.engine.outbound.get(id).await?;
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/outbound/{id}/convert-to-transfer
pub async fn convert_to_transfer(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let record = state
        .engine
        .outbound
        .convert_borrow_to_transfer(&auth.actor(), id)
        .await?;
    Ok(Json(DataResponse { data: record }))
}

/// GET /api/v1/outbound/unreturned
///
/// Open borrows, soonest expected return first.
pub async fn list_unreturned(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let records = state.engine.outbound.unreturned_borrows().await?;
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/outbound/mine
pub async fn my_borrowings(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<OutboundListParams>,
) -> AppResult<impl IntoResponse> {
    let page = state
        .engine
        .outbound
        .my_borrowings(&auth.actor(), &params)
        .await?;
    Ok(Json(DataResponse { data: page }))
}
