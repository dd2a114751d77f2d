//! Handlers for the approval workflow.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use stockroom_core::types::DbId;
use stockroom_db::models::approval::{ApprovalListParams, CreateApprovalRequest, ReviewDecision};

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PendingCount {
    pub count: i64,
}

/// GET /api/v1/approvals
///
/// Administrators see every request; other users only their own.
pub async fn list_requests(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ApprovalListParams>,
) -> AppResult<impl IntoResponse> {
    let page = state.engine.approvals.list(&auth.actor(), &params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /api/v1/approvals
pub async fn create_request(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateApprovalRequest>,
) -> AppResult<impl IntoResponse> {
    let request = state
        .engine
        .approvals
        .create_request(&auth.actor(), &input.request_type, &input.request_data)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/approvals/{id}
pub async fn get_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let request = state.engine.approvals.get(&auth.actor(), id).await?;
    Ok(Json(DataResponse { data: request }))
}

/// PUT /api/v1/approvals/{id}/review
///
/// Approve or reject. Approval applies the request's stock movement in the
/// same transaction.
pub async fn review_request(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<ReviewDecision>,
) -> AppResult<impl IntoResponse> {
    let result = state
        .engine
        .approvals
        .review(&admin.actor(), id, input.approved, input.comment.as_deref())
        .await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/approvals/pending/count
pub async fn pending_count(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let count = state.engine.approvals.pending_count(&admin.actor()).await?;
    Ok(Json(DataResponse {
        data: PendingCount { count },
    }))
}
