//! Handlers for the item ledger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stockroom_core::types::DbId;
use stockroom_db::models::item::{CategoryPathParams, CreateItem, ItemListParams, UpdateItem};

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/items
///
/// Filter by `category_id`, `status` and free-text `search`; paginated.
pub async fn list_items(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ItemListParams>,
) -> AppResult<impl IntoResponse> {
    let page = state.engine.items.list(&params).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/items/by-category-path
///
/// Items under `category_id` and its descendants (all items when omitted),
/// deepest categories first, each with its path label.
pub async fn list_by_category_path(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CategoryPathParams>,
) -> AppResult<impl IntoResponse> {
    let items = state.engine.items.list_by_category_path(&params).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/items
///
/// Create an item, optionally with opening stock.
pub async fn create_item(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateItem>,
) -> AppResult<impl IntoResponse> {
    let item = state.engine.items.create(&auth.actor(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// GET /api/v1/items/{id}
///
/// Includes the category path and the composite path label.
pub async fn get_item(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = state.engine.items.get(id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/items/{id}
pub async fn update_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateItem>,
) -> AppResult<impl IntoResponse> {
    let item = state.engine.items.update(&auth.actor(), id, &input).await?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/items/{id}
pub async fn delete_item(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.engine.items.delete(&admin.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/items/{id}/inbound
pub async fn inbound_history(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.engine.items.get(id).await?;
    let records = state.engine.inbound.history(id).await?;
    Ok(Json(DataResponse { data: records }))
}
