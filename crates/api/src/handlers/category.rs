//! Handlers for the category tree.
//!
//! Reads are open to any authenticated user; mutations require
//! [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use stockroom_core::types::DbId;
use stockroom_db::models::category::{CreateCategory, UpdateCategory};

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /api/v1/categories
///
/// The whole hierarchy, nested.
pub async fn list_tree(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tree = state.engine.categories.list_tree().await?;
    Ok(Json(DataResponse { data: tree }))
}

/// GET /api/v1/categories/flat
pub async fn list_flat(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let flat = state.engine.categories.list_flat().await?;
    Ok(Json(DataResponse { data: flat }))
}

/// GET /api/v1/categories/top-level
pub async fn list_top_level(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let roots = state.engine.categories.list_top_level().await?;
    Ok(Json(DataResponse { data: roots }))
}

/// GET /api/v1/categories/{id}
pub async fn get_category(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = state.engine.categories.get(id).await?;
    Ok(Json(DataResponse { data: category }))
}

/// GET /api/v1/categories/{id}/children
pub async fn list_children(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let children = state.engine.categories.list_children(id).await?;
    Ok(Json(DataResponse { data: children }))
}

/// GET /api/v1/categories/{id}/path
///
/// Category names from the root down to this category.
pub async fn get_path(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let path = state.engine.categories.path_of(id).await?;
    Ok(Json(DataResponse { data: path }))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/categories
pub async fn create_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    let category = state.engine.categories.create(&admin.actor(), &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/categories/{id}
pub async fn update_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    let category = state
        .engine
        .categories
        .update(&admin.actor(), id, &input)
        .await?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Fails with 409 while the category has children or items.
pub async fn delete_category(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.engine.categories.delete(&admin.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
