use axum::routing::get;
use axum::Router;

use crate::handlers::category;
use crate::state::AppState;

/// Category routes mounted at `/categories`.
///
/// ```text
/// GET    /                 -> list_tree
/// POST   /                 -> create_category (admin)
/// GET    /flat             -> list_flat
/// GET    /top-level        -> list_top_level
/// GET    /{id}             -> get_category
/// PUT    /{id}             -> update_category (admin)
/// DELETE /{id}             -> delete_category (admin)
/// GET    /{id}/children    -> list_children
/// GET    /{id}/path        -> get_path
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(category::list_tree).post(category::create_category),
        )
        .route("/flat", get(category::list_flat))
        .route("/top-level", get(category::list_top_level))
        .route(
            "/{id}",
            get(category::get_category)
                .put(category::update_category)
                .delete(category::delete_category),
        )
        .route("/{id}/children", get(category::list_children))
        .route("/{id}/path", get(category::get_path))
}
