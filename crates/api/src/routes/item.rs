use axum::routing::get;
use axum::Router;

use crate::handlers::item;
use crate::state::AppState;

/// Item routes mounted at `/items`.
///
/// ```text
/// GET    /                 -> list_items
/// POST   /                 -> create_item
/// GET    /by-category-path -> list_by_category_path
/// GET    /{id}             -> get_item
/// PUT    /{id}             -> update_item
/// DELETE /{id}             -> delete_item (admin)
/// GET    /{id}/inbound     -> inbound_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(item::list_items).post(item::create_item))
        .route("/by-category-path", get(item::list_by_category_path))
        .route(
            "/{id}",
            get(item::get_item)
                .put(item::update_item)
                .delete(item::delete_item),
        )
        .route("/{id}/inbound", get(item::inbound_history))
}
