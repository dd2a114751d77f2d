use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Statistics routes mounted at `/stats`.
///
/// ```text
/// GET    /overview         -> overview
/// GET    /by-category      -> by_category
/// GET    /trends           -> trends
/// GET    /popular-items    -> popular_items
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(stats::overview))
        .route("/by-category", get(stats::by_category))
        .route("/trends", get(stats::trends))
        .route("/popular-items", get(stats::popular_items))
}
