use axum::routing::get;
use axum::Router;

use crate::handlers::operation_log;
use crate::state::AppState;

/// Operation log routes mounted at `/logs`.
///
/// ```text
/// GET    /                                  -> list_logs
/// GET    /statistics                        -> statistics
/// GET    /target/{target_type}/{target_id}  -> target_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(operation_log::list_logs))
        .route("/statistics", get(operation_log::statistics))
        .route(
            "/target/{target_type}/{target_id}",
            get(operation_log::target_history),
        )
}
