use axum::routing::{get, put};
use axum::Router;

use crate::handlers::approval;
use crate::state::AppState;

/// Approval routes mounted at `/approvals`.
///
/// ```text
/// GET    /                  -> list_requests
/// POST   /                  -> create_request (non-admin)
/// GET    /pending/count     -> pending_count (admin)
/// GET    /{id}              -> get_request
/// PUT    /{id}/review       -> review_request (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(approval::list_requests).post(approval::create_request),
        )
        .route("/pending/count", get(approval::pending_count))
        .route("/{id}", get(approval::get_request))
        .route("/{id}/review", put(approval::review_request))
}
