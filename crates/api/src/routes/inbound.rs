use axum::routing::{get, post};
use axum::Router;

use crate::handlers::inbound;
use crate::state::AppState;

/// Inbound routes mounted at `/inbound`.
///
/// ```text
/// GET    /                 -> list_inbound
/// POST   /                 -> record_inbound
/// POST   /batch-return     -> batch_return
/// GET    /{id}             -> get_inbound
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(inbound::list_inbound).post(inbound::record_inbound),
        )
        .route("/batch-return", post(inbound::batch_return))
        .route("/{id}", get(inbound::get_inbound))
}
