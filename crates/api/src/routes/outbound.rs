use axum::routing::{get, post};
use axum::Router;

use crate::handlers::outbound;
use crate::state::AppState;

/// Outbound routes mounted at `/outbound`.
///
/// ```text
/// GET    /                            -> list_outbound
/// POST   /                            -> record_outbound
/// GET    /unreturned                  -> list_unreturned
/// GET    /mine                        -> my_borrowings
/// GET    /{id}                        -> get_outbound
/// POST   /{id}/convert-to-transfer    -> convert_to_transfer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(outbound::list_outbound).post(outbound::record_outbound),
        )
        .route("/unreturned", get(outbound::list_unreturned))
        .route("/mine", get(outbound::my_borrowings))
        .route("/{id}", get(outbound::get_outbound))
        .route(
            "/{id}/convert-to-transfer",
            post(outbound::convert_to_transfer),
        )
}
