pub mod approval;
pub mod category;
pub mod health;
pub mod inbound;
pub mod item;
pub mod operation_log;
pub mod outbound;
pub mod stats;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /categories/...          category tree (mutations admin only)
/// /items/...               item ledger
/// /inbound/...             stock in, returns, batch return
/// /outbound/...            transfers, borrows, conversions
/// /approvals/...           approval workflow
/// /logs/...                operation log, per-target history, statistics
/// /stats/...               overview, by category, trends, popular items
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", category::router())
        .nest("/items", item::router())
        .nest("/inbound", inbound::router())
        .nest("/outbound", outbound::router())
        .nest("/approvals", approval::router())
        .nest("/logs", operation_log::router())
        .nest("/stats", stats::router())
}
