//! Approval request models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Timestamp};

/// A row from the `approval_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApprovalRequest {
    pub id: DbId,
    pub request_type: String,
    pub requester_id: DbId,
    pub request_data: serde_json::Value,
    pub status: String,
    pub reviewer_id: Option<DbId>,
    pub review_comment: Option<String>,
    pub created_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
}

/// Request body for submitting an approval request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApprovalRequest {
    pub request_type: String,
    pub request_data: serde_json::Value,
}

/// Request body for the review endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewDecision {
    pub approved: bool,
    pub comment: Option<String>,
}

/// Filters for the approval listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApprovalListParams {
    pub status: Option<String>,
    pub request_type: Option<String>,
    /// Forced to the caller's id for non-administrators.
    #[serde(skip)]
    pub requester_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
