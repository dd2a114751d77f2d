//! Repository for the `approval_requests` table.

use sqlx::PgPool;
use stockroom_core::approval::STATUS_PENDING;
use stockroom_core::types::DbId;

use crate::models::approval::{ApprovalListParams, ApprovalRequest};
use crate::repositories::filter::{BindValue, Filter};
use crate::{clamp_limit, clamp_offset, DbTx};

/// Column list for `approval_requests` queries.
const COLUMNS: &str = "id, request_type, requester_id, request_data, status, \
    reviewer_id, review_comment, created_at, reviewed_at";

/// Provides storage for approval requests and their single review.
pub struct ApprovalRepo;

impl ApprovalRepo {
    /// Insert a pending request.
    pub async fn create(
        pool: &PgPool,
        request_type: &str,
        requester_id: DbId,
        request_data: &serde_json::Value,
    ) -> Result<ApprovalRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO approval_requests (request_type, requester_id, request_data)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApprovalRequest>(&query)
            .bind(request_type)
            .bind(requester_id)
            .bind(request_data)
            .fetch_one(pool)
            .await
    }

    /// Find a request by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ApprovalRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM approval_requests WHERE id = $1");
        sqlx::query_as::<_, ApprovalRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock a request row for review.
    pub async fn lock_by_id(
        tx: &mut DbTx<'_>,
        id: DbId,
    ) -> Result<Option<ApprovalRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM approval_requests WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, ApprovalRequest>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Record the review decision on a locked, pending request.
    pub async fn mark_reviewed(
        tx: &mut DbTx<'_>,
        id: DbId,
        status: &str,
        reviewer_id: DbId,
        comment: Option<&str>,
    ) -> Result<ApprovalRequest, sqlx::Error> {
        let query = format!(
            "UPDATE approval_requests
             SET status = $2, reviewer_id = $3, review_comment = $4, reviewed_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApprovalRequest>(&query)
            .bind(id)
            .bind(status)
            .bind(reviewer_id)
            .bind(comment)
            .fetch_one(&mut **tx)
            .await
    }

    /// Number of requests awaiting review.
    pub async fn count_pending(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM approval_requests WHERE status = $1")
            .bind(STATUS_PENDING)
            .fetch_one(pool)
            .await
    }

    /// Filtered, paginated listing, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &ApprovalListParams,
    ) -> Result<Vec<ApprovalRequest>, sqlx::Error> {
        let filter = build_approval_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM approval_requests {} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_rows(sqlx::query_as::<_, ApprovalRequest>(&query))
            .bind(clamp_limit(params.limit))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Number of requests matching the listing filters.
    pub async fn count(pool: &PgPool, params: &ApprovalListParams) -> Result<i64, sqlx::Error> {
        let filter = build_approval_filter(params);
        let query = format!(
            "SELECT COUNT(*) FROM approval_requests {}",
            filter.where_clause()
        );
        filter
            .bind_count(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }
}

fn build_approval_filter(params: &ApprovalListParams) -> Filter {
    let mut filter = Filter::default();
    if let Some(ref status) = params.status {
        filter.push(|i| format!("status = ${i}"), BindValue::Text(status.clone()));
    }
    if let Some(ref request_type) = params.request_type {
        filter.push(
            |i| format!("request_type = ${i}"),
            BindValue::Text(request_type.clone()),
        );
    }
    if let Some(requester_id) = params.requester_id {
        filter.push(|i| format!("requester_id = ${i}"), BindValue::BigInt(requester_id));
    }
    filter
}
