//! Repository for the `operation_logs` table.

use sqlx::PgPool;
use stockroom_core::types::DbId;

use crate::models::operation_log::{
    CreateOperationLog, DailyOperationCount, OperationLogQuery, OperationLogRecord,
    OperationStatsParams, OperatorOperationCount,
};
use crate::repositories::filter::{BindValue, Filter};
use crate::{clamp_limit, clamp_offset};

/// Column list for `operation_logs` queries.
const COLUMNS: &str = "id, operation_type, operator_id, target_type, target_id, \
    detail, ip_address, created_at";

/// Date window shared by the statistics queries; `$1` and `$2` are optional
/// inclusive UTC days.
const STATS_WINDOW: &str = "($1::DATE IS NULL OR (created_at AT TIME ZONE 'UTC')::DATE >= $1) \
    AND ($2::DATE IS NULL OR (created_at AT TIME ZONE 'UTC')::DATE <= $2)";

/// Provides insert and query operations for the operation log.
pub struct OperationLogRepo;

impl OperationLogRepo {
    /// Append one log entry.
    pub async fn create(
        pool: &PgPool,
        entry: &CreateOperationLog,
    ) -> Result<OperationLogRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO operation_logs
                (operation_type, operator_id, target_type, target_id, detail, ip_address)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OperationLogRecord>(&query)
            .bind(entry.operation_type)
            .bind(entry.operator_id)
            .bind(entry.target_type)
            .bind(entry.target_id)
            .bind(&entry.detail)
            .bind(&entry.ip_address)
            .fetch_one(pool)
            .await
    }

    /// Query log entries with filtering and pagination, newest first.
    pub async fn query(
        pool: &PgPool,
        params: &OperationLogQuery,
    ) -> Result<Vec<OperationLogRecord>, sqlx::Error> {
        let filter = build_log_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {COLUMNS} FROM operation_logs {} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_rows(sqlx::query_as::<_, OperationLogRecord>(&query))
            .bind(clamp_limit(params.limit))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Count entries matching the filter (for pagination metadata).
    pub async fn count(pool: &PgPool, params: &OperationLogQuery) -> Result<i64, sqlx::Error> {
        let filter = build_log_filter(params);
        let query = format!("SELECT COUNT(*) FROM operation_logs {}", filter.where_clause());
        filter
            .bind_count(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Full history of one target, newest first.
    pub async fn list_for_target(
        pool: &PgPool,
        target_type: &str,
        target_id: DbId,
    ) -> Result<Vec<OperationLogRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM operation_logs
             WHERE target_type = $1 AND target_id = $2
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, OperationLogRecord>(&query)
            .bind(target_type)
            .bind(target_id)
            .fetch_all(pool)
            .await
    }

    /// Entry counts per day and operation type, newest day first.
    pub async fn daily_counts(
        pool: &PgPool,
        params: &OperationStatsParams,
    ) -> Result<Vec<DailyOperationCount>, sqlx::Error> {
        let query = format!(
            "SELECT (created_at AT TIME ZONE 'UTC')::DATE AS date, operation_type, COUNT(*) AS count
             FROM operation_logs
             WHERE {STATS_WINDOW}
             GROUP BY 1, 2
             ORDER BY 1 DESC, 2 ASC"
        );
        sqlx::query_as::<_, DailyOperationCount>(&query)
            .bind(params.from)
            .bind(params.to)
            .fetch_all(pool)
            .await
    }

    /// Entry counts per operator and operation type, most active first.
    pub async fn operator_counts(
        pool: &PgPool,
        params: &OperationStatsParams,
    ) -> Result<Vec<OperatorOperationCount>, sqlx::Error> {
        let query = format!(
            "SELECT operator_id, operation_type, COUNT(*) AS count
             FROM operation_logs
             WHERE {STATS_WINDOW}
             GROUP BY 1, 2
             ORDER BY 3 DESC, 1 ASC, 2 ASC"
        );
        sqlx::query_as::<_, OperatorOperationCount>(&query)
            .bind(params.from)
            .bind(params.to)
            .fetch_all(pool)
            .await
    }
}

fn build_log_filter(params: &OperationLogQuery) -> Filter {
    let mut filter = Filter::default();

    if let Some(ref operation_type) = params.operation_type {
        filter.push(
            |i| format!("operation_type = ${i}"),
            BindValue::Text(operation_type.clone()),
        );
    }
    if let Some(operator_id) = params.operator_id {
        filter.push(|i| format!("operator_id = ${i}"), BindValue::BigInt(operator_id));
    }
    if let Some(ref target_type) = params.target_type {
        filter.push(
            |i| format!("target_type = ${i}"),
            BindValue::Text(target_type.clone()),
        );
    }
    if let Some(from) = params.from {
        filter.push(|i| format!("created_at >= ${i}"), BindValue::Timestamp(from));
    }
    if let Some(to) = params.to {
        filter.push(|i| format!("created_at <= ${i}"), BindValue::Timestamp(to));
    }

    filter
}
