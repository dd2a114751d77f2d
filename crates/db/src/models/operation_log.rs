//! Operation log models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{Date, DbId, Timestamp};

/// A row from the `operation_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OperationLogRecord {
    pub id: DbId,
    pub operation_type: String,
    pub operator_id: DbId,
    pub target_type: String,
    pub target_id: Option<DbId>,
    pub detail: serde_json::Value,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
}

/// Insert for the `operation_logs` table.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOperationLog {
    pub operation_type: &'static str,
    pub operator_id: DbId,
    pub target_type: &'static str,
    pub target_id: Option<DbId>,
    pub detail: serde_json::Value,
    pub ip_address: Option<String>,
}

/// Filters for the operation log listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationLogQuery {
    pub operation_type: Option<String>,
    pub operator_id: Option<DbId>,
    pub target_type: Option<String>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Date window for operation statistics. Both bounds are inclusive UTC days.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationStatsParams {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

/// Entries of one operation type on one UTC day.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct DailyOperationCount {
    pub date: Date,
    pub operation_type: String,
    pub count: i64,
}

/// Entries of one operation type by one operator.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct OperatorOperationCount {
    pub operator_id: DbId,
    pub operation_type: String,
    pub count: i64,
}

/// Activity breakdown over a date window.
#[derive(Debug, Clone, Serialize)]
pub struct OperationStatistics {
    pub by_day: Vec<DailyOperationCount>,
    pub by_operator: Vec<OperatorOperationCount>,
}
