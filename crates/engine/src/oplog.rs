//! The operation log collaborator.
//!
//! Entries are written after the business transaction commits. Recording is
//! infallible from the caller's point of view: a failed write is logged and
//! dropped.

use async_trait::async_trait;
use sqlx::PgPool;
use stockroom_db::models::operation_log::CreateOperationLog;
use stockroom_db::repositories::OperationLogRepo;

/// Sink for operation log entries.
#[async_trait]
pub trait OperationLog: Send + Sync {
    async fn record(&self, entry: CreateOperationLog);
}

/// Writes entries to the `operation_logs` table.
#[derive(Clone)]
pub struct PgOperationLog {
    pool: PgPool,
}

impl PgOperationLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OperationLog for PgOperationLog {
    async fn record(&self, entry: CreateOperationLog) {
        if let Err(e) = OperationLogRepo::create(&self.pool, &entry).await {
            tracing::warn!(
                error = %e,
                operation_type = entry.operation_type,
                operator_id = entry.operator_id,
                target_type = entry.target_type,
                target_id = ?entry.target_id,
                "Failed to write operation log entry"
            );
        }
    }
}
