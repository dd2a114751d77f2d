use std::sync::Arc;

use sqlx::PgPool;
use stockroom_core::roles::Actor;
use stockroom_core::types::DbId;
use stockroom_db::models::operation_log::CreateOperationLog;
use stockroom_db::DbTx;

use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::oplog::OperationLog;

/// Shared handles every engine component works through.
#[derive(Clone)]
pub struct EngineContext {
    pub pool: PgPool,
    pub oplog: Arc<dyn OperationLog>,
    pub config: Arc<EngineConfig>,
}

impl EngineContext {
    pub fn new(pool: PgPool, oplog: Arc<dyn OperationLog>, config: EngineConfig) -> Self {
        Self {
            pool,
            oplog,
            config: Arc::new(config),
        }
    }

    /// Open a transaction whose lock waits are bounded by `lock_timeout_ms`.
    ///
    /// A wait that exceeds the timeout fails the statement with SQLSTATE
    /// `55P03` and the whole transaction rolls back on drop.
    pub async fn begin(&self) -> EngineResult<DbTx<'static>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SELECT set_config('lock_timeout', $1, true)")
            .bind(format!("{}ms", self.config.lock_timeout_ms))
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// Hand an entry to the operation log after a commit.
    pub async fn log(
        &self,
        actor: &Actor,
        operation_type: &'static str,
        target_type: &'static str,
        target_id: Option<DbId>,
        detail: serde_json::Value,
    ) {
        self.oplog
            .record(CreateOperationLog {
                operation_type,
                operator_id: actor.user_id,
                target_type,
                target_id,
                detail,
                ip_address: actor.ip_address.clone(),
            })
            .await;
    }
}
