//! Transactional inventory engine.
//!
//! Every stock-mutating operation runs in one PostgreSQL transaction that
//! holds `FOR UPDATE` locks on the rows it reads and writes, with a bounded
//! `lock_timeout`. Operation log entries are written after commit.
//!
//! Components:
//! - [`CategoryTree`]: category hierarchy
//! - [`ItemLedger`]: item creation, metadata, deletion, queries
//! - [`InboundEngine`]: stock increases and returns
//! - [`OutboundEngine`]: transfers and borrows
//! - [`ApprovalWorkflow`]: deferred intents and their review
//! - [`Reports`]: dashboard figures and the operation log

use std::sync::Arc;

use sqlx::PgPool;

pub mod approval;
pub mod category;
pub mod config;
pub mod context;
pub mod error;
pub mod inbound;
pub mod item;
pub mod oplog;
pub mod outbound;
pub mod reports;

pub use approval::ApprovalWorkflow;
pub use category::CategoryTree;
pub use config::{EngineConfig, ItemDeletePolicy};
pub use context::EngineContext;
pub use error::{EngineError, EngineResult};
pub use inbound::InboundEngine;
pub use item::ItemLedger;
pub use oplog::{OperationLog, PgOperationLog};
pub use outbound::OutboundEngine;
pub use reports::Reports;

/// All engine components over one shared context.
#[derive(Clone)]
pub struct Engine {
    pub categories: CategoryTree,
    pub items: ItemLedger,
    pub inbound: InboundEngine,
    pub outbound: OutboundEngine,
    pub approvals: ApprovalWorkflow,
    pub reports: Reports,
}

impl Engine {
    pub fn new(pool: PgPool, oplog: Arc<dyn OperationLog>, config: EngineConfig) -> Self {
        let ctx = EngineContext::new(pool, oplog, config);
        Self {
            categories: CategoryTree::new(ctx.clone()),
            items: ItemLedger::new(ctx.clone()),
            inbound: InboundEngine::new(ctx.clone()),
            outbound: OutboundEngine::new(ctx.clone()),
            approvals: ApprovalWorkflow::new(ctx.clone()),
            reports: Reports::new(ctx),
        }
    }

    /// Engine writing its operation log to the same database.
    pub fn with_pg_log(pool: PgPool, config: EngineConfig) -> Self {
        let oplog = Arc::new(PgOperationLog::new(pool.clone()));
        Self::new(pool, oplog, config)
    }
}
