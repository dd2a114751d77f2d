//! Read-only reporting: dashboard figures and the operation log.

use stockroom_core::audit::{
    is_valid_operation_type, is_valid_target_type, VALID_OPERATION_TYPES, VALID_TARGET_TYPES,
};
use stockroom_core::error::CoreError;
use stockroom_core::types::{Date, DbId};
use stockroom_db::models::operation_log::{
    OperationLogQuery, OperationLogRecord, OperationStatistics, OperationStatsParams,
};
use stockroom_db::models::stats::{
    CategoryStock, InventoryOverview, MovementTrends, PopularItem, PopularItemsParams,
    TrendParams,
};
use stockroom_db::models::Page;
use stockroom_db::repositories::{OperationLogRepo, StatsRepo};

use crate::context::EngineContext;
use crate::error::EngineResult;

pub const DEFAULT_TREND_DAYS: i64 = 30;
pub const MAX_TREND_DAYS: i64 = 366;
pub const DEFAULT_POPULAR_LIMIT: i64 = 10;
pub const MAX_POPULAR_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct Reports {
    ctx: EngineContext,
}

impl Reports {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Headline figures; borrows due before `today` count as overdue.
    pub async fn overview(&self, today: Date) -> EngineResult<InventoryOverview> {
        Ok(StatsRepo::overview(&self.ctx.pool, today).await?)
    }

    pub async fn stock_by_category(&self) -> EngineResult<Vec<CategoryStock>> {
        Ok(StatsRepo::stock_by_category(&self.ctx.pool).await?)
    }

    /// Daily inbound and outbound activity over the last `days` days
    /// (default 30), counting back from `today`.
    pub async fn movement_trends(
        &self,
        params: &TrendParams,
        today: Date,
    ) -> EngineResult<MovementTrends> {
        let days = params.days.unwrap_or(DEFAULT_TREND_DAYS);
        if !(1..=MAX_TREND_DAYS).contains(&days) {
            return Err(CoreError::BadRequest(format!(
                "days must be between 1 and {MAX_TREND_DAYS}, got {days}"
            ))
            .into());
        }
        let since = today - chrono::Duration::days(days);

        let inbound = StatsRepo::inbound_trend(&self.ctx.pool, since).await?;
        let outbound = StatsRepo::outbound_trend(&self.ctx.pool, since).await?;
        Ok(MovementTrends {
            since,
            inbound,
            outbound,
        })
    }

    pub async fn popular_items(
        &self,
        params: &PopularItemsParams,
    ) -> EngineResult<Vec<PopularItem>> {
        let limit = params
            .limit
            .unwrap_or(DEFAULT_POPULAR_LIMIT)
            .clamp(1, MAX_POPULAR_LIMIT);
        Ok(StatsRepo::popular_items(&self.ctx.pool, limit).await?)
    }

    /// Filtered, paginated operation log, newest first.
    pub async fn list_logs(
        &self,
        params: &OperationLogQuery,
    ) -> EngineResult<Page<OperationLogRecord>> {
        if let Some(ref op) = params.operation_type {
            if !is_valid_operation_type(op) {
                return Err(CoreError::BadRequest(format!(
                    "Invalid operation_type '{op}'. Must be one of: {}",
                    VALID_OPERATION_TYPES.join(", ")
                ))
                .into());
            }
        }
        let items = OperationLogRepo::query(&self.ctx.pool, params).await?;
        let total = OperationLogRepo::count(&self.ctx.pool, params).await?;
        Ok(Page { items, total })
    }

    /// Every log entry about one target, newest first.
    pub async fn target_history(
        &self,
        target_type: &str,
        target_id: DbId,
    ) -> EngineResult<Vec<OperationLogRecord>> {
        if !is_valid_target_type(target_type) {
            return Err(CoreError::BadRequest(format!(
                "Invalid target_type '{target_type}'. Must be one of: {}",
                VALID_TARGET_TYPES.join(", ")
            ))
            .into());
        }
        Ok(OperationLogRepo::list_for_target(&self.ctx.pool, target_type, target_id).await?)
    }

    /// Entry counts by day and operation type, and by operator.
    pub async fn operation_statistics(
        &self,
        params: &OperationStatsParams,
    ) -> EngineResult<OperationStatistics> {
        if let (Some(from), Some(to)) = (params.from, params.to) {
            if from > to {
                return Err(CoreError::BadRequest(format!(
                    "from ({from}) must not be after to ({to})"
                ))
                .into());
            }
        }
        let by_day = OperationLogRepo::daily_counts(&self.ctx.pool, params).await?;
        let by_operator = OperationLogRepo::operator_counts(&self.ctx.pool, params).await?;
        Ok(OperationStatistics {
            by_day,
            by_operator,
        })
    }
}
