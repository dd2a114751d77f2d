//! Aggregate queries for the dashboard.

use sqlx::PgPool;
use stockroom_core::inventory::{
    OUTBOUND_BORROW, STATUS_IN_STOCK, STATUS_OUT_OF_STOCK, STATUS_PARTIALLY_OUT,
};
use stockroom_core::types::Date;

use crate::models::stats::{CategoryStock, DailyMovement, InventoryOverview, PopularItem};

/// UTC calendar day of a ledger row.
const RECORD_DAY: &str = "(created_at AT TIME ZONE 'UTC')::DATE";

/// Read-only aggregate queries.
pub struct StatsRepo;

impl StatsRepo {
    /// Headline inventory figures. Borrows expected back before `today` are overdue.
    pub async fn overview(pool: &PgPool, today: Date) -> Result<InventoryOverview, sqlx::Error> {
        sqlx::query_as::<_, InventoryOverview>(
            "SELECT
                (SELECT COUNT(*) FROM items) AS total_items,
                (SELECT COUNT(*) FROM items WHERE status IN ($1, $2)) AS in_stock_items,
                (SELECT COUNT(*) FROM items WHERE status = $3) AS out_of_stock_items,
                (SELECT COALESCE(SUM(current_quantity), 0)::BIGINT FROM items) AS total_quantity,
                (SELECT COUNT(*) FROM outbound_records
                  WHERE outbound_type = $4 AND is_returned = FALSE) AS unreturned_borrows,
                (SELECT COUNT(*) FROM outbound_records
                  WHERE outbound_type = $4 AND is_returned = FALSE
                    AND expected_return_date < $5) AS overdue_borrows",
        )
        .bind(STATUS_IN_STOCK)
        .bind(STATUS_PARTIALLY_OUT)
        .bind(STATUS_OUT_OF_STOCK)
        .bind(OUTBOUND_BORROW)
        .bind(today)
        .fetch_one(pool)
        .await
    }

    /// Item counts and quantities per category, in tree order.
    ///
    /// Only items filed directly under a category are counted; empty
    /// categories appear with zeros.
    pub async fn stock_by_category(pool: &PgPool) -> Result<Vec<CategoryStock>, sqlx::Error> {
        sqlx::query_as::<_, CategoryStock>(
            "SELECT
                c.id AS category_id,
                c.name AS category_name,
                c.level,
                COUNT(i.id) AS item_count,
                COALESCE(SUM(i.current_quantity), 0)::BIGINT AS total_quantity,
                COUNT(i.id) FILTER (WHERE i.status = $1) AS in_stock_count,
                COUNT(i.id) FILTER (WHERE i.status = $2) AS partially_out_count,
                COUNT(i.id) FILTER (WHERE i.status = $3) AS out_of_stock_count
             FROM categories c
             LEFT JOIN items i ON i.category_id = c.id
             GROUP BY c.id, c.name, c.level, c.sort_order
             ORDER BY c.level ASC, c.sort_order ASC, c.id ASC",
        )
        .bind(STATUS_IN_STOCK)
        .bind(STATUS_PARTIALLY_OUT)
        .bind(STATUS_OUT_OF_STOCK)
        .fetch_all(pool)
        .await
    }

    /// Inbound records per day from `since` onwards, oldest first.
    pub async fn inbound_trend(
        pool: &PgPool,
        since: Date,
    ) -> Result<Vec<DailyMovement>, sqlx::Error> {
        daily_movements(pool, "inbound_records", since).await
    }

    /// Outbound records per day from `since` onwards, oldest first.
    pub async fn outbound_trend(
        pool: &PgPool,
        since: Date,
    ) -> Result<Vec<DailyMovement>, sqlx::Error> {
        daily_movements(pool, "outbound_records", since).await
    }

    /// Items with the most stock moved in and out, busiest first.
    pub async fn popular_items(pool: &PgPool, limit: i64) -> Result<Vec<PopularItem>, sqlx::Error> {
        sqlx::query_as::<_, PopularItem>(
            "SELECT
                i.id AS item_id,
                i.name,
                i.unique_code,
                c.name AS category_name,
                (i.total_in + i.total_out)::BIGINT AS total_operations,
                i.total_in,
                i.total_out,
                i.current_quantity
             FROM items i
             LEFT JOIN categories c ON c.id = i.category_id
             WHERE i.total_in + i.total_out > 0
             ORDER BY total_operations DESC, i.id ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}

async fn daily_movements(
    pool: &PgPool,
    table: &'static str,
    since: Date,
) -> Result<Vec<DailyMovement>, sqlx::Error> {
    let query = format!(
        "SELECT {RECORD_DAY} AS date,
                COUNT(*) AS count,
                COALESCE(SUM(quantity), 0)::BIGINT AS quantity
         FROM {table}
         WHERE {RECORD_DAY} >= $1
         GROUP BY 1
         ORDER BY 1"
    );
    sqlx::query_as::<_, DailyMovement>(&query)
        .bind(since)
        .fetch_all(pool)
        .await
}
