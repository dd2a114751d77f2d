//! Aggregate read models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{Date, DbId};

/// Headline figures for the overview dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryOverview {
    pub total_items: i64,
    /// Items whose status is `in_stock` or `partially_out`.
    pub in_stock_items: i64,
    pub out_of_stock_items: i64,
    pub total_quantity: i64,
    pub unreturned_borrows: i64,
    pub overdue_borrows: i64,
}

/// Stock held under one category (items filed directly in it).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryStock {
    pub category_id: DbId,
    pub category_name: String,
    pub level: i32,
    pub item_count: i64,
    pub total_quantity: i64,
    pub in_stock_count: i64,
    pub partially_out_count: i64,
    pub out_of_stock_count: i64,
}

/// Movements recorded on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct DailyMovement {
    pub date: Date,
    /// Number of ledger records.
    pub count: i64,
    /// Units moved.
    pub quantity: i64,
}

/// Daily inbound and outbound series over the same window.
#[derive(Debug, Clone, Serialize)]
pub struct MovementTrends {
    pub since: Date,
    pub inbound: Vec<DailyMovement>,
    pub outbound: Vec<DailyMovement>,
}

/// An item ranked by how much stock has moved through it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PopularItem {
    pub item_id: DbId,
    pub name: String,
    pub unique_code: Option<String>,
    pub category_name: Option<String>,
    /// `total_in + total_out`.
    pub total_operations: i64,
    pub total_in: i32,
    pub total_out: i32,
    pub current_quantity: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendParams {
    /// Window length in days, ending today.
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PopularItemsParams {
    pub limit: Option<i64>,
}
