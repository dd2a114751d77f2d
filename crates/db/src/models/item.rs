//! Item ledger models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Timestamp};

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub unique_code: Option<String>,
    pub category_id: DbId,
    pub name: String,
    pub model: Option<String>,
    pub specification: Option<String>,
    pub description: Option<String>,
    pub is_stackable: bool,
    pub current_quantity: i32,
    pub total_in: i32,
    pub total_out: i32,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An item joined with its category name for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ItemWithCategory {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: Item,
    pub category_name: Option<String>,
}

/// Item detail with the category path and the composite label.
#[derive(Debug, Clone, Serialize)]
pub struct ItemDetail {
    #[serde(flatten)]
    pub item: ItemWithCategory,
    pub category_path: Vec<String>,
    pub path_label: String,
}

/// Fully validated insert for the `items` table.
///
/// Built by the engine once the stackable flag, unique code and starting
/// quantity have been checked.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub unique_code: Option<String>,
    pub category_id: DbId,
    pub name: String,
    pub model: Option<String>,
    pub specification: Option<String>,
    pub description: Option<String>,
    pub is_stackable: bool,
    pub quantity: i32,
    pub status: String,
}

/// Request body for creating an item directly.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub unique_code: Option<String>,
    pub category_id: DbId,
    pub name: String,
    pub model: Option<String>,
    pub specification: Option<String>,
    pub description: Option<String>,
    /// Falls back to the category's hint when omitted.
    pub is_stackable: Option<bool>,
    pub initial_stock: Option<i32>,
    pub remarks: Option<String>,
}

/// Metadata patch. Quantities and status are ledger-owned and not editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub model: Option<String>,
    pub specification: Option<String>,
    pub description: Option<String>,
}

/// New stock figures written after a movement.
#[derive(Debug, Clone, Copy)]
pub struct StockLevels<'a> {
    pub current_quantity: i32,
    pub total_in: i32,
    pub total_out: i32,
    pub status: &'a str,
}

/// Filters for the item listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemListParams {
    pub category_id: Option<DbId>,
    pub status: Option<String>,
    /// Matched case-insensitively against name, unique code and model.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Filter for the category-path listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPathParams {
    /// Restrict to this category and its descendants.
    pub category_id: Option<DbId>,
}
