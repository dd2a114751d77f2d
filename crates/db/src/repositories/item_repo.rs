//! Repository for the `items` table.
//!
//! Quantity columns are only written through [`ItemRepo::update_stock`],
//! which callers invoke while holding the row lock from
//! [`ItemRepo::lock_by_id`].

use sqlx::PgPool;
use stockroom_core::types::DbId;

use crate::models::item::{Item, ItemListParams, ItemWithCategory, NewItem, StockLevels, UpdateItem};
use crate::repositories::filter::{like_pattern, BindValue, Filter};
use crate::{clamp_limit, clamp_offset, DbTx};

/// Column list for `items` queries.
const COLUMNS: &str = "id, unique_code, category_id, name, model, specification, \
    description, is_stackable, current_quantity, total_in, total_out, status, \
    created_at, updated_at";

/// Column list for `items i LEFT JOIN categories c` queries.
const JOINED_COLUMNS: &str = "i.id, i.unique_code, i.category_id, i.name, i.model, \
    i.specification, i.description, i.is_stackable, i.current_quantity, i.total_in, \
    i.total_out, i.status, i.created_at, i.updated_at, c.name AS category_name";

const JOIN: &str = "items i LEFT JOIN categories c ON c.id = i.category_id";

/// Provides ledger-aware CRUD operations for items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert an item whose opening quantity counts towards `total_in`.
    pub async fn create(tx: &mut DbTx<'_>, input: &NewItem) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items
                (unique_code, category_id, name, model, specification, description,
                 is_stackable, current_quantity, total_in, total_out, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8, 0, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(&input.unique_code)
            .bind(input.category_id)
            .bind(&input.name)
            .bind(&input.model)
            .bind(&input.specification)
            .bind(&input.description)
            .bind(input.is_stackable)
            .bind(input.quantity)
            .bind(&input.status)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find an item by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an item together with its category name.
    pub async fn find_with_category(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ItemWithCategory>, sqlx::Error> {
        let query = format!("SELECT {JOINED_COLUMNS} FROM {JOIN} WHERE i.id = $1");
        sqlx::query_as::<_, ItemWithCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock an item row for a read-modify-write of its quantities.
    pub async fn lock_by_id(tx: &mut DbTx<'_>, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Write new quantities and status for a locked item.
    pub async fn update_stock(
        tx: &mut DbTx<'_>,
        id: DbId,
        levels: StockLevels<'_>,
    ) -> Result<Item, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                current_quantity = $2,
                total_in = $3,
                total_out = $4,
                status = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(levels.current_quantity)
            .bind(levels.total_in)
            .bind(levels.total_out)
            .bind(levels.status)
            .fetch_one(&mut **tx)
            .await
    }

    /// Patch descriptive fields. Returns `None` if the item does not exist.
    pub async fn update_metadata(
        pool: &PgPool,
        id: DbId,
        input: &UpdateItem,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                name = COALESCE($2, name),
                model = COALESCE($3, model),
                specification = COALESCE($4, specification),
                description = COALESCE($5, description)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.model)
            .bind(&input.specification)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete an item. Ledger rows keep their snapshot and lose the link.
    pub async fn delete(tx: &mut DbTx<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Filtered, paginated listing, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &ItemListParams,
    ) -> Result<Vec<ItemWithCategory>, sqlx::Error> {
        let filter = build_item_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOIN} {} \
             ORDER BY i.created_at DESC, i.id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_rows(sqlx::query_as::<_, ItemWithCategory>(&query))
            .bind(clamp_limit(params.limit))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Items filed under `root` or any of its descendants (every item when
    /// `root` is `None`), deepest categories first, then by category and
    /// unique code.
    pub async fn list_in_subtree(
        pool: &PgPool,
        root: Option<DbId>,
    ) -> Result<Vec<ItemWithCategory>, sqlx::Error> {
        let query = format!(
            "WITH RECURSIVE subtree AS (
                SELECT id FROM categories WHERE id = $1
                UNION
                SELECT child.id FROM categories child
                JOIN subtree ON child.parent_id = subtree.id
             )
             SELECT {JOINED_COLUMNS} FROM {JOIN}
             WHERE $1::BIGINT IS NULL OR i.category_id IN (SELECT id FROM subtree)
             ORDER BY c.level DESC, i.category_id ASC, i.unique_code ASC NULLS LAST, i.id ASC"
        );
        sqlx::query_as::<_, ItemWithCategory>(&query)
            .bind(root)
            .fetch_all(pool)
            .await
    }

    /// Number of items matching the listing filters.
    pub async fn count(pool: &PgPool, params: &ItemListParams) -> Result<i64, sqlx::Error> {
        let filter = build_item_filter(params);
        let query = format!("SELECT COUNT(*) FROM {JOIN} {}", filter.where_clause());
        filter
            .bind_count(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }
}

fn build_item_filter(params: &ItemListParams) -> Filter {
    let mut filter = Filter::default();

    if let Some(category_id) = params.category_id {
        filter.push(|i| format!("i.category_id = ${i}"), BindValue::BigInt(category_id));
    }
    if let Some(ref status) = params.status {
        filter.push(|i| format!("i.status = ${i}"), BindValue::Text(status.clone()));
    }
    if let Some(search) = params.search.as_deref().filter(|s| !s.trim().is_empty()) {
        filter.push(
            |i| format!("(i.name ILIKE ${i} OR i.unique_code ILIKE ${i} OR i.model ILIKE ${i})"),
            BindValue::Text(like_pattern(search)),
        );
    }

    filter
}
