//! Repository for the `categories` table.

use sqlx::PgPool;
use stockroom_core::types::DbId;

use crate::models::category::{Category, CreateCategory, UpdateCategory};
use crate::DbTx;

/// Column list for `categories` queries.
const COLUMNS: &str = "id, name, parent_id, level, sort_order, description, \
    is_stackable, created_at, updated_at";

/// Tree order used by every list query.
const TREE_ORDER: &str = "ORDER BY level ASC, sort_order ASC, id ASC";

/// Provides CRUD operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a category at the given (already computed) level.
    pub async fn create(
        tx: &mut DbTx<'_>,
        input: &CreateCategory,
        level: i32,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, parent_id, level, sort_order, description, is_stackable)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(input.name.trim())
            .bind(input.parent_id)
            .bind(level)
            .bind(input.sort_order.unwrap_or(0))
            .bind(&input.description)
            .bind(input.is_stackable.unwrap_or(false))
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a category by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All categories in tree order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories {TREE_ORDER}");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Root categories only.
    pub async fn list_top_level(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE parent_id IS NULL {TREE_ORDER}");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Direct children of a category.
    pub async fn list_children(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE parent_id = $1 {TREE_ORDER}");
        sqlx::query_as::<_, Category>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await
    }

    /// Partial update. Returns `None` if the category does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                sort_order = COALESCE($3, sort_order),
                description = COALESCE($4, description),
                is_stackable = COALESCE($5, is_stackable)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.sort_order)
            .bind(&input.description)
            .bind(input.is_stackable)
            .fetch_optional(pool)
            .await
    }

    /// Lock a category row for the rest of the transaction.
    pub async fn lock_by_id(tx: &mut DbTx<'_>, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Read a category and keep it from being deleted until the transaction
    /// ends. Concurrent inserts referencing it are not blocked.
    pub async fn share_lock_by_id(
        tx: &mut DbTx<'_>,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 FOR KEY SHARE");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Number of direct child categories.
    pub async fn count_children(tx: &mut DbTx<'_>, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM categories WHERE parent_id = $1")
            .bind(id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Number of items filed directly under the category.
    pub async fn count_items(tx: &mut DbTx<'_>, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items WHERE category_id = $1")
            .bind(id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Hard-delete a category. Returns `true` if a row was removed.
    pub async fn delete(tx: &mut DbTx<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
