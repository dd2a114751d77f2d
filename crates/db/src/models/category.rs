//! Category models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::category::CategoryLike;
use stockroom_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
    pub level: i32,
    pub sort_order: i32,
    pub description: Option<String>,
    pub is_stackable: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CategoryLike for Category {
    fn id(&self) -> DbId {
        self.id
    }

    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }

    fn level(&self) -> i32 {
        self.level
    }

    fn sort_order(&self) -> i32 {
        self.sort_order
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// DTO for creating a category. `level` is derived from the parent.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub parent_id: Option<DbId>,
    pub sort_order: Option<i32>,
    pub description: Option<String>,
    pub is_stackable: Option<bool>,
}

/// DTO for updating a category. The parent cannot be changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub sort_order: Option<i32>,
    pub description: Option<String>,
    pub is_stackable: Option<bool>,
}

/// A category in a flat, tree-ordered list with an indented label.
#[derive(Debug, Clone, Serialize)]
pub struct FlatCategory {
    #[serde(flatten)]
    pub category: Category,
    pub display_name: String,
}
