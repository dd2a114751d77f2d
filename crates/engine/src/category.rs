//! Category tree maintenance.
//!
//! Mutations are administrator-only. Deletion is guarded inside a
//! transaction that locks the category row before counting its children and
//! items; the `ON DELETE RESTRICT` foreign keys back the guard up.

use serde_json::json;
use stockroom_core::audit::{OP_EDIT_CATEGORY, TARGET_CATEGORY};
use stockroom_core::category::{
    build_tree, compute_level, display_name, flatten_tree, path_of, CategoryTreeNode,
};
use stockroom_core::error::CoreError;
use stockroom_core::inventory::require_text;
use stockroom_core::roles::Actor;
use stockroom_core::types::DbId;
use stockroom_db::models::category::{Category, CreateCategory, FlatCategory, UpdateCategory};
use stockroom_db::repositories::CategoryRepo;

use crate::context::EngineContext;
use crate::error::EngineResult;

#[derive(Clone)]
pub struct CategoryTree {
    ctx: EngineContext,
}

impl CategoryTree {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Create a category; its level is one below the parent's.
    pub async fn create(&self, actor: &Actor, input: &CreateCategory) -> EngineResult<Category> {
        actor.require_admin()?;
        require_text("Category name", &input.name)?;

        let mut tx = self.ctx.begin().await?;
        let parent_level = match input.parent_id {
            Some(parent_id) => {
                let parent = CategoryRepo::share_lock_by_id(&mut tx, parent_id)
                    .await?
                    .ok_or(CoreError::NotFound {
                        entity: "Category",
                        id: parent_id,
                    })?;
                Some(parent.level)
            }
            None => None,
        };
        let level = compute_level(parent_level);

        let category = CategoryRepo::create(&mut tx, input, level).await?;
        tx.commit().await?;

        tracing::info!(
            category_id = category.id,
            parent_id = ?category.parent_id,
            level,
            operator_id = actor.user_id,
            "Category created"
        );
        self.ctx
            .log(
                actor,
                OP_EDIT_CATEGORY,
                TARGET_CATEGORY,
                Some(category.id),
                json!({ "action": "create", "name": category.name, "parent_id": category.parent_id }),
            )
            .await;

        Ok(category)
    }

    /// Partial update of name, sort order, description and stackable hint.
    pub async fn update(
        &self,
        actor: &Actor,
        id: DbId,
        input: &UpdateCategory,
    ) -> EngineResult<Category> {
        actor.require_admin()?;
        if let Some(ref name) = input.name {
            require_text("Category name", name)?;
        }

        let category = CategoryRepo::update(&self.ctx.pool, id, input)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Category",
                id,
            })?;

        tracing::info!(category_id = id, operator_id = actor.user_id, "Category updated");
        self.ctx
            .log(
                actor,
                OP_EDIT_CATEGORY,
                TARGET_CATEGORY,
                Some(id),
                json!({ "action": "update", "name": category.name }),
            )
            .await;

        Ok(category)
    }

    /// Hard-delete a category that has neither child categories nor items.
    pub async fn delete(&self, actor: &Actor, id: DbId) -> EngineResult<()> {
        actor.require_admin()?;

        let mut tx = self.ctx.begin().await?;
        let category = CategoryRepo::lock_by_id(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Category",
                id,
            })?;

        if CategoryRepo::count_children(&mut tx, id).await? > 0 {
            return Err(CoreError::Conflict(
                "Category has child categories and cannot be deleted".to_string(),
            )
            .into());
        }
        if CategoryRepo::count_items(&mut tx, id).await? > 0 {
            return Err(
                CoreError::Conflict("Category still has items and cannot be deleted".to_string())
                    .into(),
            );
        }

        CategoryRepo::delete(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(category_id = id, operator_id = actor.user_id, "Category deleted");
        self.ctx
            .log(
                actor,
                OP_EDIT_CATEGORY,
                TARGET_CATEGORY,
                Some(id),
                json!({ "action": "delete", "name": category.name }),
            )
            .await;

        Ok(())
    }

    pub async fn get(&self, id: DbId) -> EngineResult<Category> {
        CategoryRepo::find_by_id(&self.ctx.pool, id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "Category",
                    id,
                }
                .into()
            })
    }

    /// The whole hierarchy, nested.
    pub async fn list_tree(&self) -> EngineResult<Vec<CategoryTreeNode<Category>>> {
        let all = CategoryRepo::list_all(&self.ctx.pool).await?;
        Ok(build_tree(all))
    }

    /// Depth-first flat list with indented display names.
    pub async fn list_flat(&self) -> EngineResult<Vec<FlatCategory>> {
        let tree = self.list_tree().await?;
        Ok(flatten_tree(tree)
            .into_iter()
            .map(|category| FlatCategory {
                display_name: display_name(&category.name, category.level),
                category,
            })
            .collect())
    }

    pub async fn list_top_level(&self) -> EngineResult<Vec<Category>> {
        Ok(CategoryRepo::list_top_level(&self.ctx.pool).await?)
    }

    pub async fn list_children(&self, id: DbId) -> EngineResult<Vec<Category>> {
        self.get(id).await?;
        Ok(CategoryRepo::list_children(&self.ctx.pool, id).await?)
    }

    /// Names from the root down to `id`.
    pub async fn path_of(&self, id: DbId) -> EngineResult<Vec<String>> {
        let all = CategoryRepo::list_all(&self.ctx.pool).await?;
        if !all.iter().any(|c| c.id == id) {
            return Err(CoreError::NotFound {
                entity: "Category",
                id,
            }
            .into());
        }
        Ok(path_of(id, &all))
    }
}
