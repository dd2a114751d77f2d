//! The item ledger: creation, metadata edits, deletion and queries.
//!
//! Quantity changes never happen here except for the opening stock of a new
//! item, which is always paired with an `initial` inbound record so that
//! `total_in` equals the sum of the item's inbound records.

use serde_json::json;
use stockroom_core::audit::{OP_EDIT_ITEM, TARGET_ITEM};
use stockroom_core::category::{path_label, path_of};
use stockroom_core::error::CoreError;
use stockroom_core::inventory::{
    initial_status, require_text, validate_unique_code, ItemStatus, NewUniqueItem,
    INBOUND_INITIAL,
};
use stockroom_core::roles::Actor;
use stockroom_core::types::DbId;
use stockroom_db::models::inbound::{InboundRecord, NewInboundRecord};
use stockroom_db::models::item::{
    CategoryPathParams, CreateItem, Item, ItemDetail, ItemListParams, ItemWithCategory, NewItem,
    UpdateItem,
};
use stockroom_db::models::Page;
use stockroom_db::repositories::{CategoryRepo, InboundRepo, ItemRepo};
use stockroom_db::DbTx;

use crate::config::ItemDeletePolicy;
use crate::context::EngineContext;
use crate::error::EngineResult;

#[derive(Clone)]
pub struct ItemLedger {
    ctx: EngineContext,
}

impl ItemLedger {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Create an item directly, optionally with opening stock.
    ///
    /// `is_stackable` falls back to the category's hint.
    pub async fn create(&self, actor: &Actor, input: &CreateItem) -> EngineResult<Item> {
        require_text("Item name", &input.name)?;
        let quantity = input.initial_stock.unwrap_or(0);
        if quantity < 0 {
            return Err(CoreError::BadRequest(format!(
                "Initial stock must not be negative, got {quantity}"
            ))
            .into());
        }

        let category = CategoryRepo::find_by_id(&self.ctx.pool, input.category_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Category",
                id: input.category_id,
            })?;
        let is_stackable = input.is_stackable.unwrap_or(category.is_stackable);
        let unique_code = validate_unique_code(is_stackable, input.unique_code.as_deref())?;

        let new_item = NewItem {
            unique_code,
            category_id: input.category_id,
            name: input.name.trim().to_string(),
            model: input.model.clone(),
            specification: input.specification.clone(),
            description: input.description.clone(),
            is_stackable,
            quantity,
            status: initial_status(quantity).as_str().to_string(),
        };

        let mut tx = self.ctx.begin().await?;
        let (item, _) =
            insert_with_opening_stock(&mut tx, &new_item, actor.user_id, input.remarks.as_deref())
                .await?;
        tx.commit().await?;

        tracing::info!(
            item_id = item.id,
            quantity,
            is_stackable,
            operator_id = actor.user_id,
            "Item created"
        );
        self.ctx
            .log(
                actor,
                OP_EDIT_ITEM,
                TARGET_ITEM,
                Some(item.id),
                json!({
                    "action": "create",
                    "name": item.name,
                    "unique_code": item.unique_code,
                    "initial_stock": quantity,
                }),
            )
            .await;

        Ok(item)
    }

    /// Item with category name, category path and composite label.
    pub async fn get(&self, id: DbId) -> EngineResult<ItemDetail> {
        let item = ItemRepo::find_with_category(&self.ctx.pool, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Item", id })?;

        let categories = CategoryRepo::list_all(&self.ctx.pool).await?;
        let category_path = path_of(item.item.category_id, &categories);
        let path_label = path_label(&category_path, item.item.unique_code.as_deref());

        Ok(ItemDetail {
            item,
            category_path,
            path_label,
        })
    }

    /// Items under a category subtree (or all items), each with its category
    /// path and composite label. Deepest categories come first.
    pub async fn list_by_category_path(
        &self,
        params: &CategoryPathParams,
    ) -> EngineResult<Vec<ItemDetail>> {
        let categories = CategoryRepo::list_all(&self.ctx.pool).await?;
        if let Some(id) = params.category_id {
            if !categories.iter().any(|c| c.id == id) {
                return Err(CoreError::NotFound {
                    entity: "Category",
                    id,
                }
                .into());
            }
        }

        let items = ItemRepo::list_in_subtree(&self.ctx.pool, params.category_id).await?;
        Ok(items
            .into_iter()
            .map(|item| {
                let category_path = path_of(item.item.category_id, &categories);
                let path_label = path_label(&category_path, item.item.unique_code.as_deref());
                ItemDetail {
                    item,
                    category_path,
                    path_label,
                }
            })
            .collect())
    }

    pub async fn list(&self, params: &ItemListParams) -> EngineResult<Page<ItemWithCategory>> {
        if let Some(ref status) = params.status {
            ItemStatus::from_str_value(status)?;
        }
        let items = ItemRepo::list(&self.ctx.pool, params).await?;
        let total = ItemRepo::count(&self.ctx.pool, params).await?;
        Ok(Page { items, total })
    }

    /// Edit descriptive fields. Stock figures are not editable.
    pub async fn update(&self, actor: &Actor, id: DbId, input: &UpdateItem) -> EngineResult<Item> {
        if let Some(ref name) = input.name {
            require_text("Item name", name)?;
        }

        let item = ItemRepo::update_metadata(&self.ctx.pool, id, input)
            .await?
            .ok_or(CoreError::NotFound { entity: "Item", id })?;

        tracing::info!(item_id = id, operator_id = actor.user_id, "Item metadata updated");
        self.ctx
            .log(
                actor,
                OP_EDIT_ITEM,
                TARGET_ITEM,
                Some(id),
                json!({ "action": "update", "name": item.name }),
            )
            .await;

        Ok(item)
    }

    /// Delete an item, subject to [`ItemDeletePolicy`] when it still holds stock.
    pub async fn delete(&self, actor: &Actor, id: DbId) -> EngineResult<()> {
        actor.require_admin()?;

        let mut tx = self.ctx.begin().await?;
        let item = ItemRepo::lock_by_id(&mut tx, id)
            .await?
            .ok_or(CoreError::NotFound { entity: "Item", id })?;

        if item.current_quantity > 0 {
            match self.ctx.config.item_delete_policy {
                ItemDeletePolicy::RejectWithStock => {
                    return Err(CoreError::Conflict(format!(
                        "Item still holds {} unit(s) and cannot be deleted",
                        item.current_quantity
                    ))
                    .into());
                }
                ItemDeletePolicy::AuditOnly => {
                    tracing::warn!(
                        item_id = id,
                        current_quantity = item.current_quantity,
                        operator_id = actor.user_id,
                        "Deleting item that still holds stock"
                    );
                }
            }
        }

        ItemRepo::delete(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(item_id = id, operator_id = actor.user_id, "Item deleted");
        self.ctx
            .log(
                actor,
                OP_EDIT_ITEM,
                TARGET_ITEM,
                Some(id),
                json!({
                    "action": "delete",
                    "name": item.name,
                    "unique_code": item.unique_code,
                    "remaining_quantity": item.current_quantity,
                }),
            )
            .await;

        Ok(())
    }
}

/// Create a non-stackable item and stock it inside the caller's transaction.
pub(crate) async fn create_unique_in_tx(
    tx: &mut DbTx<'_>,
    input: &NewUniqueItem,
    operator_id: DbId,
) -> EngineResult<(Item, InboundRecord)> {
    input.validate()?;

    CategoryRepo::lock_by_id(tx, input.category_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Category",
            id: input.category_id,
        })?;

    let quantity = input.stock();
    let new_item = NewItem {
        unique_code: validate_unique_code(false, Some(&input.unique_code))?,
        category_id: input.category_id,
        name: input.name.trim().to_string(),
        model: input.model.clone(),
        specification: input.specification.clone(),
        description: input.description.clone(),
        is_stackable: false,
        quantity,
        status: initial_status(quantity).as_str().to_string(),
    };

    match insert_with_opening_stock(tx, &new_item, operator_id, input.remarks.as_deref()).await? {
        (item, Some(record)) => Ok((item, record)),
        (_, None) => Err(CoreError::Internal(
            "Unique item was created without an opening inbound record".to_string(),
        )
        .into()),
    }
}

/// Insert an item and, when it opens with stock, its `initial` inbound record.
async fn insert_with_opening_stock(
    tx: &mut DbTx<'_>,
    new_item: &NewItem,
    operator_id: DbId,
    remarks: Option<&str>,
) -> EngineResult<(Item, Option<InboundRecord>)> {
    let item = ItemRepo::create(tx, new_item).await?;
    if new_item.quantity == 0 {
        return Ok((item, None));
    }

    let record = InboundRepo::create(
        tx,
        &NewInboundRecord {
            item_id: item.id,
            unique_code_snapshot: item.unique_code.as_deref(),
            quantity: new_item.quantity,
            inbound_type: INBOUND_INITIAL,
            related_outbound_id: None,
            operator_id,
            remarks,
        },
    )
    .await?;

    Ok((item, Some(record)))
}
