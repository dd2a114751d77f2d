//! The outbound engine: transfers, borrows and borrow reclassification.

use serde::Serialize;
use serde_json::json;
use stockroom_core::audit::{OP_OUTBOUND, TARGET_ITEM, TARGET_OUTBOUND_RECORD};
use stockroom_core::error::CoreError;
use stockroom_core::inventory::{
    ensure_sufficient_stock, status_after_outbound, validate_quantity, OutboundType, StockOut,
    OUTBOUND_BORROW, OUTBOUND_TRANSFER,
};
use stockroom_core::roles::Actor;
use stockroom_core::types::DbId;
use stockroom_db::models::item::StockLevels;
use stockroom_db::models::outbound::{
    NewOutboundRecord, OutboundListParams, OutboundRecord, OutboundRecordWithItem,
};
use stockroom_db::models::Page;
use stockroom_db::repositories::{ItemRepo, OutboundRepo};
use stockroom_db::DbTx;

use crate::context::EngineContext;
use crate::error::EngineResult;

/// Result of a committed outbound movement.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundReceipt {
    pub outbound_id: DbId,
    pub item_id: DbId,
    pub new_quantity: i32,
    pub status: String,
}

#[derive(Clone)]
pub struct OutboundEngine {
    ctx: EngineContext,
}

impl OutboundEngine {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Record an outbound movement with `actor` as the operator.
    pub async fn record(&self, actor: &Actor, cmd: &StockOut) -> EngineResult<OutboundReceipt> {
        let mut tx = self.ctx.begin().await?;
        let receipt = apply_stock_out(&mut tx, cmd, actor.user_id).await?;
        tx.commit().await?;

        tracing::info!(
            outbound_id = receipt.outbound_id,
            item_id = receipt.item_id,
            quantity = cmd.quantity,
            outbound_type = cmd.outbound_type.as_str(),
            new_quantity = receipt.new_quantity,
            operator_id = actor.user_id,
            "Outbound recorded"
        );
        self.ctx
            .log(
                actor,
                OP_OUTBOUND,
                TARGET_ITEM,
                Some(receipt.item_id),
                json!({
                    "outbound_id": receipt.outbound_id,
                    "quantity": cmd.quantity,
                    "outbound_type": cmd.outbound_type.as_str(),
                    "borrower_name": cmd.borrower_name,
                }),
            )
            .await;

        Ok(receipt)
    }

    /// Turn a borrow into a permanent transfer. Quantities are untouched.
    ///
    /// Only the operator who recorded the borrow or an administrator may
    /// convert it. Converting a record that is already a transfer is a no-op.
    pub async fn convert_borrow_to_transfer(
        &self,
        actor: &Actor,
        outbound_id: DbId,
    ) -> EngineResult<OutboundRecord> {
        let mut tx = self.ctx.begin().await?;
        let record = OutboundRepo::lock_by_id(&mut tx, outbound_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "OutboundRecord",
                id: outbound_id,
            })?;

        if record.operator_id != actor.user_id && !actor.is_admin() {
            return Err(CoreError::Forbidden(
                "Only the operator of a borrow or an administrator can convert it".to_string(),
            )
            .into());
        }
        if record.outbound_type == OUTBOUND_TRANSFER {
            return Ok(record);
        }
        if record.is_returned {
            return Err(CoreError::Conflict(format!(
                "Outbound record {outbound_id} has already been returned"
            ))
            .into());
        }

        let converted = OutboundRepo::convert_to_transfer(&mut tx, outbound_id).await?;
        tx.commit().await?;

        tracing::info!(outbound_id, operator_id = actor.user_id, "Borrow converted to transfer");
        self.ctx
            .log(
                actor,
                OP_OUTBOUND,
                TARGET_OUTBOUND_RECORD,
                Some(outbound_id),
                json!({ "action": "convert_to_transfer", "item_id": converted.item_id }),
            )
            .await;

        Ok(converted)
    }

    pub async fn get(&self, id: DbId) -> EngineResult<OutboundRecordWithItem> {
        OutboundRepo::find_by_id(&self.ctx.pool, id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "OutboundRecord",
                    id,
                }
                .into()
            })
    }

    pub async fn list(
        &self,
        params: &OutboundListParams,
    ) -> EngineResult<Page<OutboundRecordWithItem>> {
        if let Some(ref outbound_type) = params.outbound_type {
            OutboundType::from_str_value(outbound_type)?;
        }
        let items = OutboundRepo::list(&self.ctx.pool, params).await?;
        let total = OutboundRepo::count(&self.ctx.pool, params).await?;
        Ok(Page { items, total })
    }

    /// Borrows recorded by `actor`, returned or not.
    pub async fn my_borrowings(
        &self,
        actor: &Actor,
        params: &OutboundListParams,
    ) -> EngineResult<Page<OutboundRecordWithItem>> {
        let params = OutboundListParams {
            operator_id: Some(actor.user_id),
            outbound_type: Some(OUTBOUND_BORROW.to_string()),
            ..params.clone()
        };
        self.list(&params).await
    }

    /// Open borrows ordered by expected return date.
    pub async fn unreturned_borrows(&self) -> EngineResult<Vec<OutboundRecordWithItem>> {
        Ok(OutboundRepo::list_unreturned_borrows(&self.ctx.pool).await?)
    }
}

/// Apply an outbound movement inside the caller's transaction.
///
/// Shared by the direct path and approval review.
pub(crate) async fn apply_stock_out(
    tx: &mut DbTx<'_>,
    cmd: &StockOut,
    operator_id: DbId,
) -> EngineResult<OutboundReceipt> {
    let item = ItemRepo::lock_by_id(tx, cmd.item_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Item",
            id: cmd.item_id,
        })?;

    validate_quantity(cmd.quantity)?;
    ensure_sufficient_stock(item.current_quantity, cmd.quantity)?;
    let borrower = cmd.borrower()?;

    let new_quantity = item.current_quantity - cmd.quantity;
    let total_out = item
        .total_out
        .checked_add(cmd.quantity)
        .ok_or_else(|| CoreError::BadRequest("Quantity is too large".to_string()))?;

    let (name, phone, email) = match borrower {
        Some(ref b) => (Some(b.name.as_str()), Some(b.phone.as_str()), Some(b.email.as_str())),
        None => (
            cmd.borrower_name.as_deref(),
            cmd.borrower_phone.as_deref(),
            cmd.borrower_email.as_deref(),
        ),
    };
    let expected_return_date = match cmd.outbound_type {
        OutboundType::Borrow => cmd.expected_return_date,
        OutboundType::Transfer => None,
    };

    let record = OutboundRepo::create(
        tx,
        &NewOutboundRecord {
            item_id: item.id,
            unique_code_snapshot: item.unique_code.as_deref(),
            quantity: cmd.quantity,
            outbound_type: cmd.outbound_type.as_str(),
            borrower_name: name,
            borrower_phone: phone,
            borrower_email: email,
            expected_return_date,
            operator_id,
            remarks: cmd.remarks.as_deref(),
        },
    )
    .await?;

    let status = status_after_outbound(new_quantity);
    let updated = ItemRepo::update_stock(
        tx,
        item.id,
        StockLevels {
            current_quantity: new_quantity,
            total_in: item.total_in,
            total_out,
            status: status.as_str(),
        },
    )
    .await?;

    Ok(OutboundReceipt {
        outbound_id: record.id,
        item_id: updated.id,
        new_quantity: updated.current_quantity,
        status: updated.status,
    })
}
