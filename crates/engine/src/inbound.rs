//! The inbound engine: stock increases and returns of borrowed stock.
//!
//! Lock order is item row first, then the related outbound row. The batch
//! return follows the same order so it cannot deadlock against single
//! returns.

use serde::Serialize;
use serde_json::json;
use sqlx::Connection;
use stockroom_core::audit::{OP_INBOUND, TARGET_ITEM};
use stockroom_core::error::CoreError;
use stockroom_core::inventory::{
    status_after_inbound, validate_quantity, InboundType, StockIn, OUTBOUND_BORROW,
};
use stockroom_core::roles::Actor;
use stockroom_core::types::{Date, DbId};
use stockroom_db::models::inbound::{
    InboundListParams, InboundRecord, InboundRecordWithItem, NewInboundRecord,
};
use stockroom_db::models::item::StockLevels;
use stockroom_db::models::Page;
use stockroom_db::repositories::{InboundRepo, ItemRepo, OutboundRepo};
use stockroom_db::DbTx;

use crate::context::EngineContext;
use crate::error::{EngineError, EngineResult};

/// Result of a committed inbound movement.
#[derive(Debug, Clone, Serialize)]
pub struct InboundReceipt {
    pub inbound_id: DbId,
    pub item_id: DbId,
    pub new_quantity: i32,
    pub status: String,
}

/// One element of a batch return that could not be applied.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReturnFailure {
    pub outbound_id: DbId,
    pub code: &'static str,
    pub error: String,
}

/// Per-element outcome of a batch return.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReturnReport {
    pub returned: Vec<InboundReceipt>,
    pub failed: Vec<BatchReturnFailure>,
}

#[derive(Clone)]
pub struct InboundEngine {
    ctx: EngineContext,
}

impl InboundEngine {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Record an inbound movement with `actor` as the operator.
    pub async fn record(&self, actor: &Actor, cmd: &StockIn) -> EngineResult<InboundReceipt> {
        let today = chrono::Utc::now().date_naive();

        let mut tx = self.ctx.begin().await?;
        let receipt = apply_stock_in(&mut tx, cmd, actor.user_id, today).await?;
        tx.commit().await?;

        tracing::info!(
            inbound_id = receipt.inbound_id,
            item_id = receipt.item_id,
            quantity = cmd.quantity,
            inbound_type = cmd.inbound_type.as_str(),
            new_quantity = receipt.new_quantity,
            operator_id = actor.user_id,
            "Inbound recorded"
        );
        self.ctx
            .log(
                actor,
                OP_INBOUND,
                TARGET_ITEM,
                Some(receipt.item_id),
                json!({
                    "inbound_id": receipt.inbound_id,
                    "quantity": cmd.quantity,
                    "inbound_type": cmd.inbound_type.as_str(),
                    "related_outbound_id": cmd.related_outbound_id,
                }),
            )
            .await;

        Ok(receipt)
    }

    /// Return several borrows in one transaction.
    ///
    /// Ids are processed ascending with duplicates removed. Each element runs
    /// under a savepoint: a domain failure (missing, not the caller's,
    /// already returned) rolls back that element only and is reported, while
    /// a database failure aborts the whole batch.
    pub async fn batch_return(
        &self,
        actor: &Actor,
        outbound_ids: &[DbId],
        remarks: Option<&str>,
    ) -> EngineResult<BatchReturnReport> {
        let mut ids = outbound_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            return Err(CoreError::BadRequest("No outbound records selected".to_string()).into());
        }

        let today = chrono::Utc::now().date_naive();
        let mut report = BatchReturnReport::default();

        let mut tx = self.ctx.begin().await?;
        for &outbound_id in &ids {
            let mut savepoint = tx.begin().await?;
            match return_one(&mut savepoint, outbound_id, actor, remarks, today).await {
                Ok(receipt) => {
                    savepoint.commit().await?;
                    report.returned.push(receipt);
                }
                Err(EngineError::Core(err)) => {
                    savepoint.rollback().await?;
                    report.failed.push(BatchReturnFailure {
                        outbound_id,
                        code: err.kind(),
                        error: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        tx.commit().await?;

        tracing::info!(
            requested = ids.len(),
            returned = report.returned.len(),
            failed = report.failed.len(),
            operator_id = actor.user_id,
            "Batch return processed"
        );
        for receipt in &report.returned {
            self.ctx
                .log(
                    actor,
                    OP_INBOUND,
                    TARGET_ITEM,
                    Some(receipt.item_id),
                    json!({
                        "inbound_id": receipt.inbound_id,
                        "inbound_type": InboundType::Return.as_str(),
                        "batch": true,
                    }),
                )
                .await;
        }

        Ok(report)
    }

    pub async fn get(&self, id: DbId) -> EngineResult<InboundRecordWithItem> {
        InboundRepo::find_by_id(&self.ctx.pool, id)
            .await?
            .ok_or_else(|| {
                CoreError::NotFound {
                    entity: "InboundRecord",
                    id,
                }
                .into()
            })
    }

    /// Every inbound record of one item, oldest first.
    pub async fn history(&self, item_id: DbId) -> EngineResult<Vec<InboundRecord>> {
        Ok(InboundRepo::list_for_item(&self.ctx.pool, item_id).await?)
    }

    pub async fn list(
        &self,
        params: &InboundListParams,
    ) -> EngineResult<Page<InboundRecordWithItem>> {
        if let Some(ref inbound_type) = params.inbound_type {
            InboundType::from_str_value(inbound_type)?;
        }
        let items = InboundRepo::list(&self.ctx.pool, params).await?;
        let total = InboundRepo::count(&self.ctx.pool, params).await?;
        Ok(Page { items, total })
    }
}

/// Return one outbound record on behalf of its operator.
async fn return_one(
    tx: &mut DbTx<'_>,
    outbound_id: DbId,
    actor: &Actor,
    remarks: Option<&str>,
    today: Date,
) -> EngineResult<InboundReceipt> {
    let outbound = OutboundRepo::find_in_tx(tx, outbound_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "OutboundRecord",
            id: outbound_id,
        })?;

    if outbound.operator_id != actor.user_id {
        return Err(CoreError::Forbidden(format!(
            "Outbound record {outbound_id} was not recorded by the caller"
        ))
        .into());
    }
    if outbound.is_returned {
        return Err(already_returned(outbound_id).into());
    }
    let item_id = outbound.item_id.ok_or_else(|| {
        CoreError::BadRequest(format!(
            "Item of outbound record {outbound_id} no longer exists"
        ))
    })?;

    let cmd = StockIn {
        item_id,
        quantity: outbound.quantity,
        inbound_type: InboundType::Return,
        related_outbound_id: Some(outbound_id),
        remarks: remarks.map(str::to_owned),
    };
    apply_stock_in(tx, &cmd, actor.user_id, today).await
}

/// Apply an inbound movement inside the caller's transaction.
///
/// Shared by the direct path, the batch return and approval review.
pub(crate) async fn apply_stock_in(
    tx: &mut DbTx<'_>,
    cmd: &StockIn,
    operator_id: DbId,
    today: Date,
) -> EngineResult<InboundReceipt> {
    let item = ItemRepo::lock_by_id(tx, cmd.item_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Item",
            id: cmd.item_id,
        })?;

    validate_quantity(cmd.quantity)?;
    let return_target = cmd.return_target()?;

    if let Some(outbound_id) = return_target {
        let outbound = OutboundRepo::lock_by_id(tx, outbound_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "OutboundRecord",
                id: outbound_id,
            })?;
        if outbound.item_id != Some(item.id) {
            return Err(CoreError::BadRequest(format!(
                "Outbound record {outbound_id} does not belong to item {}",
                item.id
            ))
            .into());
        }
        if outbound.outbound_type != OUTBOUND_BORROW {
            return Err(CoreError::BadRequest(format!(
                "Outbound record {outbound_id} is not a borrow and cannot be returned"
            ))
            .into());
        }
        if outbound.is_returned {
            return Err(already_returned(outbound_id).into());
        }
    }

    let new_quantity = item
        .current_quantity
        .checked_add(cmd.quantity)
        .ok_or_else(|| CoreError::BadRequest("Quantity is too large".to_string()))?;
    let total_in = item
        .total_in
        .checked_add(cmd.quantity)
        .ok_or_else(|| CoreError::BadRequest("Quantity is too large".to_string()))?;

    if let Some(outbound_id) = return_target {
        OutboundRepo::mark_returned(tx, outbound_id, today).await?;
    }

    let record = InboundRepo::create(
        tx,
        &NewInboundRecord {
            item_id: item.id,
            unique_code_snapshot: item.unique_code.as_deref(),
            quantity: cmd.quantity,
            inbound_type: cmd.inbound_type.as_str(),
            related_outbound_id: return_target,
            operator_id,
            remarks: cmd.remarks.as_deref(),
        },
    )
    .await?;

    let status = status_after_inbound(new_quantity);
    let updated = ItemRepo::update_stock(
        tx,
        item.id,
        StockLevels {
            current_quantity: new_quantity,
            total_in,
            total_out: item.total_out,
            status: status.as_str(),
        },
    )
    .await?;

    Ok(InboundReceipt {
        inbound_id: record.id,
        item_id: updated.id,
        new_quantity: updated.current_quantity,
        status: updated.status,
    })
}

fn already_returned(outbound_id: DbId) -> CoreError {
    CoreError::Conflict(format!("Outbound record {outbound_id} has already been returned"))
}
