//! The approval workflow.
//!
//! Non-administrators submit a serialized intent; an administrator reviews
//! it exactly once. Approval replays the intent through the same inbound /
//! outbound / item-creation code as the direct path, inside the transaction
//! that flips the request status, with the requester as operator. If the
//! replay fails the review rolls back and the request stays pending.

use serde::Serialize;
use serde_json::json;
use stockroom_core::approval::{
    ensure_reviewable, ApprovalPayload, ApprovalStatus, InboundIntent, RequestType,
};
use stockroom_core::audit::{OP_APPROVAL, TARGET_APPROVAL_REQUEST};
use stockroom_core::error::CoreError;
use stockroom_core::roles::Actor;
use stockroom_core::types::DbId;
use stockroom_db::models::approval::{ApprovalListParams, ApprovalRequest};
use stockroom_db::models::Page;
use stockroom_db::repositories::ApprovalRepo;

use crate::context::EngineContext;
use crate::error::EngineResult;
use crate::inbound::{apply_stock_in, InboundReceipt};
use crate::item::create_unique_in_tx;
use crate::outbound::{apply_stock_out, OutboundReceipt};

/// Side effect of an approved request.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReviewOutcome {
    ItemCreated {
        item_id: DbId,
        inbound_id: DbId,
        quantity: i32,
    },
    Inbound(InboundReceipt),
    Outbound(OutboundReceipt),
}

/// A reviewed request and, when approved, what it did.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResult {
    pub request: ApprovalRequest,
    pub outcome: Option<ReviewOutcome>,
}

#[derive(Clone)]
pub struct ApprovalWorkflow {
    ctx: EngineContext,
}

impl ApprovalWorkflow {
    pub fn new(ctx: EngineContext) -> Self {
        Self { ctx }
    }

    /// Submit a deferred inbound or outbound intent for review.
    ///
    /// The payload is parsed and validated up front and stored in its
    /// canonical form. Administrators act directly and cannot submit.
    pub async fn create_request(
        &self,
        actor: &Actor,
        request_type: &str,
        request_data: &serde_json::Value,
    ) -> EngineResult<ApprovalRequest> {
        if actor.is_admin() {
            return Err(CoreError::BadRequest(
                "Administrators perform inbound and outbound operations directly".to_string(),
            )
            .into());
        }

        let request_type = RequestType::from_str_value(request_type)?;
        let payload = ApprovalPayload::parse(request_type, request_data)?;
        payload.validate()?;
        let stored = payload.to_value()?;

        let request =
            ApprovalRepo::create(&self.ctx.pool, request_type.as_str(), actor.user_id, &stored)
                .await?;

        tracing::info!(
            request_id = request.id,
            request_type = request_type.as_str(),
            requester_id = actor.user_id,
            "Approval request submitted"
        );
        self.ctx
            .log(
                actor,
                OP_APPROVAL,
                TARGET_APPROVAL_REQUEST,
                Some(request.id),
                json!({ "action": "submit", "request_type": request_type.as_str() }),
            )
            .await;

        Ok(request)
    }

    /// Approve or reject a pending request.
    pub async fn review(
        &self,
        actor: &Actor,
        request_id: DbId,
        approved: bool,
        comment: Option<&str>,
    ) -> EngineResult<ReviewResult> {
        actor.require_admin()?;

        let mut tx = self.ctx.begin().await?;
        let pending = ApprovalRepo::lock_by_id(&mut tx, request_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ApprovalRequest",
                id: request_id,
            })?;
        ensure_reviewable(&pending.status)?;

        let status = ApprovalStatus::from_decision(approved);
        let request =
            ApprovalRepo::mark_reviewed(&mut tx, request_id, status.as_str(), actor.user_id, comment)
                .await?;

        let outcome = if approved {
            let request_type = RequestType::from_str_value(&pending.request_type)?;
            let payload = ApprovalPayload::parse(request_type, &pending.request_data)?;
            let requester = pending.requester_id;
            let today = chrono::Utc::now().date_naive();

            let outcome = match payload {
                ApprovalPayload::Inbound(InboundIntent::CreateUnique(item)) => {
                    let (created, record) = create_unique_in_tx(&mut tx, &item, requester).await?;
                    ReviewOutcome::ItemCreated {
                        item_id: created.id,
                        inbound_id: record.id,
                        quantity: created.current_quantity,
                    }
                }
                ApprovalPayload::Inbound(
                    InboundIntent::UpdateStackable(cmd) | InboundIntent::Legacy(cmd),
                ) => ReviewOutcome::Inbound(apply_stock_in(&mut tx, &cmd, requester, today).await?),
                ApprovalPayload::Outbound(cmd) => {
                    ReviewOutcome::Outbound(apply_stock_out(&mut tx, &cmd, requester).await?)
                }
            };
            Some(outcome)
        } else {
            None
        };

        tx.commit().await?;

        tracing::info!(
            request_id,
            status = status.as_str(),
            reviewer_id = actor.user_id,
            requester_id = request.requester_id,
            "Approval request reviewed"
        );
        self.ctx
            .log(
                actor,
                OP_APPROVAL,
                TARGET_APPROVAL_REQUEST,
                Some(request_id),
                json!({
                    "action": "review",
                    "status": status.as_str(),
                    "request_type": request.request_type,
                    "requester_id": request.requester_id,
                    "outcome": outcome,
                }),
            )
            .await;

        Ok(ReviewResult { request, outcome })
    }

    /// A single request, visible to its requester and administrators.
    pub async fn get(&self, actor: &Actor, id: DbId) -> EngineResult<ApprovalRequest> {
        let request = ApprovalRepo::find_by_id(&self.ctx.pool, id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ApprovalRequest",
                id,
            })?;
        if !actor.is_admin() && request.requester_id != actor.user_id {
            return Err(CoreError::Forbidden(
                "Approval request belongs to another user".to_string(),
            )
            .into());
        }
        Ok(request)
    }

    /// Administrators see every request; everyone else only their own.
    pub async fn list(
        &self,
        actor: &Actor,
        params: &ApprovalListParams,
    ) -> EngineResult<Page<ApprovalRequest>> {
        if let Some(ref status) = params.status {
            ApprovalStatus::from_str_value(status)?;
        }
        if let Some(ref request_type) = params.request_type {
            RequestType::from_str_value(request_type)?;
        }

        let params = ApprovalListParams {
            requester_id: if actor.is_admin() {
                None
            } else {
                Some(actor.user_id)
            },
            ..params.clone()
        };
        let items = ApprovalRepo::list(&self.ctx.pool, &params).await?;
        let total = ApprovalRepo::count(&self.ctx.pool, &params).await?;
        Ok(Page { items, total })
    }

    /// Requests awaiting review.
    pub async fn pending_count(&self, actor: &Actor) -> EngineResult<i64> {
        actor.require_admin()?;
        Ok(ApprovalRepo::count_pending(&self.ctx.pool).await?)
    }
}
