//! Inbound ledger models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Timestamp};

/// A row from the `inbound_records` table. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InboundRecord {
    pub id: DbId,
    pub item_id: Option<DbId>,
    pub unique_code_snapshot: Option<String>,
    pub quantity: i32,
    pub inbound_type: String,
    pub related_outbound_id: Option<DbId>,
    pub operator_id: DbId,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
}

/// An inbound record joined with the item name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InboundRecordWithItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: InboundRecord,
    pub item_name: Option<String>,
}

/// Insert for the `inbound_records` table.
#[derive(Debug, Clone)]
pub struct NewInboundRecord<'a> {
    pub item_id: DbId,
    pub unique_code_snapshot: Option<&'a str>,
    pub quantity: i32,
    pub inbound_type: &'a str,
    pub related_outbound_id: Option<DbId>,
    pub operator_id: DbId,
    pub remarks: Option<&'a str>,
}

/// Filters for the inbound listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundListParams {
    pub item_id: Option<DbId>,
    pub inbound_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
