//! Outbound ledger models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{Date, DbId, Timestamp};

/// A row from the `outbound_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OutboundRecord {
    pub id: DbId,
    pub item_id: Option<DbId>,
    pub unique_code_snapshot: Option<String>,
    pub quantity: i32,
    pub outbound_type: String,
    pub borrower_name: Option<String>,
    pub borrower_phone: Option<String>,
    pub borrower_email: Option<String>,
    pub expected_return_date: Option<Date>,
    pub is_returned: bool,
    pub actual_return_date: Option<Date>,
    pub operator_id: DbId,
    pub remarks: Option<String>,
    pub created_at: Timestamp,
}

/// An outbound record joined with the item name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OutboundRecordWithItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub record: OutboundRecord,
    pub item_name: Option<String>,
}

/// Insert for the `outbound_records` table.
#[derive(Debug, Clone)]
pub struct NewOutboundRecord<'a> {
    pub item_id: DbId,
    pub unique_code_snapshot: Option<&'a str>,
    pub quantity: i32,
    pub outbound_type: &'a str,
    pub borrower_name: Option<&'a str>,
    pub borrower_phone: Option<&'a str>,
    pub borrower_email: Option<&'a str>,
    pub expected_return_date: Option<Date>,
    pub operator_id: DbId,
    pub remarks: Option<&'a str>,
}

/// Filters for the outbound listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutboundListParams {
    pub item_id: Option<DbId>,
    pub outbound_type: Option<String>,
    pub is_returned: Option<bool>,
    /// Matched case-insensitively against borrower name, phone and email.
    pub borrower: Option<String>,
    /// Set by the caller, not the client, for "my borrowings".
    #[serde(skip)]
    pub operator_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for a batch return.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchReturnRequest {
    pub outbound_ids: Vec<DbId>,
    pub remarks: Option<String>,
}
