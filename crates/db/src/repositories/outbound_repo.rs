//! Repository for the `outbound_records` table.

use sqlx::PgPool;
use stockroom_core::inventory::{OUTBOUND_BORROW, OUTBOUND_TRANSFER};
use stockroom_core::types::{Date, DbId};

use crate::models::outbound::{
    NewOutboundRecord, OutboundListParams, OutboundRecord, OutboundRecordWithItem,
};
use crate::repositories::filter::{like_pattern, BindValue, Filter};
use crate::{clamp_limit, clamp_offset, DbTx};

/// Column list for `outbound_records` queries.
const COLUMNS: &str = "id, item_id, unique_code_snapshot, quantity, outbound_type, \
    borrower_name, borrower_phone, borrower_email, expected_return_date, is_returned, \
    actual_return_date, operator_id, remarks, created_at";

const JOINED_COLUMNS: &str = "r.id, r.item_id, r.unique_code_snapshot, r.quantity, \
    r.outbound_type, r.borrower_name, r.borrower_phone, r.borrower_email, \
    r.expected_return_date, r.is_returned, r.actual_return_date, r.operator_id, \
    r.remarks, r.created_at, i.name AS item_name";

const JOIN: &str = "outbound_records r LEFT JOIN items i ON i.id = r.item_id";

/// Access to outbound records and their return bookkeeping.
pub struct OutboundRepo;

impl OutboundRepo {
    /// Append an outbound record.
    pub async fn create(
        tx: &mut DbTx<'_>,
        input: &NewOutboundRecord<'_>,
    ) -> Result<OutboundRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO outbound_records
                (item_id, unique_code_snapshot, quantity, outbound_type, borrower_name,
                 borrower_phone, borrower_email, expected_return_date, operator_id, remarks)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OutboundRecord>(&query)
            .bind(input.item_id)
            .bind(input.unique_code_snapshot)
            .bind(input.quantity)
            .bind(input.outbound_type)
            .bind(input.borrower_name)
            .bind(input.borrower_phone)
            .bind(input.borrower_email)
            .bind(input.expected_return_date)
            .bind(input.operator_id)
            .bind(input.remarks)
            .fetch_one(&mut **tx)
            .await
    }

    /// Read a record inside a transaction without locking it.
    pub async fn find_in_tx(
        tx: &mut DbTx<'_>,
        id: DbId,
    ) -> Result<Option<OutboundRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM outbound_records WHERE id = $1");
        sqlx::query_as::<_, OutboundRecord>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Lock a record for return or reclassification.
    pub async fn lock_by_id(
        tx: &mut DbTx<'_>,
        id: DbId,
    ) -> Result<Option<OutboundRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM outbound_records WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, OutboundRecord>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Mark a locked record as returned on `returned_on`.
    pub async fn mark_returned(
        tx: &mut DbTx<'_>,
        id: DbId,
        returned_on: Date,
    ) -> Result<OutboundRecord, sqlx::Error> {
        let query = format!(
            "UPDATE outbound_records SET is_returned = TRUE, actual_return_date = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OutboundRecord>(&query)
            .bind(id)
            .bind(returned_on)
            .fetch_one(&mut **tx)
            .await
    }

    /// Reclassify a locked record as a transfer and clear return bookkeeping.
    pub async fn convert_to_transfer(
        tx: &mut DbTx<'_>,
        id: DbId,
    ) -> Result<OutboundRecord, sqlx::Error> {
        let query = format!(
            "UPDATE outbound_records
             SET outbound_type = $2, is_returned = FALSE, actual_return_date = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OutboundRecord>(&query)
            .bind(id)
            .bind(OUTBOUND_TRANSFER)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a record with its item name.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OutboundRecordWithItem>, sqlx::Error> {
        let query = format!("SELECT {JOINED_COLUMNS} FROM {JOIN} WHERE r.id = $1");
        sqlx::query_as::<_, OutboundRecordWithItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Open borrows, soonest expected return first; open-ended loans last.
    pub async fn list_unreturned_borrows(
        pool: &PgPool,
    ) -> Result<Vec<OutboundRecordWithItem>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOIN}
             WHERE r.outbound_type = $1 AND r.is_returned = FALSE
             ORDER BY r.expected_return_date ASC NULLS LAST, r.id ASC"
        );
        sqlx::query_as::<_, OutboundRecordWithItem>(&query)
            .bind(OUTBOUND_BORROW)
            .fetch_all(pool)
            .await
    }

    /// Filtered, paginated listing, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &OutboundListParams,
    ) -> Result<Vec<OutboundRecordWithItem>, sqlx::Error> {
        let filter = build_outbound_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOIN} {} \
             ORDER BY r.created_at DESC, r.id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_rows(sqlx::query_as::<_, OutboundRecordWithItem>(&query))
            .bind(clamp_limit(params.limit))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Number of records matching the listing filters.
    pub async fn count(pool: &PgPool, params: &OutboundListParams) -> Result<i64, sqlx::Error> {
        let filter = build_outbound_filter(params);
        let query = format!("SELECT COUNT(*) FROM {JOIN} {}", filter.where_clause());
        filter
            .bind_count(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }
}

fn build_outbound_filter(params: &OutboundListParams) -> Filter {
    let mut filter = Filter::default();

    if let Some(item_id) = params.item_id {
        filter.push(|i| format!("r.item_id = ${i}"), BindValue::BigInt(item_id));
    }
    if let Some(ref outbound_type) = params.outbound_type {
        filter.push(
            |i| format!("r.outbound_type = ${i}"),
            BindValue::Text(outbound_type.clone()),
        );
    }
    if let Some(is_returned) = params.is_returned {
        filter.push(|i| format!("r.is_returned = ${i}"), BindValue::Bool(is_returned));
    }
    if let Some(operator_id) = params.operator_id {
        filter.push(|i| format!("r.operator_id = ${i}"), BindValue::BigInt(operator_id));
    }
    if let Some(borrower) = params.borrower.as_deref().filter(|s| !s.trim().is_empty()) {
        filter.push(
            |i| {
                format!(
                    "(r.borrower_name ILIKE ${i} OR r.borrower_phone ILIKE ${i} \
                     OR r.borrower_email ILIKE ${i})"
                )
            },
            BindValue::Text(like_pattern(borrower)),
        );
    }

    filter
}
