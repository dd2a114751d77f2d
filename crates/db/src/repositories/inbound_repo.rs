//! Repository for the `inbound_records` table.

use sqlx::PgPool;
use stockroom_core::types::DbId;

use crate::models::inbound::{
    InboundListParams, InboundRecord, InboundRecordWithItem, NewInboundRecord,
};
use crate::repositories::filter::{BindValue, Filter};
use crate::{clamp_limit, clamp_offset, DbTx};

/// Column list for `inbound_records` queries.
const COLUMNS: &str = "id, item_id, unique_code_snapshot, quantity, inbound_type, \
    related_outbound_id, operator_id, remarks, created_at";

const JOINED_COLUMNS: &str = "r.id, r.item_id, r.unique_code_snapshot, r.quantity, \
    r.inbound_type, r.related_outbound_id, r.operator_id, r.remarks, r.created_at, \
    i.name AS item_name";

const JOIN: &str = "inbound_records r LEFT JOIN items i ON i.id = r.item_id";

/// Append-only access to inbound records.
pub struct InboundRepo;

impl InboundRepo {
    /// Append an inbound record.
    pub async fn create(
        tx: &mut DbTx<'_>,
        input: &NewInboundRecord<'_>,
    ) -> Result<InboundRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO inbound_records
                (item_id, unique_code_snapshot, quantity, inbound_type,
                 related_outbound_id, operator_id, remarks)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InboundRecord>(&query)
            .bind(input.item_id)
            .bind(input.unique_code_snapshot)
            .bind(input.quantity)
            .bind(input.inbound_type)
            .bind(input.related_outbound_id)
            .bind(input.operator_id)
            .bind(input.remarks)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find an inbound record with its item name.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<InboundRecordWithItem>, sqlx::Error> {
        let query = format!("SELECT {JOINED_COLUMNS} FROM {JOIN} WHERE r.id = $1");
        sqlx::query_as::<_, InboundRecordWithItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Inbound records for an item, oldest first.
    pub async fn list_for_item(
        pool: &PgPool,
        item_id: DbId,
    ) -> Result<Vec<InboundRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM inbound_records WHERE item_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, InboundRecord>(&query)
            .bind(item_id)
            .fetch_all(pool)
            .await
    }

    /// Filtered, paginated listing, newest first.
    pub async fn list(
        pool: &PgPool,
        params: &InboundListParams,
    ) -> Result<Vec<InboundRecordWithItem>, sqlx::Error> {
        let filter = build_inbound_filter(params);
        let idx = filter.next_index();
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM {JOIN} {} \
             ORDER BY r.created_at DESC, r.id DESC \
             LIMIT ${idx} OFFSET ${}",
            filter.where_clause(),
            idx + 1
        );
        filter
            .bind_rows(sqlx::query_as::<_, InboundRecordWithItem>(&query))
            .bind(clamp_limit(params.limit))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Number of records matching the listing filters.
    pub async fn count(pool: &PgPool, params: &InboundListParams) -> Result<i64, sqlx::Error> {
        let filter = build_inbound_filter(params);
        let query = format!("SELECT COUNT(*) FROM {JOIN} {}", filter.where_clause());
        filter
            .bind_count(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }
}

fn build_inbound_filter(params: &InboundListParams) -> Filter {
    let mut filter = Filter::default();
    if let Some(item_id) = params.item_id {
        filter.push(|i| format!("r.item_id = ${i}"), BindValue::BigInt(item_id));
    }
    if let Some(ref inbound_type) = params.inbound_type {
        filter.push(
            |i| format!("r.inbound_type = ${i}"),
            BindValue::Text(inbound_type.clone()),
        );
    }
    filter
}
