//! Integration tests for the approval workflow.

mod common;

use assert_matches::assert_matches;
use common::*;
use serde_json::json;
use sqlx::PgPool;
use stockroom_core::error::CoreError;
use stockroom_db::models::approval::ApprovalListParams;
use stockroom_db::models::operation_log::OperationLogQuery;
use stockroom_db::repositories::OperationLogRepo;
use stockroom_engine::approval::ReviewOutcome;
use stockroom_engine::EngineError;

fn outbound_request(item_id: i64, quantity: i32) -> serde_json::Value {
    json!({
        "item_id": item_id,
        "quantity": quantity,
        "outbound_type": "borrow",
        "borrower_name": "Ana",
        "borrower_phone": "555-0100",
        "borrower_email": "ana@example.com",
        "expected_return_date": "2030-06-30"
    })
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_cannot_submit(pool: PgPool) {
    let engine = engine(&pool);
    let item = seed_stock(&engine, 5).await;

    let err = engine
        .approvals
        .create_request(&admin(), "outbound", &outbound_request(item.id, 1))
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::BadRequest(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_payload_is_rejected_at_submission(pool: PgPool) {
    let engine = engine(&pool);

    assert_matches!(
        engine
            .approvals
            .create_request(&user(), "inbound", &json!({ "mode": "teleport", "item_id": 1 }))
            .await,
        Err(EngineError::Core(CoreError::BadRequest(_)))
    );
    assert_matches!(
        engine
            .approvals
            .create_request(&user(), "sideways", &json!({}))
            .await,
        Err(EngineError::Core(CoreError::BadRequest(_)))
    );
    assert_matches!(
        engine
            .approvals
            .create_request(&user(), "outbound", &json!({ "item_id": 1, "quantity": 0, "outbound_type": "transfer" }))
            .await,
        Err(EngineError::Core(CoreError::BadRequest(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submission_does_not_touch_stock(pool: PgPool) {
    let engine = engine(&pool);
    let item = seed_stock(&engine, 5).await;

    let request = engine
        .approvals
        .create_request(&user(), "outbound", &outbound_request(item.id, 2))
        .await
        .unwrap();
    assert_eq!(request.status, "pending");
    assert_eq!(request.requester_id, USER_ID);
    assert!(request.reviewed_at.is_none());
    assert_eq!(reload(&engine, item.id).await.current_quantity, 5);
    assert_eq!(engine.approvals.pending_count(&admin()).await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_payload_without_mode_adds_stock(pool: PgPool) {
    let engine = engine(&pool);
    let item = seed_stock(&engine, 4).await;

    // Rows stored before inbound requests carried a `mode`.
    let request_id: i64 = sqlx::query_scalar(
        "INSERT INTO approval_requests (request_type, requester_id, request_data)
         VALUES ('inbound', $1, $2)
         RETURNING id",
    )
    .bind(USER_ID)
    .bind(json!({ "item_id": item.id, "quantity": 3, "inbound_type": "initial" }))
    .fetch_one(&pool)
    .await
    .unwrap();

    let result = engine
        .approvals
        .review(&admin(), request_id, true, None)
        .await
        .unwrap();
    assert_eq!(result.request.status, "approved");
    assert_matches!(
        result.outcome,
        Some(ReviewOutcome::Inbound(ref receipt)) if receipt.new_quantity == 7
    );

    let item = reload(&engine, item.id).await;
    assert_eq!((item.current_quantity, item.total_in), (7, 7));
    assert_eq!(item.status, "in_stock");

    let records: Vec<(String, i32)> = sqlx::query_as(
        "SELECT inbound_type, quantity FROM inbound_records
         WHERE item_id = $1 AND operator_id = $2",
    )
    .bind(item.id)
    .bind(USER_ID)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(records, vec![("initial".to_string(), 3)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_create_unique(pool: PgPool) {
    let engine = engine(&pool);
    let category = seed_category(&engine, "Hands").await;
    let data = json!({
        "mode": "create_unique",
        "unique_code": "LHT3000",
        "name": "Dexterous hand",
        "category_id": category.id,
        "initial_stock": 5
    });
    let request = engine
        .approvals
        .create_request(&user(), "inbound", &data)
        .await
        .unwrap();

    let result = engine
        .approvals
        .review(&admin(), request.id, true, Some("ok"))
        .await
        .unwrap();
    assert_eq!(result.request.status, "approved");
    assert_eq!(result.request.reviewer_id, Some(ADMIN_ID));
    assert!(result.request.reviewed_at.is_some());

    let item_id = match result.outcome {
        Some(ReviewOutcome::ItemCreated { item_id, quantity, .. }) => {
            assert_eq!(quantity, 5);
            item_id
        }
        other => panic!("unexpected outcome: {other:?}"),
    };

    let item = reload(&engine, item_id).await;
    assert_eq!((item.current_quantity, item.total_in), (5, 5));
    assert!(!item.is_stackable);
    assert_eq!(item.unique_code.as_deref(), Some("LHT3000"));

    let records: Vec<(String, i64)> =
        sqlx::query_as("SELECT inbound_type, operator_id FROM inbound_records WHERE item_id = $1")
            .bind(item_id)
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(records, vec![("initial".to_string(), USER_ID)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_outbound_runs_as_requester(pool: PgPool) {
    let engine = engine(&pool);
    let item = seed_stock(&engine, 5).await;
    let request = engine
        .approvals
        .create_request(&user(), "outbound", &outbound_request(item.id, 2))
        .await
        .unwrap();

    let result = engine
        .approvals
        .review(&admin(), request.id, true, None)
        .await
        .unwrap();
    let receipt = match result.outcome {
        Some(ReviewOutcome::Outbound(receipt)) => receipt,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(receipt.new_quantity, 3);
    assert_eq!(receipt.status, "partially_out");

    let record = engine.outbound.get(receipt.outbound_id).await.unwrap().record;
    assert_eq!(record.operator_id, USER_ID);

    // The requester can return it as their own borrow.
    let report = engine
        .inbound
        .batch_return(&user(), &[receipt.outbound_id], None)
        .await
        .unwrap();
    assert_eq!(report.returned.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_stackable_inbound(pool: PgPool) {
    let engine = engine(&pool);
    let item = seed_stock(&engine, 5).await;
    let data = json!({
        "mode": "update_stackable",
        "item_id": item.id,
        "quantity": 7,
        "inbound_type": "initial"
    });
    let request = engine
        .approvals
        .create_request(&user(), "inbound", &data)
        .await
        .unwrap();

    let result = engine
        .approvals
        .review(&admin(), request.id, true, None)
        .await
        .unwrap();
    assert_matches!(
        result.outcome,
        Some(ReviewOutcome::Inbound(ref receipt)) if receipt.new_quantity == 12
    );
    assert_eq!(inbound_sum(&pool, item.id).await, 12);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reject_leaves_ledger_untouched(pool: PgPool) {
    let engine = engine(&pool);
    let item = seed_stock(&engine, 5).await;
    let request = engine
        .approvals
        .create_request(&user(), "outbound", &outbound_request(item.id, 2))
        .await
        .unwrap();

    let result = engine
        .approvals
        .review(&admin(), request.id, false, Some("not today"))
        .await
        .unwrap();
    assert_eq!(result.request.status, "rejected");
    assert_eq!(result.request.review_comment.as_deref(), Some("not today"));
    assert!(result.outcome.is_none());

    let item = reload(&engine, item.id).await;
    assert_eq!((item.current_quantity, item.total_out), (5, 0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_review_is_conflict(pool: PgPool) {
    let engine = engine(&pool);
    let item = seed_stock(&engine, 5).await;
    let request = engine
        .approvals
        .create_request(&user(), "outbound", &outbound_request(item.id, 1))
        .await
        .unwrap();

    engine
        .approvals
        .review(&admin(), request.id, true, None)
        .await
        .unwrap();
    for approved in [true, false] {
        assert_matches!(
            engine.approvals.review(&admin(), request.id, approved, None).await,
            Err(EngineError::Core(CoreError::Conflict(_)))
        );
    }
    assert_eq!(reload(&engine, item.id).await.current_quantity, 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_replay_keeps_request_pending(pool: PgPool) {
    let engine = engine(&pool);
    let item = seed_stock(&engine, 2).await;
    let request = engine
        .approvals
        .create_request(&user(), "outbound", &outbound_request(item.id, 2))
        .await
        .unwrap();
    engine.outbound.record(&admin(), &transfer(item.id, 1)).await.unwrap();

    assert_matches!(
        engine.approvals.review(&admin(), request.id, true, None).await,
        Err(EngineError::Core(CoreError::BadRequest(_)))
    );
    let still = engine.approvals.get(&admin(), request.id).await.unwrap();
    assert_eq!(still.status, "pending");
    assert!(still.reviewer_id.is_none());

    // Rejecting is still possible.
    engine
        .approvals
        .review(&admin(), request.id, false, None)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_admin_reviews(pool: PgPool) {
    let engine = engine(&pool);
    let item = seed_stock(&engine, 5).await;
    let request = engine
        .approvals
        .create_request(&user(), "outbound", &outbound_request(item.id, 1))
        .await
        .unwrap();

    assert_matches!(
        engine.approvals.review(&user(), request.id, true, None).await,
        Err(EngineError::Core(CoreError::Forbidden(_)))
    );
    assert_matches!(
        engine.approvals.pending_count(&user()).await,
        Err(EngineError::Core(CoreError::Forbidden(_)))
    );
    assert_matches!(
        engine.approvals.review(&admin(), 9999, true, None).await,
        Err(EngineError::Core(CoreError::NotFound { .. }))
    );
}

// ---------------------------------------------------------------------------
// Visibility and audit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_requests_are_scoped_to_requester(pool: PgPool) {
    let engine = engine(&pool);
    let item = seed_stock(&engine, 5).await;
    let mine = engine
        .approvals
        .create_request(&user(), "outbound", &outbound_request(item.id, 1))
        .await
        .unwrap();
    engine
        .approvals
        .create_request(&other_user(), "outbound", &outbound_request(item.id, 1))
        .await
        .unwrap();

    let params = ApprovalListParams::default();
    assert_eq!(engine.approvals.list(&user(), &params).await.unwrap().total, 1);
    assert_eq!(engine.approvals.list(&admin(), &params).await.unwrap().total, 2);

    assert_matches!(
        engine.approvals.get(&other_user(), mine.id).await,
        Err(EngineError::Core(CoreError::Forbidden(_)))
    );

    let bad = ApprovalListParams {
        status: Some("maybe".to_string()),
        ..Default::default()
    };
    assert_matches!(
        engine.approvals.list(&admin(), &bad).await,
        Err(EngineError::Core(CoreError::BadRequest(_)))
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_review_is_logged(pool: PgPool) {
    let engine = engine(&pool);
    let item = seed_stock(&engine, 5).await;
    let request = engine
        .approvals
        .create_request(&user(), "outbound", &outbound_request(item.id, 1))
        .await
        .unwrap();
    engine
        .approvals
        .review(&admin(), request.id, true, None)
        .await
        .unwrap();

    let query = OperationLogQuery {
        operation_type: Some("approval".to_string()),
        ..Default::default()
    };
    let logs = OperationLogRepo::query(&pool, &query).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].operator_id, ADMIN_ID);
    assert_eq!(logs[0].target_id, Some(request.id));
    assert_eq!(logs[0].detail["status"], "approved");
    assert_eq!(logs[1].detail["action"], "submit");
}
