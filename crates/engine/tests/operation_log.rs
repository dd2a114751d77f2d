//! The operation log collaborator sees one entry per committed mutation and
//! nothing for failed ones.

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::*;
use sqlx::PgPool;
use stockroom_db::models::operation_log::CreateOperationLog;
use stockroom_engine::{Engine, EngineConfig, OperationLog};

#[derive(Default)]
struct RecordingLog {
    entries: Mutex<Vec<CreateOperationLog>>,
}

impl RecordingLog {
    fn snapshot(&self) -> Vec<CreateOperationLog> {
        self.entries.lock().unwrap().clone()
    }
}

#[async_trait]
impl OperationLog for RecordingLog {
    async fn record(&self, entry: CreateOperationLog) {
        self.entries.lock().unwrap().push(entry);
    }
}

fn recording_engine(pool: &PgPool) -> (Engine, Arc<RecordingLog>) {
    let log = Arc::new(RecordingLog::default());
    let engine = Engine::new(pool.clone(), log.clone(), EngineConfig::default());
    (engine, log)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_one_entry_per_committed_mutation(pool: PgPool) {
    let (engine, log) = recording_engine(&pool);
    let item = seed_stock(&engine, 5).await;

    let actor = user().with_ip(Some("10.0.0.7".to_string()));
    let out = engine.outbound.record(&actor, &borrow(item.id, 2)).await.unwrap();
    engine
        .inbound
        .record(&actor, &return_of(item.id, out.outbound_id, 2))
        .await
        .unwrap();

    let entries = log.snapshot();
    let kinds: Vec<&str> = entries.iter().map(|e| e.operation_type).collect();
    assert_eq!(kinds, vec!["edit_category", "edit_item", "outbound", "inbound"]);

    let inbound = &entries[3];
    assert_eq!(inbound.operator_id, USER_ID);
    assert_eq!(inbound.target_type, "item");
    assert_eq!(inbound.target_id, Some(item.id));
    assert_eq!(inbound.ip_address.as_deref(), Some("10.0.0.7"));
    assert_eq!(inbound.detail["inbound_type"], "return");
    assert_eq!(inbound.detail["related_outbound_id"], out.outbound_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_failed_mutation_is_not_logged(pool: PgPool) {
    let (engine, log) = recording_engine(&pool);
    let item = seed_stock(&engine, 1).await;
    let before = log.snapshot().len();

    engine
        .outbound
        .record(&user(), &transfer(item.id, 2))
        .await
        .unwrap_err();
    engine
        .approvals
        .review(&admin(), 12345, true, None)
        .await
        .unwrap_err();

    assert_eq!(log.snapshot().len(), before);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_batch_return_logs_each_returned_element(pool: PgPool) {
    let (engine, log) = recording_engine(&pool);
    let item = seed_stock(&engine, 5).await;
    let a = engine.outbound.record(&user(), &borrow(item.id, 1)).await.unwrap();
    let b = engine.outbound.record(&user(), &borrow(item.id, 1)).await.unwrap();
    let before = log.snapshot().len();

    engine
        .inbound
        .batch_return(&user(), &[b.outbound_id, a.outbound_id], None)
        .await
        .unwrap();

    let entries = log.snapshot();
    assert_eq!(entries.len(), before + 2);
    assert!(entries[before..]
        .iter()
        .all(|e| e.operation_type == "inbound" && e.detail["batch"] == true));
}
