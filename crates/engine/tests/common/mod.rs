//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use sqlx::PgPool;
use stockroom_core::inventory::{InboundType, OutboundType, StockIn, StockOut};
use stockroom_core::roles::{Actor, ROLE_ADMIN, ROLE_USER};
use stockroom_core::types::DbId;
use stockroom_db::models::category::{Category, CreateCategory};
use stockroom_db::models::item::{CreateItem, Item};
use stockroom_engine::{Engine, EngineConfig};

pub const ADMIN_ID: DbId = 1;
pub const USER_ID: DbId = 2;
pub const OTHER_USER_ID: DbId = 3;

pub fn engine(pool: &PgPool) -> Engine {
    Engine::with_pg_log(pool.clone(), EngineConfig::default())
}

pub fn engine_with(pool: &PgPool, config: EngineConfig) -> Engine {
    Engine::with_pg_log(pool.clone(), config)
}

pub fn admin() -> Actor {
    Actor::new(ADMIN_ID, ROLE_ADMIN)
}

pub fn user() -> Actor {
    Actor::new(USER_ID, ROLE_USER)
}

pub fn other_user() -> Actor {
    Actor::new(OTHER_USER_ID, ROLE_USER)
}

pub fn new_category(name: &str, parent_id: Option<DbId>) -> CreateCategory {
    CreateCategory {
        name: name.to_string(),
        parent_id,
        sort_order: None,
        description: None,
        is_stackable: None,
    }
}

pub async fn seed_category(engine: &Engine, name: &str) -> Category {
    engine
        .categories
        .create(&admin(), &new_category(name, None))
        .await
        .unwrap()
}

pub fn stackable_item(category_id: DbId, initial_stock: i32) -> CreateItem {
    CreateItem {
        unique_code: None,
        category_id,
        name: "M3 screws".to_string(),
        model: None,
        specification: None,
        description: None,
        is_stackable: Some(true),
        initial_stock: Some(initial_stock),
        remarks: None,
    }
}

pub fn unique_item(category_id: DbId, code: &str, initial_stock: i32) -> CreateItem {
    CreateItem {
        unique_code: Some(code.to_string()),
        category_id,
        name: "Dexterous hand".to_string(),
        model: Some("LHT".to_string()),
        specification: None,
        description: None,
        is_stackable: Some(false),
        initial_stock: Some(initial_stock),
        remarks: None,
    }
}

/// A category plus one stackable item holding `quantity` units.
pub async fn seed_stock(engine: &Engine, quantity: i32) -> Item {
    let category = seed_category(engine, "Consumables").await;
    engine
        .items
        .create(&admin(), &stackable_item(category.id, quantity))
        .await
        .unwrap()
}

pub fn stock_in(item_id: DbId, quantity: i32) -> StockIn {
    StockIn {
        item_id,
        quantity,
        inbound_type: InboundType::Initial,
        related_outbound_id: None,
        remarks: None,
    }
}

pub fn return_of(item_id: DbId, outbound_id: DbId, quantity: i32) -> StockIn {
    StockIn {
        item_id,
        quantity,
        inbound_type: InboundType::Return,
        related_outbound_id: Some(outbound_id),
        remarks: None,
    }
}

pub fn transfer(item_id: DbId, quantity: i32) -> StockOut {
    StockOut {
        item_id,
        quantity,
        outbound_type: OutboundType::Transfer,
        borrower_name: None,
        borrower_phone: None,
        borrower_email: None,
        expected_return_date: None,
        remarks: None,
    }
}

pub fn borrow(item_id: DbId, quantity: i32) -> StockOut {
    StockOut {
        item_id,
        quantity,
        outbound_type: OutboundType::Borrow,
        borrower_name: Some("Ana".to_string()),
        borrower_phone: Some("555-0100".to_string()),
        borrower_email: Some("ana@example.com".to_string()),
        expected_return_date: chrono::NaiveDate::from_ymd_opt(2030, 6, 30),
        remarks: None,
    }
}

pub async fn reload(engine: &Engine, item_id: DbId) -> Item {
    engine.items.get(item_id).await.unwrap().item.item
}

pub async fn inbound_sum(pool: &PgPool, item_id: DbId) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM inbound_records WHERE item_id = $1",
    )
    .bind(item_id)
    .fetch_one(pool)
    .await
    .unwrap()
}
