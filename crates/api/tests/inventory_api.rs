//! HTTP-level tests for categories, items and stock movements.

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use sqlx::PgPool;

async fn create_category(pool: &PgPool, name: &str, parent_id: Option<i64>) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/categories",
        &admin_token(),
        json!({ "name": name, "parent_id": parent_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn create_stackable(pool: &PgPool, category_id: i64, stock: i32) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/items",
        &user_token(),
        json!({
            "category_id": category_id,
            "name": "Cable ties",
            "is_stackable": true,
            "initial_stock": stock
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

fn borrow_body(item_id: i64, quantity: i32) -> serde_json::Value {
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
// Categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_mutations_are_admin_only(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/categories",
        &user_token(),
        json!({ "name": "Robotics" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_tree_and_delete_guard(pool: PgPool) {
    let root = create_category(&pool, "Robotics", None).await;
    let child = create_category(&pool, "Hands", Some(root)).await;

    let response = get_as(build_test_app(pool.clone()), "/api/v1/categories", &user_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["name"], "Robotics");
    assert_eq!(json["data"][0]["children"][0]["level"], 2);

    let uri = format!("/api/v1/categories/{child}/path");
    let json = body_json(get_as(build_test_app(pool.clone()), &uri, &user_token()).await).await;
    assert_eq!(json["data"], json!(["Robotics", "Hands"]));

    let uri = format!("/api/v1/categories/{root}");
    let response = delete(build_test_app(pool.clone()), &uri, &admin_token()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    let uri = format!("/api/v1/categories/{child}");
    let response = delete(build_test_app(pool.clone()), &uri, &admin_token()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

// ---------------------------------------------------------------------------
// Items and movements
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_borrow_then_return_round_trip(pool: PgPool) {
    let category = create_category(&pool, "Consumables", None).await;
    let item = create_stackable(&pool, category, 10).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/outbound",
        &user_token(),
        borrow_body(item, 4),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["new_quantity"], 6);
    assert_eq!(json["data"]["status"], "partially_out");
    let outbound_id = json["data"]["outbound_id"].as_i64().unwrap();

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/inbound",
        &user_token(),
        json!({
            "item_id": item,
            "quantity": 4,
            "inbound_type": "return",
            "related_outbound_id": outbound_id
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["new_quantity"], 10);
    assert_eq!(json["data"]["status"], "in_stock");

    let uri = format!("/api/v1/items/{item}");
    let json = body_json(get_as(build_test_app(pool.clone()), &uri, &user_token()).await).await;
    assert_eq!(json["data"]["current_quantity"], 10);
    assert_eq!(json["data"]["total_in"], 14);
    assert_eq!(json["data"]["total_out"], 4);
    assert_eq!(json["data"]["category_name"], "Consumables");
    assert_eq!(json["data"]["path_label"], "Consumables");

    let uri = format!("/api/v1/items/{item}/inbound");
    let json = body_json(get_as(build_test_app(pool), &uri, &user_token()).await).await;
    let types: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["inbound_type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["initial", "return"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_oversell_is_bad_request(pool: PgPool) {
    let category = create_category(&pool, "Consumables", None).await;
    let item = create_stackable(&pool, category, 2).await;

    let response = post_json(
        build_test_app(pool),
        "/api/v1/outbound",
        &user_token(),
        json!({ "item_id": item, "quantity": 3, "outbound_type": "transfer" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("current stock: 2"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_unique_code_is_conflict(pool: PgPool) {
    let category = create_category(&pool, "Hands", None).await;
    let body = json!({
        "category_id": category,
        "name": "Dexterous hand",
        "unique_code": "LHT3000",
        "is_stackable": false,
        "initial_stock": 1
    });

    let first = post_json(build_test_app(pool.clone()), "/api/v1/items", &user_token(), body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = post_json(build_test_app(pool), "/api/v1/items", &user_token(), body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_batch_return_reports_per_element(pool: PgPool) {
    let category = create_category(&pool, "Consumables", None).await;
    let item = create_stackable(&pool, category, 10).await;

    let mut ids = Vec::new();
    for token in [user_token(), other_user_token()] {
        let response = post_json(
            build_test_app(pool.clone()),
            "/api/v1/outbound",
            &token,
            borrow_body(item, 1),
        )
        .await;
        ids.push(body_json(response).await["data"]["outbound_id"].as_i64().unwrap());
    }

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/inbound/batch-return",
        &user_token(),
        json!({ "outbound_ids": ids }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["returned"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["failed"][0]["code"], "FORBIDDEN");
    assert_eq!(json["data"]["failed"][0]["outbound_id"], ids[1]);

    let json = body_json(
        get_as(build_test_app(pool), "/api/v1/outbound/unreturned", &user_token()).await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_convert_to_transfer_permissions(pool: PgPool) {
    let category = create_category(&pool, "Consumables", None).await;
    let item = create_stackable(&pool, category, 5).await;
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/outbound",
        &user_token(),
        borrow_body(item, 1),
    )
    .await;
    let outbound_id = body_json(response).await["data"]["outbound_id"].as_i64().unwrap();
    let uri = format!("/api/v1/outbound/{outbound_id}/convert-to-transfer");

    let response = post_json(build_test_app(pool.clone()), &uri, &other_user_token(), json!({})).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json(build_test_app(pool.clone()), &uri, &user_token(), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["outbound_type"], "transfer");

    let json = body_json(get_as(build_test_app(pool), "/api/v1/outbound/mine", &user_token()).await).await;
    assert_eq!(json["data"]["total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_listing_logs_and_overview(pool: PgPool) {
    let category = create_category(&pool, "Consumables", None).await;
    create_stackable(&pool, category, 3).await;

    let json = body_json(
        get_as(build_test_app(pool.clone()), "/api/v1/items?search=cable", &user_token()).await,
    )
    .await;
    assert_eq!(json["data"]["total"], 1);

    let response = get_as(
        build_test_app(pool.clone()),
        "/api/v1/logs?operation_type=edit_category",
        &user_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["total"], 1);

    let response = get_as(
        build_test_app(pool.clone()),
        "/api/v1/logs?operation_type=teleport",
        &user_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(
        get_as(build_test_app(pool), "/api/v1/stats/overview", &user_token()).await,
    )
    .await;
    assert_eq!(json["data"]["total_items"], 1);
    assert_eq!(json["data"]["total_quantity"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_report_routes(pool: PgPool) {
    let root = create_category(&pool, "Robotics", None).await;
    let hands = create_category(&pool, "Hands", Some(root)).await;
    let item = create_stackable(&pool, hands, 10).await;
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/outbound",
        &user_token(),
        borrow_body(item, 4),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let uri = format!("/api/v1/logs/target/item/{item}");
    let json = body_json(get_as(build_test_app(pool.clone()), &uri, &user_token()).await).await;
    let kinds: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["operation_type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["outbound", "edit_item"]);

    let uri = format!("/api/v1/logs/target/user/{item}");
    let response = get_as(build_test_app(pool.clone()), &uri, &user_token()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_as(
        build_test_app(pool.clone()),
        "/api/v1/logs/statistics",
        &user_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["by_day"].as_array().unwrap().len(), 3);
    assert!(json["data"]["by_operator"].is_array());

    let json = body_json(
        get_as(build_test_app(pool.clone()), "/api/v1/stats/by-category", &user_token()).await,
    )
    .await;
    assert_eq!(json["data"][0]["category_name"], "Robotics");
    assert_eq!(json["data"][1]["total_quantity"], 6);

    let json = body_json(
        get_as(build_test_app(pool.clone()), "/api/v1/stats/trends?days=7", &user_token()).await,
    )
    .await;
    assert_eq!(json["data"]["inbound"][0]["quantity"], 10);
    assert_eq!(json["data"]["outbound"][0]["quantity"], 4);

    let response = get_as(
        build_test_app(pool.clone()),
        "/api/v1/stats/trends?days=0",
        &user_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(
        get_as(
            build_test_app(pool.clone()),
            "/api/v1/stats/popular-items?limit=5",
            &user_token(),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"][0]["item_id"], item);
    assert_eq!(json["data"][0]["total_operations"], 14);

    let uri = format!("/api/v1/items/by-category-path?category_id={root}");
    let json = body_json(get_as(build_test_app(pool.clone()), &uri, &user_token()).await).await;
    assert_eq!(json["data"][0]["path_label"], "Robotics-Hands");

    let response = get_as(
        build_test_app(pool),
        "/api/v1/items/by-category-path?category_id=9999",
        &user_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_item_delete_is_admin_only(pool: PgPool) {
    let category = create_category(&pool, "Consumables", None).await;
    let item = create_stackable(&pool, category, 1).await;
    let uri = format!("/api/v1/items/{item}");

    let response = delete(build_test_app(pool.clone()), &uri, &user_token()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete(build_test_app(pool.clone()), &uri, &admin_token()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_as(build_test_app(pool), &uri, &user_token()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
