//! Order endpoints.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::{Value, json};

use shopkeep_integration_tests::TestApp;

async fn add(app: &TestApp, item_id: i32, quantity: u32) {
    let response = app
        .post(
            "/api/cart/addToCart",
            &json!({ "username": "testUser", "itemId": item_id, "quantity": quantity }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_submit_order() {
    let app = TestApp::new();
    app.create_user("testUser").await;
    let item = app.seed_item("Round Widget", Decimal::new(299, 2)).await;
    add(&app, item.id.as_i32(), 2).await;

    let response = app.post("/api/order/submit/testUser", &json!({})).await;

    assert_eq!(response.status, StatusCode::OK);
    let order: Value = response.json();
    assert_eq!(order["user"]["username"], "testUser");
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(
        Decimal::from_str(order["total"].as_str().unwrap()).unwrap(),
        Decimal::new(598, 2)
    );
}

#[tokio::test]
async fn test_order_history_is_a_snapshot() {
    let app = TestApp::new();
    app.create_user("testUser").await;
    let item = app.seed_item("Round Widget", Decimal::new(299, 2)).await;
    add(&app, item.id.as_i32(), 1).await;
    let submitted: Value = app
        .post("/api/order/submit/testUser", &json!({}))
        .await
        .json();

    add(&app, item.id.as_i32(), 5).await;

    let response = app.get("/api/order/history/testUser").await;
    assert_eq!(response.status, StatusCode::OK);
    let history: Vec<Value> = response.json();
    assert_eq!(history, vec![submitted]);
    assert_eq!(history[0]["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_history_lists_orders_oldest_first() {
    let app = TestApp::new();
    app.create_user("testUser").await;
    let item = app.seed_item("Round Widget", Decimal::new(299, 2)).await;

    add(&app, item.id.as_i32(), 1).await;
    let first: Value = app.post("/api/order/submit/testUser", &json!({})).await.json();
    add(&app, item.id.as_i32(), 1).await;
    let second: Value = app.post("/api/order/submit/testUser", &json!({})).await.json();

    let history: Vec<Value> = app.get("/api/order/history/testUser").await.json();
    assert_eq!(history, vec![first, second]);
}

#[tokio::test]
async fn test_submit_empty_cart_is_not_found() {
    let app = TestApp::new();
    app.create_user("testUser").await;

    let response = app.post("/api/order/submit/testUser", &json!({})).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    let history: Vec<Value> = app.get("/api/order/history/testUser").await.json();
    assert!(history.is_empty());
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let app = TestApp::new();

    assert_eq!(
        app.post("/api/order/submit/nobody", &json!({})).await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        app.get("/api/order/history/nobody").await.status,
        StatusCode::NOT_FOUND
    );
}
