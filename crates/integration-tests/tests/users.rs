//! User endpoints: registration and lookups.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::{Value, json};

use shopkeep_integration_tests::{TEST_PASSWORD, TestApp};

#[tokio::test]
async fn test_create_user() {
    let app = TestApp::new();

    let response = app.create_user("testUser").await;

    assert_eq!(response.status, StatusCode::OK);
    let user: Value = response.json();
    assert_eq!(user["username"], "testUser");
    assert!(user["id"].is_number());
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_create_user_rejects_short_password() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/user/create",
            &json!({ "username": "testUser", "password": "abc", "confirmPassword": "abc" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body.is_empty());
    assert_eq!(
        app.get("/api/user/testUser").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_create_user_rejects_mismatched_confirmation() {
    let app = TestApp::new();

    let response = app
        .post(
            "/api/user/create",
            &json!({
                "username": "testUser",
                "password": TEST_PASSWORD,
                "confirmPassword": "somethingElse",
            }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_rejects_missing_password() {
    let app = TestApp::new();

    let response = app
        .post("/api/user/create", &json!({ "username": "testUser" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_rejects_taken_username() {
    let app = TestApp::new();
    app.create_user("testUser").await;

    let response = app.create_user("testUser").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_user_rejects_blank_username() {
    let app = TestApp::new();

    let response = app.create_user("").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_find_user_by_username() {
    let app = TestApp::new();
    let created: Value = app.create_user("testUser").await.json();

    let response = app.get("/api/user/testUser").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json::<Value>(), created);
    assert_eq!(
        app.get("/api/user/nobody").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_find_user_by_id() {
    let app = TestApp::new();
    let created: Value = app.create_user("testUser").await.json();
    let id = created["id"].as_i64().unwrap();

    let response = app.get(&format!("/api/user/id/{id}")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json::<Value>()["username"], "testUser");
    assert_eq!(
        app.get("/api/user/id/9999").await.status,
        StatusCode::NOT_FOUND
    );
}
