//! Login, logout, the optional auth gate and the health endpoints.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use shopkeep_api::middleware::REQUEST_ID_HEADER;
use shopkeep_integration_tests::TestApp;

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app = TestApp::new();
    app.create_user("testUser").await;

    let response = app
        .post(
            "/login",
            &json!({ "username": "testUser", "password": "testPassword" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json::<Value>()["username"], "testUser");
    assert!(response.session_cookie().is_some());
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = TestApp::new();
    app.create_user("testUser").await;

    for (username, password) in [("testUser", "wrongPassword"), ("nobody", "testPassword")] {
        let response = app
            .post(
                "/login",
                &json!({ "username": username, "password": password }),
            )
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert!(response.session_cookie().is_none());
    }
}

#[tokio::test]
async fn test_api_is_open_by_default() {
    let app = TestApp::new();

    assert_eq!(app.get("/api/item").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_require_auth_gates_api_routes() {
    let app = TestApp::with_require_auth();

    assert_eq!(app.get("/api/item").await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        app.get("/api/order/history/testUser").await.status,
        StatusCode::UNAUTHORIZED
    );

    // Registration stays public so a first login is possible
    assert_eq!(app.create_user("testUser").await.status, StatusCode::OK);
    let cookie = app.login("testUser").await;

    let response = app
        .send(Method::GET, "/api/item", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .send(Method::GET, "/api/user/testUser", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::with_require_auth();
    app.create_user("testUser").await;
    let cookie = app.login("testUser").await;

    let response = app
        .send(Method::POST, "/logout", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .send(Method::GET, "/api/item", None, Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_session() {
    let app = TestApp::new();

    let response = app.send(Method::POST, "/logout", None, None).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_health_endpoints_are_public() {
    let app = TestApp::with_require_auth();

    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, b"ok");

    assert_eq!(app.get("/health/ready").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = TestApp::new();

    let response = app.get("/health").await;

    assert!(response.headers.contains_key(REQUEST_ID_HEADER));
}
