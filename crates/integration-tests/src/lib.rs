//! Integration tests for Shopkeep.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopkeep-integration-tests
//! ```
//!
//! The tests drive the full router (sessions, request IDs, auth gate)
//! through `tower::ServiceExt::oneshot`, backed by the in-memory
//! repositories and `tower_sessions::MemoryStore`. No database is needed.

#![allow(clippy::unwrap_used)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tower::ServiceExt;

use shopkeep_api::config::{ApiConfig, SentryConfig};
use shopkeep_api::db::{ItemRepository, MemoryStore, Repositories};
use shopkeep_api::middleware::SESSION_COOKIE_NAME;
use shopkeep_api::models::{Item, NewItem};
use shopkeep_api::state::AppState;
use shopkeep_core::Price;

/// Password used by [`TestApp::create_user`].
pub const TEST_PASSWORD: &str = "testPassword";

/// A router over fresh in-memory storage.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
}

impl TestApp {
    /// App with the REST surface open (the default configuration).
    #[must_use]
    pub fn new() -> Self {
        Self::build(false)
    }

    /// App where `/api` routes need a login session.
    #[must_use]
    pub fn with_require_auth() -> Self {
        Self::build(true)
    }

    fn build(require_auth: bool) -> Self {
        let store = MemoryStore::new();
        let config = ApiConfig {
            database_url: SecretString::from("postgres://unused"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8080,
            base_url: "http://localhost:8080".to_string(),
            require_auth,
            sentry: SentryConfig::default(),
        };
        let state = AppState::with_repositories(config, Repositories::in_memory(&store));
        let router = shopkeep_api::app(state, tower_sessions::MemoryStore::default());

        Self { router, store }
    }

    /// Insert a catalog item directly into storage.
    pub async fn seed_item(&self, name: &str, price: Decimal) -> Item {
        self.store
            .insert(&NewItem {
                name: name.to_string(),
                price: Price::new(price),
                description: format!("A {name}"),
            })
            .await
            .unwrap()
    }

    /// Register a user through the API with [`TEST_PASSWORD`].
    pub async fn create_user(&self, username: &str) -> TestResponse {
        self.post(
            "/api/user/create",
            &serde_json::json!({
                "username": username,
                "password": TEST_PASSWORD,
                "confirmPassword": TEST_PASSWORD,
            }),
        )
        .await
    }

    /// Log in through the API and return the session cookie.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post(
                "/login",
                &serde_json::json!({ "username": username, "password": TEST_PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.session_cookie().unwrap()
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body), None).await
    }

    /// Send a request, optionally with a JSON body and a session cookie.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<&Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// A buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Deserialize the body as JSON.
    #[must_use]
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// The `name=value` pair of the session cookie, if one was set.
    #[must_use]
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
            .map(str::to_owned)
    }
}
