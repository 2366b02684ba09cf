//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (database)
//!
//! # Session
//! POST /login                         - Start a session
//! POST /logout                        - End the session
//!
//! # Users
//! POST /api/user/create               - Register (always public)
//! GET  /api/user/{username}           - Look up by username
//! GET  /api/user/id/{id}              - Look up by ID
//!
//! # Cart
//! POST /api/cart/addToCart            - Add units of an item
//! POST /api/cart/removeFromCart       - Remove units of an item
//!
//! # Catalog
//! GET  /api/item                      - List items
//! GET  /api/item/{id}                 - Look up by ID
//! GET  /api/item/name/{name}          - Look up by exact name
//!
//! # Orders
//! POST /api/order/submit/{username}   - Submit the cart as an order
//! GET  /api/order/history/{username}  - List past orders
//! ```
//!
//! Every `/api` route except user creation sits behind
//! `require_auth_middleware` when `require_auth` is set. Request bodies go
//! through [`JsonBody`], so a body that does not parse is a 400.

pub mod auth;
pub mod carts;
pub mod health;
pub mod items;
mod json;
pub mod orders;
pub mod users;

pub use json::JsonBody;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::require_auth_middleware;
use crate::state::AppState;

/// Create the user routes router (lookups only).
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/user/{username}", get(users::find_by_username))
        .route("/api/user/id/{id}", get(users::find_by_id))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/api/cart/addToCart", post(carts::add_to_cart))
        .route("/api/cart/removeFromCart", post(carts::remove_from_cart))
}

/// Create the catalog routes router.
pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/api/item", get(items::index))
        .route("/api/item/{id}", get(items::show))
        .route("/api/item/name/{name}", get(items::find_by_name))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/api/order/submit/{username}", post(orders::submit))
        .route("/api/order/history/{username}", get(orders::history))
}

/// Create the `/api` routes, optionally gated on a logged-in session.
pub fn api_routes(require_auth: bool) -> Router<AppState> {
    let protected = Router::new()
        .merge(user_routes())
        .merge(cart_routes())
        .merge(item_routes())
        .merge(order_routes());

    let protected = if require_auth {
        protected.route_layer(axum::middleware::from_fn(require_auth_middleware))
    } else {
        protected
    };

    Router::new()
        .route("/api/user/create", post(users::create))
        .merge(protected)
}

/// Create all routes for the API.
pub fn routes(require_auth: bool) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .merge(api_routes(require_auth))
}
