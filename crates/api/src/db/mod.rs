//! Database access for Shopkeep.
//!
//! # Tables
//!
//! - `app_user` - Registered users and their password hashes
//! - `cart` / `cart_item` - One cart per user, one row per unit
//! - `item` - Catalog items (reference data)
//! - `user_order` / `user_order_item` - Immutable order snapshots
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Repositories
//!
//! Each resource is reached through a thin repository trait offering
//! lookup-by-field queries. [`Repositories::postgres`] wires the `sqlx`
//! implementations; [`Repositories::in_memory`] wires [`MemoryStore`],
//! which the test suites use.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p shopkeep-cli -- migrate
//! ```

pub mod carts;
pub mod items;
pub mod memory;
pub mod orders;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shopkeep_core::{ItemId, UserId, Username};

use crate::models::{Cart, Item, NewItem, NewOrder, User, UserOrder};

pub use carts::PgCartRepository;
pub use items::PgItemRepository;
pub use memory::MemoryStore;
pub use orders::PgOrderRepository;
pub use users::PgUserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
pub(crate) fn conflict_on_unique(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Lookups and writes for users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by ID.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Get a user by username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    /// Create a user together with its empty cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    async fn create_with_cart(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError>;

    /// Get a user and its password hash by username.
    async fn get_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError>;
}

/// Lookups and writes for carts.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Get the cart owned by `user`.
    async fn find_by_user(&self, user: &User) -> Result<Option<Cart>, RepositoryError>;

    /// Persist the cart's item list and total.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart does not exist.
    async fn save(&self, cart: &Cart) -> Result<(), RepositoryError>;
}

/// Lookups for catalog items.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// All items, ordered by ID.
    async fn find_all(&self) -> Result<Vec<Item>, RepositoryError>;

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError>;

    /// All items with exactly this name, ordered by ID.
    async fn find_by_name(&self, name: &str) -> Result<Vec<Item>, RepositoryError>;

    /// Add an item to the catalog.
    async fn insert(&self, item: &NewItem) -> Result<Item, RepositoryError>;
}

/// Lookups and writes for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Store a new order snapshot.
    async fn create(&self, order: &NewOrder) -> Result<UserOrder, RepositoryError>;

    /// All orders of `user`, oldest first.
    async fn find_by_user(&self, user: &User) -> Result<Vec<UserOrder>, RepositoryError>;
}

/// The set of repositories handlers work against.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub carts: Arc<dyn CartRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub orders: Arc<dyn OrderRepository>,
}

impl Repositories {
    /// Repositories backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            carts: Arc::new(PgCartRepository::new(pool.clone())),
            items: Arc::new(PgItemRepository::new(pool.clone())),
            orders: Arc::new(PgOrderRepository::new(pool.clone())),
        }
    }

    /// Repositories backed by a shared in-memory store.
    #[must_use]
    pub fn in_memory(store: &MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            carts: Arc::new(store.clone()),
            items: Arc::new(store.clone()),
            orders: Arc::new(store.clone()),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
