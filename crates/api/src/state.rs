//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ApiConfig;
use crate::db::Repositories;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Handlers reach storage only through
/// [`Repositories`]; the pool is kept for readiness checks.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    repos: Repositories,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create state backed by `PostgreSQL`.
    #[must_use]
    pub fn new(config: ApiConfig, pool: PgPool) -> Self {
        let repos = Repositories::postgres(&pool);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                repos,
                pool: Some(pool),
            }),
        }
    }

    /// Create state over arbitrary repositories, without a database pool.
    #[must_use]
    pub fn with_repositories(config: ApiConfig, repos: Repositories) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                repos,
                pool: None,
            }),
        }
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get the repositories.
    #[must_use]
    pub fn repos(&self) -> &Repositories {
        &self.inner.repos
    }

    /// Get the database pool, if the state is backed by `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }
}
