//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use sqlx::PgPool;

use crate::bus::ExecutorClient;
use crate::cache::Cache;
use crate::config::Config;
use crate::leaderboard::Leaderboard;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Database connection pool
    pub db: PgPool,

    /// Read-through cache
    pub cache: Cache,

    /// Fast leaderboard index
    pub leaderboard: Leaderboard,

    /// Executor message bus client
    pub executor: ExecutorClient,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        db: PgPool,
        cache: Cache,
        leaderboard: Leaderboard,
        executor: ExecutorClient,
        config: Config,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                cache,
                leaderboard,
                executor,
                config,
            }),
        }
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get a clone of the cache handle
    pub fn cache(&self) -> Cache {
        self.inner.cache.clone()
    }

    /// Get a clone of the leaderboard index handle
    pub fn leaderboard(&self) -> Leaderboard {
        self.inner.leaderboard.clone()
    }

    /// Get a reference to the executor bus client
    pub fn executor(&self) -> &ExecutorClient {
        &self.inner.executor
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
