//! Application state management
//!
//! Contains shared state accessible across all handlers.

use crate::config::JwtConfig;
use deadpool_postgres::Pool;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Database connection pool (required)
    pub db_pool: Pool,

    /// JWT issuance configuration
    pub jwt: JwtConfig,
}

impl AppState {
    pub fn new(db_pool: Pool, jwt: JwtConfig) -> Self {
        Self { db_pool, jwt }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
