//! Leaderboard request DTOs

use serde::Deserialize;

/// Top-K query; defaults to the configured window
#[derive(Debug, Deserialize)]
pub struct TopKQuery {
    pub k: Option<i64>,
}

/// Relocate a user to a new entity
#[derive(Debug, Deserialize)]
pub struct ForceChangeEntityRequest {
    pub user_id: String,
    pub entity: String,
}
