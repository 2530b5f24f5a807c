//! Leaderboard models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user's aggregated score, as produced by both the fast index and the
/// durable aggregation fallback
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserScore {
    pub user_id: String,
    pub entity: String,
    pub total_score: f64,
}

/// Full leaderboard view for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLeaderboardData {
    pub user_id: String,
    pub entity: String,
    pub score: f64,
    pub global_rank: i64,
    pub entity_rank: i64,
    pub top_k_global: Vec<UserScore>,
    pub top_k_entity: Vec<UserScore>,
}

/// Global and per-entity rank of a user; 0 means unranked
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRank {
    pub global_rank: i64,
    pub entity_rank: i64,
}
