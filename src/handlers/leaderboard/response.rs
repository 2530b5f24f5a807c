//! Leaderboard response DTOs

use serde::{Deserialize, Serialize};

use crate::models::UserScore;

/// Ranked user list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopKResponse {
    pub users: Vec<UserScore>,
}
