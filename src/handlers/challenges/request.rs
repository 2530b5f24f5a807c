//! Challenge request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create challenge request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateChallengeRequest {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1))]
    pub creator_id: String,

    #[validate(length(min = 1))]
    pub difficulty: String,

    #[serde(default)]
    pub is_private: bool,

    #[validate(length(min = 1))]
    pub problem_ids: Vec<Uuid>,

    /// Challenge duration in seconds
    #[validate(range(min = 1))]
    pub time_limit: i64,
}

/// Challenge details query
#[derive(Debug, Deserialize)]
pub struct ChallengeDetailsQuery {
    pub user_id: Option<String>,
}

/// Public challenge listing query
#[derive(Debug, Deserialize)]
pub struct PublicChallengesQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub difficulty: Option<String>,
    #[serde(default)]
    pub active_only: bool,
    pub user_id: Option<String>,
}

/// Join challenge request
#[derive(Debug, Deserialize)]
pub struct JoinChallengeRequest {
    pub user_id: String,
    pub password: Option<String>,
}

/// Start or end challenge request; the caller must be the creator
#[derive(Debug, Deserialize)]
pub struct LifecycleRequest {
    pub user_id: String,
}

/// Challenge history query
#[derive(Debug, Deserialize)]
pub struct ChallengeHistoryQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    #[serde(default)]
    pub is_private: bool,
}
