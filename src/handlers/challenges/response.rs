//! Challenge response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    Challenge, ChallengeLeaderboardEntry, ChallengeProblemMetadata, Submission, UserStats,
};

/// Create challenge response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChallengeResponse {
    pub id: Uuid,
    pub room_code: String,
    /// Empty for public challenges
    pub password: String,
    pub join_url: String,
}

/// Challenge details plus its current leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeDetailsResponse {
    pub challenge: Challenge,
    pub leaderboard: Vec<ChallengeLeaderboardEntry>,
}

/// Public listing projection: no problem list, participants, or metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeSummary {
    pub id: Uuid,
    pub title: String,
    pub creator_id: String,
    pub difficulty: String,
    pub is_private: bool,
    pub room_code: String,
    pub time_limit: i64,
    pub status: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub participant_count: usize,
    pub problem_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&Challenge> for ChallengeSummary {
    fn from(c: &Challenge) -> Self {
        Self {
            id: c.id,
            title: c.title.clone(),
            creator_id: c.creator_id.clone(),
            difficulty: c.difficulty.clone(),
            is_private: c.is_private,
            room_code: c.room_code.clone(),
            time_limit: c.time_limit,
            status: c.status.clone(),
            start_time: c.start_time,
            end_time: c.end_time,
            participant_count: c.participant_ids.len(),
            problem_count: c.problem_ids.len(),
            created_at: c.created_at,
        }
    }
}

/// Public challenge listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicChallengesResponse {
    pub challenges: Vec<ChallengeSummary>,
}

/// Join outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinChallengeResponse {
    pub challenge_id: Uuid,
    pub success: bool,
    pub message: String,
}

/// Start outcome with the fixed window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartChallengeResponse {
    pub success: bool,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

/// End outcome with the final leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndChallengeResponse {
    pub success: bool,
    pub leaderboard: Vec<ChallengeLeaderboardEntry>,
}

/// Submissions recorded against a challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeSubmissionsResponse {
    pub submissions: Vec<Submission>,
}

/// Cross-challenge user statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatsResponse {
    pub stats: UserStats,
}

/// Per-challenge user statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeUserStatsResponse {
    pub user_id: String,
    pub problems_completed: i32,
    pub total_score: i32,
    pub rank: i32,
    pub metadata: Vec<ChallengeProblemMetadata>,
}

/// Paginated challenge history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeHistoryResponse {
    pub challenges: Vec<Challenge>,
    pub total_count: i64,
    pub page: u32,
    pub page_size: u32,
}
