//! Challenge models

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Challenge database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Challenge {
    pub id: Uuid,
    pub title: String,
    pub creator_id: String,
    pub difficulty: String,
    pub is_private: bool,
    pub room_code: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub problem_ids: Vec<Uuid>,
    pub participant_ids: Vec<String>,
    pub time_limit: i64,
    pub status: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub user_problem_metadata: Json<HashMap<String, Vec<ChallengeProblemMetadata>>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Challenge {
    /// Per-user problem metadata, empty when the user never scored
    pub fn metadata_for(&self, user_id: &str) -> &[ChallengeProblemMetadata] {
        self.user_problem_metadata
            .0
            .get(user_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Per-user performance on one problem inside a challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeProblemMetadata {
    pub problem_id: Uuid,
    pub score: i32,
    pub time_taken: i64,
    pub completed_at: i64,
}

/// Ranked entry of a challenge-local leaderboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeLeaderboardEntry {
    pub user_id: String,
    pub problems_completed: i32,
    pub total_score: i32,
    pub rank: i32,
}

/// User performance aggregated across challenges
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub user_id: String,
    pub problems_completed: i32,
    pub total_time_taken: i64,
    pub challenges_completed: i32,
    pub score: f64,
    pub challenge_stats: HashMap<String, ChallengeStat>,
}

/// User performance inside a single challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeStat {
    pub rank: i32,
    pub problems_completed: i32,
    pub total_score: i32,
}

/// Compute the ranked leaderboard of a challenge from its metadata map.
///
/// Ties keep insertion order after the score sort; ranks are dense 1..=n.
pub fn compute_challenge_leaderboard(
    metadata: &HashMap<String, Vec<ChallengeProblemMetadata>>,
) -> Vec<ChallengeLeaderboardEntry> {
    let mut leaderboard: Vec<ChallengeLeaderboardEntry> = metadata
        .iter()
        .map(|(user_id, entries)| ChallengeLeaderboardEntry {
            user_id: user_id.clone(),
            problems_completed: entries.len() as i32,
            total_score: entries.iter().map(|m| m.score).sum(),
            rank: 0,
        })
        .collect();

    leaderboard.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    for (i, entry) in leaderboard.iter_mut().enumerate() {
        entry.rank = i as i32 + 1;
    }
    leaderboard
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(problem_id: Uuid, score: i32) -> ChallengeProblemMetadata {
        ChallengeProblemMetadata {
            problem_id,
            score,
            time_taken: 30,
            completed_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_leaderboard_ranks_by_total_score() {
        let p = Uuid::new_v4();
        let mut metadata = HashMap::new();
        metadata.insert("alice".to_string(), vec![meta(p, 4), meta(p, 6)]);
        metadata.insert("bob".to_string(), vec![meta(p, 2)]);

        let board = compute_challenge_leaderboard(&metadata);
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user_id, "alice");
        assert_eq!(board[0].total_score, 10);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[1].user_id, "bob");
        assert_eq!(board[1].rank, 2);
    }

    #[test]
    fn test_leaderboard_counts_problems() {
        let p = Uuid::new_v4();
        let mut metadata = HashMap::new();
        metadata.insert("carol".to_string(), vec![meta(p, 2), meta(p, 2), meta(p, 2)]);

        let board = compute_challenge_leaderboard(&metadata);
        assert_eq!(board[0].problems_completed, 3);
        assert_eq!(board[0].total_score, 6);
    }

    #[test]
    fn test_empty_metadata_gives_empty_board() {
        let board = compute_challenge_leaderboard(&HashMap::new());
        assert!(board.is_empty());
    }
}
