//! Submission response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ActivityDay, ProblemsDoneStatistics, Submission};

/// One submission in API responses; the stored user code is not echoed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub user_id: String,
    pub problem_id: Uuid,
    pub challenge_id: Option<Uuid>,
    pub title: String,
    pub difficulty: String,
    pub language: String,
    pub status: String,
    pub score: i32,
    pub execution_time: f64,
    pub output: String,
    pub country: String,
    pub is_first: bool,
    pub submitted_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            user_id: s.user_id,
            problem_id: s.problem_id,
            challenge_id: s.challenge_id,
            title: s.title,
            difficulty: s.difficulty,
            language: s.language,
            status: s.status,
            score: s.score,
            execution_time: s.execution_time,
            output: s.output,
            country: s.country,
            is_first: s.is_first,
            submitted_at: s.submitted_at,
        }
    }
}

/// Paginated submission list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionsListResponse {
    pub submissions: Vec<SubmissionResponse>,
    pub page: u32,
    pub page_size: u32,
}

/// Per-difficulty solved counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemsDoneStatisticsResponse {
    pub data: ProblemsDoneStatistics,
}

/// Dense monthly activity heatmap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyActivityHeatmapResponse {
    pub data: Vec<ActivityDay>,
}
