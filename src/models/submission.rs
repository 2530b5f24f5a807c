//! Submission and scoring models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Submission database model
///
/// Append-only audit of every submit-case execution. `is_first` marks the
/// earliest SUCCESS for a (user, problem) pair; only that row carries a
/// non-zero score.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub user_id: String,
    pub problem_id: Uuid,
    pub challenge_id: Option<Uuid>,
    pub title: String,
    pub difficulty: String,
    pub language: String,
    #[serde(skip_serializing, default)]
    pub user_code: String,
    pub status: String,
    pub score: i32,
    pub execution_time: f64,
    pub output: String,
    pub country: String,
    pub is_first: bool,
    pub submitted_at: DateTime<Utc>,
}

/// New submission payload, before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub user_id: String,
    pub problem_id: Uuid,
    pub challenge_id: Option<Uuid>,
    pub title: String,
    pub difficulty: String,
    pub language: String,
    pub user_code: String,
    pub status: String,
    pub score: i32,
    pub execution_time: f64,
    pub output: String,
    pub country: String,
    pub is_first: bool,
    pub submitted_at: DateTime<Utc>,
}

/// First-success record, at most one per (user, problem)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProblemDone {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub user_id: String,
    pub problem_id: Uuid,
    pub title: String,
    pub language: String,
    pub difficulty: String,
    pub country: String,
    pub score: i32,
    pub submitted_at: DateTime<Utc>,
}

/// Structured result document the executor emits in its `output` field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecutionStats {
    pub total_test_cases: i32,
    pub passed_test_cases: i32,
    pub failed_test_cases: i32,
    pub overall_pass: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_test_case: Option<serde_json::Value>,
}

/// Per-difficulty solved/available counts for a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemsDoneStatistics {
    pub max_easy_count: i32,
    pub done_easy_count: i32,
    pub max_medium_count: i32,
    pub done_medium_count: i32,
    pub max_hard_count: i32,
    pub done_hard_count: i32,
}

/// One day in the monthly activity heatmap
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDay {
    pub date: String,
    pub count: i64,
    pub is_active: bool,
}
