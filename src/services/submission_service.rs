//! Submission service
//!
//! Read side of the submission audit: history queries, per-user statistics,
//! and the monthly activity heatmap, all behind the read-through cache.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    cache::{keys, Cache},
    constants::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE},
    db::repositories::{ProblemRepository, SubmissionRepository},
    error::{AppError, AppResult},
    handlers::submissions::response::{
        MonthlyActivityHeatmapResponse, ProblemsDoneStatisticsResponse, SubmissionResponse,
        SubmissionsListResponse,
    },
    utils::time::{current_year_month, until_next_midnight},
};

/// Submission service for business logic
pub struct SubmissionService;

impl SubmissionService {
    /// List submissions for a problem and/or a user.
    ///
    /// At least one of the two filters is required; a problem filter is
    /// checked against the live catalog first.
    pub async fn get_submissions(
        pool: &PgPool,
        cache: Cache,
        problem_id: Option<&Uuid>,
        user_id: Option<&str>,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> AppResult<SubmissionsListResponse> {
        if problem_id.is_none() && user_id.map(str::is_empty).unwrap_or(true) {
            return Err(AppError::Validation(
                "Problem ID or user ID is required".to_string(),
            ));
        }

        let problem_key = problem_id.map(Uuid::to_string).unwrap_or_default();
        let user_key = user_id.unwrap_or_default();
        let cache_key = keys::submissions(&problem_key, user_key);
        if let Some(cached) = cache.get::<SubmissionsListResponse>(&cache_key).await {
            return Ok(cached);
        }

        if let Some(problem_id) = problem_id {
            if ProblemRepository::find_by_id(pool, problem_id).await?.is_none() {
                return Err(AppError::NotFound("Problem not found".to_string()));
            }
        }

        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let offset = (page as i64 - 1) * page_size as i64;

        let submissions =
            SubmissionRepository::list(pool, problem_id, user_id, offset, page_size as i64).await?;

        let response = SubmissionsListResponse {
            submissions: submissions.into_iter().map(SubmissionResponse::from).collect(),
            page,
            page_size,
        };
        cache.set(&cache_key, &response, keys::SUBMISSIONS_TTL).await;
        Ok(response)
    }

    /// Current state of one submission
    pub async fn get_submission_status(
        pool: &PgPool,
        cache: Cache,
        id: &Uuid,
    ) -> AppResult<SubmissionResponse> {
        let cache_key = keys::submission(id);
        if let Some(cached) = cache.get::<SubmissionResponse>(&cache_key).await {
            return Ok(cached);
        }

        let submission = SubmissionRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

        let response = SubmissionResponse::from(submission);
        cache
            .set(&cache_key, &response, keys::SUBMISSION_STATUS_TTL)
            .await;
        Ok(response)
    }

    /// Per-difficulty solved counts for a user
    pub async fn get_problems_done_statistics(
        pool: &PgPool,
        cache: Cache,
        user_id: &str,
    ) -> AppResult<ProblemsDoneStatisticsResponse> {
        if user_id.is_empty() {
            return Err(AppError::Validation("User ID is required".to_string()));
        }

        let cache_key = keys::stats(user_id);
        if let Some(cached) = cache.get::<ProblemsDoneStatisticsResponse>(&cache_key).await {
            return Ok(cached);
        }

        let data = SubmissionRepository::problems_done_statistics(pool, user_id).await?;

        let response = ProblemsDoneStatisticsResponse { data };
        cache.set(&cache_key, &response, keys::STATS_TTL).await;
        Ok(response)
    }

    /// Dense per-day activity for a calendar month.
    ///
    /// Month and year default to the current month when either is zero.
    /// Cached until the next local midnight so the current day rolls over.
    pub async fn get_monthly_activity_heatmap(
        pool: &PgPool,
        cache: Cache,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> AppResult<MonthlyActivityHeatmapResponse> {
        if user_id.is_empty() {
            return Err(AppError::Validation("User ID is required".to_string()));
        }

        let (year, month) = if year == 0 || month == 0 {
            current_year_month()
        } else {
            (year, month)
        };

        let cache_key = keys::heatmap(user_id, year, month);
        if let Some(cached) = cache.get::<MonthlyActivityHeatmapResponse>(&cache_key).await {
            return Ok(cached);
        }

        let data =
            SubmissionRepository::monthly_contribution_history(pool, user_id, year, month).await?;

        let response = MonthlyActivityHeatmapResponse { data };
        cache.set(&cache_key, &response, until_next_midnight()).await;
        Ok(response)
    }
}
