//! Submission handler implementations

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::{error::AppResult, services::SubmissionService, state::AppState};

use super::{
    request::{HeatmapQuery, ListSubmissionsQuery},
    response::{
        MonthlyActivityHeatmapResponse, ProblemsDoneStatisticsResponse, SubmissionResponse,
        SubmissionsListResponse,
    },
};

/// List submissions by problem and/or user
pub async fn get_submissions(
    State(state): State<AppState>,
    Query(query): Query<ListSubmissionsQuery>,
) -> AppResult<Json<SubmissionsListResponse>> {
    let submissions = SubmissionService::get_submissions(
        state.db(),
        state.cache(),
        query.problem_id.as_ref(),
        query.user_id.as_deref(),
        query.page,
        query.page_size,
    )
    .await?;

    Ok(Json(submissions))
}

/// Get the current state of a submission
pub async fn get_submission_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SubmissionResponse>> {
    let submission =
        SubmissionService::get_submission_status(state.db(), state.cache(), &id).await?;
    Ok(Json(submission))
}

/// Per-difficulty solved counts for a user
pub async fn get_problems_done_statistics(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<ProblemsDoneStatisticsResponse>> {
    let stats =
        SubmissionService::get_problems_done_statistics(state.db(), state.cache(), &user_id)
            .await?;
    Ok(Json(stats))
}

/// Monthly activity heatmap for a user
pub async fn get_monthly_activity_heatmap(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<HeatmapQuery>,
) -> AppResult<Json<MonthlyActivityHeatmapResponse>> {
    let heatmap = SubmissionService::get_monthly_activity_heatmap(
        state.db(),
        state.cache(),
        &user_id,
        query.year.unwrap_or(0),
        query.month.unwrap_or(0),
    )
    .await?;

    Ok(Json(heatmap))
}
