//! Challenge handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::difficulties,
    error::{AppError, AppResult},
    services::ChallengeService,
    state::AppState,
};

use super::{
    request::{
        ChallengeDetailsQuery, ChallengeHistoryQuery, CreateChallengeRequest,
        JoinChallengeRequest, LifecycleRequest, PublicChallengesQuery,
    },
    response::{
        ChallengeDetailsResponse, ChallengeHistoryResponse, ChallengeSubmissionsResponse,
        ChallengeUserStatsResponse, CreateChallengeResponse, EndChallengeResponse,
        JoinChallengeResponse, PublicChallengesResponse, StartChallengeResponse,
        UserStatsResponse,
    },
};

/// Create a new challenge
pub async fn create_challenge(
    State(state): State<AppState>,
    Json(payload): Json<CreateChallengeRequest>,
) -> AppResult<(StatusCode, Json<CreateChallengeResponse>)> {
    payload.validate()?;

    if !difficulties::ALL.contains(&payload.difficulty.as_str()) {
        return Err(AppError::Validation(format!(
            "Difficulty must be one of {:?}",
            difficulties::ALL
        )));
    }

    let challenge = ChallengeService::create_challenge(state.db(), state.cache(), payload).await?;
    Ok((StatusCode::CREATED, Json(challenge)))
}

/// Challenge details plus its leaderboard
pub async fn get_challenge_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ChallengeDetailsQuery>,
) -> AppResult<Json<ChallengeDetailsResponse>> {
    let details = ChallengeService::get_challenge_details(
        state.db(),
        state.cache(),
        &id,
        query.user_id.as_deref().unwrap_or_default(),
    )
    .await?;

    Ok(Json(details))
}

/// Paginated public challenge listing
pub async fn get_public_challenges(
    State(state): State<AppState>,
    Query(query): Query<PublicChallengesQuery>,
) -> AppResult<Json<PublicChallengesResponse>> {
    let challenges = ChallengeService::get_public_challenges(
        state.db(),
        state.cache(),
        query.page,
        query.page_size,
        query.difficulty.as_deref(),
        query.active_only,
        query.user_id.as_deref(),
    )
    .await?;

    Ok(Json(challenges))
}

/// Join a challenge
pub async fn join_challenge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JoinChallengeRequest>,
) -> AppResult<Json<JoinChallengeResponse>> {
    ChallengeService::join_challenge(
        state.db(),
        state.cache(),
        &id,
        &payload.user_id,
        payload.password.as_deref(),
    )
    .await?;

    Ok(Json(JoinChallengeResponse {
        challenge_id: id,
        success: true,
        message: "Joined successfully".to_string(),
    }))
}

/// Start a challenge (creator only)
pub async fn start_challenge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LifecycleRequest>,
) -> AppResult<Json<StartChallengeResponse>> {
    let result =
        ChallengeService::start_challenge(state.db(), state.cache(), &id, &payload.user_id).await?;
    Ok(Json(result))
}

/// End a challenge (creator only)
pub async fn end_challenge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LifecycleRequest>,
) -> AppResult<Json<EndChallengeResponse>> {
    let result =
        ChallengeService::end_challenge(state.db(), state.cache(), &id, &payload.user_id).await?;
    Ok(Json(result))
}

/// Submissions recorded against a challenge
pub async fn get_challenge_submissions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ChallengeSubmissionsResponse>> {
    let submissions =
        ChallengeService::get_challenge_submissions(state.db(), state.cache(), &id).await?;
    Ok(Json(submissions))
}

/// Cross-challenge statistics for a user
pub async fn get_user_stats(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserStatsResponse>> {
    let stats = ChallengeService::get_user_stats(state.db(), state.cache(), &user_id).await?;
    Ok(Json(stats))
}

/// Statistics for one user inside one challenge
pub async fn get_challenge_user_stats(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(Uuid, String)>,
) -> AppResult<Json<ChallengeUserStatsResponse>> {
    let stats =
        ChallengeService::get_challenge_user_stats(state.db(), state.cache(), &id, &user_id)
            .await?;
    Ok(Json(stats))
}

/// Paginated challenge participation history
pub async fn get_challenge_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ChallengeHistoryQuery>,
) -> AppResult<Json<ChallengeHistoryResponse>> {
    let history = ChallengeService::get_challenge_history(
        state.db(),
        &user_id,
        query.is_private,
        query.page,
        query.page_size,
    )
    .await?;

    Ok(Json(history))
}
