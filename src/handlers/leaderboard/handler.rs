//! Leaderboard handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{UserLeaderboardData, UserRank},
    services::LeaderboardService,
    state::AppState,
};

use super::{
    request::{ForceChangeEntityRequest, TopKQuery},
    response::TopKResponse,
};

/// Top-K users globally
pub async fn get_top_k_global(
    State(state): State<AppState>,
    Query(query): Query<TopKQuery>,
) -> AppResult<Json<TopKResponse>> {
    let leaderboard = state.leaderboard();
    let users = LeaderboardService::get_top_k_global(state.db(), &leaderboard, query.k).await?;
    Ok(Json(TopKResponse { users }))
}

/// Top-K users within one entity
pub async fn get_top_k_entity(
    State(state): State<AppState>,
    Path(entity): Path<String>,
) -> AppResult<Json<TopKResponse>> {
    let leaderboard = state.leaderboard();
    let users = LeaderboardService::get_top_k_entity(state.db(), &leaderboard, &entity).await?;
    Ok(Json(TopKResponse { users }))
}

/// Global and entity rank of a user
pub async fn get_user_rank(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserRank>> {
    let leaderboard = state.leaderboard();
    let rank = LeaderboardService::get_user_rank(state.db(), &leaderboard, &user_id).await?;
    Ok(Json(rank))
}

/// Combined leaderboard view for one user
pub async fn get_leaderboard_data(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserLeaderboardData>> {
    let leaderboard = state.leaderboard();
    let data = LeaderboardService::get_leaderboard_data(state.db(), &leaderboard, &user_id).await?;
    Ok(Json(data))
}

/// Relocate a user's leaderboard entity, durably and in the index
pub async fn force_change_user_entity(
    State(state): State<AppState>,
    Json(payload): Json<ForceChangeEntityRequest>,
) -> AppResult<StatusCode> {
    let leaderboard = state.leaderboard();
    LeaderboardService::force_change_user_entity(
        state.db(),
        &leaderboard,
        &payload.user_id,
        &payload.entity,
    )
    .await?;

    Ok(StatusCode::OK)
}
