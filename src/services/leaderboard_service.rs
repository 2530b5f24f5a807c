//! Leaderboard service
//!
//! Serves ranked views from the fast index first and falls back to the
//! durable aggregation when the index misses or errors. The durable path
//! is authoritative but slow; the index may lag between syncs.

use sqlx::PgPool;

use crate::{
    db::repositories::SubmissionRepository,
    error::{AppError, AppResult},
    leaderboard::Leaderboard,
    models::{UserLeaderboardData, UserRank, UserScore},
};

/// Leaderboard service for business logic
pub struct LeaderboardService;

impl LeaderboardService {
    /// Top-K users globally
    pub async fn get_top_k_global(
        pool: &PgPool,
        leaderboard: &Leaderboard,
        k: Option<i64>,
    ) -> AppResult<Vec<UserScore>> {
        match leaderboard.get_top_k_global().await {
            Ok(users) if !users.is_empty() => return Ok(users),
            Ok(_) => tracing::debug!("leaderboard index empty for global top-k"),
            Err(e) => tracing::warn!("leaderboard index failed for global top-k: {}", e),
        }

        let k = k.filter(|k| *k > 0).unwrap_or(10);
        SubmissionRepository::get_top_k_global(pool, k).await
    }

    /// Top-K users within one entity
    pub async fn get_top_k_entity(
        pool: &PgPool,
        leaderboard: &Leaderboard,
        entity: &str,
    ) -> AppResult<Vec<UserScore>> {
        if entity.is_empty() {
            return Err(AppError::Validation("Entity is required".to_string()));
        }

        match leaderboard.get_top_k_entity(entity).await {
            Ok(users) if !users.is_empty() => return Ok(users),
            Ok(_) => tracing::debug!("leaderboard index empty for entity {}", entity),
            Err(e) => tracing::warn!("leaderboard index failed for entity {}: {}", entity, e),
        }

        SubmissionRepository::get_top_k_entity(pool, &entity.to_uppercase(), 10).await
    }

    /// Global and entity rank for a user; 0 means unranked
    pub async fn get_user_rank(
        pool: &PgPool,
        leaderboard: &Leaderboard,
        user_id: &str,
    ) -> AppResult<UserRank> {
        if user_id.is_empty() {
            return Err(AppError::Validation("User ID is required".to_string()));
        }

        match (
            leaderboard.get_rank_global(user_id).await,
            leaderboard.get_rank_entity(user_id).await,
        ) {
            (Ok(Some(global_rank)), Ok(entity_rank)) => {
                return Ok(UserRank {
                    global_rank,
                    entity_rank: entity_rank.unwrap_or(0),
                });
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("leaderboard index failed for rank of {}: {}", user_id, e)
            }
            _ => tracing::debug!("user {} not in leaderboard index", user_id),
        }

        let (global_rank, entity_rank) = SubmissionRepository::get_user_rank(pool, user_id).await?;
        Ok(UserRank {
            global_rank,
            entity_rank,
        })
    }

    /// Combined leaderboard view for one user
    pub async fn get_leaderboard_data(
        pool: &PgPool,
        leaderboard: &Leaderboard,
        user_id: &str,
    ) -> AppResult<UserLeaderboardData> {
        if user_id.is_empty() {
            return Err(AppError::Validation("User ID is required".to_string()));
        }

        match leaderboard.get_user_leaderboard_data(user_id).await {
            Ok(Some(data)) => return Ok(data),
            Ok(None) => tracing::debug!("user {} not in leaderboard index", user_id),
            Err(e) => tracing::warn!("leaderboard index failed for {}: {}", user_id, e),
        }

        let user = SubmissionRepository::get_leaderboard_data(pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let (global_rank, entity_rank) = SubmissionRepository::get_user_rank(pool, user_id).await?;
        let top_k_global = SubmissionRepository::get_top_k_global(pool, 10).await?;
        let top_k_entity = if user.entity.is_empty() {
            Vec::new()
        } else {
            SubmissionRepository::get_top_k_entity(pool, &user.entity, 10).await?
        };

        Ok(UserLeaderboardData {
            user_id: user.user_id,
            entity: user.entity,
            score: user.total_score,
            global_rank,
            entity_rank,
            top_k_global,
            top_k_entity,
        })
    }

    /// Relocate a user to a new entity, durably and in the index.
    ///
    /// The durable multi-update retries internally; the index relocation
    /// follows so reads converge immediately instead of at the next sync.
    pub async fn force_change_user_entity(
        pool: &PgPool,
        leaderboard: &Leaderboard,
        user_id: &str,
        entity: &str,
    ) -> AppResult<()> {
        if user_id.is_empty() || entity.is_empty() {
            return Err(AppError::Validation(
                "User ID and entity are required".to_string(),
            ));
        }

        SubmissionRepository::force_change_user_entity(pool, user_id, entity).await?;
        leaderboard.update_entity(user_id, entity).await?;

        Ok(())
    }

    /// Full rebuild of the fast index from the durable store
    pub async fn sync_leaderboard(pool: &PgPool, leaderboard: &Leaderboard) -> AppResult<usize> {
        SubmissionRepository::sync_leaderboard(pool, leaderboard).await
    }
}
