//! Challenge service
//!
//! Multi-participant timed rooms over a shared pool of problems: creation
//! with room codes and optional passwords, idempotent joining, creator-only
//! lifecycle transitions, and challenge-local leaderboards.

use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    cache::{keys, Cache},
    constants::{CHALLENGE_PASSWORD_LENGTH, DEFAULT_PAGE, DEFAULT_PAGE_SIZE, ROOM_CODE_LENGTH},
    db::repositories::ChallengeRepository,
    error::{AppError, AppResult},
    handlers::challenges::{
        request::CreateChallengeRequest,
        response::{
            ChallengeDetailsResponse, ChallengeHistoryResponse, ChallengeSubmissionsResponse,
            ChallengeSummary, ChallengeUserStatsResponse, CreateChallengeResponse,
            EndChallengeResponse, PublicChallengesResponse, StartChallengeResponse,
            UserStatsResponse,
        },
    },
};

/// Challenge service for business logic
pub struct ChallengeService;

impl ChallengeService {
    /// Create a challenge; private rooms get a generated password
    pub async fn create_challenge(
        pool: &PgPool,
        cache: Cache,
        payload: CreateChallengeRequest,
    ) -> AppResult<CreateChallengeResponse> {
        let room_code = generate_access_code(ROOM_CODE_LENGTH);
        let password = if payload.is_private {
            generate_access_code(CHALLENGE_PASSWORD_LENGTH)
        } else {
            String::new()
        };

        let challenge = ChallengeRepository::create(
            pool,
            &payload.title,
            &payload.creator_id,
            &payload.difficulty,
            payload.is_private,
            &room_code,
            &password,
            &payload.problem_ids,
            payload.time_limit,
        )
        .await?;

        if !payload.is_private {
            cache
                .invalidate(&[keys::PUBLIC_CHALLENGES_PATTERN.to_string()])
                .await;
        }

        Ok(CreateChallengeResponse {
            id: challenge.id,
            room_code,
            password,
            join_url: format!("https://codearena.io/challenges/join/{}", challenge.id),
        })
    }

    /// Challenge details plus its current leaderboard
    pub async fn get_challenge_details(
        pool: &PgPool,
        cache: Cache,
        id: &Uuid,
        user_id: &str,
    ) -> AppResult<ChallengeDetailsResponse> {
        let cache_key = keys::challenge_details(id, user_id);
        if let Some(cached) = cache.get::<ChallengeDetailsResponse>(&cache_key).await {
            return Ok(cached);
        }

        let challenge = ChallengeRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Challenge not found".to_string()))?;
        let leaderboard = ChallengeRepository::get_leaderboard(pool, id).await?;

        let response = ChallengeDetailsResponse {
            challenge,
            leaderboard,
        };
        cache.set(&cache_key, &response, keys::CHALLENGE_TTL).await;
        Ok(response)
    }

    /// Paginated public challenge listing
    pub async fn get_public_challenges(
        pool: &PgPool,
        cache: Cache,
        page: Option<u32>,
        page_size: Option<u32>,
        difficulty: Option<&str>,
        active_only: bool,
        user_id: Option<&str>,
    ) -> AppResult<PublicChallengesResponse> {
        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

        let cache_key = keys::public_challenges(
            difficulty.unwrap_or_default(),
            active_only,
            user_id.unwrap_or_default(),
        );
        if let Some(cached) = cache.get::<PublicChallengesResponse>(&cache_key).await {
            return Ok(cached);
        }

        let offset = (page as i64 - 1) * page_size as i64;
        let challenges =
            ChallengeRepository::list_public(pool, difficulty, active_only, offset, page_size as i64)
                .await?;

        let response = PublicChallengesResponse {
            challenges: challenges.iter().map(ChallengeSummary::from).collect(),
        };
        cache.set(&cache_key, &response, keys::CHALLENGE_TTL).await;
        Ok(response)
    }

    /// Join a challenge; repeated joins succeed without effect
    pub async fn join_challenge(
        pool: &PgPool,
        cache: Cache,
        id: &Uuid,
        user_id: &str,
        password: Option<&str>,
    ) -> AppResult<()> {
        if user_id.is_empty() {
            return Err(AppError::Validation("User ID is required".to_string()));
        }

        ChallengeRepository::join(pool, id, user_id, password).await?;

        cache.invalidate(&[keys::challenge_details_pattern(id)]).await;

        Ok(())
    }

    /// Start a challenge (creator only)
    pub async fn start_challenge(
        pool: &PgPool,
        cache: Cache,
        id: &Uuid,
        user_id: &str,
    ) -> AppResult<StartChallengeResponse> {
        if user_id.is_empty() {
            return Err(AppError::Validation("User ID is required".to_string()));
        }

        let challenge = ChallengeRepository::start(pool, id, user_id).await?;

        cache
            .invalidate(&[
                keys::challenge_details_pattern(id),
                keys::PUBLIC_CHALLENGES_PATTERN.to_string(),
            ])
            .await;

        Ok(StartChallengeResponse {
            success: true,
            start_time: challenge.start_time,
            end_time: challenge.end_time,
        })
    }

    /// End a challenge (creator only) and return the final leaderboard
    pub async fn end_challenge(
        pool: &PgPool,
        cache: Cache,
        id: &Uuid,
        user_id: &str,
    ) -> AppResult<EndChallengeResponse> {
        if user_id.is_empty() {
            return Err(AppError::Validation("User ID is required".to_string()));
        }

        let leaderboard = ChallengeRepository::get_leaderboard(pool, id).await?;
        ChallengeRepository::end(pool, id, user_id).await?;

        cache
            .invalidate(&[
                keys::challenge_details_pattern(id),
                keys::PUBLIC_CHALLENGES_PATTERN.to_string(),
            ])
            .await;

        Ok(EndChallengeResponse {
            success: true,
            leaderboard,
        })
    }

    /// Every submission recorded against a challenge
    pub async fn get_challenge_submissions(
        pool: &PgPool,
        cache: Cache,
        id: &Uuid,
    ) -> AppResult<ChallengeSubmissionsResponse> {
        let cache_key = keys::challenge_submissions(id);
        if let Some(cached) = cache.get::<ChallengeSubmissionsResponse>(&cache_key).await {
            return Ok(cached);
        }

        let submissions = ChallengeRepository::get_submissions(pool, id).await?;

        let response = ChallengeSubmissionsResponse { submissions };
        cache
            .set(&cache_key, &response, keys::SUBMISSION_STATUS_TTL)
            .await;
        Ok(response)
    }

    /// User performance aggregated across challenges
    pub async fn get_user_stats(
        pool: &PgPool,
        cache: Cache,
        user_id: &str,
    ) -> AppResult<UserStatsResponse> {
        if user_id.is_empty() {
            return Err(AppError::Validation("User ID is required".to_string()));
        }

        let cache_key = keys::user_stats(user_id);
        if let Some(cached) = cache.get::<UserStatsResponse>(&cache_key).await {
            return Ok(cached);
        }

        let stats = ChallengeRepository::get_user_stats(pool, user_id).await?;

        let response = UserStatsResponse { stats };
        cache.set(&cache_key, &response, keys::STATS_TTL).await;
        Ok(response)
    }

    /// User performance inside one challenge
    pub async fn get_challenge_user_stats(
        pool: &PgPool,
        cache: Cache,
        id: &Uuid,
        user_id: &str,
    ) -> AppResult<ChallengeUserStatsResponse> {
        if user_id.is_empty() {
            return Err(AppError::Validation("User ID is required".to_string()));
        }

        let cache_key = keys::challenge_user_stats(id, user_id);
        if let Some(cached) = cache.get::<ChallengeUserStatsResponse>(&cache_key).await {
            return Ok(cached);
        }

        let (problems_completed, total_score, rank, metadata) =
            ChallengeRepository::get_challenge_user_stats(pool, id, user_id).await?;

        let response = ChallengeUserStatsResponse {
            user_id: user_id.to_string(),
            problems_completed,
            total_score,
            rank,
            metadata,
        };
        cache.set(&cache_key, &response, keys::STATS_TTL).await;
        Ok(response)
    }

    /// Paginated challenge participation history for a user
    pub async fn get_challenge_history(
        pool: &PgPool,
        user_id: &str,
        is_private: bool,
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> AppResult<ChallengeHistoryResponse> {
        if user_id.is_empty() {
            return Err(AppError::Validation("User ID is required".to_string()));
        }

        let page = page.unwrap_or(DEFAULT_PAGE).max(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let offset = (page as i64 - 1) * page_size as i64;

        let (challenges, total) =
            ChallengeRepository::get_history(pool, user_id, is_private, offset, page_size as i64)
                .await?;

        Ok(ChallengeHistoryResponse {
            challenges,
            total_count: total,
            page,
            page_size,
        })
    }
}

/// Random alphanumeric code for room codes and passwords
fn generate_access_code(length: usize) -> String {
    const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_code_length_and_charset() {
        let code = generate_access_code(ROOM_CODE_LENGTH);
        assert_eq!(code.len(), ROOM_CODE_LENGTH);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_access_codes_differ() {
        let a = generate_access_code(CHALLENGE_PASSWORD_LENGTH);
        let b = generate_access_code(CHALLENGE_PASSWORD_LENGTH);
        assert_ne!(a, b);
    }
}
