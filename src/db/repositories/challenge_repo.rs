//! Challenge repository
//!
//! Challenges are multi-participant timed rooms over a shared pool of
//! problems. Lifecycle transitions are creator-only; joining is idempotent
//! and password-gated for private rooms.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    constants::challenge_status,
    error::{AppError, AppResult},
    models::{
        compute_challenge_leaderboard, Challenge, ChallengeLeaderboardEntry, ChallengeStat,
        Submission, UserStats,
    },
};

/// Repository for challenge database operations
pub struct ChallengeRepository;

impl ChallengeRepository {
    /// Create a challenge; the creator is always a participant
    pub async fn create(
        pool: &PgPool,
        title: &str,
        creator_id: &str,
        difficulty: &str,
        is_private: bool,
        room_code: &str,
        password: &str,
        problem_ids: &[Uuid],
        time_limit: i64,
    ) -> AppResult<Challenge> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM challenges WHERE title = $1 AND deleted_at IS NULL"#,
        )
        .bind(title)
        .fetch_one(pool)
        .await?;
        if count > 0 {
            return Err(AppError::TitleTaken(title.to_string()));
        }

        let challenge = sqlx::query_as::<_, Challenge>(
            r#"
            INSERT INTO challenges (
                title, creator_id, difficulty, is_private, room_code, password,
                problem_ids, participant_ids, time_limit, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, ARRAY[$2], $8, $9)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(creator_id)
        .bind(difficulty)
        .bind(is_private)
        .bind(room_code)
        .bind(password)
        .bind(problem_ids)
        .bind(time_limit)
        .bind(challenge_status::CREATED)
        .fetch_one(pool)
        .await?;

        Ok(challenge)
    }

    /// Find a live challenge by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Challenge>> {
        let challenge = sqlx::query_as::<_, Challenge>(
            r#"SELECT * FROM challenges WHERE id = $1 AND deleted_at IS NULL"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(challenge)
    }

    /// List public challenges with filters and pagination
    pub async fn list_public(
        pool: &PgPool,
        difficulty: Option<&str>,
        active_only: bool,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<Challenge>> {
        let challenges = sqlx::query_as::<_, Challenge>(
            r#"
            SELECT * FROM challenges
            WHERE deleted_at IS NULL
                AND is_private = FALSE
                AND ($1::text IS NULL OR difficulty = $1)
                AND (NOT $2 OR status = $3)
            ORDER BY created_at DESC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(difficulty)
        .bind(active_only)
        .bind(challenge_status::ACTIVE)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(challenges)
    }

    /// Add a user to a challenge.
    ///
    /// Private rooms require the matching password; joining twice is a
    /// successful no-op.
    pub async fn join(
        pool: &PgPool,
        id: &Uuid,
        user_id: &str,
        password: Option<&str>,
    ) -> AppResult<Challenge> {
        let challenge = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Challenge not found".to_string()))?;

        if challenge.is_private && password != Some(challenge.password.as_str()) {
            return Err(AppError::AccessDenied("Invalid password".to_string()));
        }

        if challenge.participant_ids.iter().any(|p| p == user_id) {
            return Ok(challenge);
        }

        let challenge = sqlx::query_as::<_, Challenge>(
            r#"
            UPDATE challenges
            SET participant_ids = array_append(participant_ids, $2), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(challenge)
    }

    /// CREATED → ACTIVE; fixes end_time = start_time + time_limit
    pub async fn start(pool: &PgPool, id: &Uuid, user_id: &str) -> AppResult<Challenge> {
        let challenge = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Challenge not found".to_string()))?;

        if challenge.creator_id != user_id {
            return Err(AppError::AccessDenied(
                "Only the creator can start a challenge".to_string(),
            ));
        }
        if challenge.status != challenge_status::CREATED {
            return Err(AppError::InvalidState(format!(
                "Challenge cannot be started from status {}",
                challenge.status
            )));
        }

        let start_time = Utc::now();
        let end_time = start_time + Duration::seconds(challenge.time_limit);

        let challenge = sqlx::query_as::<_, Challenge>(
            r#"
            UPDATE challenges
            SET status = $2, start_time = $3, end_time = $4, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(challenge_status::ACTIVE)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(pool)
        .await?;

        Ok(challenge)
    }

    /// ACTIVE → COMPLETED
    pub async fn end(pool: &PgPool, id: &Uuid, user_id: &str) -> AppResult<Challenge> {
        let challenge = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Challenge not found".to_string()))?;

        if challenge.creator_id != user_id {
            return Err(AppError::AccessDenied(
                "Only the creator can end a challenge".to_string(),
            ));
        }
        if challenge.status != challenge_status::ACTIVE {
            return Err(AppError::InvalidState(format!(
                "Challenge cannot be ended from status {}",
                challenge.status
            )));
        }

        let challenge = sqlx::query_as::<_, Challenge>(
            r#"
            UPDATE challenges
            SET status = $2, end_time = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(challenge_status::COMPLETED)
        .fetch_one(pool)
        .await?;

        Ok(challenge)
    }

    /// Every submission recorded against a challenge
    pub async fn get_submissions(pool: &PgPool, id: &Uuid) -> AppResult<Vec<Submission>> {
        if Self::find_by_id(pool, id).await?.is_none() {
            return Err(AppError::NotFound("Challenge not found".to_string()));
        }

        let submissions = sqlx::query_as::<_, Submission>(
            r#"SELECT * FROM submissions WHERE challenge_id = $1 ORDER BY submitted_at DESC"#,
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        Ok(submissions)
    }

    /// Ranked leaderboard of one challenge
    pub async fn get_leaderboard(
        pool: &PgPool,
        id: &Uuid,
    ) -> AppResult<Vec<ChallengeLeaderboardEntry>> {
        let challenge = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Challenge not found".to_string()))?;

        Ok(compute_challenge_leaderboard(&challenge.user_problem_metadata.0))
    }

    /// Paginated list of challenges a user has participated in
    pub async fn get_history(
        pool: &PgPool,
        user_id: &str,
        is_private: bool,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<Challenge>, i64)> {
        let challenges = sqlx::query_as::<_, Challenge>(
            r#"
            SELECT * FROM challenges
            WHERE deleted_at IS NULL
                AND is_private = $2
                AND $1 = ANY(participant_ids)
            ORDER BY created_at DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(is_private)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM challenges
            WHERE deleted_at IS NULL
                AND is_private = $2
                AND $1 = ANY(participant_ids)
            "#,
        )
        .bind(user_id)
        .bind(is_private)
        .fetch_one(pool)
        .await?;

        Ok((challenges, total))
    }

    /// User performance aggregated across every challenge they joined
    pub async fn get_user_stats(pool: &PgPool, user_id: &str) -> AppResult<UserStats> {
        let challenges = sqlx::query_as::<_, Challenge>(
            r#"
            SELECT * FROM challenges
            WHERE deleted_at IS NULL AND $1 = ANY(participant_ids)
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        let mut stats = UserStats {
            user_id: user_id.to_string(),
            ..Default::default()
        };

        for challenge in challenges {
            let metadata = challenge.metadata_for(user_id);
            if metadata.is_empty() {
                continue;
            }

            let problems_completed = metadata.len() as i32;
            let total_score: i32 = metadata.iter().map(|m| m.score).sum();
            let time_taken: i64 = metadata.iter().map(|m| m.time_taken).sum();

            stats.problems_completed += problems_completed;
            stats.total_time_taken += time_taken;
            stats.score += total_score as f64;
            stats.challenges_completed += 1;

            let board = compute_challenge_leaderboard(&challenge.user_problem_metadata.0);
            let rank = board
                .iter()
                .find(|e| e.user_id == user_id)
                .map(|e| e.rank)
                .unwrap_or(0);

            stats.challenge_stats.insert(
                challenge.id.to_string(),
                ChallengeStat {
                    rank,
                    problems_completed,
                    total_score,
                },
            );
        }

        Ok(stats)
    }

    /// User performance inside one challenge, with their rank on its board
    pub async fn get_challenge_user_stats(
        pool: &PgPool,
        id: &Uuid,
        user_id: &str,
    ) -> AppResult<(i32, i32, i32, Vec<crate::models::ChallengeProblemMetadata>)> {
        let challenge = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Challenge not found".to_string()))?;

        let metadata = challenge.metadata_for(user_id).to_vec();
        if metadata.is_empty() {
            return Ok((0, 0, 0, metadata));
        }

        let problems_completed = metadata.len() as i32;
        let total_score: i32 = metadata.iter().map(|m| m.score).sum();

        let board = compute_challenge_leaderboard(&challenge.user_problem_metadata.0);
        let rank = board
            .iter()
            .find(|e| e.user_id == user_id)
            .map(|e| e.rank)
            .unwrap_or(0);

        Ok((problems_completed, total_score, rank, metadata))
    }
}
