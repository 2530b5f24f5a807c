//! Submission repository
//!
//! Owns the append-only submission audit, the first-success scoring rule,
//! and the durable leaderboard aggregations the fast index falls back to
//! and resyncs from.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    constants::{
        difficulties, score_for_difficulty, statuses, ENTITY_UPDATE_MAX_RETRIES,
        ENTITY_UPDATE_RETRY_BACKOFF,
    },
    error::{AppError, AppResult},
    leaderboard::Leaderboard,
    models::{ActivityDay, NewSubmission, ProblemsDoneStatistics, Submission, UserScore},
    utils::time::month_bounds,
};

#[derive(Debug, sqlx::FromRow)]
struct DifficultyCount {
    difficulty: String,
    count: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct DayCount {
    date: String,
    count: i64,
}

/// Repository for submission and scoring database operations
pub struct SubmissionRepository;

impl SubmissionRepository {
    /// Record one submit-case execution and apply the scoring rule.
    ///
    /// The count-then-insert sequence is not atomic across dispatchers; the
    /// unique index on problems_done(user_id, problem_id) arbitrates the
    /// race and a duplicate-key insert is treated as the other writer
    /// having won.
    pub async fn push_submission_data(
        pool: &PgPool,
        leaderboard: &Leaderboard,
        mut submission: NewSubmission,
        status: &str,
    ) -> AppResult<Uuid> {
        submission.country = submission.country.to_uppercase();

        let success_count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM submissions
            WHERE user_id = $1 AND problem_id = $2 AND status = $3
            "#,
        )
        .bind(&submission.user_id)
        .bind(submission.problem_id)
        .bind(statuses::SUCCESS)
        .fetch_one(pool)
        .await?;

        if success_count == 0 && status == statuses::SUCCESS {
            submission.score = score_for_difficulty(&submission.difficulty);
            submission.is_first = true;
        }

        let submission_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO submissions (
                user_id, problem_id, challenge_id, title, difficulty, language,
                user_code, status, score, execution_time, output, country,
                is_first, submitted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id
            "#,
        )
        .bind(&submission.user_id)
        .bind(submission.problem_id)
        .bind(submission.challenge_id)
        .bind(&submission.title)
        .bind(&submission.difficulty)
        .bind(&submission.language)
        .bind(&submission.user_code)
        .bind(&submission.status)
        .bind(submission.score)
        .bind(submission.execution_time)
        .bind(&submission.output)
        .bind(&submission.country)
        .bind(submission.is_first)
        .bind(submission.submitted_at)
        .fetch_one(pool)
        .await?;

        tracing::debug!("submission {} recorded with status {}", submission_id, status);

        if !(submission.is_first && status == statuses::SUCCESS) {
            return Ok(submission_id);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO problems_done (
                submission_id, user_id, problem_id, title, language,
                difficulty, country, score, submitted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(submission_id)
        .bind(&submission.user_id)
        .bind(submission.problem_id)
        .bind(&submission.title)
        .bind(&submission.language)
        .bind(&submission.difficulty)
        .bind(&submission.country)
        .bind(submission.score)
        .bind(submission.submitted_at)
        .execute(pool)
        .await;

        match inserted {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                // A concurrent dispatcher already wrote the first success
                tracing::warn!(
                    "duplicate first-success for user {} problem {}, skipping",
                    submission.user_id,
                    submission.problem_id
                );
                return Ok(submission_id);
            }
            Err(e) => return Err(e.into()),
        }

        // First success: feed the fast index incrementally
        match leaderboard.get_user_entity(&submission.user_id).await {
            Ok(Some(entity)) if !entity.is_empty() => {
                leaderboard
                    .increment_score(&submission.user_id, &entity, submission.score as f64)
                    .await?;
            }
            _ => {
                leaderboard
                    .add_user(&submission.user_id, &submission.country, submission.score as f64)
                    .await?;
            }
        }

        Ok(submission_id)
    }

    /// List submissions filtered by problem and/or user, paginated
    pub async fn list(
        pool: &PgPool,
        problem_id: Option<&Uuid>,
        user_id: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT * FROM submissions
            WHERE ($1::uuid IS NULL OR problem_id = $1)
                AND ($2::text IS NULL OR user_id = $2)
            ORDER BY submitted_at DESC
            OFFSET $3 LIMIT $4
            "#,
        )
        .bind(problem_id)
        .bind(user_id)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(submissions)
    }

    /// Find a submission by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Submission>> {
        let submission =
            sqlx::query_as::<_, Submission>(r#"SELECT * FROM submissions WHERE id = $1"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(submission)
    }

    /// Per-difficulty solved counts for a user against the live catalog
    pub async fn problems_done_statistics(
        pool: &PgPool,
        user_id: &str,
    ) -> AppResult<ProblemsDoneStatistics> {
        let totals = sqlx::query_as::<_, DifficultyCount>(
            r#"
            SELECT difficulty, COUNT(*) AS count
            FROM problems
            WHERE deleted_at IS NULL
            GROUP BY difficulty
            "#,
        )
        .fetch_all(pool)
        .await?;

        let done = sqlx::query_as::<_, DifficultyCount>(
            r#"
            SELECT difficulty, COUNT(*) AS count
            FROM problems_done
            WHERE user_id = $1
            GROUP BY difficulty
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        let mut stats = ProblemsDoneStatistics::default();
        for row in totals {
            match row.difficulty.as_str() {
                difficulties::EASY => stats.max_easy_count = row.count as i32,
                difficulties::MEDIUM => stats.max_medium_count = row.count as i32,
                difficulties::HARD => stats.max_hard_count = row.count as i32,
                _ => {}
            }
        }
        for row in done {
            match row.difficulty.as_str() {
                difficulties::EASY => stats.done_easy_count = row.count as i32,
                difficulties::MEDIUM => stats.done_medium_count = row.count as i32,
                difficulties::HARD => stats.done_hard_count = row.count as i32,
                _ => {}
            }
        }

        Ok(stats)
    }

    /// Daily submission counts for a calendar month, as a dense sequence
    /// covering every day of the month in UTC.
    pub async fn monthly_contribution_history(
        pool: &PgPool,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> AppResult<Vec<ActivityDay>> {
        let (start, end) = month_bounds(year, month)
            .ok_or_else(|| AppError::Validation(format!("invalid month {year}-{month}")))?;

        let counts = sqlx::query_as::<_, DayCount>(
            r#"
            SELECT TO_CHAR(submitted_at AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS date,
                   COUNT(*) AS count
            FROM submissions
            WHERE user_id = $1
                AND submitted_at >= $2::date
                AND submitted_at < $3::date
            GROUP BY 1
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        let mut days = Vec::new();
        let mut current = start;
        while current < end {
            let date = current.format("%Y-%m-%d").to_string();
            let count = counts
                .iter()
                .find(|c| c.date == date)
                .map(|c| c.count)
                .unwrap_or(0);
            days.push(ActivityDay {
                date,
                count,
                is_active: count > 0,
            });
            current = next_day(current, end);
        }

        Ok(days)
    }

    /// Top-K users globally by summed first-success score.
    ///
    /// The entity shown is the user's earliest-success country.
    pub async fn get_top_k_global(pool: &PgPool, k: i64) -> AppResult<Vec<UserScore>> {
        let users = sqlx::query_as::<_, UserScore>(
            r#"
            SELECT user_id,
                   (ARRAY_AGG(country ORDER BY submitted_at ASC))[1] AS entity,
                   SUM(score)::DOUBLE PRECISION AS total_score
            FROM problems_done
            GROUP BY user_id
            ORDER BY total_score DESC
            LIMIT $1
            "#,
        )
        .bind(k)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Top-K users within one country
    pub async fn get_top_k_entity(pool: &PgPool, entity: &str, k: i64) -> AppResult<Vec<UserScore>> {
        let users = sqlx::query_as::<_, UserScore>(
            r#"
            SELECT user_id,
                   (ARRAY_AGG(country ORDER BY submitted_at ASC))[1] AS entity,
                   SUM(score)::DOUBLE PRECISION AS total_score
            FROM problems_done
            WHERE country = $1
            GROUP BY user_id
            ORDER BY total_score DESC
            LIMIT $2
            "#,
        )
        .bind(entity)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Global and entity rank of a user; 0 means unranked
    pub async fn get_user_rank(pool: &PgPool, user_id: &str) -> AppResult<(i64, i64)> {
        let global_rank: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT rank FROM (
                SELECT user_id, RANK() OVER (ORDER BY SUM(score) DESC) AS rank
                FROM problems_done
                GROUP BY user_id
            ) ranked
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        let entity: Option<String> = sqlx::query_scalar(
            r#"
            SELECT country FROM problems_done
            WHERE user_id = $1
            ORDER BY submitted_at ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        let entity_rank: Option<i64> = match entity {
            Some(entity) => {
                sqlx::query_scalar(
                    r#"
                    SELECT rank FROM (
                        SELECT user_id, RANK() OVER (ORDER BY SUM(score) DESC) AS rank
                        FROM problems_done
                        WHERE country = $2
                        GROUP BY user_id
                    ) ranked
                    WHERE user_id = $1
                    "#,
                )
                .bind(user_id)
                .bind(entity)
                .fetch_optional(pool)
                .await?
            }
            None => None,
        };

        Ok((global_rank.unwrap_or(0), entity_rank.unwrap_or(0)))
    }

    /// A single user's aggregated score and primary country
    pub async fn get_leaderboard_data(pool: &PgPool, user_id: &str) -> AppResult<Option<UserScore>> {
        let user = sqlx::query_as::<_, UserScore>(
            r#"
            SELECT user_id,
                   (ARRAY_AGG(country ORDER BY submitted_at ASC))[1] AS entity,
                   SUM(score)::DOUBLE PRECISION AS total_score
            FROM problems_done
            WHERE user_id = $1
            GROUP BY user_id
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Replay the entire durable aggregation into the fast index.
    ///
    /// AddUser is total-replace, so overlapping live increments converge to
    /// the durable sums by the next sync.
    pub async fn sync_leaderboard(pool: &PgPool, leaderboard: &Leaderboard) -> AppResult<usize> {
        let started = std::time::Instant::now();
        tracing::info!("leaderboard full resync started");

        let users = sqlx::query_as::<_, UserScore>(
            r#"
            SELECT user_id,
                   (ARRAY_AGG(country ORDER BY submitted_at ASC))[1] AS entity,
                   SUM(score)::DOUBLE PRECISION AS total_score
            FROM problems_done
            GROUP BY user_id
            "#,
        )
        .fetch_all(pool)
        .await?;

        let synced = users.len();
        for user in users {
            leaderboard
                .add_user(&user.user_id, &user.entity, user.total_score)
                .await?;
        }

        tracing::info!(
            "leaderboard full resync finished: {} users in {:?}",
            synced,
            started.elapsed()
        );
        Ok(synced)
    }

    /// Relocate every first-success row of a user to a new country.
    ///
    /// Best-effort multi-row update with bounded retries.
    pub async fn force_change_user_entity(
        pool: &PgPool,
        user_id: &str,
        entity: &str,
    ) -> AppResult<()> {
        let entity = entity.to_uppercase();

        let mut last_err = None;
        for attempt in 0..ENTITY_UPDATE_MAX_RETRIES {
            let result = sqlx::query(r#"UPDATE problems_done SET country = $2 WHERE user_id = $1"#)
                .bind(user_id)
                .bind(&entity)
                .execute(pool)
                .await;

            match result {
                Ok(_) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        "entity relocation attempt {} failed for user {}: {}",
                        attempt + 1,
                        user_id,
                        e
                    );
                    last_err = Some(e);
                    tokio::time::sleep(ENTITY_UPDATE_RETRY_BACKOFF).await;
                }
            }
        }

        Err(last_err
            .map(AppError::from)
            .unwrap_or_else(|| AppError::Database("entity relocation failed".to_string())))
    }
}

fn next_day(current: NaiveDate, end: NaiveDate) -> NaiveDate {
    current.succ_opt().unwrap_or(end)
}
