//! Fast leaderboard index
//!
//! Redis sorted sets hold two ranked views, a global board and one board
//! per entity (country), plus a user→entity hash. The durable
//! `problems_done` aggregation stays authoritative; this index is the
//! performance tier, rebuilt by the periodic full resync and kept current
//! by incremental updates from the submission writer.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::AppResult;
use crate::models::{UserLeaderboardData, UserScore};

/// Leaderboard index over Redis sorted sets
#[derive(Clone)]
pub struct Leaderboard {
    conn: ConnectionManager,
    namespace: String,
    top_k: usize,
}

impl Leaderboard {
    pub fn new(conn: ConnectionManager, namespace: impl Into<String>, top_k: usize) -> Self {
        Self {
            conn,
            namespace: namespace.into(),
            top_k,
        }
    }

    fn global_key(&self) -> String {
        format!("{}:global", self.namespace)
    }

    fn entity_key(&self, entity: &str) -> String {
        format!("{}:entity:{}", self.namespace, entity)
    }

    fn entities_key(&self) -> String {
        format!("{}:entities", self.namespace)
    }

    /// Total-replace upsert of a user's row.
    ///
    /// Replaces the score in both ranked views and relocates the user if
    /// the entity changed. Replay-safe: the periodic resync feeds every
    /// aggregated row through here, so this must never be additive.
    pub async fn add_user(&self, user_id: &str, entity: &str, score: f64) -> AppResult<()> {
        let entity = entity.to_uppercase();
        let mut conn = self.conn.clone();

        let old_entity: Option<String> = conn.hget(self.entities_key(), user_id).await?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        if let Some(old) = old_entity.as_deref() {
            if old != entity {
                pipe.zrem(self.entity_key(old), user_id).ignore();
            }
        }
        pipe.zadd(self.global_key(), user_id, score).ignore();
        pipe.zadd(self.entity_key(&entity), user_id, score).ignore();
        pipe.hset(self.entities_key(), user_id, &entity).ignore();
        pipe.query_async::<()>(&mut conn).await?;

        Ok(())
    }

    /// Monotonic score increment; creates the row when absent
    pub async fn increment_score(&self, user_id: &str, entity: &str, delta: f64) -> AppResult<()> {
        let entity = entity.to_uppercase();
        let mut conn = self.conn.clone();

        let mut pipe = redis::pipe();
        pipe.atomic();
        pipe.zincr(self.global_key(), user_id, delta).ignore();
        pipe.zincr(self.entity_key(&entity), user_id, delta).ignore();
        pipe.hset(self.entities_key(), user_id, &entity).ignore();
        pipe.query_async::<()>(&mut conn).await?;

        Ok(())
    }

    /// Move a user's score between entity buckets
    pub async fn update_entity(&self, user_id: &str, entity: &str) -> AppResult<()> {
        let entity = entity.to_uppercase();
        let mut conn = self.conn.clone();

        let old_entity: Option<String> = conn.hget(self.entities_key(), user_id).await?;
        let score: Option<f64> = conn.zscore(self.global_key(), user_id).await?;
        let Some(score) = score else {
            return Ok(());
        };

        let mut pipe = redis::pipe();
        pipe.atomic();
        if let Some(old) = old_entity.as_deref() {
            pipe.zrem(self.entity_key(old), user_id).ignore();
        }
        pipe.zadd(self.entity_key(&entity), user_id, score).ignore();
        pipe.hset(self.entities_key(), user_id, &entity).ignore();
        pipe.query_async::<()>(&mut conn).await?;

        Ok(())
    }

    /// Entity a user is currently bucketed under
    pub async fn get_user_entity(&self, user_id: &str) -> AppResult<Option<String>> {
        let mut conn = self.conn.clone();
        let entity: Option<String> = conn.hget(self.entities_key(), user_id).await?;
        Ok(entity)
    }

    /// Top-K users of the global board
    pub async fn get_top_k_global(&self) -> AppResult<Vec<UserScore>> {
        let mut conn = self.conn.clone();
        let rows: Vec<(String, f64)> = conn
            .zrevrange_withscores(self.global_key(), 0, self.top_k as isize - 1)
            .await?;

        let mut users = Vec::with_capacity(rows.len());
        for (user_id, total_score) in rows {
            let entity: Option<String> = conn.hget(self.entities_key(), &user_id).await?;
            users.push(UserScore {
                user_id,
                entity: entity.unwrap_or_default(),
                total_score,
            });
        }
        Ok(users)
    }

    /// Top-K users within one entity bucket
    pub async fn get_top_k_entity(&self, entity: &str) -> AppResult<Vec<UserScore>> {
        let entity = entity.to_uppercase();
        let mut conn = self.conn.clone();
        let rows: Vec<(String, f64)> = conn
            .zrevrange_withscores(self.entity_key(&entity), 0, self.top_k as isize - 1)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, total_score)| UserScore {
                user_id,
                entity: entity.clone(),
                total_score,
            })
            .collect())
    }

    /// 1-based global rank; None when the user is not on the board
    pub async fn get_rank_global(&self, user_id: &str) -> AppResult<Option<i64>> {
        let mut conn = self.conn.clone();
        let rank: Option<i64> = conn.zrevrank(self.global_key(), user_id).await?;
        Ok(rank.map(|r| r + 1))
    }

    /// 1-based rank within the user's entity bucket
    pub async fn get_rank_entity(&self, user_id: &str) -> AppResult<Option<i64>> {
        let mut conn = self.conn.clone();
        let entity: Option<String> = conn.hget(self.entities_key(), user_id).await?;
        let Some(entity) = entity else {
            return Ok(None);
        };
        let rank: Option<i64> = conn.zrevrank(self.entity_key(&entity), user_id).await?;
        Ok(rank.map(|r| r + 1))
    }

    /// Combined per-user view: score, entity, both ranks, both top-K lists
    pub async fn get_user_leaderboard_data(
        &self,
        user_id: &str,
    ) -> AppResult<Option<UserLeaderboardData>> {
        let mut conn = self.conn.clone();
        let score: Option<f64> = conn.zscore(self.global_key(), user_id).await?;
        let Some(score) = score else {
            return Ok(None);
        };

        let entity: Option<String> = conn.hget(self.entities_key(), user_id).await?;
        let entity = entity.unwrap_or_default();
        let global_rank = self.get_rank_global(user_id).await?.unwrap_or(0);
        let entity_rank = self.get_rank_entity(user_id).await?.unwrap_or(0);
        let top_k_global = self.get_top_k_global().await?;
        let top_k_entity = if entity.is_empty() {
            Vec::new()
        } else {
            self.get_top_k_entity(&entity).await?
        };

        Ok(Some(UserLeaderboardData {
            user_id: user_id.to_string(),
            entity,
            score,
            global_rank,
            entity_rank,
            top_k_global,
            top_k_entity,
        }))
    }
}
