//! Read-through cache wrapper
//!
//! A flat key/value layer over Redis with per-key TTLs. The cache is never
//! authoritative: every miss, deserialization failure, or transport fault
//! falls through to the durable store, and every successful mutation
//! deletes the keys whose value could depend on the mutated entity.

use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Cache key builders and TTLs, one per endpoint family.
///
/// Keys ending in `*` are invalidation patterns, deleted by glob.
pub mod keys {
    use std::time::Duration;

    use uuid::Uuid;

    pub const PROBLEM_TTL: Duration = Duration::from_secs(60 * 60);
    pub const PROBLEM_LIST_TTL: Duration = Duration::from_secs(60 * 60);
    pub const LANGUAGE_SUPPORTS_TTL: Duration = Duration::from_secs(30 * 60);
    pub const SUBMISSIONS_TTL: Duration = Duration::from_secs(5 * 60);
    pub const SUBMISSION_STATUS_TTL: Duration = Duration::from_secs(30 * 60);
    pub const STATS_TTL: Duration = Duration::from_secs(60 * 60);
    pub const CHALLENGE_TTL: Duration = Duration::from_secs(60 * 60);

    pub fn problem(id: &Uuid) -> String {
        format!("problem:{id}")
    }

    pub fn problem_slug(slug: &str) -> String {
        format!("problem_slug:{slug}")
    }

    pub fn problems_list(page: u32, page_size: u32) -> String {
        format!("problems_list:{page}:{page_size}")
    }

    pub const PROBLEMS_LIST_PATTERN: &str = "problems_list:*";

    pub fn problem_metadata_list(page: u32, page_size: u32) -> String {
        format!("problem_id_list:{page}:{page_size}")
    }

    pub const PROBLEM_METADATA_LIST_PATTERN: &str = "problem_id_list:*";

    pub fn language_supports(id: &Uuid) -> String {
        format!("language_supports:{id}")
    }

    pub fn submissions(problem_id: &str, user_id: &str) -> String {
        format!("submissions:{problem_id}:{user_id}")
    }

    pub fn submission(id: &Uuid) -> String {
        format!("submission:{id}")
    }

    pub fn stats(user_id: &str) -> String {
        format!("stats:{user_id}")
    }

    pub fn heatmap(user_id: &str, year: i32, month: u32) -> String {
        format!("heatmap:{user_id}:{year}:{month}")
    }

    pub fn challenge_details(id: &Uuid, user_id: &str) -> String {
        format!("challenge_details:{id}:{user_id}")
    }

    pub fn challenge_details_pattern(id: &Uuid) -> String {
        format!("challenge_details:{id}:*")
    }

    pub fn public_challenges(difficulty: &str, active_only: bool, user_id: &str) -> String {
        format!("challenges:public:{difficulty}:{active_only}:{user_id}")
    }

    pub const PUBLIC_CHALLENGES_PATTERN: &str = "challenges:public:*";

    pub fn challenge_submissions(id: &Uuid) -> String {
        format!("challenge_submissions:{id}")
    }

    pub fn user_stats(user_id: &str) -> String {
        format!("user_stats:{user_id}")
    }

    pub fn challenge_user_stats(challenge_id: &Uuid, user_id: &str) -> String {
        format!("challenge_user_stats:{challenge_id}:{user_id}")
    }
}

/// Read-through cache over a shared Redis connection
#[derive(Clone)]
pub struct Cache {
    conn: ConnectionManager,
}

impl Cache {
    pub fn new(conn: ConnectionManager) -> Self {
        Self { conn }
    }

    /// Get and deserialize a cached value.
    ///
    /// Returns `None` on miss and on every failure mode; callers always
    /// fall through to the durable store.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = match conn.get(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("cache get failed for '{}': {}", key, e);
                return None;
            }
        };

        let raw = raw?;
        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!("cache hit: {}", key);
                Some(value)
            }
            Err(e) => {
                tracing::warn!("cache deserialization failed for '{}': {}", key, e);
                None
            }
        }
    }

    /// Serialize and store a value with a TTL.
    ///
    /// Failures are logged and swallowed; the caller already holds the
    /// authoritative value.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("cache serialization failed for '{}': {}", key, e);
                return;
            }
        };

        let mut conn = self.conn.clone();
        if let Err(e) = conn
            .set_ex::<_, _, ()>(key, raw, ttl.as_secs().max(1))
            .await
        {
            tracing::warn!("cache set failed for '{}': {}", key, e);
        }
    }

    /// Delete a key, or every key matching a `*`-suffixed glob pattern.
    pub async fn delete(&self, key: &str) {
        let mut conn = self.conn.clone();

        if key.contains('*') {
            let keys: Vec<String> = match redis::cmd("KEYS").arg(key).query_async(&mut conn).await
            {
                Ok(keys) => keys,
                Err(e) => {
                    tracing::warn!("cache pattern lookup failed for '{}': {}", key, e);
                    return;
                }
            };
            if keys.is_empty() {
                return;
            }
            if let Err(e) = conn.del::<_, ()>(keys).await {
                tracing::warn!("cache pattern delete failed for '{}': {}", key, e);
            }
            return;
        }

        if let Err(e) = conn.del::<_, ()>(key).await {
            tracing::warn!("cache delete failed for '{}': {}", key, e);
        }
    }

    /// Delete a set of keys/patterns after a successful mutation
    pub async fn invalidate(&self, keys: &[String]) {
        for key in keys {
            self.delete(key).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_key_shapes() {
        let id = Uuid::nil();
        assert_eq!(
            keys::problem(&id),
            "problem:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(keys::problem_slug("two-sum"), "problem_slug:two-sum");
        assert_eq!(keys::problems_list(1, 10), "problems_list:1:10");
        assert_eq!(keys::submissions("p1", "u1"), "submissions:p1:u1");
        assert_eq!(keys::stats("u1"), "stats:u1");
        assert_eq!(keys::heatmap("u1", 2025, 4), "heatmap:u1:2025:4");
    }

    #[test]
    fn test_invalidation_patterns_are_globs() {
        assert!(keys::PROBLEMS_LIST_PATTERN.ends_with('*'));
        assert!(keys::PUBLIC_CHALLENGES_PATTERN.ends_with('*'));
        assert!(keys::challenge_details_pattern(&Uuid::nil()).ends_with('*'));
    }
}
