//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

use std::time::Duration;

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 50055;

// =============================================================================
// STORE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

/// Default Postgres connection string
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/codearena";

/// Default Redis connection string
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// Default NATS connection string
pub const DEFAULT_NATS_URL: &str = "nats://localhost:4222";

// =============================================================================
// EXECUTION
// =============================================================================

/// Request/reply subject the sandbox executor listens on
pub const EXECUTE_SUBJECT: &str = "problems.execute.request";

/// Hard timeout for a single executor round trip
pub const EXECUTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Marker replaced with the serialized test cases during template splicing
pub const TESTCASE_PLACEHOLDER: &str = "{TESTCASE_PLACEHOLDER}";

/// Marker replaced with the user's code during template splicing
pub const FUNCTION_PLACEHOLDER: &str = "{FUNCTION_PLACEHOLDER}";

// =============================================================================
// TEST CASE LIMITS
// =============================================================================

/// Maximum number of visible run cases per problem
pub const MAX_RUN_CASES: usize = 3;

/// Maximum number of hidden submit cases per problem
pub const MAX_SUBMIT_CASES: usize = 100;

/// Minimum run cases required before a problem can be validated
pub const MIN_RUN_CASES_FOR_VALIDATION: usize = 3;

/// Minimum submit cases required before a problem can be validated
pub const MIN_SUBMIT_CASES_FOR_VALIDATION: usize = 5;

// =============================================================================
// SCORING
// =============================================================================

/// Difficulty identifiers
pub mod difficulties {
    pub const EASY: &str = "E";
    pub const MEDIUM: &str = "M";
    pub const HARD: &str = "H";

    /// All valid difficulty identifiers
    pub const ALL: &[&str] = &[EASY, MEDIUM, HARD];
}

/// Points awarded for the first successful submission, by difficulty.
/// Unknown difficulties fall back to the easy score.
pub fn score_for_difficulty(difficulty: &str) -> i32 {
    match difficulty {
        difficulties::MEDIUM => 4,
        difficulties::HARD => 6,
        _ => 2,
    }
}

// =============================================================================
// SUBMISSION STATUSES
// =============================================================================

/// Submission outcome statuses
pub mod statuses {
    pub const SUCCESS: &str = "SUCCESS";
    pub const FAILED: &str = "FAILED";
}

// =============================================================================
// CHALLENGES
// =============================================================================

/// Challenge lifecycle states
pub mod challenge_status {
    pub const CREATED: &str = "CREATED";
    pub const ACTIVE: &str = "ACTIVE";
    pub const COMPLETED: &str = "COMPLETED";
}

/// Length of generated challenge room codes
pub const ROOM_CODE_LENGTH: usize = 8;

/// Length of generated private challenge passwords
pub const CHALLENGE_PASSWORD_LENGTH: usize = 12;

// =============================================================================
// LEADERBOARD
// =============================================================================

/// Redis key namespace for the leaderboard index
pub const LEADERBOARD_NAMESPACE: &str = "problems_leaderboard";

/// Default top-K window for leaderboard reads
pub const DEFAULT_LEADERBOARD_TOP_K: usize = 10;

/// Default cron expression for the full leaderboard resync (hourly)
pub const DEFAULT_LEADERBOARD_SYNC_CRON: &str = "0 0 * * * *";

/// Retry attempts for the durable entity relocation multi-update
pub const ENTITY_UPDATE_MAX_RETRIES: u32 = 3;

/// Backoff between entity relocation retries
pub const ENTITY_UPDATE_RETRY_BACKOFF: Duration = Duration::from_millis(50);

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page number for paginated results
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size for paginated results
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_table() {
        assert_eq!(score_for_difficulty(difficulties::EASY), 2);
        assert_eq!(score_for_difficulty(difficulties::MEDIUM), 4);
        assert_eq!(score_for_difficulty(difficulties::HARD), 6);
    }

    #[test]
    fn test_unknown_difficulty_scores_as_easy() {
        assert_eq!(score_for_difficulty(""), 2);
        assert_eq!(score_for_difficulty("X"), 2);
    }
}
