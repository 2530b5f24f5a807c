//! Business logic services
//!
//! Services sit between the handlers and the repositories: they own the
//! cache coherence rules, the execution pipeline, and the leaderboard
//! fallback semantics.

pub mod challenge_service;
pub mod execution_service;
pub mod leaderboard_service;
pub mod problem_service;
pub mod submission_service;

pub use challenge_service::ChallengeService;
pub use execution_service::ExecutionService;
pub use leaderboard_service::LeaderboardService;
pub use problem_service::ProblemService;
pub use submission_service::SubmissionService;
