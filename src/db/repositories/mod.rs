//! Database repositories
//!
//! Repositories handle all direct database interactions and own the
//! durable side of every invariant: soft deletes, validation resets,
//! first-success uniqueness, and the leaderboard aggregations.

pub mod challenge_repo;
pub mod problem_repo;
pub mod submission_repo;

pub use challenge_repo::ChallengeRepository;
pub use problem_repo::ProblemRepository;
pub use submission_repo::SubmissionRepository;
