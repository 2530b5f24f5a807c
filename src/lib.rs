//! codearena - Competitive Programming Platform Core
//!
//! This library provides the backend core of the codearena platform:
//! problems with test suites and per-language scaffolding, sandboxed
//! execution of user code through an out-of-process executor, scored
//! submissions, and global / per-country leaderboards.
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic, cache coherence, execution pipeline
//! - **Repositories**: Database access
//! - **Models**: Domain models and DTOs
//!
//! Shared mutable state lives only in the external stores: Postgres for
//! durable data, Redis for the cache and the fast leaderboard index, and
//! NATS for the executor request/reply.

pub mod bus;
pub mod cache;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod leaderboard;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
