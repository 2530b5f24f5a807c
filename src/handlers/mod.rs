//! HTTP Request Handlers
//!
//! This module contains all request handlers organized by domain.

pub mod challenges;
pub mod health;
pub mod leaderboard;
pub mod problems;
pub mod submissions;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest("/problems", problems::routes())
        .nest("/submissions", submissions::routes())
        .nest("/leaderboard", leaderboard::routes())
        .nest("/challenges", challenges::routes())
}
