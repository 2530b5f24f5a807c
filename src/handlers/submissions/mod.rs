//! Submission query handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Submission routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::get_submissions))
        .route("/stats/{user_id}", get(handler::get_problems_done_statistics))
        .route("/heatmap/{user_id}", get(handler::get_monthly_activity_heatmap))
        .route("/{id}", get(handler::get_submission_status))
}
