//! Challenge handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Challenge routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handler::create_challenge))
        .route("/public", get(handler::get_public_challenges))
        .route("/history/{user_id}", get(handler::get_challenge_history))
        .route("/user/{user_id}/stats", get(handler::get_user_stats))
        .route("/{id}", get(handler::get_challenge_details))
        .route("/{id}/join", post(handler::join_challenge))
        .route("/{id}/start", post(handler::start_challenge))
        .route("/{id}/end", post(handler::end_challenge))
        .route("/{id}/submissions", get(handler::get_challenge_submissions))
        .route("/{id}/stats/{user_id}", get(handler::get_challenge_user_stats))
}
