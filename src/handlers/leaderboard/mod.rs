//! Leaderboard handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;

use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

/// Leaderboard routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/global", get(handler::get_top_k_global))
        .route("/entity/{entity}", get(handler::get_top_k_entity))
        .route("/rank/{user_id}", get(handler::get_user_rank))
        .route("/user/{user_id}", get(handler::get_leaderboard_data))
        .route("/entity", put(handler::force_change_user_entity))
}
