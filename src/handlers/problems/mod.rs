//! Problem management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

/// Problem routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_problems))
        .route("/", post(handler::create_problem))
        .route("/metadata", get(handler::get_problem_metadata_list))
        .route("/lookup", get(handler::get_problem_by_id_slug))
        .route("/run", post(handler::run_user_code))
        .route("/{id}", get(handler::get_problem))
        .route("/{id}", put(handler::update_problem))
        .route("/{id}", delete(handler::delete_problem))
        .route("/{id}/validate", post(handler::full_validation))
        // Test cases
        .route("/{id}/testcases", post(handler::add_test_cases))
        .route("/{id}/testcases/{tc_id}", delete(handler::delete_test_case))
        // Language scaffolding
        .route("/{id}/languages", get(handler::get_language_supports))
        .route("/{id}/languages", post(handler::add_language_support))
        .route("/{id}/languages", put(handler::update_language_support))
        .route(
            "/{id}/languages/{language}",
            delete(handler::remove_language_support),
        )
}
