//! Problem handler implementations

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::difficulties,
    error::{AppError, AppResult},
    services::{ExecutionService, ProblemService},
    state::AppState,
};

use super::{
    request::{
        AddTestCasesRequest, CreateProblemRequest, DeleteTestCaseQuery, LanguageSupportRequest,
        ListProblemsQuery, LookupProblemQuery, RunProblemRequest, UpdateProblemRequest,
    },
    response::{
        FullValidationResponse, LanguageSupportsResponse, ProblemMetadataListResponse,
        ProblemResponse, ProblemsListResponse, RunProblemResponse, TestCasesAddedResponse,
    },
};

/// Create a new problem
pub async fn create_problem(
    State(state): State<AppState>,
    Json(payload): Json<CreateProblemRequest>,
) -> AppResult<(StatusCode, Json<ProblemResponse>)> {
    payload.validate()?;

    if !difficulties::ALL.contains(&payload.difficulty.as_str()) {
        return Err(AppError::Validation(format!(
            "Difficulty must be one of {:?}",
            difficulties::ALL
        )));
    }

    let problem = ProblemService::create_problem(state.db(), state.cache(), payload).await?;
    Ok((StatusCode::CREATED, Json(problem)))
}

/// List problems (paginated)
pub async fn list_problems(
    State(state): State<AppState>,
    Query(query): Query<ListProblemsQuery>,
) -> AppResult<Json<ProblemsListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(10).max(1);
    let tags = query.tag_list();

    let problems = ProblemService::list_problems(
        state.db(),
        state.cache(),
        page,
        page_size,
        tags.as_deref(),
        query.difficulty.as_deref(),
        query.search.as_deref(),
    )
    .await?;

    Ok(Json(problems))
}

/// Lite metadata list (paginated)
pub async fn get_problem_metadata_list(
    State(state): State<AppState>,
    Query(query): Query<ListProblemsQuery>,
) -> AppResult<Json<ProblemMetadataListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(10).max(1);
    let tags = query.tag_list();

    let problems = ProblemService::get_problem_metadata_list(
        state.db(),
        state.cache(),
        page,
        page_size,
        tags.as_deref(),
        query.difficulty.as_deref(),
        query.search.as_deref(),
    )
    .await?;

    Ok(Json(problems))
}

/// Get a specific problem
pub async fn get_problem(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProblemResponse>> {
    let problem = ProblemService::get_problem(state.db(), state.cache(), &id).await?;
    Ok(Json(problem))
}

/// Get a problem's lite projection by ID or slug
pub async fn get_problem_by_id_slug(
    State(state): State<AppState>,
    Query(query): Query<LookupProblemQuery>,
) -> AppResult<Json<ProblemMetadataListResponse>> {
    if query.problem_id.is_none() && query.slug.as_deref().unwrap_or_default().is_empty() {
        return Err(AppError::Validation(
            "Problem ID or slug is required".to_string(),
        ));
    }

    let problem = ProblemService::get_problem_by_id_slug(
        state.db(),
        state.cache(),
        query.problem_id.as_ref(),
        query.slug.as_deref(),
    )
    .await?;

    Ok(Json(problem))
}

/// Update a problem
pub async fn update_problem(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProblemRequest>,
) -> AppResult<Json<ProblemResponse>> {
    payload.validate()?;

    if let Some(difficulty) = payload.difficulty.as_deref() {
        if !difficulties::ALL.contains(&difficulty) {
            return Err(AppError::Validation(format!(
                "Difficulty must be one of {:?}",
                difficulties::ALL
            )));
        }
    }

    let problem = ProblemService::update_problem(state.db(), state.cache(), &id, payload).await?;
    Ok(Json(problem))
}

/// Soft-delete a problem
pub async fn delete_problem(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    ProblemService::delete_problem(state.db(), state.cache(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add test cases to a problem
pub async fn add_test_cases(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddTestCasesRequest>,
) -> AppResult<Json<TestCasesAddedResponse>> {
    if payload.run.is_empty() && payload.submit.is_empty() {
        return Err(AppError::Validation(
            "At least one test case is required".to_string(),
        ));
    }
    for tc in payload.run.iter().chain(payload.submit.iter()) {
        if tc.input.is_empty() || tc.expected.is_empty() {
            return Err(AppError::Validation(
                "Test case input and expected output are required".to_string(),
            ));
        }
    }

    let added = ProblemService::add_test_cases(state.db(), state.cache(), &id, payload).await?;
    Ok(Json(TestCasesAddedResponse { added_count: added }))
}

/// Delete a test case from a problem
pub async fn delete_test_case(
    State(state): State<AppState>,
    Path((id, tc_id)): Path<(Uuid, String)>,
    Query(query): Query<DeleteTestCaseQuery>,
) -> AppResult<StatusCode> {
    if tc_id.is_empty() {
        return Err(AppError::Validation("Testcase ID is required".to_string()));
    }

    ProblemService::delete_test_case(state.db(), state.cache(), &id, &tc_id, query.is_run_testcase)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Add language support to a problem
pub async fn add_language_support(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LanguageSupportRequest>,
) -> AppResult<StatusCode> {
    validate_language_payload(&payload)?;
    ProblemService::add_language_support(state.db(), state.cache(), &id, payload).await?;
    Ok(StatusCode::CREATED)
}

/// Update language support on a problem
pub async fn update_language_support(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LanguageSupportRequest>,
) -> AppResult<StatusCode> {
    validate_language_payload(&payload)?;
    ProblemService::update_language_support(state.db(), state.cache(), &id, payload).await?;
    Ok(StatusCode::OK)
}

/// Remove language support from a problem
pub async fn remove_language_support(
    State(state): State<AppState>,
    Path((id, language)): Path<(Uuid, String)>,
) -> AppResult<StatusCode> {
    if language.is_empty() {
        return Err(AppError::Validation("Language is required".to_string()));
    }

    ProblemService::remove_language_support(state.db(), state.cache(), &id, &language).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get supported languages for a problem
pub async fn get_language_supports(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LanguageSupportsResponse>> {
    let supports = ProblemService::get_language_supports(state.db(), state.cache(), &id).await?;
    Ok(Json(supports))
}

/// Validate a problem across all supported languages
pub async fn full_validation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FullValidationResponse>> {
    let result = ProblemService::full_validation(
        state.db(),
        state.cache(),
        state.leaderboard(),
        state.executor(),
        &id,
    )
    .await?;

    Ok(Json(result))
}

/// Execute user code against a problem
pub async fn run_user_code(
    State(state): State<AppState>,
    Json(payload): Json<RunProblemRequest>,
) -> AppResult<Json<RunProblemResponse>> {
    if payload.language.is_empty() {
        return Err(AppError::Validation("Language is required".to_string()));
    }
    if payload.user_code.is_empty() {
        return Err(AppError::Validation("User code is required".to_string()));
    }

    let result = ExecutionService::run_user_code(
        state.db(),
        state.cache(),
        state.leaderboard(),
        state.executor(),
        payload,
    )
    .await?;

    Ok(Json(result))
}

fn validate_language_payload(payload: &LanguageSupportRequest) -> AppResult<()> {
    if payload.language.is_empty() {
        return Err(AppError::Validation("Language is required".to_string()));
    }
    if payload.validation_code.code.is_empty() || payload.validation_code.template.is_empty() {
        return Err(AppError::Validation(
            "Validation code (code and template) is required".to_string(),
        ));
    }
    Ok(())
}
