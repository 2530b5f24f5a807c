//! Problem service
//!
//! Problem CRUD behind the read-through cache, plus the Draft → Validated
//! state machine: a problem becomes eligible for scoring only after its
//! structural preconditions hold and the reference solution of every
//! supported language passes the full test suite.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    bus::ExecutorClient,
    cache::{keys, Cache},
    db::repositories::{problem_repo::TestCaseInput, ProblemRepository},
    error::{AppError, AppResult},
    handlers::problems::{
        request::{
            AddTestCasesRequest, CreateProblemRequest, LanguageSupportRequest, RunProblemRequest,
            UpdateProblemRequest,
        },
        response::{
            FullValidationResponse, LanguageSupportsResponse, ProblemMetadataListResponse,
            ProblemResponse, ProblemsListResponse,
        },
    },
    leaderboard::Leaderboard,
    models::CodeData,
    services::ExecutionService,
    utils::language::normalize_language,
};

/// Problem service for business logic
pub struct ProblemService;

impl ProblemService {
    /// Create a new problem
    pub async fn create_problem(
        pool: &PgPool,
        cache: Cache,
        payload: CreateProblemRequest,
    ) -> AppResult<ProblemResponse> {
        let problem = ProblemRepository::create(
            pool,
            &payload.title,
            &payload.description,
            &payload.tags.unwrap_or_default(),
            &payload.difficulty,
        )
        .await?;

        cache
            .invalidate(&[
                keys::PROBLEMS_LIST_PATTERN.to_string(),
                keys::PROBLEM_METADATA_LIST_PATTERN.to_string(),
            ])
            .await;

        Ok(ProblemResponse::from(problem))
    }

    /// Get problem by ID, read-through cached
    pub async fn get_problem(pool: &PgPool, cache: Cache, id: &Uuid) -> AppResult<ProblemResponse> {
        let cache_key = keys::problem(id);
        if let Some(cached) = cache.get::<ProblemResponse>(&cache_key).await {
            return Ok(cached);
        }

        let problem = ProblemRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        let response = ProblemResponse::from(problem);
        cache.set(&cache_key, &response, keys::PROBLEM_TTL).await;
        Ok(response)
    }

    /// Get the lite projection of a problem by ID or slug
    pub async fn get_problem_by_id_slug(
        pool: &PgPool,
        cache: Cache,
        id: Option<&Uuid>,
        slug: Option<&str>,
    ) -> AppResult<ProblemMetadataListResponse> {
        let cache_key = match (id, slug) {
            (Some(id), _) => keys::problem(id),
            (None, Some(slug)) => keys::problem_slug(slug),
            (None, None) => {
                return Err(AppError::Validation(
                    "Problem ID or slug is required".to_string(),
                ))
            }
        };

        if let Some(cached) = cache.get::<ProblemMetadataListResponse>(&cache_key).await {
            return Ok(cached);
        }

        let problem = ProblemRepository::find_by_id_or_slug(pool, id, slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        let response = ProblemMetadataListResponse::single(&problem);
        cache.set(&cache_key, &response, keys::PROBLEM_TTL).await;
        Ok(response)
    }

    /// Update a problem; a title change invalidates the old slug key too
    pub async fn update_problem(
        pool: &PgPool,
        cache: Cache,
        id: &Uuid,
        payload: UpdateProblemRequest,
    ) -> AppResult<ProblemResponse> {
        let previous = ProblemRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        let problem = ProblemRepository::update(
            pool,
            id,
            payload.title.as_deref(),
            payload.description.as_deref(),
            payload.tags.as_deref(),
            payload.difficulty.as_deref(),
        )
        .await?;

        let mut stale = vec![
            keys::problem(id),
            keys::PROBLEMS_LIST_PATTERN.to_string(),
            keys::PROBLEM_METADATA_LIST_PATTERN.to_string(),
        ];
        if let Some(slug) = previous.slug.as_deref() {
            stale.push(keys::problem_slug(slug));
        }
        if let Some(slug) = problem.slug.as_deref() {
            stale.push(keys::problem_slug(slug));
        }
        cache.invalidate(&stale).await;

        Ok(ProblemResponse::from(problem))
    }

    /// Tombstone a problem
    pub async fn delete_problem(pool: &PgPool, cache: Cache, id: &Uuid) -> AppResult<()> {
        ProblemRepository::soft_delete(pool, id).await?;

        cache
            .invalidate(&[
                keys::problem(id),
                keys::PROBLEMS_LIST_PATTERN.to_string(),
                keys::PROBLEM_METADATA_LIST_PATTERN.to_string(),
            ])
            .await;

        Ok(())
    }

    /// List problems, read-through cached per page
    pub async fn list_problems(
        pool: &PgPool,
        cache: Cache,
        page: u32,
        page_size: u32,
        tags: Option<&[String]>,
        difficulty: Option<&str>,
        search: Option<&str>,
    ) -> AppResult<ProblemsListResponse> {
        let unfiltered = tags.is_none() && difficulty.is_none() && search.is_none();
        let cache_key = keys::problems_list(page, page_size);
        if unfiltered {
            if let Some(cached) = cache.get::<ProblemsListResponse>(&cache_key).await {
                return Ok(cached);
            }
        }

        let offset = (page as i64 - 1) * page_size as i64;
        let (problems, total) =
            ProblemRepository::list(pool, offset, page_size as i64, tags, difficulty, search)
                .await?;

        let response = ProblemsListResponse {
            problems: problems.into_iter().map(ProblemResponse::from).collect(),
            total_count: total,
            page,
            page_size,
        };

        if unfiltered {
            cache.set(&cache_key, &response, keys::PROBLEM_LIST_TTL).await;
        }
        Ok(response)
    }

    /// Lite metadata list for catalog views
    pub async fn get_problem_metadata_list(
        pool: &PgPool,
        cache: Cache,
        page: u32,
        page_size: u32,
        tags: Option<&[String]>,
        difficulty: Option<&str>,
        search: Option<&str>,
    ) -> AppResult<ProblemMetadataListResponse> {
        let unfiltered = tags.is_none() && difficulty.is_none() && search.is_none();
        let cache_key = keys::problem_metadata_list(page, page_size);
        if unfiltered {
            if let Some(cached) = cache.get::<ProblemMetadataListResponse>(&cache_key).await {
                return Ok(cached);
            }
        }

        let offset = (page as i64 - 1) * page_size as i64;
        let (problems, _) =
            ProblemRepository::list(pool, offset, page_size as i64, tags, difficulty, search)
                .await?;

        let response = ProblemMetadataListResponse::from_problems(&problems);

        if unfiltered {
            cache.set(&cache_key, &response, keys::PROBLEM_LIST_TTL).await;
        }
        Ok(response)
    }

    /// Append test cases to a problem
    pub async fn add_test_cases(
        pool: &PgPool,
        cache: Cache,
        id: &Uuid,
        payload: AddTestCasesRequest,
    ) -> AppResult<usize> {
        let to_input = |tc: crate::handlers::problems::request::TestCaseRequest| TestCaseInput {
            id: tc.id,
            input: tc.input,
            expected: tc.expected,
        };
        let run: Vec<TestCaseInput> = payload.run.into_iter().map(to_input).collect();
        let submit: Vec<TestCaseInput> = payload.submit.into_iter().map(to_input).collect();

        let added = ProblemRepository::add_test_cases(pool, id, run, submit).await?;

        cache
            .invalidate(&[keys::problem(id), keys::language_supports(id)])
            .await;

        Ok(added)
    }

    /// Remove one test case from a problem
    pub async fn delete_test_case(
        pool: &PgPool,
        cache: Cache,
        id: &Uuid,
        testcase_id: &str,
        is_run_testcase: bool,
    ) -> AppResult<()> {
        ProblemRepository::delete_test_case(pool, id, testcase_id, is_run_testcase).await?;

        cache
            .invalidate(&[keys::problem(id), keys::language_supports(id)])
            .await;

        Ok(())
    }

    /// Add scaffolding for a new language
    pub async fn add_language_support(
        pool: &PgPool,
        cache: Cache,
        id: &Uuid,
        payload: LanguageSupportRequest,
    ) -> AppResult<()> {
        let language = normalize_language(&payload.language);
        let code = CodeData {
            placeholder: payload.validation_code.placeholder,
            code: payload.validation_code.code,
            template: payload.validation_code.template,
        };

        ProblemRepository::add_language_support(pool, id, &language, &code).await?;

        cache
            .invalidate(&[keys::problem(id), keys::language_supports(id)])
            .await;

        Ok(())
    }

    /// Replace the scaffolding of a supported language
    pub async fn update_language_support(
        pool: &PgPool,
        cache: Cache,
        id: &Uuid,
        payload: LanguageSupportRequest,
    ) -> AppResult<()> {
        let language = normalize_language(&payload.language);
        let code = CodeData {
            placeholder: payload.validation_code.placeholder,
            code: payload.validation_code.code,
            template: payload.validation_code.template,
        };

        ProblemRepository::update_language_support(pool, id, &language, &code).await?;

        cache
            .invalidate(&[keys::problem(id), keys::language_supports(id)])
            .await;

        Ok(())
    }

    /// Drop a language from a problem
    pub async fn remove_language_support(
        pool: &PgPool,
        cache: Cache,
        id: &Uuid,
        language: &str,
    ) -> AppResult<()> {
        let language = normalize_language(language);

        ProblemRepository::remove_language_support(pool, id, &language).await?;

        cache
            .invalidate(&[keys::problem(id), keys::language_supports(id)])
            .await;

        Ok(())
    }

    /// Supported languages and their scaffolding, read-through cached
    pub async fn get_language_supports(
        pool: &PgPool,
        cache: Cache,
        id: &Uuid,
    ) -> AppResult<LanguageSupportsResponse> {
        let cache_key = keys::language_supports(id);
        if let Some(cached) = cache.get::<LanguageSupportsResponse>(&cache_key).await {
            return Ok(cached);
        }

        let problem = ProblemRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        let response = LanguageSupportsResponse {
            supported_languages: problem.supported_languages,
            validate_code: problem.validate_code.0,
        };
        cache
            .set(&cache_key, &response, keys::LANGUAGE_SUPPORTS_TTL)
            .await;
        Ok(response)
    }

    /// Promote a problem from Draft to Validated.
    ///
    /// Runs the structural precondition checks, then executes every
    /// supported language's reference solution against the full test suite,
    /// sequentially and short-circuiting on the first failure. The reported
    /// `validated` flag is the post-write value read back from the store.
    pub async fn full_validation(
        pool: &PgPool,
        cache: Cache,
        leaderboard: Leaderboard,
        executor: &ExecutorClient,
        id: &Uuid,
    ) -> AppResult<FullValidationResponse> {
        let problem = match ProblemRepository::basic_validation(pool, id).await? {
            Ok(problem) => problem,
            Err(failure) => {
                ProblemRepository::toggle_validation(pool, id, false).await?;
                return Ok(FullValidationResponse {
                    success: false,
                    message: failure.message,
                    error_type: Some(failure.error_type.to_string()),
                    validated: false,
                });
            }
        };

        for lang in &problem.supported_languages {
            let Some(code_data) = problem.validate_code.0.get(lang) else {
                ProblemRepository::toggle_validation(pool, id, false).await?;
                return Ok(FullValidationResponse {
                    success: false,
                    message: format!("No validation code found for language: {lang}"),
                    error_type: Some("CONFIGURATION_ERROR".to_string()),
                    validated: false,
                });
            };

            let run = ExecutionService::run_user_code(
                pool,
                cache.clone(),
                leaderboard.clone(),
                executor,
                RunProblemRequest {
                    problem_id: *id,
                    language: lang.clone(),
                    user_code: code_data.code.clone(),
                    user_id: None,
                    country: None,
                    is_run_testcase: false,
                },
            )
            .await;

            let result = match run {
                Ok(result) => result,
                Err(e) => {
                    ProblemRepository::toggle_validation(pool, id, false).await?;
                    return Ok(FullValidationResponse {
                        success: false,
                        message: format!("Execution failed for language {lang}: {e}"),
                        error_type: Some("EXECUTION_ERROR".to_string()),
                        validated: false,
                    });
                }
            };

            match overall_pass(&result.message) {
                Some(true) => {}
                Some(false) => {
                    ProblemRepository::toggle_validation(pool, id, false).await?;
                    return Ok(FullValidationResponse {
                        success: false,
                        message: format!("Validation failed for language {lang}"),
                        error_type: Some("VALIDATION_FAILED".to_string()),
                        validated: false,
                    });
                }
                None => {
                    ProblemRepository::toggle_validation(pool, id, false).await?;
                    return Ok(FullValidationResponse {
                        success: false,
                        message: format!("No output received for language {lang}"),
                        error_type: Some("EXECUTION_ERROR".to_string()),
                        validated: false,
                    });
                }
            }
        }

        let validated = ProblemRepository::toggle_validation(pool, id, true).await?;
        let (success, message) = if validated {
            (true, "Full validation successful".to_string())
        } else {
            (
                false,
                "Full validation completed, but failed to toggle status".to_string(),
            )
        };

        cache.invalidate(&[keys::problem(id)]).await;

        Ok(FullValidationResponse {
            success,
            message,
            error_type: None,
            validated,
        })
    }
}

/// Read `overallPass` out of an execution result message.
///
/// None when the message is not JSON or the field is missing or not a
/// boolean.
fn overall_pass(message: &str) -> Option<bool> {
    let value: serde_json::Value = serde_json::from_str(message).ok()?;
    value.get("overallPass")?.as_bool()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_pass_true() {
        assert_eq!(overall_pass(r#"{"overallPass":true}"#), Some(true));
    }

    #[test]
    fn test_overall_pass_false() {
        assert_eq!(
            overall_pass(r#"{"overallPass":false,"totalTestCases":5}"#),
            Some(false)
        );
    }

    #[test]
    fn test_overall_pass_missing_or_invalid() {
        assert_eq!(overall_pass(r#"{"totalTestCases":5}"#), None);
        assert_eq!(overall_pass(r#"{"overallPass":"yes"}"#), None);
        assert_eq!(overall_pass("syntax error at line 3"), None);
    }
}
