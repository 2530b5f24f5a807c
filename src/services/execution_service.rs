//! Execution dispatcher
//!
//! Takes a run request, splices the user's code and the problem's test
//! cases into the language template, performs exactly one request/reply
//! round trip to the sandbox executor, interprets the structured result,
//! and decides whether the execution counts as a scoring submission.

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    bus::{ExecuteRequest, ExecutorClient},
    cache::{keys, Cache},
    constants::{
        statuses, EXECUTE_SUBJECT, EXECUTE_TIMEOUT, FUNCTION_PLACEHOLDER, TESTCASE_PLACEHOLDER,
    },
    db::repositories::{ProblemRepository, SubmissionRepository},
    error::{AppError, AppResult},
    handlers::problems::{request::RunProblemRequest, response::RunProblemResponse},
    leaderboard::Leaderboard,
    models::{ExecutionStats, NewSubmission, Problem, TestCase},
    utils::language::{needs_json_escaping, normalize_language},
    utils::time::current_year_month,
};

/// Execution service for the run/submit pipeline
pub struct ExecutionService;

impl ExecutionService {
    /// Execute user code against a problem's test cases.
    ///
    /// Logical pipeline failures (unsupported language, compile error,
    /// unparseable executor output) come back as `success = false` results;
    /// only store and input faults become errors.
    pub async fn run_user_code(
        pool: &PgPool,
        cache: Cache,
        leaderboard: Leaderboard,
        executor: &ExecutorClient,
        payload: RunProblemRequest,
    ) -> AppResult<RunProblemResponse> {
        let language = normalize_language(&payload.language);
        tracing::info!(
            "running user code for problem {} language {}",
            payload.problem_id,
            language
        );

        let problem = ProblemRepository::find_by_id(pool, &payload.problem_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        let submit_case = !payload.is_run_testcase;

        let Some(code_data) = problem.code_data(&language) else {
            return Ok(RunProblemResponse::failure(
                &payload,
                &language,
                "INVALID_LANGUAGE",
                "Language not supported",
            ));
        };

        let test_cases = collect_test_cases(&problem, payload.is_run_testcase);
        let cases_json = serde_json::to_string(&test_cases)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to serialize test cases: {e}")))?;

        let spliced = splice_template(&code_data.template, &payload.user_code, &cases_json, &language);

        let request = ExecuteRequest {
            code: spliced,
            language: language.clone(),
        };
        let reply = match executor.execute(EXECUTE_SUBJECT, &request, EXECUTE_TIMEOUT).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(
                    "executor call failed for problem {}: {}",
                    payload.problem_id,
                    e
                );
                return Ok(RunProblemResponse::failure(
                    &payload,
                    &language,
                    "COMPILATION_ERROR",
                    "Failed to execute code",
                ));
            }
        };

        let Some(output) = reply.output_str().map(str::to_string) else {
            return Ok(RunProblemResponse::failure(
                &payload,
                &language,
                "EXECUTION_ERROR",
                "Invalid execution result format",
            ));
        };

        if is_compile_error(&output) {
            tracing::info!(
                "compile error for problem {} language {}",
                payload.problem_id,
                language
            );
            // Recorded on a detached task so a client disconnect does not
            // lose the audit row
            let pool = pool.clone();
            let submission = build_submission(&payload, &language, &problem, statuses::FAILED);
            tokio::spawn(async move {
                record_submission(&pool, &cache, &leaderboard, submission, submit_case, statuses::FAILED)
                    .await;
            });
            return Ok(RunProblemResponse::failure(
                &payload,
                &language,
                "COMPILATION_ERROR",
                &output,
            ));
        }

        // An unparseable stats document is conservatively a failed run
        let stats: ExecutionStats = serde_json::from_str(&output).unwrap_or_default();
        let status = if stats.overall_pass {
            statuses::SUCCESS
        } else {
            statuses::FAILED
        };

        let submission = build_submission(&payload, &language, &problem, status);
        record_submission(pool, &cache, &leaderboard, submission, submit_case, status).await;

        tracing::info!(
            "execution completed for problem {} with status {}",
            payload.problem_id,
            status
        );

        Ok(RunProblemResponse {
            success: true,
            problem_id: payload.problem_id,
            language,
            is_run_testcase: payload.is_run_testcase,
            error_type: None,
            message: output,
        })
    }
}

/// Test cases sent to the executor: run cases only for a run, the full
/// run ++ submit suite for a submit. Cases without an id are dropped.
fn collect_test_cases(problem: &Problem, is_run_testcase: bool) -> Vec<TestCase> {
    let mut cases: Vec<TestCase> = problem
        .run_cases
        .0
        .iter()
        .filter(|tc| !tc.id.is_empty())
        .cloned()
        .collect();

    if !is_run_testcase {
        cases.extend(
            problem
                .submit_cases
                .0
                .iter()
                .filter(|tc| !tc.id.is_empty())
                .cloned(),
        );
    }

    cases
}

/// Splice the serialized test cases and the user's code into a template.
///
/// Only the first occurrence of each marker is replaced, so templates may
/// carry the literal marker strings inside string literals. For python and
/// javascript the JSON is embedded in a string literal and every quote is
/// escaped first.
fn splice_template(template: &str, user_code: &str, cases_json: &str, language: &str) -> String {
    let cases = if needs_json_escaping(language) {
        cases_json.replace('"', "\\\"")
    } else {
        cases_json.to_string()
    };

    template
        .replacen(TESTCASE_PLACEHOLDER, &cases, 1)
        .replacen(FUNCTION_PLACEHOLDER, user_code, 1)
}

/// Executor output that is compiler chatter rather than a stats document
fn is_compile_error(output: &str) -> bool {
    output.contains("syntax error") || output.contains("# command-line-arguments")
}

fn build_submission(
    payload: &RunProblemRequest,
    language: &str,
    problem: &Problem,
    status: &str,
) -> NewSubmission {
    NewSubmission {
        user_id: payload.user_id.clone().unwrap_or_default(),
        problem_id: payload.problem_id,
        challenge_id: None,
        title: problem.title.clone(),
        difficulty: problem.difficulty.clone(),
        language: language.to_string(),
        user_code: payload.user_code.clone(),
        status: status.to_string(),
        score: 0,
        execution_time: 0.0,
        output: String::new(),
        country: payload.country.clone().unwrap_or_default(),
        is_first: false,
        submitted_at: Utc::now(),
    }
}

/// Persist a submission when the execution qualifies as one.
///
/// Run-only executions and anonymous executions are never recorded.
/// Failures are logged; the execution result has already been decided.
async fn record_submission(
    pool: &PgPool,
    cache: &Cache,
    leaderboard: &Leaderboard,
    submission: NewSubmission,
    submit_case: bool,
    status: &str,
) {
    if !submit_case || submission.user_id.is_empty() {
        return;
    }

    let user_id = submission.user_id.clone();
    let problem_id = submission.problem_id;

    if let Err(e) =
        SubmissionRepository::push_submission_data(pool, leaderboard, submission, status).await
    {
        tracing::error!(
            "failed to record submission for user {} problem {}: {}",
            user_id,
            problem_id,
            e
        );
        return;
    }

    let (year, month) = current_year_month();
    cache
        .invalidate(&[
            keys::submissions(&problem_id.to_string(), &user_id),
            keys::stats(&user_id),
            keys::heatmap(&user_id, year, month),
        ])
        .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn tc(id: &str) -> TestCase {
        TestCase {
            id: id.to_string(),
            input: format!("in-{id}"),
            expected: format!("out-{id}"),
        }
    }

    fn problem_with_cases(run: Vec<TestCase>, submit: Vec<TestCase>) -> Problem {
        Problem {
            id: Uuid::new_v4(),
            title: "Two Sum".to_string(),
            slug: Some("two-sum".to_string()),
            description: "desc".to_string(),
            tags: vec![],
            difficulty: "M".to_string(),
            run_cases: Json(run),
            submit_cases: Json(submit),
            supported_languages: vec!["go".to_string()],
            validate_code: Json(HashMap::new()),
            validated: false,
            validated_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_run_collects_run_cases_only() {
        let problem = problem_with_cases(vec![tc("r1"), tc("r2")], vec![tc("s1")]);
        let cases = collect_test_cases(&problem, true);
        assert_eq!(cases.len(), 2);
        assert!(cases.iter().all(|c| c.id.starts_with('r')));
    }

    #[test]
    fn test_submit_collects_run_then_submit() {
        let problem = problem_with_cases(vec![tc("r1")], vec![tc("s1"), tc("s2")]);
        let cases = collect_test_cases(&problem, false);
        let ids: Vec<&str> = cases.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "s1", "s2"]);
    }

    #[test]
    fn test_cases_without_id_are_dropped() {
        let problem = problem_with_cases(vec![tc("r1"), tc("")], vec![tc("")]);
        let cases = collect_test_cases(&problem, false);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].id, "r1");
    }

    #[test]
    fn test_splice_replaces_both_markers() {
        let template = "cases = {TESTCASE_PLACEHOLDER}\n{FUNCTION_PLACEHOLDER}\nmain()";
        let out = splice_template(template, "func solve() {}", r#"[{"id":"a"}]"#, "go");
        assert_eq!(out, "cases = [{\"id\":\"a\"}]\nfunc solve() {}\nmain()");
    }

    #[test]
    fn test_splice_escapes_quotes_for_python_and_js() {
        let template = r#"cases = "{TESTCASE_PLACEHOLDER}""#;
        for lang in ["python", "py", "javascript", "js"] {
            let out = splice_template(template, "", r#"[{"id":"a"}]"#, lang);
            assert_eq!(out, r#"cases = "[{\"id\":\"a\"}]""#, "language {lang}");
            assert!(!out.contains(r#"[{"id"#), "unescaped quote leaked for {lang}");
        }
    }

    #[test]
    fn test_splice_keeps_raw_json_for_other_languages() {
        let template = "cases := {TESTCASE_PLACEHOLDER}";
        for lang in ["go", "cpp", "rust"] {
            let out = splice_template(template, "", r#"[{"id":"a"}]"#, lang);
            assert_eq!(out, r#"cases := [{"id":"a"}]"#, "language {lang}");
        }
    }

    #[test]
    fn test_splice_replaces_first_occurrence_only() {
        let template = "{TESTCASE_PLACEHOLDER} {TESTCASE_PLACEHOLDER} {FUNCTION_PLACEHOLDER} {FUNCTION_PLACEHOLDER}";
        let out = splice_template(template, "CODE", "CASES", "go");
        assert_eq!(out, "CASES {TESTCASE_PLACEHOLDER} CODE {FUNCTION_PLACEHOLDER}");
    }

    #[test]
    fn test_compile_error_detection() {
        assert!(is_compile_error("syntax error at line 3"));
        assert!(is_compile_error("# command-line-arguments\nundefined: foo"));
        assert!(!is_compile_error(r#"{"overallPass":true}"#));
    }

    #[test]
    fn test_unparseable_stats_fail_conservatively() {
        let stats: ExecutionStats = serde_json::from_str("not json").unwrap_or_default();
        assert!(!stats.overall_pass);
    }

    #[test]
    fn test_stats_parse() {
        let stats: ExecutionStats = serde_json::from_str(
            r#"{"totalTestCases":3,"passedTestCases":3,"failedTestCases":0,"overallPass":true}"#,
        )
        .unwrap_or_default();
        assert!(stats.overall_pass);
        assert_eq!(stats.total_test_cases, 3);
        assert_eq!(stats.passed_test_cases, 3);
    }
}
