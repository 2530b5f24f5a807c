//! Problem repository
//!
//! Owns the durable side of the problem invariants: title uniqueness among
//! non-deleted rows, tombstone deletion, test-case caps, and the rule that
//! every structural mutation drops the problem back to the unvalidated
//! state.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    constants::{
        MAX_RUN_CASES, MAX_SUBMIT_CASES, MIN_RUN_CASES_FOR_VALIDATION,
        MIN_SUBMIT_CASES_FOR_VALIDATION,
    },
    error::{AppError, AppResult},
    models::{CodeData, Problem, TestCase, ValidationFailure},
};

/// Incoming test case; ids are generated when absent
#[derive(Debug, Clone)]
pub struct TestCaseInput {
    pub id: Option<String>,
    pub input: String,
    pub expected: String,
}

/// Repository for problem database operations
pub struct ProblemRepository;

impl ProblemRepository {
    /// Create a new problem with empty test and language collections
    pub async fn create(
        pool: &PgPool,
        title: &str,
        description: &str,
        tags: &[String],
        difficulty: &str,
    ) -> AppResult<Problem> {
        if Self::title_exists(pool, title, None).await? {
            return Err(AppError::TitleTaken(title.to_string()));
        }

        let problem = sqlx::query_as::<_, Problem>(
            r#"
            INSERT INTO problems (title, slug, description, tags, difficulty)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(slugify(title))
        .bind(description)
        .bind(tags)
        .bind(difficulty)
        .fetch_one(pool)
        .await?;

        Ok(problem)
    }

    /// Find a live problem by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Problem>> {
        let problem = sqlx::query_as::<_, Problem>(
            r#"SELECT * FROM problems WHERE id = $1 AND deleted_at IS NULL"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(problem)
    }

    /// Find a live problem by ID or slug; the ID wins when both are given
    pub async fn find_by_id_or_slug(
        pool: &PgPool,
        id: Option<&Uuid>,
        slug: Option<&str>,
    ) -> AppResult<Option<Problem>> {
        if let Some(id) = id {
            return Self::find_by_id(pool, id).await;
        }

        let problem = sqlx::query_as::<_, Problem>(
            r#"SELECT * FROM problems WHERE slug = $1 AND deleted_at IS NULL"#,
        )
        .bind(slug)
        .fetch_optional(pool)
        .await?;

        Ok(problem)
    }

    /// Update problem content.
    ///
    /// Any content change resets `validated`; a title change re-checks
    /// uniqueness against live problems.
    pub async fn update(
        pool: &PgPool,
        id: &Uuid,
        title: Option<&str>,
        description: Option<&str>,
        tags: Option<&[String]>,
        difficulty: Option<&str>,
    ) -> AppResult<Problem> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        if let Some(new_title) = title {
            if new_title != existing.title && Self::title_exists(pool, new_title, Some(id)).await? {
                return Err(AppError::TitleTaken(new_title.to_string()));
            }
        }

        let reset_validation =
            title.is_some() || description.is_some() || tags.is_some() || difficulty.is_some();

        let problem = sqlx::query_as::<_, Problem>(
            r#"
            UPDATE problems
            SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                tags = COALESCE($5, tags),
                difficulty = COALESCE($6, difficulty),
                validated = CASE WHEN $7 THEN FALSE ELSE validated END,
                validated_at = CASE WHEN $7 THEN NULL ELSE validated_at END,
                updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(title.map(slugify))
        .bind(description)
        .bind(tags)
        .bind(difficulty)
        .bind(reset_validation)
        .fetch_one(pool)
        .await?;

        Ok(problem)
    }

    /// Tombstone a problem; the row and its submissions survive
    pub async fn soft_delete(pool: &PgPool, id: &Uuid) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE problems
            SET deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "Problem not found or already deleted".to_string(),
            ));
        }
        Ok(())
    }

    /// List live problems with filters and pagination
    pub async fn list(
        pool: &PgPool,
        offset: i64,
        limit: i64,
        tags: Option<&[String]>,
        difficulty: Option<&str>,
        search: Option<&str>,
    ) -> AppResult<(Vec<Problem>, i64)> {
        let search_pattern = search.map(|s| format!("%{}%", s));

        let problems = sqlx::query_as::<_, Problem>(
            r#"
            SELECT * FROM problems
            WHERE deleted_at IS NULL
                AND ($1::text[] IS NULL OR tags @> $1)
                AND ($2::text IS NULL OR difficulty = $2)
                AND ($3::text IS NULL OR title ILIKE $3 OR description ILIKE $3)
            ORDER BY created_at DESC
            OFFSET $4 LIMIT $5
            "#,
        )
        .bind(tags)
        .bind(difficulty)
        .bind(&search_pattern)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM problems
            WHERE deleted_at IS NULL
                AND ($1::text[] IS NULL OR tags @> $1)
                AND ($2::text IS NULL OR difficulty = $2)
                AND ($3::text IS NULL OR title ILIKE $3 OR description ILIKE $3)
            "#,
        )
        .bind(tags)
        .bind(difficulty)
        .bind(&search_pattern)
        .fetch_one(pool)
        .await?;

        Ok((problems, total))
    }

    /// Append test cases to both buckets.
    ///
    /// Caps are checked against the combined size, incoming cases without an
    /// id get one generated, and cases whose id already exists in the bucket
    /// are skipped. Returns how many cases were actually added.
    pub async fn add_test_cases(
        pool: &PgPool,
        id: &Uuid,
        run: Vec<TestCaseInput>,
        submit: Vec<TestCaseInput>,
    ) -> AppResult<usize> {
        let problem = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        if problem.run_cases.0.len() + run.len() > MAX_RUN_CASES {
            return Err(AppError::LimitExceeded(format!(
                "Run test case limit ({}) exceeded",
                MAX_RUN_CASES
            )));
        }
        if problem.submit_cases.0.len() + submit.len() > MAX_SUBMIT_CASES {
            return Err(AppError::LimitExceeded(format!(
                "Submit test case limit ({}) exceeded",
                MAX_SUBMIT_CASES
            )));
        }

        let mut run_cases = problem.run_cases.0;
        let mut submit_cases = problem.submit_cases.0;
        let added = merge_test_cases(&mut run_cases, run) + merge_test_cases(&mut submit_cases, submit);

        sqlx::query(
            r#"
            UPDATE problems
            SET run_cases = $2, submit_cases = $3,
                validated = FALSE, validated_at = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(Json(&run_cases))
        .bind(Json(&submit_cases))
        .execute(pool)
        .await?;

        Ok(added)
    }

    /// Remove one test case from the chosen bucket
    pub async fn delete_test_case(
        pool: &PgPool,
        id: &Uuid,
        testcase_id: &str,
        is_run_testcase: bool,
    ) -> AppResult<()> {
        let problem = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        let mut cases = if is_run_testcase {
            problem.run_cases.0
        } else {
            problem.submit_cases.0
        };

        let before = cases.len();
        cases.retain(|tc| tc.id != testcase_id);
        if cases.len() == before {
            return Err(AppError::NotFound("Testcase not found".to_string()));
        }

        let column = if is_run_testcase { "run_cases" } else { "submit_cases" };
        let query = format!(
            r#"
            UPDATE problems
            SET {column} = $2, validated = FALSE, validated_at = NULL, updated_at = NOW()
            WHERE id = $1
            "#
        );
        sqlx::query(&query)
            .bind(id)
            .bind(Json(&cases))
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Add scaffolding for a new language
    pub async fn add_language_support(
        pool: &PgPool,
        id: &Uuid,
        language: &str,
        code: &CodeData,
    ) -> AppResult<()> {
        let problem = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        if problem.supported_languages.iter().any(|l| l == language) {
            return Err(AppError::Validation("Language already supported".to_string()));
        }

        sqlx::query(
            r#"
            UPDATE problems
            SET supported_languages = array_append(supported_languages, $2),
                validate_code = jsonb_set(validate_code, ARRAY[$2], $3),
                validated = FALSE, validated_at = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(language)
        .bind(Json(code))
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Replace the scaffolding of an already supported language
    pub async fn update_language_support(
        pool: &PgPool,
        id: &Uuid,
        language: &str,
        code: &CodeData,
    ) -> AppResult<()> {
        let problem = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        if !problem.supported_languages.iter().any(|l| l == language) {
            return Err(AppError::NotFound("Language not supported".to_string()));
        }

        sqlx::query(
            r#"
            UPDATE problems
            SET validate_code = jsonb_set(validate_code, ARRAY[$2], $3),
                validated = FALSE, validated_at = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(language)
        .bind(Json(code))
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Drop a language and its scaffolding
    pub async fn remove_language_support(
        pool: &PgPool,
        id: &Uuid,
        language: &str,
    ) -> AppResult<()> {
        let problem = Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;

        if !problem.supported_languages.iter().any(|l| l == language) {
            return Err(AppError::NotFound("Language not supported".to_string()));
        }

        sqlx::query(
            r#"
            UPDATE problems
            SET supported_languages = array_remove(supported_languages, $2),
                validate_code = validate_code - $2,
                validated = FALSE, validated_at = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(language)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Set the validated flag and return the post-write value read back
    /// from the store, so callers can detect a write that didn't stick.
    pub async fn toggle_validation(pool: &PgPool, id: &Uuid, status: bool) -> AppResult<bool> {
        sqlx::query(
            r#"
            UPDATE problems
            SET validated = $2, validated_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?;

        let validated: Option<bool> = sqlx::query_scalar(
            r#"SELECT validated FROM problems WHERE id = $1 AND deleted_at IS NULL"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(validated.unwrap_or(false))
    }

    /// Structural precondition checks gating full validation.
    ///
    /// Returns the full problem on success so the caller can drive the
    /// per-language execution pass without a second read.
    pub async fn basic_validation(
        pool: &PgPool,
        id: &Uuid,
    ) -> AppResult<Result<Problem, ValidationFailure>> {
        let Some(problem) = Self::find_by_id(pool, id).await? else {
            return Ok(Err(ValidationFailure::new("NOT_FOUND", "Problem not found")));
        };

        // Both thresholds must hold, not either
        if problem.run_cases.0.len() < MIN_RUN_CASES_FOR_VALIDATION
            || problem.submit_cases.0.len() < MIN_SUBMIT_CASES_FOR_VALIDATION
        {
            return Ok(Err(ValidationFailure::new(
                "INSUFFICIENT_TESTCASES",
                format!(
                    "requires at least {} run cases and {} submit cases",
                    MIN_RUN_CASES_FOR_VALIDATION, MIN_SUBMIT_CASES_FOR_VALIDATION
                ),
            )));
        }

        if problem.supported_languages.is_empty() {
            return Ok(Err(ValidationFailure::new(
                "NO_LANGUAGES",
                "No supported languages",
            )));
        }

        for lang in &problem.supported_languages {
            let Some(code) = problem.validate_code.0.get(lang) else {
                return Ok(Err(ValidationFailure::new(
                    "MISSING_VALIDATION_CODES",
                    format!("Missing validation code for {lang}"),
                )));
            };
            if code.placeholder.is_empty() {
                return Ok(Err(ValidationFailure::new(
                    "MISSING_PLACEHOLDER",
                    format!("Missing placeholder for language {lang}"),
                )));
            }
            if code.template.is_empty() {
                return Ok(Err(ValidationFailure::new(
                    "MISSING_TEMPLATE",
                    format!("Missing template for language {lang}"),
                )));
            }
            if code.code.is_empty() {
                return Ok(Err(ValidationFailure::new(
                    "MISSING_CODE",
                    format!("Missing code for language {lang}"),
                )));
            }
        }

        Ok(Ok(problem))
    }

    async fn title_exists(pool: &PgPool, title: &str, exclude: Option<&Uuid>) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM problems
            WHERE title = $1 AND deleted_at IS NULL AND ($2::uuid IS NULL OR id <> $2)
            "#,
        )
        .bind(title)
        .bind(exclude)
        .fetch_one(pool)
        .await?;

        Ok(count > 0)
    }
}

/// Append incoming cases to a bucket, generating missing ids and skipping
/// ids the bucket already holds. Returns how many were appended.
fn merge_test_cases(existing: &mut Vec<TestCase>, incoming: Vec<TestCaseInput>) -> usize {
    let mut added = 0;
    for tc in incoming {
        let id = match tc.id {
            Some(id) if !id.is_empty() => id,
            _ => Uuid::new_v4().to_string(),
        };
        if existing.iter().any(|e| e.id == id) {
            continue;
        }
        existing.push(TestCase {
            id,
            input: tc.input,
            expected: tc.expected,
        });
        added += 1;
    }
    added
}

/// URL-safe slug derived from the problem title
fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Two Sum"), "two-sum");
        assert_eq!(slugify("  Median of Two  Arrays "), "median-of-two-arrays");
        assert_eq!(slugify("A+B Problem!"), "a-b-problem");
    }

    #[test]
    fn test_merge_generates_missing_ids() {
        let mut existing = Vec::new();
        let added = merge_test_cases(
            &mut existing,
            vec![TestCaseInput {
                id: None,
                input: "1 2".to_string(),
                expected: "3".to_string(),
            }],
        );
        assert_eq!(added, 1);
        assert!(!existing[0].id.is_empty());
    }

    #[test]
    fn test_merge_skips_duplicate_ids() {
        let mut existing = vec![TestCase {
            id: "tc-1".to_string(),
            input: "1".to_string(),
            expected: "1".to_string(),
        }];
        let added = merge_test_cases(
            &mut existing,
            vec![
                TestCaseInput {
                    id: Some("tc-1".to_string()),
                    input: "other".to_string(),
                    expected: "other".to_string(),
                },
                TestCaseInput {
                    id: Some("tc-2".to_string()),
                    input: "2".to_string(),
                    expected: "2".to_string(),
                },
            ],
        );
        assert_eq!(added, 1);
        assert_eq!(existing.len(), 2);
        // the duplicate did not overwrite the existing case
        assert_eq!(existing[0].input, "1");
    }
}
