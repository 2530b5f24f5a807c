//! Problem response DTOs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{CodeData, Problem, TestCase};

/// Full problem view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemResponse {
    pub problem_id: Uuid,
    pub title: String,
    pub slug: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub difficulty: String,
    pub testcases: TestCasesResponse,
    pub supported_languages: Vec<String>,
    pub validate_code: HashMap<String, CodeData>,
    pub validated: bool,
    pub validated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Both test case buckets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCasesResponse {
    pub run: Vec<TestCase>,
    pub submit: Vec<TestCase>,
}

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self {
            problem_id: p.id,
            title: p.title,
            slug: p.slug,
            description: p.description,
            tags: p.tags,
            difficulty: p.difficulty,
            testcases: TestCasesResponse {
                run: p.run_cases.0,
                submit: p.submit_cases.0,
            },
            supported_languages: p.supported_languages,
            validate_code: p.validate_code.0,
            validated: p.validated,
            validated_at: p.validated_at,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Paginated problem list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemsListResponse {
    pub problems: Vec<ProblemResponse>,
    pub total_count: i64,
    pub page: u32,
    pub page_size: u32,
}

/// Catalog projection: run cases only, plus the per-language editor
/// placeholders; hidden cases and reference code stay server-side
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemMetadataLite {
    pub problem_id: Uuid,
    pub title: String,
    pub slug: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub difficulty: String,
    pub testcase_run: Vec<TestCase>,
    pub supported_languages: Vec<String>,
    pub validated: bool,
    pub placeholder_maps: HashMap<String, String>,
}

impl From<&Problem> for ProblemMetadataLite {
    fn from(p: &Problem) -> Self {
        let placeholder_maps = p
            .validate_code
            .0
            .iter()
            .map(|(lang, code)| (lang.clone(), code.placeholder.clone()))
            .collect();

        Self {
            problem_id: p.id,
            title: p.title.clone(),
            slug: p.slug.clone(),
            description: p.description.clone(),
            tags: p.tags.clone(),
            difficulty: p.difficulty.clone(),
            testcase_run: p.run_cases.0.clone(),
            supported_languages: p.supported_languages.clone(),
            validated: p.validated,
            placeholder_maps,
        }
    }
}

/// Lite metadata list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemMetadataListResponse {
    pub problems: Vec<ProblemMetadataLite>,
}

impl ProblemMetadataListResponse {
    pub fn single(problem: &Problem) -> Self {
        Self {
            problems: vec![ProblemMetadataLite::from(problem)],
        }
    }

    pub fn from_problems(problems: &[Problem]) -> Self {
        Self {
            problems: problems.iter().map(ProblemMetadataLite::from).collect(),
        }
    }
}

/// Test cases added response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCasesAddedResponse {
    pub added_count: usize,
}

/// Supported languages and their scaffolding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSupportsResponse {
    pub supported_languages: Vec<String>,
    pub validate_code: HashMap<String, CodeData>,
}

/// Full validation outcome; `validated` is the post-write value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullValidationResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    pub validated: bool,
}

/// Run/submit execution outcome.
///
/// `success = false` carries the pipeline failure kind in `error_type`;
/// `success = true` echoes the raw executor output in `message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProblemResponse {
    pub success: bool,
    pub problem_id: Uuid,
    pub language: String,
    pub is_run_testcase: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    pub message: String,
}

impl RunProblemResponse {
    /// Terminal pipeline failure for a run request
    pub fn failure(
        payload: &super::request::RunProblemRequest,
        language: &str,
        error_type: &str,
        message: &str,
    ) -> Self {
        Self {
            success: false,
            problem_id: payload.problem_id,
            language: language.to_string(),
            is_run_testcase: payload.is_run_testcase,
            error_type: Some(error_type.to_string()),
            message: message.to_string(),
        }
    }
}
