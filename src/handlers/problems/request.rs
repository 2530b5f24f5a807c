//! Problem request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create problem request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProblemRequest {
    #[validate(length(min = 1, max = 256))]
    pub title: String,

    #[validate(length(min = 1))]
    pub description: String,

    pub tags: Option<Vec<String>>,

    /// One of "E", "M", "H"
    #[validate(length(min = 1))]
    pub difficulty: String,
}

/// Update problem request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProblemRequest {
    #[validate(length(min = 1, max = 256))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub description: Option<String>,

    pub tags: Option<Vec<String>>,

    #[validate(length(min = 1))]
    pub difficulty: Option<String>,
}

/// List problems query parameters
#[derive(Debug, Deserialize)]
pub struct ListProblemsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// Comma-separated tag filter
    pub tags: Option<String>,
    pub difficulty: Option<String>,
    pub search: Option<String>,
}

impl ListProblemsQuery {
    pub fn tag_list(&self) -> Option<Vec<String>> {
        self.tags.as_deref().map(|tags| {
            tags.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

/// Lookup by ID or slug; the ID wins when both are given
#[derive(Debug, Deserialize)]
pub struct LookupProblemQuery {
    pub problem_id: Option<Uuid>,
    pub slug: Option<String>,
}

/// One incoming test case
#[derive(Debug, Deserialize)]
pub struct TestCaseRequest {
    pub id: Option<String>,
    pub input: String,
    pub expected: String,
}

/// Add test cases request; either bucket may be empty but not both
#[derive(Debug, Default, Deserialize)]
pub struct AddTestCasesRequest {
    #[serde(default)]
    pub run: Vec<TestCaseRequest>,
    #[serde(default)]
    pub submit: Vec<TestCaseRequest>,
}

/// Delete test case query parameters
#[derive(Debug, Deserialize)]
pub struct DeleteTestCaseQuery {
    #[serde(default)]
    pub is_run_testcase: bool,
}

/// Language scaffolding payload
#[derive(Debug, Deserialize)]
pub struct ValidationCodeRequest {
    #[serde(default)]
    pub placeholder: String,
    pub code: String,
    pub template: String,
}

/// Add or update language support request
#[derive(Debug, Deserialize)]
pub struct LanguageSupportRequest {
    pub language: String,
    pub validation_code: ValidationCodeRequest,
}

/// Run user code request
#[derive(Debug, Clone, Deserialize)]
pub struct RunProblemRequest {
    pub problem_id: Uuid,
    pub language: String,
    pub user_code: String,
    pub user_id: Option<String>,
    pub country: Option<String>,
    #[serde(default)]
    pub is_run_testcase: bool,
}
