//! Problem model

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::TestCase;

/// Problem database model
///
/// Test cases and per-language scaffolding live on the problem row as JSONB
/// documents; every structural mutation resets `validated`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Problem {
    pub id: Uuid,
    pub title: String,
    pub slug: Option<String>,
    pub description: String,
    pub tags: Vec<String>,
    pub difficulty: String,
    pub run_cases: Json<Vec<TestCase>>,
    pub submit_cases: Json<Vec<TestCase>>,
    pub supported_languages: Vec<String>,
    pub validate_code: Json<HashMap<String, CodeData>>,
    pub validated: bool,
    pub validated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Problem {
    /// Language scaffolding for one language, if supported
    pub fn code_data(&self, language: &str) -> Option<&CodeData> {
        self.validate_code.0.get(language)
    }
}

/// Per-language scaffolding: editor placeholder, reference solution, and
/// the execution template carrying the splice markers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodeData {
    pub placeholder: String,
    pub code: String,
    pub template: String,
}

/// Outcome of the structural precondition checks that gate full validation.
///
/// Checks are ordered; the first failing precondition wins.
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    pub error_type: &'static str,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(error_type: &'static str, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
        }
    }
}
