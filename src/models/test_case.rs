//! Test case model

use serde::{Deserialize, Serialize};

/// A single test case: an input blob and the expected output blob.
///
/// Ids are stable within their run/submit bucket; cases arriving without an
/// id get one generated on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub input: String,
    pub expected: String,
}
