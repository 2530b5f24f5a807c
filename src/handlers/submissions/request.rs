//! Submission request DTOs

use serde::Deserialize;
use uuid::Uuid;

/// List submissions query; at least one of problem_id/user_id is required
#[derive(Debug, Deserialize)]
pub struct ListSubmissionsQuery {
    pub problem_id: Option<Uuid>,
    pub user_id: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Heatmap query; zero or missing values default to the current month
#[derive(Debug, Deserialize)]
pub struct HeatmapQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}
