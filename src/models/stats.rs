//! Public response shapes for the analytics endpoints.

use serde::{Deserialize, Serialize};

/// Task counts per priority level. Every level is always present.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PriorityBreakdown {
    #[serde(rename = "Low")]
    pub low: i64,
    #[serde(rename = "Medium")]
    pub medium: i64,
    #[serde(rename = "High")]
    pub high: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    pub user_id: String,
    pub total_tasks: i64,
    pub completed: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completion_rate: f64,
    pub by_priority: PriorityBreakdown,
}

impl UserStatsResponse {
    /// Response for a user with no tasks.
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            total_tasks: 0,
            completed: 0,
            pending: 0,
            in_progress: 0,
            completion_rate: 0.0,
            by_priority: PriorityBreakdown::default(),
        }
    }
}

/// Percentage of completed tasks rounded to two decimals, ties to even; 0 when there are no tasks.
pub fn completion_rate(completed: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let pct = completed as f64 / total as f64 * 100.0;
    (pct * 100.0).round_ties_even() / 100.0
}

/// Completed task count for one UTC calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyCompletion {
    pub date: String,
    pub completed: i64,
}

/// Requested bounds echoed back verbatim.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductivityResponse {
    pub user_id: String,
    pub series: Vec<DailyCompletion>,
    pub total_completed: i64,
    pub date_range: DateRange,
}

impl ProductivityResponse {
    pub fn new(user_id: &str, series: Vec<DailyCompletion>, date_range: DateRange) -> Self {
        let total_completed = series.iter().map(|day| day.completed).sum();
        Self {
            user_id: user_id.to_string(),
            series,
            total_completed,
            date_range,
        }
    }
}
