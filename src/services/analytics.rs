//! User statistics and productivity series computed from task aggregations.

use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde::Deserialize;

use crate::db::TaskStore;
use crate::errors::AppError;
use crate::models::stats::{
    completion_rate, DailyCompletion, DateRange, PriorityBreakdown, ProductivityResponse,
    UserStatsResponse,
};
use crate::models::task::{TaskPriority, TaskStatus};
use crate::pipelines::{build_productivity_query, build_user_stats_query, Pipeline};

/// Optional bounds for the productivity series, as received on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductivityParams {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Parse a path identifier as a 24-hex ObjectId.
pub fn parse_user_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidIdentifier(raw.to_string()))
}

/// Totals, completion rate and priority breakdown for one user.
pub async fn user_stats(
    store: &dyn TaskStore,
    raw_user_id: &str,
) -> Result<UserStatsResponse, AppError> {
    let user_id = parse_user_id(raw_user_id)?;
    let pipeline = build_user_stats_query(&user_id)?;
    let docs = run(store, &pipeline, raw_user_id).await?;
    fold_user_stats(raw_user_id, docs)
}

/// Completed tasks per day within the optional window.
pub async fn productivity(
    store: &dyn TaskStore,
    raw_user_id: &str,
    params: &ProductivityParams,
) -> Result<ProductivityResponse, AppError> {
    let user_id = parse_user_id(raw_user_id)?;
    // Blank values (`?start=`) mean "unbounded" but are still echoed back.
    let start = params.start.as_deref().filter(|s| !s.is_empty());
    let end = params.end.as_deref().filter(|s| !s.is_empty());
    let pipeline = build_productivity_query(&user_id, start, end)?;
    let docs = run(store, &pipeline, raw_user_id).await?;
    let series = fold_series(docs)?;

    Ok(ProductivityResponse::new(
        raw_user_id,
        series,
        DateRange {
            start: params.start.clone(),
            end: params.end.clone(),
        },
    ))
}

async fn run(
    store: &dyn TaskStore,
    pipeline: &Pipeline,
    user_id: &str,
) -> Result<Vec<Document>, AppError> {
    store.aggregate(pipeline).await.map_err(|e| {
        tracing::warn!(user_id, pipeline = pipeline.name(), error = %e, "Aggregation failed");
        AppError::from(e)
    })
}

// -- Result shaping --

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FacetOutput {
    #[serde(default)]
    status_counts: Vec<GroupCount>,
    #[serde(default)]
    priority_counts: Vec<GroupCount>,
    #[serde(default)]
    total_count: Vec<TotalCount>,
}

#[derive(Debug, Deserialize)]
struct GroupCount {
    #[serde(rename = "_id")]
    key: Bson,
    count: i64,
}

#[derive(Debug, Deserialize)]
struct TotalCount {
    total: i64,
}

fn decode<T: serde::de::DeserializeOwned>(doc: Document, what: &str) -> Result<T, AppError> {
    bson::from_document(doc)
        .map_err(|e| AppError::Internal(format!("malformed {what} row: {e}")))
}

/// Fold `$facet` output into the fixed response shape.
///
/// Unknown status or priority values still count toward `totalTasks`.
fn fold_user_stats(user_id: &str, docs: Vec<Document>) -> Result<UserStatsResponse, AppError> {
    let Some(first) = docs.into_iter().next() else {
        return Ok(UserStatsResponse::empty(user_id));
    };
    let facets: FacetOutput = decode(first, "user stats")?;

    let total_tasks = facets.total_count.first().map(|t| t.total).unwrap_or(0);
    if total_tasks == 0 {
        return Ok(UserStatsResponse::empty(user_id));
    }

    let (mut completed, mut pending, mut in_progress) = (0, 0, 0);
    for row in &facets.status_counts {
        match row.key.as_str().and_then(TaskStatus::parse) {
            Some(TaskStatus::Completed) => completed += row.count,
            Some(TaskStatus::Todo) => pending += row.count,
            Some(TaskStatus::InProgress) => in_progress += row.count,
            None => tracing::debug!(user_id, status = %row.key, "Ignoring unknown status"),
        }
    }

    let mut by_priority = PriorityBreakdown::default();
    for row in &facets.priority_counts {
        match row.key.as_str().and_then(TaskPriority::parse) {
            Some(TaskPriority::Low) => by_priority.low += row.count,
            Some(TaskPriority::Medium) => by_priority.medium += row.count,
            Some(TaskPriority::High) => by_priority.high += row.count,
            None => tracing::debug!(user_id, priority = %row.key, "Ignoring unknown priority"),
        }
    }

    Ok(UserStatsResponse {
        user_id: user_id.to_string(),
        total_tasks,
        completed,
        pending,
        in_progress,
        completion_rate: completion_rate(completed, total_tasks),
        by_priority,
    })
}

fn fold_series(docs: Vec<Document>) -> Result<Vec<DailyCompletion>, AppError> {
    docs.into_iter()
        .map(|doc| decode::<DailyCompletion>(doc, "productivity"))
        .filter(|row| !matches!(row, Ok(day) if day.completed == 0))
        .collect()
}
