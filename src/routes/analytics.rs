//! Analytics routes: per-user statistics and productivity over time.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::errors::AppError;
use crate::models::stats::{ProductivityResponse, UserStatsResponse};
use crate::services::analytics::{self as analytics_service, ProductivityParams};
use crate::AppState;

/// GET /analytics/user-stats/{user_id} — totals, completion rate and priority breakdown.
pub async fn user_stats(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<UserStatsResponse>, AppError> {
    let Path(user_id) = path?;
    let stats = analytics_service::user_stats(state.store.as_ref(), &user_id).await?;
    Ok(Json(stats))
}

/// GET /analytics/productivity/{user_id}?start&end — completed tasks per day.
pub async fn productivity(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ProductivityParams>, QueryRejection>,
) -> Result<Json<ProductivityResponse>, AppError> {
    let Path(user_id) = path?;
    let Query(params) = query?;
    let series = analytics_service::productivity(state.store.as_ref(), &user_id, &params).await?;
    Ok(Json(series))
}
