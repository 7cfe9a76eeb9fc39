//! Route definitions for the analytics API.

pub mod analytics;
pub mod health;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let analytics_routes = Router::new()
        .route(
            "/analytics/user-stats/{user_id}",
            get(analytics::user_stats),
        )
        .route(
            "/analytics/productivity/{user_id}",
            get(analytics::productivity),
        );

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::live))
        .route("/health/ready", get(health::ready))
        .merge(analytics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
