pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod routes;
pub mod services;

use std::sync::Arc;

use db::TaskStore;

/// Shared application state passed to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TaskStore>,
    pub config: config::AppConfig,
}
