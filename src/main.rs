use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use mimalloc::MiMalloc;
use quicktask_analytics::config::AppConfig;
use quicktask_analytics::db::{self, MongoTaskStore};
use quicktask_analytics::{routes, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quicktask_analytics=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = AppConfig::from_env();

    let database = db::connect(&config)
        .await
        .context("invalid MONGO_URI")?;
    tracing::info!(database = %config.database_name, "Configured MongoDB client");

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid ANALYTICS_HOST/ANALYTICS_PORT")?;

    let state = AppState {
        store: Arc::new(MongoTaskStore::new(database)),
        config,
    };
    let app = routes::router(state);

    tracing::info!(host = %addr, "Starting QuickTask Analytics API server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
