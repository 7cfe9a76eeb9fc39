//! MongoDB client construction and the task store seam used by handlers.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};

use crate::config::AppConfig;
use crate::pipelines::Pipeline;

#[cfg(test)]
pub(crate) mod fake;

pub const TASKS_COLLECTION: &str = "tasks";

/// Create a pooled MongoDB client and select the configured database.
///
/// The driver connects lazily, so this succeeds even if the server is down;
/// connectivity problems surface on the first query.
pub async fn connect(config: &AppConfig) -> Result<Database, mongodb::error::Error> {
    let mut options = ClientOptions::parse(&config.mongo_uri).await?;
    options.max_pool_size = Some(config.mongo_max_pool_size);
    options.app_name = Some("quicktask-analytics".to_string());

    let client = Client::with_options(options)?;
    Ok(client.database(&config.database_name))
}

pub fn tasks_collection(db: &Database) -> Collection<Document> {
    db.collection(TASKS_COLLECTION)
}

/// Read-only access to the task collection.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Run an aggregation pipeline and collect every output document.
    async fn aggregate(&self, pipeline: &Pipeline) -> Result<Vec<Document>, mongodb::error::Error>;

    /// Round-trip to the server for readiness checks.
    async fn ping(&self) -> Result<(), mongodb::error::Error>;
}

/// [`TaskStore`] backed by a live MongoDB database.
#[derive(Debug, Clone)]
pub struct MongoTaskStore {
    db: Database,
    tasks: Collection<Document>,
}

impl MongoTaskStore {
    pub fn new(db: Database) -> Self {
        let tasks = tasks_collection(&db);
        Self { db, tasks }
    }
}

#[async_trait]
impl TaskStore for MongoTaskStore {
    async fn aggregate(&self, pipeline: &Pipeline) -> Result<Vec<Document>, mongodb::error::Error> {
        tracing::debug!(pipeline = pipeline.name(), "Running aggregation");
        let cursor = self.tasks.aggregate(pipeline.to_documents()).await?;
        cursor.try_collect().await
    }

    async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
