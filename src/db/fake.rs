//! In-memory [`TaskStore`] for handler and service tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::Document;

use super::TaskStore;
use crate::pipelines::Pipeline;

/// Returns a canned aggregation result and records every pipeline it receives.
pub struct RecordingStore {
    result: Result<Vec<Document>, mongodb::error::Error>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Vec<Document>>>,
}

impl RecordingStore {
    pub fn returning(docs: Vec<Document>) -> Self {
        Self {
            result: Ok(docs),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, message.to_string());
        Self {
            result: Err(mongodb::error::Error::from(io)),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Rendered stages of every pipeline run so far.
    pub fn pipelines(&self) -> Vec<Vec<Document>> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskStore for RecordingStore {
    async fn aggregate(&self, pipeline: &Pipeline) -> Result<Vec<Document>, mongodb::error::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(pipeline.to_documents());
        self.result.clone()
    }

    async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.result.clone().map(|_| ())
    }
}
