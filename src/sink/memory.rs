//! In-memory upload sink for testing

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::sync::Arc;

use super::{SinkError, UploadSink};
use crate::thumbnail::EncodedArtifact;

/// One recorded upload
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub data: Bytes,
    pub content_type: &'static str,
}

/// Sink that records uploads in memory, in upload order
#[derive(Clone, Default)]
pub struct MemorySink {
    objects: Arc<RwLock<Vec<StoredObject>>>,
    /// Fail the upload with this (zero-based) index
    fail_at: Arc<RwLock<Option<usize>>>,
    attempts: Arc<RwLock<usize>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a store failure on the `index`-th upload attempt
    pub fn fail_on_upload(&self, index: usize) {
        *self.fail_at.write() = Some(index);
    }

    /// All successfully stored objects
    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.read().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.read().iter().map(|o| o.key.clone()).collect()
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().iter().find(|o| o.key == key).cloned()
    }

    pub fn upload_count(&self) -> usize {
        self.objects.read().len()
    }

    /// Number of upload calls, including failed ones
    pub fn attempts(&self) -> usize {
        *self.attempts.read()
    }
}

#[async_trait]
impl UploadSink for MemorySink {
    async fn upload(&self, key: &str, artifact: EncodedArtifact) -> Result<(), SinkError> {
        let attempt = {
            let mut attempts = self.attempts.write();
            *attempts += 1;
            *attempts - 1
        };

        if *self.fail_at.read() == Some(attempt) {
            return Err(SinkError::upload(key, "Simulated store failure"));
        }

        self.objects.write().push(StoredObject {
            key: key.to_string(),
            data: artifact.data,
            content_type: artifact.content_type,
        });
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
