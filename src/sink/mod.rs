//! Upload sinks for encoded derivatives
//!
//! The generator never talks to a store directly; it hands each artifact to
//! an [`UploadSink`]. Implementations:
//! - [`S3Sink`] - S3-compatible object store (aws-sdk-s3)
//! - [`LocalSink`] - directory tree on the local filesystem
//! - [`MemorySink`] - in-memory recorder for tests

pub mod local;
pub mod memory;
pub mod s3;

use async_trait::async_trait;

use crate::config::{Config, SinkConfig};
use crate::naming;
use crate::thumbnail::EncodedArtifact;

pub use local::LocalSink;
pub use memory::{MemorySink, StoredObject};
pub use s3::{ConnectionString, S3Sink};

/// Errors raised by upload sinks
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Upload of '{key}' failed: {message}")]
    Upload { key: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sink configuration error: {0}")]
    Config(String),
}

impl SinkError {
    pub fn upload(key: impl Into<String>, message: impl Into<String>) -> Self {
        SinkError::Upload {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Destination for encoded derivatives
#[async_trait]
pub trait UploadSink: Send + Sync {
    /// Store `artifact` under `key` in the output container
    async fn upload(&self, key: &str, artifact: EncodedArtifact) -> Result<(), SinkError>;

    /// Storage key for a derived reference
    ///
    /// The default strips scheme, host and container from URL references.
    fn object_key(&self, reference: &str) -> String {
        naming::object_key(reference)
    }

    /// Short sink name for logs
    fn kind(&self) -> &'static str;
}

/// Build the sink selected by the configuration
pub async fn build_sink(config: &Config) -> Result<Box<dyn UploadSink>, SinkError> {
    match &config.sink {
        SinkConfig::S3(s3) => {
            let sink =
                S3Sink::from_config(s3, &config.output_container, config.connection.as_deref())
                    .await?;
            Ok(Box::new(sink))
        }
        SinkConfig::Local(local) => Ok(Box::new(LocalSink::new(
            &local.root,
            &config.output_container,
        ))),
    }
}
