//! Filesystem upload sink
//!
//! Writes artifacts to `<root>/<container>/<key>`. Useful for local runs of
//! the binary without an object store.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

use super::{SinkError, UploadSink};
use crate::thumbnail::EncodedArtifact;

pub struct LocalSink {
    base: PathBuf,
}

impl LocalSink {
    pub fn new(root: impl AsRef<Path>, container: &str) -> Self {
        Self {
            base: root.as_ref().join(container),
        }
    }

    /// Directory uploads are written under
    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, SinkError> {
        let relative = Path::new(key.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if key.trim_start_matches('/').is_empty() || escapes {
            return Err(SinkError::upload(key, "Invalid object key"));
        }
        Ok(self.base.join(relative))
    }
}

#[async_trait]
impl UploadSink for LocalSink {
    async fn upload(&self, key: &str, artifact: EncodedArtifact) -> Result<(), SinkError> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &artifact.data).await?;

        tracing::debug!(
            path = %path.display(),
            size = artifact.len(),
            "Wrote derivative to disk"
        );
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "local"
    }
}
