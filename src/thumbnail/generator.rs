//! Derivative generation for one uploaded image
//!
//! `handle` is the whole invocation: pick the encoder from the source
//! extension, read and decode the content once, then for every target
//! resize, encode and upload in configured order. The first hard failure
//! aborts the remaining targets.

use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::Instrument;

use super::encoder::{select_encoder, EncoderQuality, ImageEncoder};
use super::processor::{render_target, SourceImage};
use crate::config::{Config, TargetSpec};
use crate::error::{Result, ThumbnailError};
use crate::metrics::ThumbnailMetrics;
use crate::naming::{derive_name, extension_of};
use crate::sink::UploadSink;

/// Outcome of a successful invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Storage keys of uploaded derivatives, in upload order
    pub uploaded: Vec<String>,
    /// Targets skipped because the source is too narrow for them
    pub skipped_targets: Vec<TargetSpec>,
    /// The source extension has no encoder, nothing was attempted
    pub unsupported: bool,
}

impl GenerationReport {
    pub fn upload_count(&self) -> usize {
        self.uploaded.len()
    }
}

pub struct ThumbnailGenerator {
    targets: Vec<TargetSpec>,
    quality: EncoderQuality,
    sink: Arc<dyn UploadSink>,
    metrics: Option<&'static ThumbnailMetrics>,
}

impl ThumbnailGenerator {
    pub fn new(config: &Config, sink: Arc<dyn UploadSink>) -> Self {
        Self::with_targets(config.targets(), config.encoder_quality(), sink)
    }

    pub fn with_targets(
        targets: Vec<TargetSpec>,
        quality: EncoderQuality,
        sink: Arc<dyn UploadSink>,
    ) -> Self {
        Self {
            targets,
            quality,
            sink,
            metrics: None,
        }
    }

    /// Record outcomes in the global Prometheus metrics
    pub fn with_metrics(mut self, metrics: &'static ThumbnailMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn targets(&self) -> &[TargetSpec] {
        &self.targets
    }

    /// Run one invocation for `source` and its content stream
    ///
    /// A missing stream or an unsupported extension completes successfully
    /// with zero uploads.
    pub async fn handle<R>(&self, source: &str, content: Option<R>) -> Result<GenerationReport>
    where
        R: AsyncRead + Unpin + Send,
    {
        let span = tracing::info_span!("thumbnail", source = %source);

        async move {
            let Some(content) = content else {
                tracing::info!("No content stream for source, nothing to do");
                return Ok(GenerationReport::default());
            };

            let extension = extension_of(source);
            let Some(encoder) = select_encoder(extension, self.quality) else {
                tracing::info!(extension = %extension, "No encoder support for: {}", source);
                if let Some(metrics) = self.metrics {
                    metrics.invocations_skipped.inc();
                }
                return Ok(GenerationReport {
                    unsupported: true,
                    ..Default::default()
                });
            };

            match self.generate(source, content, Arc::from(encoder)).await {
                Ok(report) => {
                    if let Some(metrics) = self.metrics {
                        metrics.invocations_processed.inc();
                    }
                    tracing::info!(
                        uploaded = report.upload_count(),
                        skipped = report.skipped_targets.len(),
                        "Thumbnail generation complete"
                    );
                    Ok(report)
                }
                Err(e) => {
                    if let Some(metrics) = self.metrics {
                        metrics.invocations_failed.inc();
                    }
                    tracing::error!(error = %e, "Thumbnail generation failed");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Resize, encode and upload every target with an already chosen encoder
    pub async fn generate<R>(
        &self,
        source: &str,
        mut content: R,
        encoder: Arc<dyn ImageEncoder>,
    ) -> Result<GenerationReport>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut data = Vec::new();
        content
            .read_to_end(&mut data)
            .await
            .map_err(ThumbnailError::Read)?;

        let image =
            Arc::new(tokio::task::spawn_blocking(move || SourceImage::decode(&data)).await??);
        let (source_width, source_height) = image.dimensions();
        tracing::debug!(
            width = source_width,
            height = source_height,
            format = encoder.format().as_str(),
            "Decoded source image"
        );

        let mut report = GenerationReport::default();

        for target in &self.targets {
            let _timer = self.metrics.map(|m| m.target_duration.start_timer());

            let rendered = {
                let image = Arc::clone(&image);
                let encoder = Arc::clone(&encoder);
                let width = target.width;
                tokio::task::spawn_blocking(move || render_target(&image, width, encoder.as_ref()))
                    .await?
            };

            let artifact = match rendered {
                Ok(artifact) => artifact,
                Err(e) if e.is_skip() => {
                    tracing::warn!(
                        width = target.width,
                        tag = %target.tag,
                        source_width = source_width,
                        error = %e,
                        "Skipping target"
                    );
                    if let Some(metrics) = self.metrics {
                        metrics.targets_skipped.inc();
                    }
                    report.skipped_targets.push(target.clone());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let key = self.sink.object_key(&derive_name(source, &target.tag));
            let (width, height) = artifact.dimensions;
            let size = artifact.len();

            self.sink.upload(&key, artifact).await?;

            tracing::info!(
                key = %key,
                sink = self.sink.kind(),
                width = width,
                height = height,
                size = size,
                "Uploaded thumbnail"
            );
            if let Some(metrics) = self.metrics {
                metrics.record_thumbnail(&target.tag);
            }
            report.uploaded.push(key);
        }

        Ok(report)
    }
}
