// Thumbnail generation Prometheus metrics
//
// Counters for invocation outcomes and produced derivatives, plus a
// histogram of per-target processing time.

use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram,
    IntCounter, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Global metrics for the thumbnail pipeline
pub struct ThumbnailMetrics {
    /// Invocations that completed with a supported format
    pub invocations_processed: IntCounter,

    /// Invocations skipped because the source format is unsupported
    pub invocations_skipped: IntCounter,

    /// Invocations aborted by an error
    pub invocations_failed: IntCounter,

    /// Uploaded derivatives by tag
    pub thumbnails: IntCounterVec,

    /// Targets skipped because they cannot be scaled from the source
    pub targets_skipped: IntCounter,

    /// Resize-to-upload duration of one target (in seconds)
    pub target_duration: Histogram,
}

/// Global singleton instance of metrics
static METRICS: OnceLock<ThumbnailMetrics> = OnceLock::new();

impl ThumbnailMetrics {
    /// Initialize and return the global metrics instance
    pub fn global() -> &'static Self {
        METRICS.get_or_init(|| {
            let invocations = register_int_counter_vec!(
                "thumbnailer_invocations_total",
                "Total number of thumbnail invocations by outcome",
                &["outcome"] // processed, skipped, failed
            )
            .expect("Failed to register invocations_total metric");

            let thumbnails = register_int_counter_vec!(
                "thumbnailer_thumbnails_total",
                "Total number of uploaded derivatives by tag",
                &["tag"]
            )
            .expect("Failed to register thumbnails_total metric");

            let targets_skipped = register_int_counter!(
                "thumbnailer_targets_skipped_total",
                "Total number of targets skipped because the source is too narrow"
            )
            .expect("Failed to register targets_skipped_total metric");

            let target_duration = register_histogram!(
                "thumbnailer_target_duration_seconds",
                "Duration of resize, encode and upload for one target in seconds",
                vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
            )
            .expect("Failed to register target_duration_seconds metric");

            ThumbnailMetrics {
                invocations_processed: invocations.with_label_values(&["processed"]),
                invocations_skipped: invocations.with_label_values(&["skipped"]),
                invocations_failed: invocations.with_label_values(&["failed"]),
                thumbnails,
                targets_skipped,
                target_duration,
            }
        })
    }

    pub fn record_thumbnail(&self, tag: &str) {
        self.thumbnails.with_label_values(&[tag]).inc();
    }

    /// Render all registered metrics in the Prometheus text format
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
            tracing::warn!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}
