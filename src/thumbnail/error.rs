//! Thumbnail pipeline error types
//!
//! Covers the image side of the pipeline: decoding the source, computing
//! target dimensions, resizing and encoding.

use std::fmt;

/// Errors that can occur while producing a single derivative
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    // === Decoding Errors ===
    /// Failed to decode the source image
    DecodeFailed { message: String },

    // === Scaling Errors ===
    /// Target width is larger than the source, or the computed height is zero
    DegenerateScale {
        source_width: u32,
        source_height: u32,
        target_width: u32,
    },

    // === Processing Errors ===
    /// Resize operation failed
    ResizeFailed { message: String },
    /// Encoding to output format failed
    EncodeFailed { format: String, message: String },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::DecodeFailed { message } => {
                write!(f, "Failed to decode image: {}", message)
            }
            ImageError::DegenerateScale {
                source_width,
                source_height,
                target_width,
            } => {
                write!(
                    f,
                    "Cannot scale {}x{} image to width {}",
                    source_width, source_height, target_width
                )
            }
            ImageError::ResizeFailed { message } => {
                write!(f, "Resize failed: {}", message)
            }
            ImageError::EncodeFailed { format, message } => {
                write!(f, "Failed to encode to {}: {}", format, message)
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl ImageError {
    /// Skip conditions are reported but never abort an invocation
    pub fn is_skip(&self) -> bool {
        matches!(self, ImageError::DegenerateScale { .. })
    }

    pub fn decode_failed(message: impl Into<String>) -> Self {
        ImageError::DecodeFailed {
            message: message.into(),
        }
    }

    pub fn resize_failed(message: impl Into<String>) -> Self {
        ImageError::ResizeFailed {
            message: message.into(),
        }
    }

    pub fn encode_failed(format: impl Into<String>, message: impl Into<String>) -> Self {
        ImageError::EncodeFailed {
            format: format.into(),
            message: message.into(),
        }
    }
}
