//! Thumbnail generation
//!
//! Turns one uploaded image into a fixed set of resized derivatives:
//! - Encoder selection from the source extension (PNG, JPEG, GIF)
//! - Width-driven scaling with an integer divisor for the height
//! - Lanczos3 resize, re-encode in the source format, upload
//!
//! # Scaling
//!
//! ```text
//! divisor = floor(source_width / target_width)
//! height  = round(source_height / divisor)   // halves away from zero
//! ```
//!
//! A target wider than its source (divisor 0) is skipped with a warning.

pub mod encoder;
pub mod error;
pub mod generator;
pub mod processor;

pub use encoder::{
    select_encoder, EncodedArtifact, EncoderFactory, EncoderQuality, GifEncoder, ImageEncoder,
    JpegEncoder, OutputFormat, PngEncoder,
};
pub use error::ImageError;
pub use generator::{GenerationReport, ThumbnailGenerator};
pub use processor::{render_target, scale_divisor, scaled_height, target_dimensions, SourceImage};
