// Thumbnailer library
//
// Generates fixed-width derivatives of newly uploaded images and uploads
// them next to the source in an output container.

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod logging;
pub mod metrics;
pub mod naming;
pub mod sink;
pub mod thumbnail;

pub use config::{Config, TargetSpec};
pub use error::{Result, ThumbnailError};
pub use thumbnail::{GenerationReport, ThumbnailGenerator};
