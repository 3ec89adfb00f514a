// Constants module - centralized default values and well-known names
//
// Environment variable names, derivative tags and encoder defaults live here
// so the config layer and the generator agree on them.

// =============================================================================
// Environment variables
// =============================================================================

/// Width of the "big" derivative
pub const ENV_BIG_WIDTH: &str = "BIG_WIDTH";

/// Width of the "medium" derivative
pub const ENV_MEDIUM_WIDTH: &str = "MEDIUM_WIDTH";

/// Width of the "small" derivative
pub const ENV_SMALL_WIDTH: &str = "SMALL_WIDTH";

/// Destination container (bucket) for uploaded derivatives
pub const ENV_OUTPUT_CONTAINER_NAME: &str = "OUTPUT_CONTAINER_NAME";

/// Opaque storage connection credential
pub const ENV_STORAGE_CONNECTION: &str = "AzureWebJobsStorage";

// =============================================================================
// Derivative tags
// =============================================================================

/// Tag inserted into the name of the big derivative
pub const TAG_BIG: &str = "-b";

/// Tag inserted into the name of the medium derivative
pub const TAG_MEDIUM: &str = "-m";

/// Tag inserted into the name of the small derivative
pub const TAG_SMALL: &str = "-s";

// =============================================================================
// Encoder defaults
// =============================================================================

/// Default JPEG quality (1-100)
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

// =============================================================================
// Events
// =============================================================================

/// Event type emitted when a new blob is written
pub const BLOB_CREATED_EVENT_TYPE: &str = "Microsoft.Storage.BlobCreated";

// =============================================================================
// Logging defaults
// =============================================================================

/// Default log filter when RUST_LOG is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";
