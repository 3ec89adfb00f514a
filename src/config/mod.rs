// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_JPEG_QUALITY, ENV_BIG_WIDTH, ENV_MEDIUM_WIDTH, ENV_OUTPUT_CONTAINER_NAME,
    ENV_SMALL_WIDTH, ENV_STORAGE_CONNECTION, TAG_BIG, TAG_MEDIUM, TAG_SMALL,
};
use crate::logging::LoggingConfig;
use crate::thumbnail::EncoderQuality;

/// Deployment configuration, resolved once before any invocation runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub widths: WidthConfig,
    pub output_container: String,
    /// Opaque storage credential, only the sink interprets it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The three derivative widths, in pixels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WidthConfig {
    pub big: u32,
    pub medium: u32,
    pub small: u32,
}

/// One derivative to produce: target width and the tag for its name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetSpec {
    pub width: u32,
    pub tag: String,
}

impl TargetSpec {
    pub fn new(width: u32, tag: impl Into<String>) -> Self {
        Self {
            width,
            tag: tag.into(),
        }
    }
}

/// Where derivatives are uploaded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SinkConfig {
    S3(S3SinkConfig),
    Local(LocalSinkConfig),
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig::S3(S3SinkConfig::default())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct S3SinkConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Use path-style addressing (MinIO, LocalStack)
    #[serde(default)]
    pub force_path_style: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocalSinkConfig {
    pub root: PathBuf,
}

fn default_jpeg_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    /// Read `BIG_WIDTH`, `MEDIUM_WIDTH`, `SMALL_WIDTH`,
    /// `OUTPUT_CONTAINER_NAME` and `AzureWebJobsStorage` from the process
    /// environment
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Config::from_env`] with an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let width = |name: &str| -> Result<u32, String> {
            let raw = lookup(name)
                .ok_or_else(|| format!("Environment variable '{}' is not set", name))?;
            raw.trim().parse::<u32>().map_err(|e| {
                format!(
                    "Environment variable '{}' must be a positive integer, got '{}': {}",
                    name, raw, e
                )
            })
        };

        let widths = WidthConfig {
            big: width(ENV_BIG_WIDTH)?,
            medium: width(ENV_MEDIUM_WIDTH)?,
            small: width(ENV_SMALL_WIDTH)?,
        };

        let output_container = lookup(ENV_OUTPUT_CONTAINER_NAME).ok_or_else(|| {
            format!(
                "Environment variable '{}' is not set",
                ENV_OUTPUT_CONTAINER_NAME
            )
        })?;

        Ok(Config {
            widths,
            output_container,
            connection: lookup(ENV_STORAGE_CONNECTION).filter(|c| !c.trim().is_empty()),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            sink: SinkConfig::default(),
            logging: LoggingConfig::default(),
        })
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, width) in [
            ("big", self.widths.big),
            ("medium", self.widths.medium),
            ("small", self.widths.small),
        ] {
            if width == 0 {
                return Err(format!("Width '{}' must be greater than 0", name));
            }
        }

        if self.output_container.trim().is_empty() {
            return Err("Output container name cannot be empty".to_string());
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(format!(
                "JPEG quality {} is out of range, must be 1-100",
                self.jpeg_quality
            ));
        }

        if let SinkConfig::Local(local) = &self.sink {
            if local.root.as_os_str().is_empty() {
                return Err("Local sink root cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Derivatives to produce, keyed by width
    ///
    /// Widths are unique: when two configured widths are equal only the
    /// first (big, then medium, then small) is kept.
    pub fn targets(&self) -> Vec<TargetSpec> {
        let configured = [
            (self.widths.big, TAG_BIG),
            (self.widths.medium, TAG_MEDIUM),
            (self.widths.small, TAG_SMALL),
        ];

        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(configured.len());
        for (width, tag) in configured {
            if seen.insert(width) {
                targets.push(TargetSpec::new(width, tag));
            } else {
                tracing::warn!(
                    width = width,
                    tag = tag,
                    "Duplicate derivative width, dropping target"
                );
            }
        }
        targets
    }

    pub fn encoder_quality(&self) -> EncoderQuality {
        EncoderQuality::with_jpeg_quality(self.jpeg_quality)
    }
}
