//! S3-compatible upload sink
//!
//! The output container maps to a bucket. Credentials come either from the
//! opaque connection string or, when none is configured, from the default
//! AWS provider chain.
//!
//! # Connection string
//!
//! ```text
//! AccessKeyId=AKIA...;SecretAccessKey=...;Region=eu-west-1;Endpoint=http://127.0.0.1:9000
//! ```
//!
//! Keys are case-insensitive. `SessionToken`, `Region` and `Endpoint` are
//! optional.

use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::{SinkError, UploadSink};
use crate::config::S3SinkConfig;
use crate::thumbnail::EncodedArtifact;

/// Parsed `Key=Value;...` storage connection credential
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionString {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub region: Option<String>,
    pub endpoint: Option<String>,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self, SinkError> {
        let mut parsed = ConnectionString::default();

        for part in raw.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }

            // Values may contain '=' (base64 secrets), split on the first one
            let (key, value) = part.split_once('=').ok_or_else(|| {
                SinkError::Config(format!("Malformed connection string segment '{}'", part))
            })?;
            let value = value.trim().to_string();

            match key.trim().to_ascii_lowercase().as_str() {
                "accesskeyid" => parsed.access_key_id = Some(value),
                "secretaccesskey" => parsed.secret_access_key = Some(value),
                "sessiontoken" => parsed.session_token = Some(value),
                "region" => parsed.region = Some(value),
                "endpoint" => parsed.endpoint = Some(value),
                other => {
                    tracing::debug!(key = %other, "Ignoring unknown connection string key");
                }
            }
        }

        if parsed.access_key_id.is_some() != parsed.secret_access_key.is_some() {
            return Err(SinkError::Config(
                "Connection string must set both AccessKeyId and SecretAccessKey".to_string(),
            ));
        }

        Ok(parsed)
    }

    fn credentials(&self) -> Option<Credentials> {
        match (&self.access_key_id, &self.secret_access_key) {
            (Some(id), Some(secret)) => Some(Credentials::new(
                id.clone(),
                secret.clone(),
                self.session_token.clone(),
                None,
                "connection-string",
            )),
            _ => None,
        }
    }
}

pub struct S3Sink {
    client: Client,
    bucket: String,
}

impl S3Sink {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        tracing::debug!(bucket = %bucket, "Initializing S3 upload sink");
        Self { client, bucket }
    }

    /// Build a client from sink settings and the optional connection string
    ///
    /// Connection string values take precedence over `S3SinkConfig`.
    pub async fn from_config(
        config: &S3SinkConfig,
        bucket: &str,
        connection: Option<&str>,
    ) -> Result<Self, SinkError> {
        let connection = connection
            .map(ConnectionString::parse)
            .transpose()?
            .unwrap_or_default();

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = connection.region.clone().or_else(|| config.region.clone()) {
            loader = loader.region(aws_config::Region::new(region));
        }
        if let Some(endpoint) = connection
            .endpoint
            .as_deref()
            .or(config.endpoint.as_deref())
        {
            loader = loader.endpoint_url(endpoint);
        }
        if let Some(credentials) = connection.credentials() {
            loader = loader.credentials_provider(credentials);
        }

        let shared = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.force_path_style)
            .build();

        Ok(Self::new(Client::from_conf(s3_config), bucket))
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl UploadSink for S3Sink {
    async fn upload(&self, key: &str, artifact: EncodedArtifact) -> Result<(), SinkError> {
        let size = artifact.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(artifact.content_type)
            .body(ByteStream::from(artifact.data))
            .send()
            .await
            .map_err(|e| SinkError::upload(key, DisplayErrorContext(&e).to_string()))?;

        tracing::debug!(
            bucket = %self.bucket,
            key = %key,
            size = size,
            "Uploaded derivative to S3"
        );
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "s3"
    }
}
