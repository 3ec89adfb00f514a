//! Blob-created notification payloads
//!
//! Events arrive in the Event Grid envelope, either one object or a batch:
//!
//! ```json
//! [{
//!   "id": "831e1650-001e-001b-66ab-eeb76e069631",
//!   "eventType": "Microsoft.Storage.BlobCreated",
//!   "subject": "/blobServices/default/containers/images/blobs/pic.png",
//!   "eventTime": "2017-06-26T18:41:00.9584103Z",
//!   "data": {
//!     "url": "https://acct.blob.core.windows.net/images/pic.png",
//!     "contentType": "image/png",
//!     "contentLength": 524288
//!   }
//! }]
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::BLOB_CREATED_EVENT_TYPE;
use crate::error::{Result, ThumbnailError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlobCreatedEvent {
    #[serde(default)]
    pub id: String,
    pub event_type: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_time: Option<DateTime<Utc>>,
    pub data: BlobCreatedData,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlobCreatedData {
    /// Full address of the new object
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
}

impl BlobCreatedEvent {
    pub fn is_blob_created(&self) -> bool {
        self.event_type == BLOB_CREATED_EVENT_TYPE
    }

    /// Source reference of the uploaded object
    pub fn source_url(&self) -> &str {
        &self.data.url
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<BlobCreatedEvent>),
    One(Box<BlobCreatedEvent>),
}

/// Parse a single event or a batch of events
pub fn parse_events(json: &str) -> Result<Vec<BlobCreatedEvent>> {
    let parsed: OneOrMany =
        serde_json::from_str(json).map_err(|e| ThumbnailError::Event(e.to_string()))?;

    let events = match parsed {
        OneOrMany::Many(events) => events,
        OneOrMany::One(event) => vec![*event],
    };

    if let Some(event) = events.iter().find(|e| e.data.url.trim().is_empty()) {
        return Err(ThumbnailError::Event(format!(
            "Event '{}' has an empty data.url",
            event.id
        )));
    }

    Ok(events)
}
