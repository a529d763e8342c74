//! Object storage for alert reports
//!
//! Reports are written once per alert with a single signed PUT. There is no
//! read path and no retry.

mod s3;
pub mod sigv4;

pub use s3::S3Store;

use async_trait::async_trait;
use bytes::Bytes;

/// Result of a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object key
    pub key: String,
    /// HTTP status returned by the store
    pub status: u16,
}

/// Destination for rendered reports
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Write `body` under `key`, overwriting any existing object
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;
}

/// Storage errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Access key ID or secret access key not configured
    #[error("missing AWS credentials (access key ID and secret access key are required)")]
    MissingCredentials,

    /// Object URL could not be built
    #[error("invalid object URL: {0}")]
    InvalidUrl(String),

    /// Request could not be sent or completed
    #[error("HTTP error: {0}")]
    Http(String),

    /// Store answered with a non-2xx status
    #[error("store returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },
}
