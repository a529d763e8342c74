//! S3 report store

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::sigv4::{self, Credentials, Signer};
use super::{ReportStore, StorageError, StoredObject};
use crate::config::StorageConfig;

/// Writes objects to an S3 bucket with SigV4-signed PUTs
pub struct S3Store {
    client: Client,
    config: StorageConfig,
}

impl S3Store {
    /// Create a new S3 store
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StorageError::Http(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// URL of the object stored under `key`
    pub fn object_url(&self, key: &str) -> Result<Url, StorageError> {
        let key = sigv4::uri_encode(key, true);
        let raw = match &self.config.endpoint {
            Some(endpoint) => format!("{}/{key}", endpoint.trim_end_matches('/')),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{key}",
                self.config.bucket, self.config.region
            ),
        };
        Url::parse(&raw).map_err(|e| StorageError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Credentials are looked up per write so a missing key only fails the
    /// write that needs it.
    fn signer(&self) -> Result<Signer, StorageError> {
        let (Some(access_key_id), Some(secret_access_key)) = (
            self.config.access_key_id.clone(),
            self.config.secret_access_key.clone(),
        ) else {
            return Err(StorageError::MissingCredentials);
        };

        Ok(Signer::new(
            Credentials {
                access_key_id,
                secret_access_key,
                session_token: self.config.session_token.clone(),
            },
            self.config.region.clone(),
            "s3",
        ))
    }
}

#[async_trait]
impl ReportStore for S3Store {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        let url = self.object_url(key)?;
        let signer = self.signer()?;

        let payload_hash = sigv4::sha256_hex(&body);
        let signed = signer.sign(
            "PUT",
            &url,
            &[("content-type", content_type)],
            &payload_hash,
            Utc::now(),
        );

        let mut request = self
            .client
            .put(url.clone())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(body);
        for (name, value) in &signed {
            request = request.header(name.as_str(), value.as_str());
        }

        debug!(url = %url, "Writing report object");

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(StoredObject {
            key: key.to_string(),
            status: status.as_u16(),
        })
    }
}
