//! Alert publishing
//!
//! Turns an alert event into a report envelope and writes it to the report
//! store under a key derived from the alert ID.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::AlertEvent;
use crate::report::{FormattedReport, ReportEnvelope, REPORT_CONTENT_TYPE};
use crate::storage::{ReportStore, StorageError};

/// Object key for an alert. A missing ID yields `alert-undefined.txt`.
pub fn storage_key(alert_id: Option<&str>) -> String {
    format!("alert-{}.txt", alert_id.unwrap_or("undefined"))
}

/// Outcome of a single archive write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Report written
    Stored {
        /// Object key
        key: String,
        /// HTTP status returned by the store
        status: u16,
    },
    /// Report not written
    Failed {
        /// Object key
        key: String,
        /// Why the write failed
        error: StorageError,
    },
}

impl PublishOutcome {
    /// Whether the report was written
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored { .. })
    }

    /// Object key the write targeted
    pub fn key(&self) -> &str {
        match self {
            Self::Stored { key, .. } | Self::Failed { key, .. } => key,
        }
    }
}

impl std::fmt::Display for PublishOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stored { key, status } => write!(f, "stored {key} ({status})"),
            Self::Failed { key, error } => write!(f, "failed to store {key}: {error}"),
        }
    }
}

/// Formats alerts and archives them
#[derive(Clone)]
pub struct AlertPublisher {
    store: Arc<dyn ReportStore>,
}

impl AlertPublisher {
    /// Create a new publisher
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    /// Storage key and envelope for an event, without writing anything
    pub fn preview(event: &AlertEvent) -> (String, ReportEnvelope) {
        let envelope = FormattedReport::from_event(event).envelope();
        (storage_key(event.alert_id.as_deref()), envelope)
    }

    /// Render the event and write it with one PUT. Write failures are
    /// reported in the outcome, never as an error.
    pub async fn publish(&self, event: &AlertEvent) -> Result<PublishOutcome> {
        let (key, envelope) = Self::preview(event);
        let body = Bytes::from(envelope.to_bytes()?);

        let outcome = match self.store.put(&key, body, REPORT_CONTENT_TYPE).await {
            Ok(stored) => {
                info!(
                    alert_id = event.alert_id.as_deref().unwrap_or_default(),
                    key = %stored.key,
                    status = stored.status,
                    "Alert report archived"
                );
                PublishOutcome::Stored {
                    key: stored.key,
                    status: stored.status,
                }
            }
            Err(e) => {
                warn!(
                    alert_id = event.alert_id.as_deref().unwrap_or_default(),
                    key = %key,
                    error = %e,
                    "Alert report not archived"
                );
                PublishOutcome::Failed { key, error: e }
            }
        };

        Ok(outcome)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::StoredObject;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// A recorded `put` call
    #[derive(Debug, Clone)]
    pub struct PutCall {
        pub key: String,
        pub body: Bytes,
        pub content_type: String,
    }

    /// In-memory store that records writes and can be told to fail
    #[derive(Default)]
    pub struct RecordingStore {
        pub calls: Mutex<Vec<PutCall>>,
        pub fail_with: Option<StorageError>,
    }

    impl RecordingStore {
        pub fn failing() -> Self {
            Self::failing_with(StorageError::Http("connection refused".to_string()))
        }

        pub fn failing_with(error: StorageError) -> Self {
            Self {
                fail_with: Some(error),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<PutCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReportStore for RecordingStore {
        async fn put(
            &self,
            key: &str,
            body: Bytes,
            content_type: &str,
        ) -> std::result::Result<StoredObject, StorageError> {
            self.calls.lock().unwrap().push(PutCall {
                key: key.to_string(),
                body,
                content_type: content_type.to_string(),
            });
            if let Some(error) = &self.fail_with {
                return Err(error.clone());
            }
            Ok(StoredObject {
                key: key.to_string(),
                status: 200,
            })
        }
    }

    #[test]
    fn test_storage_key() {
        assert_eq!(storage_key(Some("123")), "alert-123.txt");
        assert_eq!(storage_key(None), "alert-undefined.txt");
    }

    #[tokio::test]
    async fn test_publish_writes_envelope_once() {
        let store = Arc::new(RecordingStore::default());
        let publisher = AlertPublisher::new(store.clone());
        let event = AlertEvent {
            alert_id: Some("123".to_string()),
            subject: Some("Invoice".to_string()),
            ..AlertEvent::default()
        };

        let outcome = publisher.publish(&event).await.unwrap();
        assert_eq!(
            outcome,
            PublishOutcome::Stored {
                key: "alert-123.txt".to_string(),
                status: 200
            }
        );

        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].key, "alert-123.txt");
        assert_eq!(calls[0].content_type, "application/json;charset=UTF-8");

        let envelope: ReportEnvelope = serde_json::from_slice(&calls[0].body).unwrap();
        assert_eq!(envelope.text, FormattedReport::from_event(&event).text());
    }

    #[tokio::test]
    async fn test_publish_failure_is_an_outcome() {
        let store = Arc::new(RecordingStore::failing());
        let publisher = AlertPublisher::new(store.clone());

        let outcome = publisher.publish(&AlertEvent::default()).await.unwrap();
        assert!(!outcome.is_stored());
        assert!(matches!(
            outcome,
            PublishOutcome::Failed {
                error: StorageError::Http(_),
                ..
            }
        ));
        assert_eq!(outcome.key(), "alert-undefined.txt");
        assert_eq!(
            outcome.to_string(),
            "failed to store alert-undefined.txt: HTTP error: connection refused"
        );
        assert_eq!(store.calls().len(), 1);
    }

    #[test]
    fn test_preview() {
        let (key, envelope) = AlertPublisher::preview(&AlertEvent {
            alert_id: Some("9".to_string()),
            ..AlertEvent::default()
        });
        assert_eq!(key, "alert-9.txt");
        assert!(envelope.text.contains("Alert ID:9"));
    }
}
