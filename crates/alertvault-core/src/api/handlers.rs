//! Webhook handlers

use axum::{
    extract::State,
    http::{Method, StatusCode},
};
use bytes::Bytes;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::AlertPayload;
use crate::publisher::{AlertPublisher, PublishOutcome};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Formats and archives alerts
    pub publisher: AlertPublisher,
    /// Answer 502 when the archive write fails
    pub surface_storage_errors: bool,
}

/// Receive an alert and archive it.
///
/// Answers 200 with an empty body once the write has been attempted,
/// whatever its outcome, unless `surface_storage_errors` is set.
pub async fn receive_alert(State(state): State<AppState>, body: Bytes) -> Result<StatusCode> {
    let payload = AlertPayload::from_slice(&body)?;

    match state.publisher.publish(&payload.event).await? {
        PublishOutcome::Failed { error, .. } if state.surface_storage_errors => {
            Err(Error::Storage(error))
        }
        _ => Ok(StatusCode::OK),
    }
}

/// Blank page for browsers and liveness probes
pub async fn browse() -> StatusCode {
    StatusCode::OK
}

/// Methods the receiver does not answer
pub async fn unsupported_method(method: Method) -> StatusCode {
    debug!(%method, "Ignoring unsupported method");
    StatusCode::METHOD_NOT_ALLOWED
}
