//! Alert event models

use serde::{Deserialize, Serialize};

use super::lenient;
use crate::error::{Error, Result};

/// Webhook body delivered by the alerting service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertPayload {
    /// The alert itself
    pub event: AlertEvent,
}

impl AlertPayload {
    /// Parse a raw webhook body
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| Error::invalid_payload(e.to_string()))
    }
}

/// A security alert about a single email message.
///
/// Every field is optional. Absent fields render as empty text in the
/// report, except `alert_id`, whose absence still yields a storage key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEvent {
    /// Outcome classification (e.g. "MALICIOUS", "SPAM")
    #[serde(default, deserialize_with = "lenient::text")]
    pub final_disposition: Option<String>,

    /// HELO name of the sending server. Parsed but not rendered.
    #[serde(default, deserialize_with = "lenient::text")]
    pub smtp_helo_server_name: Option<String>,

    /// SMTP-level recipient addresses
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub envelope_to: Option<Vec<String>>,

    /// Header-level recipient addresses, index-aligned with `envelope_to`
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub to: Option<Vec<String>>,

    /// Human-readable reasons the message was flagged
    #[serde(default, deserialize_with = "lenient::text_list_or_scalar")]
    pub alert_reasons: Option<Vec<String>>,

    /// SMTP-level sender address. Parsed but not rendered.
    #[serde(default, deserialize_with = "lenient::text")]
    pub envelope_from: Option<String>,

    /// Header-level sender address
    #[serde(default, deserialize_with = "lenient::text")]
    pub from: Option<String>,

    /// Sender display name
    #[serde(default, deserialize_with = "lenient::text")]
    pub from_name: Option<String>,

    /// Message subject
    #[serde(default, deserialize_with = "lenient::text")]
    pub subject: Option<String>,

    /// Message-ID header
    #[serde(default, deserialize_with = "lenient::text")]
    pub message_id: Option<String>,

    /// Delivery timestamp, ISO-8601
    #[serde(default, deserialize_with = "lenient::string_only")]
    pub ts: Option<String>,

    /// Alert identifier, names the stored report
    #[serde(default, deserialize_with = "lenient::text")]
    pub alert_id: Option<String>,
}
