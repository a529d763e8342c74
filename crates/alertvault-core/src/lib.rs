//! # AlertVault
//!
//! Webhook receiver that archives email security alerts to S3.
//!
//! The alerting service POSTs a JSON payload with an `event` object. AlertVault
//! renders the event as a fixed-layout text report and writes it, wrapped as
//! `{"text": ...}`, to `alert-{alert_id}.txt` in the configured bucket.
//!
//! ## Architecture
//!
//! - **API**: axum router that dispatches on HTTP method
//! - **Report**: field extraction and the plain-text layout
//! - **Publisher**: one signed PUT per alert, typed outcome
//! - **Storage**: `ReportStore` trait and the SigV4 S3 client
//!
//! ## Quick Start
//!
//! ```bash
//! export AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=...
//! alertvault serve --port 8787
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod publisher;
pub mod report;
pub mod storage;
pub mod telemetry;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::api::HttpServer;
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::publisher::{AlertPublisher, PublishOutcome};
    pub use crate::report::FormattedReport;
    pub use crate::storage::{ReportStore, S3Store};
}
