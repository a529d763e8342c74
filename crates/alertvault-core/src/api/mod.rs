//! Webhook HTTP API
//!
//! This module provides the HTTP endpoint that receives alert webhooks.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;

use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{Error, Result};
use crate::publisher::AlertPublisher;

/// HTTP webhook server
pub struct HttpServer {
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(publisher: AlertPublisher, surface_storage_errors: bool) -> Self {
        Self {
            state: AppState {
                publisher,
                surface_storage_errors,
            },
        }
    }

    /// Start the HTTP server and run until Ctrl+C
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = create_router(self.state).layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(addr).await?;

        info!("HTTP server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;

        info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Ctrl+C received, shutting down...");
    }
}
