//! HTTP server for the chat UI

pub mod chat;
pub mod health;

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::gateway::InferenceGateway;

/// Shared state for API handlers
#[derive(Debug, Clone)]
pub struct ApiState {
    pub gateway: InferenceGateway,
}

/// Configuration for building an API server
pub struct ApiServerBuilder {
    gateway: InferenceGateway,
    addr: String,
    static_dir: Option<PathBuf>,
}

impl ApiServerBuilder {
    /// Create a new API server builder
    #[must_use]
    pub fn new(gateway: InferenceGateway, addr: impl Into<String>) -> Self {
        Self {
            gateway,
            addr: addr.into(),
            static_dir: None,
        }
    }

    /// Set the static files directory served under `/static`
    #[must_use]
    pub fn static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    /// Build the API server
    #[must_use]
    pub fn build(self) -> ApiServer {
        ApiServer {
            state: Arc::new(ApiState {
                gateway: self.gateway,
            }),
            addr: self.addr,
            static_dir: self.static_dir,
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    addr: String,
    static_dir: Option<PathBuf>,
}

impl ApiServer {
    /// Build the router with all routes
    #[must_use]
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .merge(chat::router(self.state.clone()))
            .merge(health::router())
            .merge(health::ready_router(self.state.clone()));

        if let Some(static_dir) = &self.static_dir {
            router = router.nest_service("/static", ServeDir::new(static_dir));
            tracing::info!(path = %static_dir.display(), "serving static files");
        }

        router.layer(TraceLayer::new_for_http())
    }

    /// Run the API server until Ctrl-C
    ///
    /// # Errors
    ///
    /// Returns error if server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|e| crate::Error::Server(format!("failed to bind {}: {e}", self.addr)))?;

        tracing::info!(url = %format!("http://{}", self.addr), "chat server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| crate::Error::Server(format!("chat server error: {e}")))?;

        tracing::info!("chat server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
