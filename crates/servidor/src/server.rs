//! Server instance management

use axum::{extract::DefaultBodyLimit, Router};
use std::net::SocketAddr;
use tokio::signal;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::handlers::{create_router, AppState};

/// Consulta HTTP server
///
/// Owns the loaded catalogs and the session store; runs the idle-session
/// reaper for as long as it serves.
pub struct ConsultaServer {
    /// Server configuration
    config: ServerConfig,

    /// Shared handler state
    state: AppState,
}

impl ConsultaServer {
    /// Validate `config`, load catalogs and set up the chat backend
    pub fn new(config: ServerConfig) -> Result<Self, ApiError> {
        if let Err(e) = config.validate() {
            return Err(ApiError::internal(format!("Invalid config: {}", e)));
        }

        let state = AppState::from_config(config.clone()).map_err(|e| {
            error!("Failed to initialize server state: {}", e);
            e
        })?;

        Ok(Self { config, state })
    }

    /// Get socket address for binding
    pub fn socket_addr(&self) -> Result<SocketAddr, ApiError> {
        self.config
            .socket_addr()
            .map_err(|e| ApiError::internal(format!("Failed to parse address: {}", e)))
    }

    /// Handler state shared with the router
    #[must_use]
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Get server URL
    #[must_use]
    pub fn server_url(&self) -> String {
        self.config.server_url()
    }

    /// Serve until Ctrl+C or SIGTERM
    pub async fn start(self) -> Result<(), ApiError> {
        let addr = self.socket_addr()?;
        let app = build_app(self.state.clone());

        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind to {}: {:?}", addr, e);
            ApiError::internal(format!("Failed to bind to {}: {}", addr, e))
        })?;

        let reaper = sessao::spawn_reaper(self.state.sessions.clone(), self.config.reaper_config());

        info!("Server listening on: {}", self.server_url());

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_shutdown())
            .await
            .map_err(|e| ApiError::internal(format!("Server error: {}", e)));

        reaper.abort();
        info!(
            "Server stopped; {} discussions discarded",
            self.state.sessions.len().await
        );
        served
    }
}

/// Router with middleware and state applied.
///
/// Unmatched paths fall through to the static directory when one is
/// configured and exists.
pub fn build_app(state: AppState) -> Router {
    let mut router = create_router();

    match state.config.static_dir.as_deref() {
        Some(dir) if dir.is_dir() => {
            info!("Serving static files from {:?}", dir);
            router = router.fallback_service(ServeDir::new(dir));
        }
        Some(dir) => warn!("Static directory {:?} not found; static files disabled", dir),
        None => {}
    }

    router
        .layer(DefaultBodyLimit::max(state.config.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Wait for shutdown signal
///
/// Resolves on Ctrl+C, or SIGTERM on unix
pub async fn wait_for_shutdown() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix;
        match unix::signal(unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received TERM signal");
            }
            Err(e) => {
                error!("Failed to install TERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
