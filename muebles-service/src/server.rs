//! HTTP server with graceful shutdown

use std::any::Any;

use axum::{
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

use crate::{
    config::Config,
    error::{Error, Result},
    middleware::{request_id_layer, request_id_propagation_layer, sensitive_headers_layer},
};

/// HTTP server
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a server for `config`
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Wrap `app` in the service middleware stack
    pub fn layered(&self, app: Router) -> Router {
        app.layer(self.build_cors_layer())
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::with_status_code(
                http::StatusCode::REQUEST_TIMEOUT,
                self.config.service.timeout(),
            ))
            .layer(RequestBodyLimitLayer::new(
                self.config.middleware.body_limit_bytes(),
            ))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_response(DefaultOnResponse::new().include_headers(true)),
            )
            .layer(sensitive_headers_layer())
            .layer(request_id_propagation_layer())
            .layer(request_id_layer())
            .layer(CatchPanicLayer::custom(panic_response))
    }

    /// Bind the configured address and serve `app` until SIGINT/SIGTERM
    pub async fn serve(self, app: Router) -> Result<()> {
        let addr = self.config.listen_addr()?;

        tracing::info!("Starting {} on {}", self.config.service.name, addr);

        self.log_middleware_config();

        let app = self.layered(app);
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on http://{}/api/v1/muebles", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    fn log_middleware_config(&self) {
        tracing::info!("Middleware configuration:");
        tracing::info!("  - Panic recovery: enabled");
        tracing::info!("  - Request ID tracking: enabled");
        tracing::info!("  - Sensitive header masking: enabled");
        tracing::info!(
            "  - Request body limit: {} MB",
            self.config.middleware.body_limit_mb
        );
        tracing::info!("  - Compression: enabled");
        tracing::info!("  - CORS mode: {}", self.config.middleware.cors_mode);
        tracing::info!(
            "  - Request timeout: {} seconds",
            self.config.service.timeout_secs
        );
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn build_cors_layer(&self) -> CorsLayer {
        match self.config.middleware.cors_mode.as_str() {
            "permissive" => {
                tracing::debug!("Enabling permissive CORS");
                CorsLayer::permissive()
            }
            "restrictive" | "disabled" => {
                tracing::debug!("Cross-origin requests denied");
                CorsLayer::new()
            }
            _ => {
                tracing::warn!(
                    "Unknown CORS mode: {}, defaulting to permissive",
                    self.config.middleware.cors_mode
                );
                CorsLayer::permissive()
            }
        }
    }
}

// Panics surface like any other server failure
fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    Error::Internal("handler panicked".to_string()).into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl+C), starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    tracing::info!("Shutdown signal received, draining requests...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let config = Config::default();
        let server = Server::new(config.clone());
        assert_eq!(server.config().service.port, config.service.port);
    }
}
