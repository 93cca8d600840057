//! Ruleforge API Server implementation
//!
//! HTTP REST API server using Axum. Wires the rule service (cache +
//! template provider + compiler) into the request handlers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::compiler::CommandCompiler;
use crate::git::GitClient;
use crate::service::RuleService;

use super::handlers;

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Command line for the external decision-table compiler.
    pub compiler: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            compiler: "drools-compile".to_string(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub version: String,
    pub service: RuleService,
}

/// Build the router over an already-constructed state. Split out so tests
/// can drive the routes with injected collaborators.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Rule CRUD
        .route(
            "/api/v1/rules",
            get(handlers::list_rules).post(handlers::create_rule),
        )
        .route(
            "/api/v1/rules/:id",
            get(handlers::get_rule)
                .put(handlers::update_rule)
                .delete(handlers::delete_rule),
        )
        // Repository round-trip
        .route("/api/v1/rules/fetch", post(handlers::fetch_rules))
        .route("/api/v1/rules/validate", post(handlers::validate_rules))
        .route("/api/v1/rules/publish", post(handlers::publish_rules))
        .route(
            "/api/v1/rules/pull-request",
            post(handlers::create_pull_request),
        )
        // State and middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ruleforge_server=info,tower_http=info".into()),
        )
        .init();

    let compiler = CommandCompiler::new(&config.compiler)?;
    let state = Arc::new(AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: RuleService::new(Arc::new(GitClient), Arc::new(compiler)),
    });

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Ruleforge API Server starting on http://{}", addr);
    info!("   Rules: /api/v1/rules, fetch/validate/publish under /api/v1/rules/");
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Ruleforge API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== ApiConfig Tests ====================

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.compiler, "drools-compile");
    }

    #[test]
    fn test_config_custom_values() {
        let config = ApiConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            compiler: "dtc --strict".to_string(),
        };
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.compiler, "dtc --strict");
    }

    #[test]
    fn test_config_address_format() {
        let config = ApiConfig {
            host: "192.168.1.100".to_string(),
            port: 9090,
            compiler: "drools-compile".to_string(),
        };
        let addr_str = format!("{}:{}", config.host, config.port);
        let addr: SocketAddr = addr_str.parse().unwrap();
        assert_eq!(addr.port(), 9090);
    }
}
