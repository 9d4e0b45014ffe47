mod api;
mod auth;
mod config;
mod errors;
mod logging;
mod models;
mod openapi;
mod state;
#[cfg(test)]
mod test_utils;
mod upstream;

use crate::config::{LoggingConfig, Settings};
use crate::state::AppState;
use axum::Router;
use log::{error, info, warn};
use std::net::SocketAddr;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[tokio::main]
async fn main() {
    // Initialize logging before anything else can fail
    let (logging_config, logging_error) = match LoggingConfig::from_env() {
        Ok(config) => (config, None),
        Err(e) => (LoggingConfig::default(), Some(e)),
    };
    logging::init(&logging_config);
    if let Some(e) = logging_error {
        warn!("Invalid logging configuration, using defaults: {}", e);
    }

    // Load configuration
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!("University Proxy API starting up...");

    // Initialize application state
    let state = match AppState::new(settings.clone()) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            std::process::exit(1);
        }
    };

    let app = create_app(state).await;

    // Start server
    let listener = match tokio::net::TcpListener::bind((settings.host.as_str(), settings.port)).await
    {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}:{}: {}", settings.host, settings.port, e);
            std::process::exit(1);
        }
    };

    match listener.local_addr() {
        Ok(addr) => info!("Server running on {}, press Ctrl+C to stop", addr),
        Err(_) => info!("Server running, press Ctrl+C to stop"),
    }

    // Peer addresses feed the client IP reported to the university service
    let serve = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;
    if let Err(e) = serve {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("University Proxy API shutting down...");
}

/// Create a new application instance with a given state
pub async fn create_app(state: AppState) -> Router {
    // Create OpenAPI documentation
    let (openapi_router, api_doc) =
        OpenApiRouter::with_openapi(openapi::ApiDoc::openapi()).split_for_parts();

    // Create base router with routes
    Router::new()
        .merge(api::router())
        .merge(openapi::router())
        .merge(openapi_router)
        .merge(Scalar::with_url("/scalar", api_doc))
        .with_state(state)
}

// Simple signal handler that works on all platforms
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::TestFixture;
    use http::StatusCode;

    #[tokio::test]
    async fn test_scalar_served() {
        let fixture = TestFixture::new().await;
        let response = fixture.get("/scalar").await;
        response.assert_ok();
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let fixture = TestFixture::new().await;
        let response = fixture.get("/student/someone-else/info").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }
}
