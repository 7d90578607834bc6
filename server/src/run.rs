//! QRIS dynamic payload HTTP server entrypoint.
//!
//! Wires the pure rewrite core behind the HTTP layer: loads configuration,
//! initializes tracing, builds the router with CORS and request tracing,
//! and serves until a shutdown signal arrives.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/generate` | Rewrite a static payload and render the QR image |
//! | `GET` | `/health` | Health check endpoint |

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method};
use dotenvy::dotenv;
use tower_http::cors;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use qris_service::util::ShutdownSignal;
use qris_service::{HttpQrImageEncoder, QrisService, handlers};

use crate::config::Config;

fn build_cors_layer() -> Result<cors::CorsLayer, io::Error> {
    let raw = std::env::var("QRIS_CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string());

    let base = cors::CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(cors::Any);

    if raw.trim() == "*" {
        return Ok(base.allow_origin(cors::Any));
    }

    let origins: Vec<HeaderValue> = raw
        .split(",")
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(HeaderValue::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid QRIS_CORS_ALLOWED_ORIGINS: {e}"),
            )
        })?;

    if origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "QRIS_CORS_ALLOWED_ORIGINS is empty",
        ));
    }

    Ok(base.allow_origin(origins))
}

/// Initializes and runs the server.
///
/// - Loads `.env` variables.
/// - Initializes tracing from `RUST_LOG` (default `info`).
/// - Builds the generate service around the configured image encoder.
/// - Binds to `HOST:PORT` and serves with graceful shutdown.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let encoder = HttpQrImageEncoder::new(
        config.encoder_url().clone(),
        config.qr_width(),
        config.encoder_timeout(),
    );
    let service = QrisService::new(Arc::new(encoder));
    let axum_state = Arc::new(service);

    let http_endpoints = Router::new()
        .merge(handlers::routes().with_state(axum_state))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer()?);

    let addr = SocketAddr::new(config.host(), config.port());
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .inspect_err(|e| tracing::error!("Failed to bind to {}: {}", addr, e))?;

    let sig_down = ShutdownSignal::try_new()?;
    let cancellation_token = sig_down.cancellation_token();
    let graceful_shutdown = async move { cancellation_token.cancelled().await };
    axum::serve(listener, http_endpoints)
        .with_graceful_shutdown(graceful_shutdown)
        .await?;

    Ok(())
}
