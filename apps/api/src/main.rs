mod chat;
mod config;
mod errors;
mod interview;
mod llm_client;
mod normalizer;
mod resume;
mod routes;
mod state;
mod uploads;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::uploads::{UploadJanitor, UploadStore};

const JANITOR_STOP_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting career guidance API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone())
        .context("Failed to build the Gemini HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Prepare the upload directory and its janitor
    let uploads = UploadStore::new(&config.upload_dir);
    uploads
        .ensure_dir()
        .await
        .with_context(|| format!("Failed to create {}", config.upload_dir.display()))?;

    let janitor_cancel = CancellationToken::new();
    let janitor_handle = UploadJanitor::new(
        uploads.dir(),
        config.upload_max_age,
        config.sweep_interval,
    )
    .spawn(janitor_cancel.clone());

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        uploads,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(build_cors_layer(&config)?),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the janitor once in-flight requests have drained.
    janitor_cancel.cancel();
    if tokio::time::timeout(JANITOR_STOP_TIMEOUT, janitor_handle)
        .await
        .is_err()
    {
        warn!("Upload janitor did not stop within {JANITOR_STOP_TIMEOUT:?}");
    }

    info!("Graceful shutdown complete");
    Ok(())
}

/// Permissive CORS unless `CLIENT_URL` names a single allowed origin.
fn build_cors_layer(config: &Config) -> Result<CorsLayer> {
    let Some(client_url) = &config.client_url else {
        return Ok(CorsLayer::permissive());
    };

    let origin: HeaderValue = client_url
        .parse()
        .with_context(|| format!("CLIENT_URL '{client_url}' is not a valid origin"))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true))
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM to start graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("SIGINT received, shutting down gracefully..."),
        () = terminate => info!("SIGTERM received, shutting down gracefully..."),
    }
}
