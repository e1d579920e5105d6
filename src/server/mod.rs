pub mod error;
pub mod handler;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::core::config::AppConfig;
use crate::providers::AwesomeApiProvider;
use crate::store::open_store;
use error::HandlerError;
use handler::QuoteRequestHandler;

async fn get_quote(
    State(handler): State<Arc<QuoteRequestHandler>>,
) -> Result<impl IntoResponse, HandlerError> {
    match handler.handle().await {
        Ok(body) => Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )),
        Err(e) => {
            if e.is_deadline_exceeded() {
                warn!(error = %e, "Quote request timed out");
            } else {
                error!(error = %e, "Quote request failed");
            }
            Err(HandlerError::from(e))
        }
    }
}

pub fn router(handler: Arc<QuoteRequestHandler>) -> Router {
    Router::new()
        .route("/cotacao", get(get_quote))
        .route("/health", get(|| async { "OK" }))
        .with_state(handler)
}

/// Wires provider and store from config into a request handler.
pub fn build_handler(config: &AppConfig) -> Result<QuoteRequestHandler> {
    let provider = AwesomeApiProvider::new(&config.provider.base_url, &config.provider.pair)
        .context("Failed to create quote provider")?;
    let store = open_store(config)?;
    Ok(QuoteRequestHandler::new(
        Arc::new(provider),
        store,
        config.server.fetch_timeout(),
        config.server.store_timeout(),
    ))
}

pub async fn serve(config: &AppConfig) -> Result<()> {
    let handler = Arc::new(build_handler(config)?);
    let app = router(handler);

    let listener = TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_addr))?;
    info!(
        addr = %config.server.listen_addr,
        fetch_timeout = ?config.server.fetch_timeout(),
        store_timeout = ?config.server.store_timeout(),
        "Serving quotes"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated unexpectedly")?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
