// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::errors::ApiError;
use super::handlers::{classes_handler, health_handler, home_handler};
use super::predict::predict_handler;
use crate::classifier::ModelService;
use crate::vision::MAX_IMAGE_SIZE;

/// Request body limit: one maximum-size image plus multipart framing
pub const MAX_BODY_BYTES: usize = MAX_IMAGE_SIZE + 1024 * 1024;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub model_service: Arc<ModelService>,
}

impl AppState {
    pub fn new(model_service: Arc<ModelService>) -> Self {
        Self { model_service }
    }
}

/// Build the router with all routes and layers
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route("/classes", get(classes_handler))
        .route("/predict", post(predict_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl+C
pub async fn start_server(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    ApiError::InternalError(format!("Handler panicked: {}", detail)).into_response()
}
