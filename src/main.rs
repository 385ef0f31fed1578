// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use clap::Parser;
use plant_disease_api::{
    api::{start_server, AppState},
    classifier::ModelService,
    config::ServerConfig,
    version,
};
use std::{env, sync::Arc};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServerConfig::parse();
    let addr = config.listen_addr()?;

    info!("Starting {}...", version::get_version_string());

    // A missing or corrupt model is not fatal: /health keeps answering and
    // /predict reports "Model not loaded"
    let model_service = ModelService::load(&config.model_path);
    match model_service.model_path() {
        Some(path) => info!("Serving predictions with model {}", path.display()),
        None => info!(
            "Continuing without a model; expected at {}",
            config.model_path.display()
        ),
    }

    let state = AppState::new(Arc::new(model_service));
    start_server(state, addr).await
}
