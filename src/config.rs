// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration from command line and environment

use anyhow::{Context, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::classifier::DEFAULT_MODEL_PATH;

/// Plant Disease Detection API server
#[derive(Parser, Debug, Clone)]
#[command(name = "plant-disease-api")]
#[command(version)]
#[command(about = "Serves a pepper leaf disease classifier over HTTP", long_about = None)]
pub struct ServerConfig {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Path to the ONNX classification model
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,
}

impl ServerConfig {
    /// Socket address built from `host` and `port`
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .with_context(|| format!("Invalid HOST address '{}'", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
