// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::http_server::AppState;
use crate::classifier::CLASS_NAMES;
use crate::version;

/// Endpoint summaries advertised by `GET /`
pub const ENDPOINTS: &[&str] = &[
    "/health - Health check",
    "/predict - Disease prediction (POST with image)",
    "/classes - Get all disease classes",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfoResponse {
    pub message: String,
    pub version: String,
    pub model_loaded: bool,
    pub endpoints: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    /// UTC, formatted `YYYY-MM-DDTHH:MM:SS`
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassesResponse {
    pub classes: Vec<String>,
    pub count: usize,
}

/// GET / - API information
pub async fn home_handler(State(state): State<AppState>) -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        message: version::API_NAME.to_string(),
        version: version::VERSION_NUMBER.to_string(),
        model_loaded: state.model_service.is_loaded(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

/// GET /health - Liveness plus model availability
///
/// Always answers `healthy`; an unloaded model is reported through
/// `model_loaded` rather than a failing status.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.model_service.is_loaded(),
        timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
    })
}

/// GET /classes - Class labels in model output order
pub async fn classes_handler() -> Json<ClassesResponse> {
    Json(ClassesResponse {
        classes: CLASS_NAMES.iter().map(|c| c.to_string()).collect(),
        count: CLASS_NAMES.len(),
    })
}
