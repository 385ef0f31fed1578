// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod classifier;
pub mod config;
pub mod version;
pub mod vision;

// Re-export main types
pub use api::{create_app, start_server, ApiError, AppState};
pub use classifier::{
    ClassificationEngine, ClassifyError, DiseaseInfo, ModelService, PredictionResult, Severity,
    CLASS_NAMES,
};
pub use config::ServerConfig;
pub use vision::{preprocess_image_bytes, ImageError};
