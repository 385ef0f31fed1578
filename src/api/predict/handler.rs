// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction endpoint handler

use axum::body::Bytes;
use axum::http::StatusCode;
use axum::{extract::State, Json};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use tracing::{debug, info, warn};

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::classifier::{build_prediction, ModelService, PredictionResult};
use crate::vision::preprocess_image_bytes;

/// Multipart field carrying the uploaded photo
pub const IMAGE_FIELD: &str = "image";

/// A file part pulled out of the multipart body
#[derive(Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// POST /predict - Classify an uploaded leaf photo
///
/// # Request
/// - multipart form with a file field `image`
///
/// # Response
/// - `disease`, `confidence` (0-100), `severity`, `description`,
///   `treatment`, `color`, `predicted_class`, `class_index`
///
/// # Errors
/// - 500 `Model not loaded`: the model artifact could not be loaded at startup
/// - 400 `No image file provided`: no `image` file part
/// - 400 `No image file selected`: the `image` part has an empty file name
/// - 400 `Error processing image`: the upload could not be decoded
/// - 500 `Invalid prediction result`: model output does not match the labels
/// - 500 `Internal server error`: anything else
pub async fn predict_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    // 1. The model must be available before anything else is looked at
    if !state.model_service.is_loaded() {
        return Err(ApiError::ModelNotLoaded);
    }

    // 2. Pull the image part out of the form
    let upload = read_image_upload(multipart).await?;
    info!(
        "Processing image: {} ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );

    // 3. Preprocess and classify off the async runtime
    let service = state.model_service.clone();
    let result = tokio::task::spawn_blocking(move || predict_image_bytes(&service, &upload.bytes))
        .await
        .map_err(|e| ApiError::InternalError(format!("Prediction task failed: {}", e)))??;

    info!(
        "Predicted {} ({:.2}%, severity {})",
        result.predicted_class, result.confidence, result.severity
    );

    Ok(Json(result))
}

/// Find the `image` file part in a multipart body
///
/// Form fields without a file name are ignored, so a text field named
/// `image` counts as no file at all.
pub async fn read_image_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ImageUpload, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        warn!("Rejected multipart body: {}", e);
        ApiError::NoImageProvided
    })?;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(ApiError::NoImageProvided),
            Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                warn!("Upload exceeds body limit: {}", e);
                return Err(ApiError::ImageProcessing(format!("Upload too large: {}", e)));
            }
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                return Err(ApiError::NoImageProvided);
            }
        };

        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_owned) else {
            debug!("Ignoring '{}' field without a file name", IMAGE_FIELD);
            continue;
        };

        if file_name.is_empty() {
            return Err(ApiError::NoImageSelected);
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::ImageProcessing(format!("Failed to read upload: {}", e)))?;

        return Ok(ImageUpload { file_name, bytes });
    }
}

/// Preprocess, classify and enrich one uploaded image
///
/// Blocking: runs the decoder and a full forward pass.
pub fn predict_image_bytes(
    service: &ModelService,
    bytes: &[u8],
) -> Result<PredictionResult, ApiError> {
    let tensor = preprocess_image_bytes(bytes)?;

    let scores = service.classify(&tensor)?;
    debug!("Raw predictions: {:?}", scores);

    Ok(build_prediction(&scores)?)
}
