// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classifier::{ClassifyError, PredictionError};
use crate::vision::ImageError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    NoImageProvided,
    NoImageSelected,
    ImageProcessing(String),
    ModelNotLoaded,
    InvalidPrediction(String),
    InternalError(String),
}

impl ApiError {
    /// Message returned to the client; internal details are never included
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::NoImageProvided => "No image file provided",
            ApiError::NoImageSelected => "No image file selected",
            ApiError::ImageProcessing(_) => "Error processing image",
            ApiError::ModelNotLoaded => "Model not loaded",
            ApiError::InvalidPrediction(_) => "Invalid prediction result",
            ApiError::InternalError(_) => "Internal server error",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.public_message().to_string(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NoImageProvided
            | ApiError::NoImageSelected
            | ApiError::ImageProcessing(_) => 400,
            ApiError::ModelNotLoaded
            | ApiError::InvalidPrediction(_)
            | ApiError::InternalError(_) => 500,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ImageProcessing(detail)
            | ApiError::InvalidPrediction(detail)
            | ApiError::InternalError(detail) => {
                write!(f, "{}: {}", self.public_message(), detail)
            }
            _ => f.write_str(self.public_message()),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<ImageError> for ApiError {
    fn from(e: ImageError) -> Self {
        ApiError::ImageProcessing(e.to_string())
    }
}

impl From<ClassifyError> for ApiError {
    fn from(e: ClassifyError) -> Self {
        match e {
            ClassifyError::ModelNotLoaded => ApiError::ModelNotLoaded,
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

impl From<PredictionError> for ApiError {
    fn from(e: PredictionError) -> Self {
        ApiError::InvalidPrediction(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match &self {
            ApiError::InternalError(_) | ApiError::InvalidPrediction(_) => {
                tracing::error!("{}", self)
            }
            _ => tracing::warn!("{}", self),
        }

        (status, Json(self.to_response())).into_response()
    }
}
