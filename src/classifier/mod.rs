// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Pepper leaf disease classification
//!
//! Components:
//! - `labels` - Class labels in model output order
//! - `disease_info` - Static metadata for each class
//! - `model` - Model service wrapping the ONNX classifier
//! - `prediction` - Arg-max, confidence and response assembly

pub mod disease_info;
pub mod labels;
pub mod model;
pub mod prediction;

pub use disease_info::{disease_info, disease_table, DiseaseInfo, Severity};
pub use labels::{class_count, label_for_index, CLASS_NAMES};
pub use model::{
    ClassificationEngine, ClassifyError, ModelService, OnnxClassifier, DEFAULT_MODEL_PATH,
};
pub use prediction::{
    argmax, build_prediction, confidence_percent, PredictionError, PredictionResult,
};
