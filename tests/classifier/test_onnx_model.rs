// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tests against the real quantized pepper model
//!
//! Ignored by default. Run with the artifact in place:
//! `MODEL_PATH=/path/to/pepper_disease_model_quantized.onnx cargo test -- --ignored`

use image::{DynamicImage, Rgb, RgbImage};
use plant_disease_api::classifier::{
    build_prediction, ModelService, OnnxClassifier, CLASS_NAMES, DEFAULT_MODEL_PATH,
};
use plant_disease_api::vision::preprocess_for_classification;

fn model_path() -> String {
    std::env::var("MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

#[test]
#[ignore] // Requires the ONNX model artifact
fn test_model_loads() {
    let classifier = OnnxClassifier::new(model_path());
    assert!(classifier.is_ok(), "{:?}", classifier.err());
}

#[test]
#[ignore] // Requires the ONNX model artifact
fn test_real_model_prediction() {
    let service = ModelService::load(model_path());
    assert!(service.is_loaded());

    let leaf = DynamicImage::ImageRgb8(RgbImage::from_fn(300, 300, |x, y| {
        Rgb([30 + (x % 40) as u8, 140 + (y % 60) as u8, 50])
    }));
    let tensor = preprocess_for_classification(&leaf);

    let scores = service.classify(&tensor).unwrap();
    assert_eq!(scores.len(), CLASS_NAMES.len());

    let prediction = build_prediction(&scores).unwrap();
    assert!((0.0..=100.0).contains(&prediction.confidence));
    assert!(CLASS_NAMES.contains(&prediction.predicted_class.as_str()));

    // Same input, same answer
    let again = build_prediction(&service.classify(&tensor).unwrap()).unwrap();
    assert_eq!(prediction.predicted_class, again.predicted_class);
    assert_eq!(prediction.confidence, again.confidence);
}

#[test]
#[ignore] // Requires the ONNX model artifact and a healthy leaf photo
fn test_healthy_leaf_photo() {
    let photo = std::env::var("HEALTHY_LEAF_IMAGE")
        .unwrap_or_else(|_| "tests/fixtures/healthy_pepper_leaf.jpg".to_string());
    let bytes = std::fs::read(&photo).expect("healthy leaf photo not found");

    let service = ModelService::load(model_path());
    let tensor = plant_disease_api::vision::preprocess_image_bytes(&bytes).unwrap();
    let prediction = build_prediction(&service.classify(&tensor).unwrap()).unwrap();

    assert_eq!(prediction.predicted_class, "Pepper__bell___healthy");
    assert_eq!(prediction.severity.as_str(), "None");
    assert_eq!(prediction.color, "green");
}
