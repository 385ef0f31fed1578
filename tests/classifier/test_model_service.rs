// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ModelService tests with stub engines
//!
//! Covers startup without an artifact, input validation and the
//! preprocess -> classify -> build_prediction pipeline from outside the crate.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::Array4;
use plant_disease_api::classifier::{
    build_prediction, ClassificationEngine, ClassifyError, ModelService, PredictionError,
    CLASS_NAMES,
};
use plant_disease_api::vision::{preprocess_image_bytes, MODEL_INPUT_SHAPE};
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Engine favouring the healthy class and counting its calls
#[derive(Default)]
struct CountingEngine {
    calls: AtomicUsize,
}

impl ClassificationEngine for CountingEngine {
    fn run(&self, _input: &Array4<f32>) -> anyhow::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0.12, 0.88])
    }
}

/// Engine guarding its runtime with a mutex, the way `OnnxClassifier`
/// guards its session, and recording any overlapping forward passes
#[derive(Default)]
struct SerializedEngine {
    runtime: Mutex<()>,
    in_flight: AtomicBool,
    overlaps: AtomicUsize,
    calls: AtomicUsize,
}

impl ClassificationEngine for SerializedEngine {
    fn run(&self, _input: &Array4<f32>) -> anyhow::Result<Vec<f32>> {
        let _session = self
            .runtime
            .lock()
            .map_err(|_| anyhow::anyhow!("runtime lock poisoned"))?;

        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        std::thread::sleep(Duration::from_millis(5));
        self.in_flight.store(false, Ordering::SeqCst);

        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0.7, 0.3])
    }
}

fn leaf_png() -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 150, Rgb([50, 160, 70])));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_missing_artifact_starts_unloaded() {
    let dir = tempfile::tempdir().unwrap();
    let service = ModelService::load(dir.path().join("pepper_disease_model_quantized.onnx"));

    assert!(!service.is_loaded());
    assert!(service.model_path().is_none());

    let input = Array4::zeros(MODEL_INPUT_SHAPE);
    assert!(matches!(
        service.classify(&input),
        Err(ClassifyError::ModelNotLoaded)
    ));
}

#[test]
fn test_wrong_input_shape_rejected() {
    let service = ModelService::with_engine(Arc::new(CountingEngine::default()));
    let input = Array4::zeros([1, 224, 224, 3]);

    assert!(matches!(
        service.classify(&input),
        Err(ClassifyError::InvalidInput(_, _))
    ));
}

#[test]
fn test_pipeline_from_upload_bytes() {
    let engine = Arc::new(CountingEngine::default());
    let service = ModelService::with_engine(engine.clone());

    let tensor = preprocess_image_bytes(&leaf_png()).unwrap();
    let scores = service.classify(&tensor).unwrap();
    let prediction = build_prediction(&scores).unwrap();

    assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    assert_eq!(prediction.predicted_class, CLASS_NAMES[1]);
    assert_eq!(prediction.confidence, 88.0);
}

#[test]
fn test_shared_service_answers_every_thread() {
    let engine = Arc::new(CountingEngine::default());
    let service = Arc::new(ModelService::with_engine(engine.clone()));
    let tensor = Arc::new(preprocess_image_bytes(&leaf_png()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            let tensor = tensor.clone();
            std::thread::spawn(move || service.classify(&tensor).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec![0.12, 0.88]);
    }
    assert_eq!(engine.calls.load(Ordering::SeqCst), 8);
}

#[test]
fn test_forward_passes_never_overlap() {
    let engine = Arc::new(SerializedEngine::default());
    let service = Arc::new(ModelService::with_engine(engine.clone()));
    let tensor = Arc::new(preprocess_image_bytes(&leaf_png()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            let tensor = tensor.clone();
            std::thread::spawn(move || service.classify(&tensor).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec![0.7, 0.3]);
    }
    assert_eq!(engine.calls.load(Ordering::SeqCst), 8);
    assert_eq!(engine.overlaps.load(Ordering::SeqCst), 0);
}

#[test]
fn test_score_count_mismatch_is_not_a_prediction() {
    assert_eq!(
        build_prediction(&[0.2, 0.3, 0.5]).unwrap_err(),
        PredictionError::IndexOutOfRange {
            index: 2,
            classes: 2
        }
    );
    assert_eq!(build_prediction(&[]).unwrap_err(), PredictionError::EmptyScores);
}
