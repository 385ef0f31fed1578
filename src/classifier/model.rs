// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Model service owning the leaf classifier
//!
//! The service is built once at startup. A missing or unreadable model
//! artifact leaves it unloaded for the lifetime of the process; requests
//! then fail with [`ClassifyError::ModelNotLoaded`] instead of crashing.

use anyhow::{anyhow, Context, Result};
use ndarray::Array4;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::labels::class_count;
use crate::vision::MODEL_INPUT_SHAPE;

/// Model artifact location, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "pepper_disease_model_quantized.onnx";

/// Errors returned by [`ModelService::classify`]
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("Invalid input shape: {0:?}, expected {1:?}")]
    InvalidInput(Vec<usize>, [usize; 4]),

    #[error("Inference failed: {0:#}")]
    Inference(#[from] anyhow::Error),
}

/// A forward pass over one preprocessed image
///
/// Implementations must serialize concurrent calls themselves when the
/// underlying runtime is not safe for concurrent inference.
#[cfg_attr(test, mockall::automock)]
pub trait ClassificationEngine: Send + Sync {
    /// Run the model on an NHWC tensor and return the raw class scores
    fn run(&self, input: &Array4<f32>) -> Result<Vec<f32>>;
}

/// ONNX Runtime classifier running on CPU
pub struct OnnxClassifier {
    /// Session guarded so only one forward pass runs at a time
    session: Arc<Mutex<Session>>,
    input_name: String,
    output_name: String,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    /// Load the classifier from an ONNX file
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - ONNX Runtime initialization fails
    /// - The file is not a valid model
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("Model file not found at {}", model_path.display());
        }

        info!("Loading classification model from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load classification model from {}",
                model_path.display()
            ))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| anyhow!("Model declares no inputs"))?;

        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| anyhow!("Model declares no outputs"))?;

        debug!(
            "Classifier loaded - input: {}, output: {}",
            input_name, output_name
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
        })
    }
}

impl ClassificationEngine for OnnxClassifier {
    fn run(&self, input: &Array4<f32>) -> Result<Vec<f32>> {
        let input_value =
            Value::from_array(input.to_owned()).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("Classifier session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Classification inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        debug!("Raw predictions shape: {:?}", output_tensor.shape());

        Ok(output_tensor.iter().copied().collect())
    }
}

/// Owns the (possibly absent) classification engine
pub struct ModelService {
    engine: Option<Arc<dyn ClassificationEngine>>,
    model_path: Option<PathBuf>,
}

impl std::fmt::Debug for ModelService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelService")
            .field("loaded", &self.is_loaded())
            .field("model_path", &self.model_path)
            .finish()
    }
}

impl ModelService {
    /// Load the ONNX model at `model_path`
    ///
    /// Never fails: load errors are logged and leave the service unloaded.
    pub fn load<P: AsRef<Path>>(model_path: P) -> Self {
        let model_path = model_path.as_ref();

        match OnnxClassifier::new(model_path) {
            Ok(classifier) => {
                info!(
                    "✅ Classification model loaded successfully from {}",
                    model_path.display()
                );
                Self {
                    engine: Some(Arc::new(classifier)),
                    model_path: Some(model_path.to_path_buf()),
                }
            }
            Err(e) => {
                warn!("⚠️ Error loading model: {:#}", e);
                warn!("   /predict will answer 'Model not loaded' until restart");
                Self::unloaded()
            }
        }
    }

    /// Wrap an already constructed engine
    pub fn with_engine(engine: Arc<dyn ClassificationEngine>) -> Self {
        Self {
            engine: Some(engine),
            model_path: None,
        }
    }

    /// A service with no model; every classification fails
    pub fn unloaded() -> Self {
        Self {
            engine: None,
            model_path: None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.engine.is_some()
    }

    /// Path the model was loaded from, if it came from disk
    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    /// Run one forward pass and return the raw class scores
    ///
    /// The input must have shape [1, 256, 256, 3] with values in [0, 255].
    /// Selecting the winning class is left to the caller.
    pub fn classify(&self, input: &Array4<f32>) -> Result<Vec<f32>, ClassifyError> {
        let engine = self.engine.as_ref().ok_or(ClassifyError::ModelNotLoaded)?;

        if input.shape() != &MODEL_INPUT_SHAPE[..] {
            return Err(ClassifyError::InvalidInput(
                input.shape().to_vec(),
                MODEL_INPUT_SHAPE,
            ));
        }

        let scores = engine.run(input)?;

        if scores.len() != class_count() {
            warn!(
                "Model produced {} scores but {} class labels are configured",
                scores.len(),
                class_count()
            );
        }

        Ok(scores)
    }
}
