// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Prediction API endpoint module
//!
//! Provides POST /predict for classifying uploaded leaf photos.

pub mod handler;

pub use handler::{predict_handler, predict_image_bytes, read_image_upload, ImageUpload, IMAGE_FIELD};
