// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image handling for leaf photos
//!
//! This module provides:
//! - Decoding of uploaded bytes in any common container format
//! - Preprocessing into the classifier's NHWC input tensor

pub mod image_utils;
pub mod preprocessing;

pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo, MAX_IMAGE_SIZE};
pub use preprocessing::{
    preprocess_for_classification, preprocess_image_bytes, MODEL_INPUT_SHAPE, MODEL_INPUT_SIZE,
};
