// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image preprocessing for the leaf classifier
//!
//! The model was trained on raw pixel magnitudes, so the tensor stays in
//! the [0, 255] range. Scaling to [0, 1] or applying mean/std
//! normalization breaks every prediction.

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

use super::image_utils::{decode_image_bytes, ImageError};

/// Side length of the square classifier input
pub const MODEL_INPUT_SIZE: u32 = 256;

/// Number of color channels fed to the classifier (RGB)
pub const MODEL_INPUT_CHANNELS: usize = 3;

/// Shape of the classifier input tensor (NHWC)
pub const MODEL_INPUT_SHAPE: [usize; 4] = [
    1,
    MODEL_INPUT_SIZE as usize,
    MODEL_INPUT_SIZE as usize,
    MODEL_INPUT_CHANNELS,
];

/// Decode uploaded bytes and build the classifier input tensor
pub fn preprocess_image_bytes(bytes: &[u8]) -> Result<Array4<f32>, ImageError> {
    let (image, info) = decode_image_bytes(bytes)?;
    tracing::debug!(
        "Original image size: {}x{}, color: {:?}, format: {:?}",
        info.width,
        info.height,
        info.color,
        info.format
    );

    let tensor = preprocess_for_classification(&image);

    let (min_val, max_val) = tensor
        .iter()
        .fold((f32::MAX, f32::MIN), |(min, max), &v| (min.min(v), max.max(v)));
    tracing::debug!(
        "Preprocessed image shape: {:?}, value range: [{:.1}, {:.1}]",
        tensor.shape(),
        min_val,
        max_val
    );

    Ok(tensor)
}

/// Preprocess a decoded image for classification
///
/// Steps:
/// 1. Convert to RGB (palette, grayscale and alpha images are converted,
///    alpha is dropped)
/// 2. Resize to exactly 256x256 with Lanczos3 (aspect ratio is not kept)
/// 3. Copy pixels into an NHWC tensor [1, 256, 256, 3] without rescaling
pub fn preprocess_for_classification(image: &DynamicImage) -> Array4<f32> {
    let rgb = image.to_rgb8();
    let resized = image::imageops::resize(
        &rgb,
        MODEL_INPUT_SIZE,
        MODEL_INPUT_SIZE,
        FilterType::Lanczos3,
    );

    let size = MODEL_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros(MODEL_INPUT_SHAPE);

    for y in 0..size {
        for x in 0..size {
            let pixel = resized.get_pixel(x as u32, y as u32);
            for c in 0..MODEL_INPUT_CHANNELS {
                tensor[[0, y, x, c]] = pixel[c] as f32;
            }
        }
    }

    tensor
}
