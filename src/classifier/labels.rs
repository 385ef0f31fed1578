// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Class labels in model output order

/// Trained categories, sorted alphabetically as in the training dataset.
///
/// Index `i` names the `i`-th entry of the model's score vector.
pub const CLASS_NAMES: &[&str] = &["Pepper__bell___Bacterial_spot", "Pepper__bell___healthy"];

/// Number of classes the model was trained on
pub fn class_count() -> usize {
    CLASS_NAMES.len()
}

/// Resolve a score-vector index to its label
pub fn label_for_index(index: usize) -> Option<&'static str> {
    CLASS_NAMES.get(index).copied()
}
