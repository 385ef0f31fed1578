// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Turning raw class scores into a user-facing prediction

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::disease_info::{disease_info, Severity};
use super::labels::{class_count, label_for_index};

#[derive(Debug, Error, PartialEq)]
pub enum PredictionError {
    #[error("Model returned an empty score vector")]
    EmptyScores,

    #[error("Predicted index {index} exceeds class list length {classes}")]
    IndexOutOfRange { index: usize, classes: usize },
}

/// Response body of a successful prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    /// Human readable disease name
    pub disease: String,
    /// Top score as a percentage, rounded to 2 decimals
    pub confidence: f64,
    pub severity: Severity,
    pub description: String,
    pub treatment: String,
    pub color: String,
    /// Raw class label
    pub predicted_class: String,
    pub class_index: usize,
}

/// Index of the highest score; the first one wins on ties
///
/// NaN scores never win.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((i, score)),
        }
    }
    best.map(|(i, _)| i)
}

/// Scale a probability to a percentage rounded to 2 decimals, within [0, 100]
pub fn confidence_percent(score: f32) -> f64 {
    let percent = (f64::from(score) * 100.0 * 100.0).round() / 100.0;
    percent.clamp(0.0, 100.0)
}

/// Indices of the `k` best scores, best first
pub fn top_k(scores: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, s)| !s.is_nan())
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(k);
    ranked
}

/// Resolve raw scores into a [`PredictionResult`] enriched with disease info
pub fn build_prediction(scores: &[f32]) -> Result<PredictionResult, PredictionError> {
    let index = argmax(scores).ok_or(PredictionError::EmptyScores)?;
    let label = label_for_index(index).ok_or(PredictionError::IndexOutOfRange {
        index,
        classes: class_count(),
    })?;

    let confidence = confidence_percent(scores[index]);
    tracing::debug!(
        "Predicted class index: {}, label: {}, confidence: {:.2}%",
        index,
        label,
        confidence
    );

    for (rank, (i, score)) in top_k(scores, 3).into_iter().enumerate() {
        tracing::debug!(
            "  {}. {}: {:.2}%",
            rank + 1,
            label_for_index(i).unwrap_or("<unlabelled>"),
            score * 100.0
        );
    }

    let info = disease_info(label);

    Ok(PredictionResult {
        disease: info.name.clone(),
        confidence,
        severity: info.severity,
        description: info.description.clone(),
        treatment: info.treatment.clone(),
        color: info.color.clone(),
        predicted_class: label.to_string(),
        class_index: index,
    })
}
