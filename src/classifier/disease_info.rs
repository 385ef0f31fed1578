// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Static disease information keyed by class label

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// How serious a detected condition is
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive record shown to the user for a predicted class
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiseaseInfo {
    /// Human readable name
    pub name: String,
    pub severity: Severity,
    pub description: String,
    pub treatment: String,
    /// Display color hint for clients (green, orange, gray, ...)
    pub color: String,
    pub symptoms: Vec<String>,
    pub causes: Vec<String>,
    pub prevention: Vec<String>,
}

impl DiseaseInfo {
    /// Record used for labels missing from the table
    ///
    /// The name is the label with underscores replaced by spaces.
    pub fn fallback(label: &str) -> Self {
        Self {
            name: label.replace('_', " "),
            severity: Severity::Unknown,
            description: "Disease information not available.".to_string(),
            treatment: "Consult with a plant pathologist for treatment recommendations."
                .to_string(),
            color: "gray".to_string(),
            symptoms: Vec::new(),
            causes: Vec::new(),
            prevention: Vec::new(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn build_table() -> HashMap<&'static str, DiseaseInfo> {
    let mut table = HashMap::new();

    table.insert(
        "Pepper__bell___Bacterial_spot",
        DiseaseInfo {
            name: "Pepper Bell Bacterial Spot".to_string(),
            severity: Severity::Medium,
            description: "A bacterial disease that affects bell peppers, caused by Xanthomonas species. Creates dark, water-soaked spots on leaves and fruits.".to_string(),
            treatment: "Apply copper-based bactericides, improve air circulation, avoid overhead watering, remove infected plant material, and practice crop rotation.".to_string(),
            color: "orange".to_string(),
            symptoms: strings(&[
                "Small, dark, water-soaked spots on leaves",
                "Spots may have yellow halos around them",
                "Leaf yellowing and premature drop",
                "Fruit spots that are raised and scabby",
                "Reduced fruit quality and yield",
            ]),
            causes: strings(&[
                "Bacterial infection (Xanthomonas campestris, X. vesicatoria, X. euvesicatoria, X. gardneri)",
                "Warm, humid weather conditions",
                "Poor air circulation",
                "Overhead watering",
                "Contaminated seeds or transplants",
            ]),
            prevention: strings(&[
                "Start with certified disease-free seeds",
                "Provide adequate plant spacing",
                "Ensure good drainage",
                "Avoid working with plants when wet",
                "Practice crop rotation",
                "Remove crop debris after harvest",
            ]),
        },
    );

    table.insert(
        "Pepper__bell___healthy",
        DiseaseInfo {
            name: "Healthy Bell Pepper".to_string(),
            severity: Severity::None,
            description: "Your bell pepper plant appears healthy with no signs of disease. Continue with proper care practices.".to_string(),
            treatment: "Continue regular care and monitoring for optimal plant health.".to_string(),
            color: "green".to_string(),
            symptoms: strings(&[
                "Vibrant green foliage",
                "No spots or discoloration on leaves",
                "Strong, upright growth",
                "Clear, unblemished fruit",
                "Good overall plant vigor",
            ]),
            causes: strings(&[
                "Proper growing conditions",
                "Good soil health and nutrition",
                "Adequate water management",
                "Disease prevention practices",
                "Healthy growing environment",
            ]),
            prevention: strings(&[
                "Maintain optimal growing conditions",
                "Regular monitoring for diseases",
                "Proper spacing and air circulation",
                "Balanced fertilization program",
                "Clean garden practices",
                "Timely harvest of mature fruit",
            ]),
        },
    );

    table
}

/// The immutable disease table, built on first access
pub fn disease_table() -> &'static HashMap<&'static str, DiseaseInfo> {
    static TABLE: OnceLock<HashMap<&'static str, DiseaseInfo>> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

/// Look up the record for a label, synthesizing a fallback when absent
pub fn disease_info(label: &str) -> Cow<'static, DiseaseInfo> {
    match disease_table().get(label) {
        Some(info) => Cow::Borrowed(info),
        None => {
            tracing::warn!("No disease information for class '{}', using fallback", label);
            Cow::Owned(DiseaseInfo::fallback(label))
        }
    }
}
