// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Plant Disease Detection API

/// Service name reported by `GET /`
pub const API_NAME: &str = "Plant Disease Detection API";

/// Semantic version number
pub const VERSION_NUMBER: &str = "1.0.0";

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} v{}", API_NAME, VERSION_NUMBER)
}
