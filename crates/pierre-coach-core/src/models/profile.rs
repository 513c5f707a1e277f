// ABOUTME: Authenticated user's profile as returned by the backend
// ABOUTME: The only context source whose failure is fatal to aggregation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// User identity and coaching preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User identifier
    #[serde(deserialize_with = "super::string_or_number::deserialize")]
    pub id: String,
    /// Display name
    #[serde(default, alias = "displayName")]
    pub name: String,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Self-reported experience level (beginner, intermediate, advanced)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
    /// Primary training goal in free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    /// Preferred units (metric, imperial)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}
