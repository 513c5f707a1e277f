// ABOUTME: Application constants for the coaching client organized by domain
// ABOUTME: Cache TTL presets, backend endpoint paths, chat sentinels, and training factors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cache capacity, cleanup interval, and TTL presets
pub mod cache;

/// Chat protocol sentinels and user-facing fallback text
pub mod chat;

/// Backend endpoint paths
pub mod endpoints;

/// Training metric windows and intensity factors
pub mod training;

/// Service names used in structured logs
pub mod service_names {
    /// Client library service name
    pub const PIERRE_COACH_CLIENT: &str = "pierre_coach_client";
    /// CLI binary service name
    pub const PIERRE_COACH_CLI: &str = "pierre_coach";
}
