// ABOUTME: Cache-related constants for TTL presets, capacity, and cleanup intervals
// ABOUTME: Presets are conventions for callers, not limits enforced by the cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Default maximum entries for the in-memory cache
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 100;

/// Default cleanup interval in seconds for expired entries
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60;

/// Short TTL (1 minute) - volatile data such as fatigue scores
pub const TTL_SHORT_SECS: u64 = 60;

/// Medium TTL (5 minutes) - aggregated context and dashboard state
pub const TTL_MEDIUM_SECS: u64 = 300;

/// Long TTL (15 minutes) - activity lists and conversation lists
pub const TTL_LONG_SECS: u64 = 900;

/// Hour TTL - generated AI insights
pub const TTL_HOUR_SECS: u64 = 3_600;

/// Day TTL - profile and other slowly changing data
pub const TTL_DAY_SECS: u64 = 86_400;

/// Namespace for aggregated coaching context entries
pub const NAMESPACE_CONTEXT: &str = "context";

/// Namespace for dashboard and insight entries
pub const NAMESPACE_DASHBOARD: &str = "dashboard";

/// Cache key used for context aggregated without a conversation
pub const CONTEXT_DEFAULT_KEY: &str = "default";

/// Cache key for the precomputed dashboard
pub const DASHBOARD_STATE_KEY: &str = "state";

/// Cache key for the most recent AI insight generation
pub const DASHBOARD_INSIGHTS_KEY: &str = "ai_insights";
