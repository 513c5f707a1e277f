// ABOUTME: Bounded in-memory cache with per-entry TTL for API responses and derived state
// ABOUTME: Injected into pipelines; namespaced views keep subsystems from colliding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Response cache
//!
//! [`TtlCache`] stores serialized values with a per-entry time to live and a hard
//! capacity. When full, the entry inserted earliest is evicted. Reads never refresh an
//! entry's position, so eviction order is insertion order.
//!
//! Pipelines receive a [`NamespacedCache`] so that, for example, the context aggregator
//! and the dashboard pipeline can share one store without key collisions.
//!
//! ```rust,no_run
//! use pierre_coach_client::cache::{CacheConfig, TtlCache, TtlPreset};
//! # async fn example() {
//! let cache = TtlCache::new(CacheConfig {
//!     enable_background_cleanup: false,
//!     ..CacheConfig::default()
//! });
//! let dashboard = cache.namespace("dashboard");
//! dashboard.set("greeting", &"Morning!", TtlPreset::Medium.duration()).await;
//! let greeting: Option<String> = dashboard.get("greeting").await;
//! assert_eq!(greeting.as_deref(), Some("Morning!"));
//! # }
//! ```

/// In-memory TTL cache implementation
pub mod memory;
/// Prefix-scoped view over a shared cache
pub mod namespaced;

pub use memory::TtlCache;
pub use namespaced::NamespacedCache;

use pierre_coach_core::constants::cache::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CLEANUP_INTERVAL_SECS, TTL_DAY_SECS, TTL_HOUR_SECS,
    TTL_LONG_SECS, TTL_MEDIUM_SECS, TTL_SHORT_SECS,
};
use std::time::Duration;

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries held at once
    pub max_entries: usize,
    /// Interval of the background sweep for expired entries
    pub cleanup_interval: Duration,
    /// Spawn the background sweep (should be false in tests)
    pub enable_background_cleanup: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
        }
    }
}

/// Named TTL conventions used by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlPreset {
    /// 1 minute
    Short,
    /// 5 minutes
    Medium,
    /// 15 minutes
    Long,
    /// 1 hour
    Hour,
    /// 24 hours
    Day,
}

impl TtlPreset {
    /// Duration of this preset
    #[must_use]
    pub const fn duration(self) -> Duration {
        Duration::from_secs(match self {
            Self::Short => TTL_SHORT_SECS,
            Self::Medium => TTL_MEDIUM_SECS,
            Self::Long => TTL_LONG_SECS,
            Self::Hour => TTL_HOUR_SECS,
            Self::Day => TTL_DAY_SECS,
        })
    }
}
