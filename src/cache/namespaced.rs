// ABOUTME: Prefix-scoped view over a shared TTL cache
// ABOUTME: Lets independent pipelines share one store without key collisions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::TtlCache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Cache view that prefixes every key with `"{namespace}:"`
#[derive(Debug, Clone)]
pub struct NamespacedCache {
    inner: TtlCache,
    prefix: String,
}

impl NamespacedCache {
    pub(super) fn new(inner: TtlCache, namespace: &str) -> Self {
        Self {
            inner,
            prefix: format!("{namespace}:"),
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    /// Namespace name without the trailing separator
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.prefix.trim_end_matches(':')
    }

    /// See [`TtlCache::get`]
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.inner.get(&self.scoped(key)).await
    }

    /// See [`TtlCache::set`]
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) {
        self.inner.set(&self.scoped(key), value, ttl).await;
    }

    /// See [`TtlCache::delete`]
    pub async fn delete(&self, key: &str) -> bool {
        self.inner.delete(&self.scoped(key)).await
    }

    /// Remove only this namespace's entries, returning how many were removed
    pub async fn clear(&self) -> usize {
        self.inner.remove_prefix(&self.prefix).await
    }

    /// See [`TtlCache::contains`]
    pub async fn contains(&self, key: &str) -> bool {
        self.inner.contains(&self.scoped(key)).await
    }
}
