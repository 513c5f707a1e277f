// ABOUTME: In-memory cache with insertion-order capacity eviction and per-entry TTL
// ABOUTME: Includes an optional background sweep task for expired entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{CacheConfig, NamespacedCache};
use lru::LruCache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Stored value with the moment it was written and how long it stays valid
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<u8>,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data,
            stored_at: Instant::now(),
            ttl,
        }
    }

    fn is_expired(&self) -> bool {
        self.stored_at.elapsed() > self.ttl
    }

    fn remaining_ttl(&self) -> Option<Duration> {
        self.ttl.checked_sub(self.stored_at.elapsed())
    }
}

type Store = Arc<RwLock<LruCache<String, CacheEntry>>>;

/// Closes the sweep task's channel when the last cache handle is dropped
#[derive(Debug)]
struct CleanupGuard {
    _shutdown_tx: mpsc::Sender<()>,
}

/// Bounded TTL cache shared by the client pipelines
///
/// `LruCache` is used purely as an ordered map: reads go through `peek`, so the
/// least-recently-used entry is always the earliest inserted one and eviction follows
/// insertion order. Clones share the same store.
///
/// Values are stored as JSON so a single cache can hold heterogeneous types. A value
/// that no longer decodes as the requested type is treated as a miss.
#[derive(Clone)]
pub struct TtlCache {
    store: Store,
    capacity: NonZeroUsize,
    cleanup: Option<Arc<CleanupGuard>>,
}

impl TtlCache {
    /// Capacity used when the configuration asks for zero entries
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(100) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a cache, spawning the background sweep when enabled
    ///
    /// The sweep needs a running tokio runtime; without one it is skipped.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or_else(|| {
            warn!(
                fallback = Self::DEFAULT_CAPACITY.get(),
                "Cache configured with zero capacity, using fallback"
            );
            Self::DEFAULT_CAPACITY
        });
        let store: Store = Arc::new(RwLock::new(LruCache::new(capacity)));

        let cleanup = if config.enable_background_cleanup {
            Self::spawn_cleanup(&store, config.cleanup_interval)
        } else {
            None
        };

        Self {
            store,
            capacity,
            cleanup,
        }
    }

    /// Create a cache with the given capacity and no background sweep
    #[must_use]
    pub fn with_capacity(max_entries: usize) -> Self {
        Self::new(CacheConfig {
            max_entries,
            enable_background_cleanup: false,
            ..CacheConfig::default()
        })
    }

    fn spawn_cleanup(store: &Store, interval: Duration) -> Option<Arc<CleanupGuard>> {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("No tokio runtime available, cache background cleanup disabled");
            return None;
        };

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        let store = Arc::clone(store);
        handle.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        Self::cleanup_expired(&store).await;
                    }
                    _ = shutdown_rx.recv() => {
                        debug!("Cache cleanup task stopped");
                        break;
                    }
                }
            }
        });

        Some(Arc::new(CleanupGuard {
            _shutdown_tx: shutdown_tx,
        }))
    }

    /// Remove all expired entries
    async fn cleanup_expired(store: &Store) {
        let mut guard = store.write().await;

        let expired: Vec<String> = guard
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            guard.pop(key);
        }
        drop(guard);

        if !expired.is_empty() {
            debug!(removed = expired.len(), "Cleaned up expired cache entries");
        }
    }

    /// Maximum number of entries
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Fetch a live value
    ///
    /// Missing and expired entries return `None`; an expired entry is evicted by the read.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut store = self.store.write().await;

        let entry = store.peek(key)?;
        if entry.is_expired() {
            store.pop(key);
            drop(store);
            debug!(key, "Cache entry expired");
            return None;
        }

        match serde_json::from_slice(&entry.data) {
            Ok(value) => Some(value),
            Err(e) => {
                store.pop(key);
                drop(store);
                warn!(key, error = %e, "Discarding cache entry that no longer decodes");
                None
            }
        }
    }

    /// Store a value for `ttl`
    ///
    /// When the cache is full and `key` is new, exactly one entry (the earliest
    /// inserted) is evicted first. Re-setting an existing key replaces it in place of
    /// an eviction and moves it to the newest position.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) {
        let data = match serde_json::to_vec(value) {
            Ok(data) => data,
            Err(e) => {
                warn!(key, error = %e, "Value could not be serialized, not cached");
                return;
            }
        };

        let mut store = self.store.write().await;
        if store.pop(key).is_none() && store.len() >= self.capacity.get() {
            if let Some((evicted, _)) = store.pop_lru() {
                debug!(key = %evicted, "Evicted oldest cache entry");
            }
        }
        store.push(key.to_owned(), CacheEntry::new(data, ttl));
    }

    /// Remove an entry, returning whether it existed
    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.pop(key).is_some()
    }

    /// Remove every entry
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    /// Whether a live entry exists; an expired entry is evicted by the check
    pub async fn contains(&self, key: &str) -> bool {
        let mut store = self.store.write().await;
        match store.peek(key).map(CacheEntry::is_expired) {
            Some(false) => true,
            Some(true) => {
                store.pop(key);
                false
            }
            None => false,
        }
    }

    /// Time left before an entry expires
    pub async fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let store = self.store.read().await;
        store.peek(key).and_then(CacheEntry::remaining_ttl)
    }

    /// Number of stored entries, including expired ones not yet swept
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Prefix-scoped view sharing this store
    #[must_use]
    pub fn namespace(&self, prefix: &str) -> NamespacedCache {
        NamespacedCache::new(self.clone(), prefix)
    }

    /// Remove every entry whose key starts with `prefix`
    pub(crate) async fn remove_prefix(&self, prefix: &str) -> usize {
        let mut store = self.store.write().await;
        let keys: Vec<String> = store
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            store.pop(key);
        }
        keys.len()
    }
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("capacity", &self.capacity)
            .field("background_cleanup", &self.cleanup.is_some())
            .finish_non_exhaustive()
    }
}
