// ABOUTME: Builds the aggregated coaching context from several backend sources concurrently
// ABOUTME: Tolerates per-source failures, derives training metrics, and caches the result
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Context aggregation
//!
//! [`ContextAggregator::aggregate`] fans out to the profile, activities, races, weekly
//! stats and (optionally) conversation history endpoints at once. Only the profile is
//! required; every other source falls back to an empty or neutral value when it fails,
//! so the AI insight call always receives a fully populated context.

/// Training load, streak and event-window calculations
pub mod metrics;

pub use metrics::{current_streak, filter_upcoming_events, intensity_factor, training_load};

use crate::cache::{NamespacedCache, TtlCache, TtlPreset};
use crate::client::CoachApi;
use chrono::{DateTime, Utc};
use pierre_coach_core::constants::cache::{CONTEXT_DEFAULT_KEY, NAMESPACE_CONTEXT};
use pierre_coach_core::constants::chat::CONTEXT_MESSAGE_LIMIT;
use pierre_coach_core::constants::training::RECENT_ACTIVITY_LIMIT;
use pierre_coach_core::models::AggregatedContext;
use pierre_coach_core::ApiResult;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Source of "now" for date-window calculations
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Fan-out aggregator for the coaching context
#[derive(Clone)]
pub struct ContextAggregator {
    api: Arc<dyn CoachApi>,
    cache: NamespacedCache,
    clock: Clock,
}

impl fmt::Debug for ContextAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextAggregator")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl ContextAggregator {
    /// Create an aggregator caching into the `context` namespace of `cache`
    #[must_use]
    pub fn new(api: Arc<dyn CoachApi>, cache: &TtlCache) -> Self {
        Self {
            api,
            cache: cache.namespace(NAMESPACE_CONTEXT),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the wall clock
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn cache_key(conversation_id: Option<i64>) -> String {
        conversation_id.map_or_else(|| CONTEXT_DEFAULT_KEY.to_owned(), |id| id.to_string())
    }

    /// Build the context, serving a cached copy unless `force_refresh` is set
    ///
    /// # Errors
    ///
    /// Fails only when the profile cannot be fetched.
    pub async fn aggregate(
        &self,
        conversation_id: Option<i64>,
        force_refresh: bool,
    ) -> ApiResult<AggregatedContext> {
        let key = Self::cache_key(conversation_id);
        if !force_refresh {
            if let Some(cached) = self.cache.get::<AggregatedContext>(&key).await {
                debug!(key = %key, "Serving aggregated context from cache");
                return Ok(cached);
            }
        }

        let api = &self.api;
        let (profile, activities, races, weekly_stats, messages) = tokio::join!(
            api.profile(),
            api.recent_activities(RECENT_ACTIVITY_LIMIT),
            api.upcoming_races(),
            api.weekly_stats(),
            async {
                match conversation_id {
                    Some(id) => api.conversation_messages(id, CONTEXT_MESSAGE_LIMIT).await,
                    None => Ok(Vec::new()),
                }
            },
        );

        let profile = profile.inspect_err(|e| {
            warn!(
                source = "profile",
                error_class = %e.class(),
                error = %e,
                "Context aggregation failed: profile unavailable"
            );
        })?;

        let now = (self.clock)();
        let mut recent_activities = or_default("activities", activities);
        recent_activities.truncate(RECENT_ACTIVITY_LIMIT as usize);

        let mut recent_messages = or_default("messages", messages);
        let limit = CONTEXT_MESSAGE_LIMIT as usize;
        if recent_messages.len() > limit {
            recent_messages.drain(..recent_messages.len() - limit);
        }

        let context = AggregatedContext {
            profile,
            current_streak: current_streak(&recent_activities, now),
            training_load: training_load(&recent_activities, now),
            upcoming_events: filter_upcoming_events(or_default("races", races), now),
            weekly_stats: or_default("weekly_stats", weekly_stats),
            recent_activities,
            recent_messages,
            aggregated_at: now,
        };

        self.cache
            .set(&key, &context, TtlPreset::Medium.duration())
            .await;

        info!(
            key = %key,
            activities = context.recent_activities.len(),
            upcoming_events = context.upcoming_events.len(),
            messages = context.recent_messages.len(),
            streak = context.current_streak,
            training_load = context.training_load,
            "Aggregated coaching context"
        );
        Ok(context)
    }

    /// Drop the cached context for one conversation (or the default key)
    pub async fn invalidate(&self, conversation_id: Option<i64>) -> bool {
        self.cache.delete(&Self::cache_key(conversation_id)).await
    }

    /// Drop every cached context
    pub async fn clear(&self) -> usize {
        self.cache.clear().await
    }
}

/// Substitute the neutral default for a failed optional source
fn or_default<T: Default>(source: &'static str, result: ApiResult<T>) -> T {
    result.unwrap_or_else(|e| {
        warn!(
            source,
            error_class = %e.class(),
            error = %e,
            "Context source failed, using default"
        );
        T::default()
    })
}
