// ABOUTME: Dashboard and AI insight pipeline with cache-first loads and latest-request-wins ordering
// ABOUTME: Merges generated insights into the dashboard and fetches best-effort pattern signals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Dashboard pipeline
//!
//! - [`DashboardPipeline::load_dashboard`] serves the precomputed dashboard from cache,
//!   or fetches it under [`RetryPolicy::dashboard`].
//! - [`DashboardPipeline::generate_ai_insights`] aggregates the coaching context, asks
//!   the backend for insights under [`RetryPolicy::insights`], and merges the response
//!   into the current dashboard.
//! - [`DashboardPipeline::load_patterns`] fetches training patterns and the fatigue
//!   score; failures there are never surfaced.

use crate::cache::{NamespacedCache, TtlCache, TtlPreset};
use crate::client::CoachApi;
use crate::context::ContextAggregator;
use crate::retry::{retry, RetryPolicy};
use pierre_coach_core::constants::cache::{
    DASHBOARD_INSIGHTS_KEY, DASHBOARD_STATE_KEY, NAMESPACE_DASHBOARD,
};
use pierre_coach_core::constants::training::DEFAULT_MAX_INSIGHTS;
use pierre_coach_core::models::{
    DashboardState, FatigueScore, InsightRequest, InsightResponse, TrainingPattern,
};
use pierre_coach_core::ApiResult;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Tunables for the dashboard pipeline
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Policy for dashboard loads
    pub load_retry: RetryPolicy,
    /// Policy for insight generation
    pub insights_retry: RetryPolicy,
    /// Upper bound on generated insights
    pub max_insights: u32,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            load_retry: RetryPolicy::dashboard(),
            insights_retry: RetryPolicy::insights(),
            max_insights: DEFAULT_MAX_INSIGHTS,
        }
    }
}

/// Best-effort training signals shown next to the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSignals {
    /// Detected patterns, empty when unavailable
    pub patterns: Vec<TrainingPattern>,
    /// Fatigue score, absent when unavailable
    pub fatigue: Option<FatigueScore>,
}

#[derive(Debug, Default)]
struct AppliedState {
    seq: u64,
    dashboard: Option<DashboardState>,
}

/// Loads, caches and enriches the dashboard
pub struct DashboardPipeline {
    api: Arc<dyn CoachApi>,
    cache: NamespacedCache,
    aggregator: ContextAggregator,
    options: DashboardOptions,
    next_seq: AtomicU64,
    state: RwLock<AppliedState>,
}

impl fmt::Debug for DashboardPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardPipeline")
            .field("cache", &self.cache)
            .field("options", &self.options)
            .field("next_seq", &self.next_seq.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl DashboardPipeline {
    /// Create a pipeline caching into the `dashboard` namespace of `cache`
    #[must_use]
    pub fn new(
        api: Arc<dyn CoachApi>,
        cache: &TtlCache,
        aggregator: ContextAggregator,
        options: DashboardOptions,
    ) -> Self {
        Self {
            api,
            cache: cache.namespace(NAMESPACE_DASHBOARD),
            aggregator,
            options,
            next_seq: AtomicU64::new(0),
            state: RwLock::new(AppliedState::default()),
        }
    }

    /// Most recently applied dashboard
    pub async fn current(&self) -> Option<DashboardState> {
        self.state.read().await.dashboard.clone()
    }

    /// Apply `dashboard` if `seq` is newer than the last applied load
    async fn apply(&self, seq: u64, dashboard: &DashboardState) -> bool {
        let mut state = self.state.write().await;
        if seq <= state.seq {
            debug!(seq, applied = state.seq, "Discarding stale dashboard load");
            return false;
        }
        state.seq = seq;
        state.dashboard = Some(dashboard.clone());
        true
    }

    /// Load the dashboard, serving the cached copy unless `force_refresh` is set
    ///
    /// When loads overlap, only the most recently started one updates
    /// [`Self::current`] and the cache; every caller still receives its own result.
    ///
    /// # Errors
    ///
    /// Returns the last error once the retry policy is exhausted.
    pub async fn load_dashboard(&self, force_refresh: bool) -> ApiResult<DashboardState> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;

        if !force_refresh {
            if let Some(cached) = self.cache.get::<DashboardState>(DASHBOARD_STATE_KEY).await {
                debug!(seq, "Serving dashboard from cache");
                let cached = cached.with_sorted_cards();
                self.apply(seq, &cached).await;
                return Ok(cached);
            }
        }

        let api = &self.api;
        let dashboard = retry("load_dashboard", &self.options.load_retry, || async move {
            api.dashboard().await
        })
        .await?
        .with_sorted_cards();

        if self.apply(seq, &dashboard).await {
            self.cache
                .set(DASHBOARD_STATE_KEY, &dashboard, TtlPreset::Medium.duration())
                .await;
            info!(seq, cards = dashboard.cards.len(), "Dashboard loaded");
        }
        Ok(dashboard)
    }

    /// Generate AI insights and merge them into the current dashboard
    ///
    /// Generated insights are cached for an hour independently of the dashboard. A
    /// cached response only refreshes the insight list; its mode, greeting, subtitle and
    /// cards were merged when it was generated and are not replayed over newer loads.
    ///
    /// The merge counts as the newest dashboard update, so a load that started before
    /// it and finishes after it is discarded.
    /// # Errors
    ///
    /// Returns the context aggregation error, or the last insight error once the
    /// retry policy is exhausted.
    pub async fn generate_ai_insights(&self) -> ApiResult<DashboardState> {
        let response = match self
            .cache
            .get::<InsightResponse>(DASHBOARD_INSIGHTS_KEY)
            .await
        {
            Some(cached) => {
                debug!("Serving AI insights from cache");
                InsightResponse {
                    mode: None,
                    greeting: None,
                    subtitle: None,
                    cards: None,
                    insights: cached.insights,
                }
            }
            None => {
                let response = self.request_insights().await?;
                self.cache
                    .set(DASHBOARD_INSIGHTS_KEY, &response, TtlPreset::Hour.duration())
                    .await;
                response
            }
        };

        let insights = response.insights.len();
        let (seq, merged) = {
            let mut state = self.state.write().await;
            let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
            let merged = state
                .dashboard
                .take()
                .unwrap_or_default()
                .merge_insights(response);
            state.seq = seq;
            state.dashboard = Some(merged.clone());
            (seq, merged)
        };

        self.cache
            .set(DASHBOARD_STATE_KEY, &merged, TtlPreset::Medium.duration())
            .await;
        info!(seq, insights, "AI insights merged into dashboard");
        Ok(merged)
    }

    async fn request_insights(&self) -> ApiResult<InsightResponse> {
        let context = self.aggregator.aggregate(None, false).await?;
        let request = InsightRequest {
            context: &context,
            max_insights: self.options.max_insights,
        };

        let api = &self.api;
        let request = &request;
        retry("generate_insights", &self.options.insights_retry, || async move {
            api.generate_insights(request).await
        })
        .await
    }

    /// Fetch training patterns and fatigue score concurrently
    ///
    /// Each signal degrades to empty on failure; nothing is surfaced.
    pub async fn load_patterns(&self) -> PatternSignals {
        let (patterns, fatigue) =
            tokio::join!(self.api.training_patterns(), self.api.fatigue_score());

        PatternSignals {
            patterns: patterns.unwrap_or_else(|e| {
                warn!(signal = "patterns", error_class = %e.class(), error = %e, "Training patterns unavailable");
                Vec::new()
            }),
            fatigue: fatigue.unwrap_or_else(|e| {
                warn!(signal = "fatigue", error_class = %e.class(), error = %e, "Fatigue score unavailable");
                None
            }),
        }
    }

    /// Drop cached dashboard and insights
    pub async fn invalidate(&self) -> usize {
        self.cache.clear().await
    }
}
