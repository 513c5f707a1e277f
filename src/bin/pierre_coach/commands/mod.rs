// ABOUTME: Command implementations for pierre-coach and the shared service wiring
// ABOUTME: Builds the HTTP client, cache, and pipelines from ClientConfig
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod chat;
pub mod context;
pub mod dashboard;

use anyhow::{Context as _, Result};
use pierre_coach_client::cache::TtlCache;
use pierre_coach_client::chat::ChatSession;
use pierre_coach_client::client::{CoachApi, HttpCoachApi, SessionProvider, StaticSession};
use pierre_coach_client::config::ClientConfig;
use pierre_coach_client::context::ContextAggregator;
use pierre_coach_client::dashboard::DashboardPipeline;
use serde::Serialize;
use std::sync::Arc;

/// Pipelines wired to one HTTP client and one cache
pub struct Services {
    pub chat: ChatSession,
    pub aggregator: ContextAggregator,
    pub dashboard: DashboardPipeline,
}

impl Services {
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let session: Arc<dyn SessionProvider> =
            Arc::new(StaticSession::from_token(config.api_token.clone()));
        let api: Arc<dyn CoachApi> = Arc::new(
            HttpCoachApi::new(&config.api_url, Arc::clone(&session), config.http_timeouts())
                .context("Failed to create backend client")?,
        );
        let cache = TtlCache::new(config.cache_config());
        let aggregator = ContextAggregator::new(Arc::clone(&api), &cache);

        Ok(Self {
            chat: ChatSession::new(Arc::clone(&api), session, config.chat_options()),
            dashboard: DashboardPipeline::new(
                api,
                &cache,
                aggregator.clone(),
                config.dashboard_options(),
            ),
            aggregator,
        })
    }
}

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{rendered}");
    Ok(())
}
