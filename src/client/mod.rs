// ABOUTME: Remote API seam for the coaching backend and the bearer-token session seam
// ABOUTME: Pipelines depend on these traits; HttpCoachApi is the reqwest implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// `reqwest` implementation of [`CoachApi`]
pub mod http;

pub use http::{HttpCoachApi, HttpTimeouts};

use crate::stream::ByteStream;
use async_trait::async_trait;
use pierre_coach_core::models::{
    Activity, ChatRequest, ChatResponse, ConversationMessage, ConversationSummary,
    DashboardState, FatigueScore, InsightRequest, InsightResponse, RaceEvent, TrainingPattern,
    UserProfile, WeeklyStats,
};
use pierre_coach_core::ApiResult;

/// Every backend endpoint the client consumes
///
/// Implementations perform a single attempt per call; retry and caching are layered
/// on top by the pipelines.
#[async_trait]
pub trait CoachApi: Send + Sync {
    /// Athlete profile
    async fn profile(&self) -> ApiResult<UserProfile>;

    /// Most recent activities, newest first
    async fn recent_activities(&self, limit: u32) -> ApiResult<Vec<Activity>>;

    /// Upcoming races and events
    async fn upcoming_races(&self) -> ApiResult<Vec<RaceEvent>>;

    /// Current week's totals
    async fn weekly_stats(&self) -> ApiResult<WeeklyStats>;

    /// Last `limit` messages of a conversation, oldest first
    async fn conversation_messages(
        &self,
        conversation_id: i64,
        limit: u32,
    ) -> ApiResult<Vec<ConversationMessage>>;

    /// Conversation list
    async fn conversations(&self) -> ApiResult<Vec<ConversationSummary>>;

    /// Non-streaming chat exchange
    async fn send_chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse>;

    /// Open a streaming chat exchange, returning the raw response body
    async fn open_chat_stream(&self, request: &ChatRequest) -> ApiResult<ByteStream>;

    /// Precomputed dashboard
    async fn dashboard(&self) -> ApiResult<DashboardState>;

    /// Generate AI insights from an aggregated context
    async fn generate_insights(&self, request: &InsightRequest<'_>) -> ApiResult<InsightResponse>;

    /// Detected training patterns
    async fn training_patterns(&self) -> ApiResult<Vec<TrainingPattern>>;

    /// Latest fatigue score, if one has been computed
    async fn fatigue_score(&self) -> ApiResult<Option<FatigueScore>>;
}

/// Supplies the bearer token for the signed-in athlete
pub trait SessionProvider: Send + Sync {
    /// Current token, or `None` when signed out
    fn bearer_token(&self) -> Option<String>;

    /// Whether a token is available
    fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }
}

/// Session with a fixed token, used by the CLI and tests
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
}

impl StaticSession {
    /// Signed-in session
    #[must_use]
    pub fn authenticated(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Signed-out session
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { token: None }
    }

    /// Session from an optional token; blank tokens count as signed out
    #[must_use]
    pub fn from_token(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }
}

impl SessionProvider for StaticSession {
    fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }
}
