// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Scriptable in-memory CoachApi fake, fixtures, and quiet logging setup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    missing_docs,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `pierre_coach_client`
//!
//! [`FakeCoachApi`] answers every endpoint from scripted values. Endpoints that are
//! called repeatedly (chat, stream, dashboard, insights) take their answers from a
//! queue; once the queue is drained the last configured answer repeats.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use futures_util::{stream, StreamExt};
use pierre_coach_client::client::CoachApi;
use pierre_coach_client::models::{
    Activity, ActivityStatus, ChatRequest, ChatResponse, ConversationMessage,
    ConversationSummary, DashboardCard, DashboardState, FatigueScore, InsightRequest,
    InsightResponse, RaceEvent, TrainingPattern, UserProfile, WeeklyStats,
};
use pierre_coach_client::stream::ByteStream;
use pierre_coach_client::{ApiError, ApiResult};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("warn")
            .with_test_writer()
            .try_init();
    });
}

/// Fixed "now" used by fixtures: 2025-06-15 12:00 UTC
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

pub fn profile() -> UserProfile {
    UserProfile {
        id: "athlete-1".to_owned(),
        name: "Test Runner".to_owned(),
        ..UserProfile::default()
    }
}

/// Completed activity finished `days_ago` days before `now`
pub fn completed(activity_type: &str, duration_seconds: u64, days_ago: i64, now: DateTime<Utc>) -> Activity {
    Activity {
        id: format!("{activity_type}-{days_ago}"),
        activity_type: activity_type.to_owned(),
        status: ActivityStatus::Completed,
        duration_seconds,
        distance_meters: None,
        scheduled_date: None,
        completed_at: Some(now - ChronoDuration::days(days_ago)),
    }
}

pub fn planned(activity_type: &str, duration_seconds: u64, days_ago: i64, now: DateTime<Utc>) -> Activity {
    Activity {
        status: ActivityStatus::Planned,
        ..completed(activity_type, duration_seconds, days_ago, now)
    }
}

pub fn race(name: &str, days_ahead: i64, now: DateTime<Utc>) -> RaceEvent {
    RaceEvent {
        id: name.to_lowercase().replace(' ', "-"),
        name: name.to_owned(),
        date: now + ChronoDuration::days(days_ahead),
        distance_meters: Some(42_195.0),
        priority: None,
    }
}

pub fn message(id: i64, role: &str, content: &str) -> ConversationMessage {
    ConversationMessage {
        id,
        role: role.to_owned(),
        content: content.to_owned(),
        created_at: None,
    }
}

pub fn card(title: &str, order: i32) -> DashboardCard {
    DashboardCard {
        card_type: "workout".to_owned(),
        title: title.to_owned(),
        subtitle: None,
        content: format!("{title} content"),
        cta: None,
        priority: "medium".to_owned(),
        order,
    }
}

pub fn dashboard(greeting: &str, cards: Vec<DashboardCard>) -> DashboardState {
    DashboardState {
        mode: "build".to_owned(),
        greeting: greeting.to_owned(),
        subtitle: "Week 3 of 12".to_owned(),
        cards,
        insights: Vec::new(),
    }
}

pub fn chat_reply(text: &str, conversation_id: i64) -> ChatResponse {
    ChatResponse {
        response: text.to_owned(),
        conversation_id,
        message_id: Some(1000 + conversation_id),
    }
}

pub fn server_error() -> ApiError {
    ApiError::from_status(503, "upstream unavailable")
}

/// Stream body delivered as the given raw chunks
pub fn stream_body(chunks: &[&str]) -> Vec<ApiResult<Bytes>> {
    chunks
        .iter()
        .map(|chunk| Ok(Bytes::from(chunk.to_string())))
        .collect()
}

/// Scripted answers for one repeatedly-called endpoint
struct Script<T> {
    queue: VecDeque<T>,
    last: Option<T>,
}

impl<T: Clone> Script<T> {
    const fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            last: None,
        }
    }

    fn push(&mut self, item: T) {
        self.queue.push_back(item);
    }

    fn next(&mut self) -> Option<T> {
        if let Some(item) = self.queue.pop_front() {
            self.last = Some(item.clone());
            return Some(item);
        }
        self.last.clone()
    }
}

/// In-memory `CoachApi` with scripted answers and call counting
pub struct FakeCoachApi {
    profile: Mutex<ApiResult<UserProfile>>,
    activities: Mutex<ApiResult<Vec<Activity>>>,
    races: Mutex<ApiResult<Vec<RaceEvent>>>,
    weekly_stats: Mutex<ApiResult<WeeklyStats>>,
    messages: Mutex<ApiResult<Vec<ConversationMessage>>>,
    conversations: Mutex<ApiResult<Vec<ConversationSummary>>>,
    patterns: Mutex<ApiResult<Vec<TrainingPattern>>>,
    fatigue: Mutex<ApiResult<Option<FatigueScore>>>,
    chat: Mutex<Script<ApiResult<ChatResponse>>>,
    streams: Mutex<Script<ApiResult<Vec<ApiResult<Bytes>>>>>,
    dashboards: Mutex<Script<(Duration, ApiResult<DashboardState>)>>,
    insights: Mutex<Script<ApiResult<InsightResponse>>>,
    stall_streams: AtomicBool,
    calls: Mutex<HashMap<&'static str, usize>>,
    chat_requests: Mutex<Vec<ChatRequest>>,
    insight_requests: Mutex<Vec<serde_json::Value>>,
}

impl Default for FakeCoachApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeCoachApi {
    /// Every endpoint succeeds with empty data and the fixture profile
    pub fn new() -> Self {
        Self {
            profile: Mutex::new(Ok(profile())),
            activities: Mutex::new(Ok(Vec::new())),
            races: Mutex::new(Ok(Vec::new())),
            weekly_stats: Mutex::new(Ok(WeeklyStats::default())),
            messages: Mutex::new(Ok(Vec::new())),
            conversations: Mutex::new(Ok(Vec::new())),
            patterns: Mutex::new(Ok(Vec::new())),
            fatigue: Mutex::new(Ok(None)),
            chat: Mutex::new(Script::new()),
            streams: Mutex::new(Script::new()),
            dashboards: Mutex::new(Script::new()),
            insights: Mutex::new(Script::new()),
            stall_streams: AtomicBool::new(false),
            calls: Mutex::new(HashMap::new()),
            chat_requests: Mutex::new(Vec::new()),
            insight_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_profile(self, result: ApiResult<UserProfile>) -> Self {
        *self.profile.lock().unwrap() = result;
        self
    }

    pub fn with_activities(self, result: ApiResult<Vec<Activity>>) -> Self {
        *self.activities.lock().unwrap() = result;
        self
    }

    pub fn with_races(self, result: ApiResult<Vec<RaceEvent>>) -> Self {
        *self.races.lock().unwrap() = result;
        self
    }

    pub fn with_weekly_stats(self, result: ApiResult<WeeklyStats>) -> Self {
        *self.weekly_stats.lock().unwrap() = result;
        self
    }

    pub fn with_messages(self, result: ApiResult<Vec<ConversationMessage>>) -> Self {
        *self.messages.lock().unwrap() = result;
        self
    }

    pub fn with_conversations(self, result: ApiResult<Vec<ConversationSummary>>) -> Self {
        *self.conversations.lock().unwrap() = result;
        self
    }

    pub fn with_patterns(self, result: ApiResult<Vec<TrainingPattern>>) -> Self {
        *self.patterns.lock().unwrap() = result;
        self
    }

    pub fn with_fatigue(self, result: ApiResult<Option<FatigueScore>>) -> Self {
        *self.fatigue.lock().unwrap() = result;
        self
    }

    /// Queue a non-streaming chat answer
    pub fn push_chat(self, result: ApiResult<ChatResponse>) -> Self {
        self.chat.lock().unwrap().push(result);
        self
    }

    /// Queue a streaming answer: `Err` fails the open, `Ok` yields the chunks
    pub fn push_stream(self, result: ApiResult<Vec<ApiResult<Bytes>>>) -> Self {
        self.streams.lock().unwrap().push(result);
        self
    }

    /// Streams never end after their scripted chunks
    pub fn with_stalled_streams(self) -> Self {
        self.stall_streams.store(true, Ordering::SeqCst);
        self
    }

    /// Queue a dashboard answer delivered after `delay`
    pub fn push_dashboard(self, delay: Duration, result: ApiResult<DashboardState>) -> Self {
        self.dashboards.lock().unwrap().push((delay, result));
        self
    }

    pub fn push_insights(self, result: ApiResult<InsightResponse>) -> Self {
        self.insights.lock().unwrap().push(result);
        self
    }

    /// Number of calls made to `endpoint`
    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls.lock().unwrap().get(endpoint).copied().unwrap_or(0)
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub fn insight_requests(&self) -> Vec<serde_json::Value> {
        self.insight_requests.lock().unwrap().clone()
    }

    fn record(&self, endpoint: &'static str) {
        *self.calls.lock().unwrap().entry(endpoint).or_insert(0) += 1;
    }
}

fn unscripted(endpoint: &str) -> ApiError {
    ApiError::transport(format!("no scripted answer for {endpoint}"))
}

#[async_trait]
impl CoachApi for FakeCoachApi {
    async fn profile(&self) -> ApiResult<UserProfile> {
        self.record("profile");
        self.profile.lock().unwrap().clone()
    }

    async fn recent_activities(&self, limit: u32) -> ApiResult<Vec<Activity>> {
        self.record("activities");
        self.activities
            .lock()
            .unwrap()
            .clone()
            .map(|mut list| {
                list.truncate(limit as usize);
                list
            })
    }

    async fn upcoming_races(&self) -> ApiResult<Vec<RaceEvent>> {
        self.record("races");
        self.races.lock().unwrap().clone()
    }

    async fn weekly_stats(&self) -> ApiResult<WeeklyStats> {
        self.record("weekly_stats");
        self.weekly_stats.lock().unwrap().clone()
    }

    async fn conversation_messages(
        &self,
        _conversation_id: i64,
        _limit: u32,
    ) -> ApiResult<Vec<ConversationMessage>> {
        self.record("messages");
        self.messages.lock().unwrap().clone()
    }

    async fn conversations(&self) -> ApiResult<Vec<ConversationSummary>> {
        self.record("conversations");
        self.conversations.lock().unwrap().clone()
    }

    async fn send_chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse> {
        self.record("chat");
        self.chat_requests.lock().unwrap().push(request.clone());
        self.chat
            .lock()
            .unwrap()
            .next()
            .unwrap_or_else(|| Err(unscripted("chat")))
    }

    async fn open_chat_stream(&self, request: &ChatRequest) -> ApiResult<ByteStream> {
        self.record("stream");
        self.chat_requests.lock().unwrap().push(request.clone());
        let chunks = self
            .streams
            .lock()
            .unwrap()
            .next()
            .unwrap_or_else(|| Err(unscripted("stream")))?;
        if self.stall_streams.load(Ordering::SeqCst) {
            return Ok(Box::pin(stream::iter(chunks).chain(stream::pending())));
        }
        Ok(Box::pin(stream::iter(chunks)))
    }

    async fn dashboard(&self) -> ApiResult<DashboardState> {
        self.record("dashboard");
        let scripted = self.dashboards.lock().unwrap().next();
        let (delay, result) =
            scripted.unwrap_or_else(|| (Duration::ZERO, Err(unscripted("dashboard"))));
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn generate_insights(&self, request: &InsightRequest<'_>) -> ApiResult<InsightResponse> {
        self.record("insights");
        self.insight_requests
            .lock()
            .unwrap()
            .push(serde_json::to_value(request).unwrap());
        self.insights
            .lock()
            .unwrap()
            .next()
            .unwrap_or_else(|| Err(unscripted("insights")))
    }

    async fn training_patterns(&self) -> ApiResult<Vec<TrainingPattern>> {
        self.record("patterns");
        self.patterns.lock().unwrap().clone()
    }

    async fn fatigue_score(&self) -> ApiResult<Option<FatigueScore>> {
        self.record("fatigue");
        self.fatigue.lock().unwrap().clone()
    }
}
