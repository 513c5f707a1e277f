// ABOUTME: reqwest-based CoachApi implementation with bearer auth and status classification
// ABOUTME: Maps transport failures and HTTP statuses onto the ApiError taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{CoachApi, SessionProvider};
use crate::stream::ByteStream;
use async_trait::async_trait;
use futures_util::StreamExt;
use pierre_coach_core::constants::endpoints;
use pierre_coach_core::models::{
    Activity, ChatRequest, ChatResponse, ConversationMessage, ConversationSummary,
    DashboardState, FatigueScore, InsightRequest, InsightResponse, RaceEvent, TrainingPattern,
    UserProfile, WeeklyStats,
};
use pierre_coach_core::{ApiError, ApiResult};
use reqwest::header::ACCEPT;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default whole-request timeout for non-streaming calls
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Transport timeouts
///
/// `request` bounds each non-streaming call end to end. Streaming calls are bounded
/// only by `connect`, since a reply may legitimately stream for longer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Whole-request timeout for non-streaming calls
    pub request: Duration,
    /// Connection establishment timeout
    pub connect: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// HTTP client for the coaching backend
#[derive(Clone)]
pub struct HttpCoachApi {
    client: Client,
    base_url: Url,
    session: Arc<dyn SessionProvider>,
    timeouts: HttpTimeouts,
}

impl fmt::Debug for HttpCoachApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpCoachApi")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.session.is_authenticated())
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl HttpCoachApi {
    /// Create a client for `base_url`
    ///
    /// Endpoint paths are resolved relative to the base URL, so a base with a path
    /// prefix (`https://host/coach`) keeps that prefix.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] for an unparseable base URL or if the
    /// underlying HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        session: Arc<dyn SessionProvider>,
        timeouts: HttpTimeouts,
    ) -> ApiResult<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ApiError::invalid_request(format!("invalid base URL {base_url}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = ClientBuilder::new()
            .connect_timeout(timeouts.connect)
            .build()
            .map_err(|e| ApiError::invalid_request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            session,
            timeouts,
        })
    }

    /// Base URL every endpoint is resolved against
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::invalid_request(format!("invalid endpoint {path}: {e}")))
    }

    fn authorize(&self, builder: RequestBuilder) -> ApiResult<RequestBuilder> {
        let token = self
            .session
            .bearer_token()
            .ok_or(ApiError::Unauthenticated)?;
        Ok(builder.bearer_auth(token))
    }

    /// Send a request and turn non-success statuses into errors
    async fn execute(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = self
            .authorize(builder)?
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "Backend returned error status");
        Err(ApiError::from_status(status.as_u16(), body))
    }

    async fn read_json<T: DeserializeOwned>(
        response: Response,
        context: &'static str,
    ) -> ApiResult<T> {
        let bytes = response.bytes().await.map_err(map_transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::decode(context, e))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &'static str,
    ) -> ApiResult<T> {
        let builder = self.client.get(url).timeout(self.timeouts.request);
        let response = self.execute(builder).await?;
        Self::read_json(response, context).await
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        url: Url,
        collection_key: &'static str,
    ) -> ApiResult<Vec<T>> {
        let value: Value = self.get_json(url, collection_key).await?;
        decode_list(value, collection_key)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B, context: &'static str) -> ApiResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .client
            .post(self.endpoint(path)?)
            .timeout(self.timeouts.request)
            .json(body);
        let response = self.execute(builder).await?;
        Self::read_json(response, context).await
    }
}

/// Classify a `reqwest` failure that carries no HTTP status
fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout {
            status: None,
            message: error.to_string(),
        }
    } else if error.is_builder() {
        ApiError::invalid_request(error.to_string())
    } else {
        ApiError::transport(error.to_string())
    }
}

/// Accept a bare JSON array or an object wrapping it under `collection_key`
fn decode_list<T: DeserializeOwned>(value: Value, collection_key: &'static str) -> ApiResult<Vec<T>> {
    let list = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map.remove(collection_key).ok_or_else(|| {
            ApiError::decode(collection_key, format!("missing \"{collection_key}\" array"))
        })?,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(ApiError::decode(
                collection_key,
                format!("expected array, got {other}"),
            ))
        }
    };
    serde_json::from_value(list).map_err(|e| ApiError::decode(collection_key, e))
}

#[async_trait]
impl CoachApi for HttpCoachApi {
    async fn profile(&self) -> ApiResult<UserProfile> {
        self.get_json(self.endpoint(endpoints::PROFILE)?, "profile")
            .await
    }

    async fn recent_activities(&self, limit: u32) -> ApiResult<Vec<Activity>> {
        let mut url = self.endpoint(endpoints::ACTIVITIES)?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        self.get_list(url, "activities").await
    }

    async fn upcoming_races(&self) -> ApiResult<Vec<RaceEvent>> {
        self.get_list(self.endpoint(endpoints::UPCOMING_RACES)?, "races")
            .await
    }

    async fn weekly_stats(&self) -> ApiResult<WeeklyStats> {
        self.get_json(self.endpoint(endpoints::WEEKLY_STATS)?, "weekly stats")
            .await
    }

    async fn conversation_messages(
        &self,
        conversation_id: i64,
        limit: u32,
    ) -> ApiResult<Vec<ConversationMessage>> {
        let path = format!("{}/{conversation_id}/messages", endpoints::CONVERSATIONS);
        let mut url = self.endpoint(&path)?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        self.get_list(url, "messages").await
    }

    async fn conversations(&self) -> ApiResult<Vec<ConversationSummary>> {
        self.get_list(self.endpoint(endpoints::CONVERSATIONS)?, "conversations")
            .await
    }

    async fn send_chat(&self, request: &ChatRequest) -> ApiResult<ChatResponse> {
        self.post_json(endpoints::CHAT_MESSAGE, request, "chat response")
            .await
    }

    async fn open_chat_stream(&self, request: &ChatRequest) -> ApiResult<ByteStream> {
        let builder = self
            .client
            .post(self.endpoint(endpoints::CHAT_STREAM)?)
            .header(ACCEPT, "text/event-stream")
            .json(request);
        let response = self.execute(builder).await?;
        Ok(Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(map_transport_error)),
        ))
    }

    async fn dashboard(&self) -> ApiResult<DashboardState> {
        self.get_json(self.endpoint(endpoints::DASHBOARD)?, "dashboard")
            .await
    }

    async fn generate_insights(&self, request: &InsightRequest<'_>) -> ApiResult<InsightResponse> {
        self.post_json(endpoints::INSIGHTS_GENERATE, request, "insights")
            .await
    }

    async fn training_patterns(&self) -> ApiResult<Vec<TrainingPattern>> {
        self.get_list(self.endpoint(endpoints::INSIGHTS_PATTERNS)?, "patterns")
            .await
    }

    async fn fatigue_score(&self) -> ApiResult<Option<FatigueScore>> {
        self.get_json(self.endpoint(endpoints::INSIGHTS_FATIGUE)?, "fatigue score")
            .await
    }
}
