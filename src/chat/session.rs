// ABOUTME: ChatSession state machine: optimistic send, streaming reply, retried fallback
// ABOUTME: Conversation selection, history loading, and list refresh for new conversations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::client::{CoachApi, SessionProvider};
use crate::retry::{reject_degraded, retry, RetryPolicy};
use crate::stream::{StreamAbortHandle, StreamHandler, StreamSession, StreamState};
use chrono::Utc;
use pierre_coach_core::constants::chat::{
    DEGRADED_RESPONSE_SENTINELS, FALLBACK_NOTICE, FALLBACK_REPLY, HISTORY_MESSAGE_LIMIT,
    NOT_AUTHENTICATED_NOTICE,
};
use pierre_coach_core::models::{
    ChatMessage, ChatRequest, ChatResponse, ConversationSummary, Sender,
};
use pierre_coach_core::{ApiError, ApiResult};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Observable chat state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSnapshot {
    /// Finalized transcript, oldest first
    pub messages: Vec<ChatMessage>,
    /// Assistant text received so far while a stream is in flight
    pub streaming_text: Option<String>,
    /// A send is in progress
    pub is_sending: bool,
    /// Visible, dismissible error notice
    pub error: Option<String>,
    /// Active conversation, `None` until the first reply of a new one
    pub conversation_id: Option<i64>,
    /// Known conversations
    pub conversations: Vec<ConversationSummary>,
}

/// How a [`ChatSession::send`] call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Reply streamed to completion
    Streamed,
    /// Reply came from the non-streaming endpoint
    Replied {
        /// The stream failed first and this was its fallback
        after_stream_failure: bool,
    },
    /// Every attempt failed; the fixed fallback reply was appended
    Fallback,
    /// The stream was aborted by the caller
    Cancelled,
    /// No session token; nothing was sent
    NotAuthenticated,
    /// Blank message; nothing was sent
    EmptyMessage,
}

/// Tunables for a chat session
#[derive(Debug, Clone)]
pub struct ChatOptions {
    /// Policy for the non-streaming path
    pub retry: RetryPolicy,
    /// Bodies treated as degraded content
    pub degraded_sentinels: Vec<String>,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::chat(),
            degraded_sentinels: DEGRADED_RESPONSE_SENTINELS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

/// Publishes stream deltas into the snapshot as they arrive
struct TranscriptHandler<'a> {
    state: &'a watch::Sender<ChatSnapshot>,
    text: String,
}

impl StreamHandler for TranscriptHandler<'_> {
    fn on_chunk(&mut self, delta: &str) {
        self.text.push_str(delta);
        let text = self.text.clone();
        self.state.send_modify(|s| s.streaming_text = Some(text));
    }

    fn on_complete(&mut self) {
        debug!(chars = self.text.len(), "Chat stream complete");
    }

    fn on_error(&mut self, error: &ApiError) {
        debug!(error = %error, received = self.text.len(), "Chat stream errored");
    }
}

enum StreamOutcome {
    Completed(String),
    Failed,
    Cancelled,
}

/// A conversation with the AI coach
pub struct ChatSession {
    api: Arc<dyn CoachApi>,
    session: Arc<dyn SessionProvider>,
    options: ChatOptions,
    state: watch::Sender<ChatSnapshot>,
    abort: StreamAbortHandle,
}

impl fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSession")
            .field("options", &self.options)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

impl ChatSession {
    /// Start with an empty transcript and no active conversation
    #[must_use]
    pub fn new(
        api: Arc<dyn CoachApi>,
        session: Arc<dyn SessionProvider>,
        options: ChatOptions,
    ) -> Self {
        let (state, _) = watch::channel(ChatSnapshot::default());
        let (abort, _) = StreamAbortHandle::new();
        Self {
            api,
            session,
            options,
            state,
            abort,
        }
    }

    /// Observe state changes
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.state.subscribe()
    }

    /// Current state
    #[must_use]
    pub fn snapshot(&self) -> ChatSnapshot {
        self.state.borrow().clone()
    }

    /// Handle that cancels the in-flight stream
    #[must_use]
    pub fn abort_handle(&self) -> StreamAbortHandle {
        self.abort.clone()
    }

    /// Clear the visible error notice
    pub fn dismiss_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    /// Forget the active conversation so the next send starts a new one
    pub fn new_conversation(&self) {
        self.state.send_modify(|s| {
            s.conversation_id = None;
            s.messages.clear();
            s.streaming_text = None;
            s.error = None;
        });
    }

    /// Switch to an existing conversation and load its history
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the error notice is set and the transcript is kept.
    pub async fn select_conversation(&self, conversation_id: i64) -> ApiResult<()> {
        match self
            .api
            .conversation_messages(conversation_id, HISTORY_MESSAGE_LIMIT)
            .await
        {
            Ok(history) => {
                let messages: Vec<ChatMessage> = history.iter().map(ChatMessage::from).collect();
                self.state.send_modify(|s| {
                    s.conversation_id = Some(conversation_id);
                    s.messages = messages;
                    s.streaming_text = None;
                    s.error = None;
                });
                Ok(())
            }
            Err(e) => {
                warn!(conversation_id, error_class = %e.class(), error = %e, "Failed to load conversation");
                self.state.send_modify(|s| s.error = Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Reload the conversation list
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous list is kept.
    pub async fn refresh_conversations(&self) -> ApiResult<Vec<ConversationSummary>> {
        let conversations = self.api.conversations().await.inspect_err(|e| {
            warn!(error_class = %e.class(), error = %e, "Failed to refresh conversation list");
        })?;
        let published = conversations.clone();
        self.state.send_modify(|s| s.conversations = published);
        Ok(conversations)
    }

    /// Send a message and wait for the assistant reply
    ///
    /// The user message is appended before any network call. With `use_streaming` the
    /// reply is streamed; a failed stream falls back exactly once to the retried
    /// non-streaming endpoint.
    pub async fn send(&self, text: &str, use_streaming: bool) -> SendOutcome {
        if !self.session.is_authenticated() {
            warn!("Chat send attempted without a session");
            self.state
                .send_modify(|s| s.error = Some(NOT_AUTHENTICATED_NOTICE.to_owned()));
            return SendOutcome::NotAuthenticated;
        }

        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::EmptyMessage;
        }

        let provisional = ChatMessage::new(
            format!("temp-{}", Uuid::new_v4()),
            text,
            Sender::User,
            Utc::now(),
        );
        let mut conversation_id = None;
        self.state.send_modify(|s| {
            conversation_id = s.conversation_id;
            s.messages.push(provisional);
            s.is_sending = true;
            s.streaming_text = None;
            s.error = None;
        });

        let request = ChatRequest {
            message: text.to_owned(),
            conversation_id,
        };

        let outcome = if use_streaming {
            match self.stream_reply(&request).await {
                StreamOutcome::Completed(reply) => {
                    self.finish_streamed(&request, reply).await;
                    SendOutcome::Streamed
                }
                StreamOutcome::Cancelled => SendOutcome::Cancelled,
                StreamOutcome::Failed => {
                    info!("Falling back to non-streaming chat");
                    self.reply_without_stream(&request, true).await
                }
            }
        } else {
            self.reply_without_stream(&request, false).await
        };

        self.state.send_modify(|s| {
            s.is_sending = false;
            s.streaming_text = None;
        });
        outcome
    }

    async fn stream_reply(&self, request: &ChatRequest) -> StreamOutcome {
        let signal = self.abort.rearm();

        let bytes = match self.api.open_chat_stream(request).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error_class = %e.class(), error = %e, "Failed to open chat stream");
                return StreamOutcome::Failed;
            }
        };

        let mut handler = TranscriptHandler {
            state: &self.state,
            text: String::new(),
        };
        let mut session = StreamSession::new();
        match session.run(bytes, &mut handler, signal).await {
            StreamState::Complete => {
                if handler.text.trim().is_empty() {
                    warn!("Chat stream completed without content");
                    return StreamOutcome::Failed;
                }
                match reject_degraded(handler.text, &self.options.degraded_sentinels) {
                    Ok(reply) => StreamOutcome::Completed(reply),
                    Err(e) => {
                        warn!(error_class = %e.class(), "Chat stream returned degraded content");
                        StreamOutcome::Failed
                    }
                }
            }
            StreamState::Cancelled => StreamOutcome::Cancelled,
            StreamState::Init | StreamState::Streaming | StreamState::Error => StreamOutcome::Failed,
        }
    }

    async fn finish_streamed(&self, request: &ChatRequest, reply: String) {
        let assistant = ChatMessage::new(
            format!("stream-{}", Uuid::new_v4()),
            reply,
            Sender::Assistant,
            Utc::now(),
        );
        self.state.send_modify(|s| s.messages.push(assistant));

        if request.conversation_id.is_none() {
            if let Ok(conversations) = self.refresh_conversations().await {
                let latest = conversations
                    .iter()
                    .max_by_key(|c| c.updated_at)
                    .map(|c| c.id);
                self.state.send_modify(|s| s.conversation_id = latest);
            }
        }
    }

    async fn reply_without_stream(
        &self,
        request: &ChatRequest,
        after_stream_failure: bool,
    ) -> SendOutcome {
        let api = &self.api;
        let sentinels = &self.options.degraded_sentinels;
        let result = retry("chat_message", &self.options.retry, || async move {
            let response = api.send_chat(request).await?;
            let text = reject_degraded(response.response, sentinels)?;
            Ok(ChatResponse {
                response: text,
                ..response
            })
        })
        .await;

        match result {
            Ok(response) => {
                let id = response
                    .message_id
                    .map_or_else(|| format!("msg-{}", Uuid::new_v4()), |id| id.to_string());
                let assistant =
                    ChatMessage::new(id, response.response, Sender::Assistant, Utc::now());
                self.state.send_modify(|s| {
                    s.messages.push(assistant);
                    s.conversation_id = Some(response.conversation_id);
                });

                if request.conversation_id.is_none() {
                    // List refresh is best effort; failures are already logged
                    let _ = self.refresh_conversations().await;
                }
                SendOutcome::Replied {
                    after_stream_failure,
                }
            }
            Err(_) => {
                let fallback = ChatMessage::new(
                    format!("fallback-{}", Uuid::new_v4()),
                    FALLBACK_REPLY,
                    Sender::Assistant,
                    Utc::now(),
                );
                self.state.send_modify(|s| {
                    s.messages.push(fallback);
                    s.error = Some(FALLBACK_NOTICE.to_owned());
                });
                SendOutcome::Fallback
            }
        }
    }
}
