// ABOUTME: Chat message models for the local transcript and the chat endpoints
// ABOUTME: Includes conversation history entries and non-streaming request/response shapes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author of a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The athlete
    User,
    /// The AI coach
    Assistant,
}

/// A message in the local chat transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Server id, or a `temp-` id while the message is provisional
    pub id: String,
    /// Message text
    pub text: String,
    /// Author
    pub sender: Sender,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a transcript message
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        sender: Sender,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender,
            timestamp,
        }
    }

    /// Whether the message still carries a client-side temporary id
    #[must_use]
    pub fn is_provisional(&self) -> bool {
        self.id.starts_with("temp-")
    }
}

impl From<&ConversationMessage> for ChatMessage {
    fn from(message: &ConversationMessage) -> Self {
        let sender = if message.role == "user" {
            Sender::User
        } else {
            Sender::Assistant
        };
        Self {
            id: message.id.to_string(),
            text: message.content.clone(),
            sender,
            timestamp: message.created_at.unwrap_or_default(),
        }
    }
}

/// A stored message from the conversation history endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    /// Message id
    pub id: i64,
    /// `user`, `assistant`, or `system`
    pub role: String,
    /// Message text
    pub content: String,
    /// When the message was stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Entry in the conversation list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    /// Conversation id
    pub id: i64,
    /// Title, usually derived from the first message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Last activity time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of both chat endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// User message text
    pub message: String,
    /// Existing conversation, or none to start a new one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<i64>,
}

/// Response of the non-streaming chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// Assistant reply text
    pub response: String,
    /// Conversation the exchange was stored in
    pub conversation_id: i64,
    /// Stored assistant message id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<i64>,
}
