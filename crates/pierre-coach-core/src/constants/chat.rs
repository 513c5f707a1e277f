// ABOUTME: Chat streaming protocol constants and user-facing fallback messages
// ABOUTME: Frame prefix, completion sentinel, delta field priority, degraded-body sentinels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Prefix carried by every payload line of the chat stream
pub const FRAME_PREFIX: &str = "data:";

/// Payload marking the end of a chat stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// JSON fields checked for a text delta, highest priority first
pub const DELTA_FIELDS: [&str; 4] = ["content", "token", "text", "chunk"];

/// Assistant reply shown when every non-streaming attempt failed
pub const FALLBACK_REPLY: &str =
    "I'm having trouble reaching your coach right now. Please try again in a moment.";

/// Dismissible error notice shown alongside the fallback reply
pub const FALLBACK_NOTICE: &str = "Your coach is temporarily unavailable";

/// Notice shown when a message is sent without an active session
pub const NOT_AUTHENTICATED_NOTICE: &str = "Please sign in to chat with your coach";

/// Bodies the backend returns with HTTP 200 when its AI dependency is down
pub const DEGRADED_RESPONSE_SENTINELS: [&str; 2] = [
    "Service temporarily unavailable",
    "I'm sorry, I'm unable to respond right now. Please try again later.",
];

/// Number of conversation messages included in aggregated context
pub const CONTEXT_MESSAGE_LIMIT: u32 = 10;

/// Number of messages loaded when reopening a conversation
pub const HISTORY_MESSAGE_LIMIT: u32 = 50;
