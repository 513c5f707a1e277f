// ABOUTME: Backend endpoint paths consumed by the coaching client
// ABOUTME: Paths are relative to the configured API base URL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Authenticated user's profile
pub const PROFILE: &str = "api/user/profile";

/// Recent activities (`?limit=N`)
pub const ACTIVITIES: &str = "api/activities";

/// Upcoming races and events
pub const UPCOMING_RACES: &str = "api/races/upcoming";

/// Current week's training statistics
pub const WEEKLY_STATS: &str = "api/stats/weekly";

/// Conversation list; messages live under `{id}/messages`
pub const CONVERSATIONS: &str = "api/chat/conversations";

/// Non-streaming chat completion
pub const CHAT_MESSAGE: &str = "api/chat/message";

/// Streaming chat completion
pub const CHAT_STREAM: &str = "api/chat/stream";

/// Precomputed dashboard state
pub const DASHBOARD: &str = "api/dashboard";

/// AI insight generation
pub const INSIGHTS_GENERATE: &str = "api/insights/generate";

/// Training pattern detections
pub const INSIGHTS_PATTERNS: &str = "api/insights/patterns";

/// Fatigue score
pub const INSIGHTS_FATIGUE: &str = "api/insights/fatigue";
