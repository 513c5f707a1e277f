// ABOUTME: Wire and domain models exchanged with the Pierre coaching backend
// ABOUTME: Profile, activities, races, chat, dashboard, insights, and aggregated context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Models are deserialized leniently: unknown fields are ignored and missing optional
//! fields fall back to defaults, because the backend evolves independently of clients.

mod activity;
mod context;
mod conversation;
mod dashboard;
mod profile;

pub use activity::{Activity, ActivityStatus, RaceEvent, WeeklyStats};
pub use context::AggregatedContext;
pub use conversation::{
    ChatMessage, ChatRequest, ChatResponse, ConversationMessage, ConversationSummary, Sender,
};
pub use dashboard::{
    CardCta, DashboardCard, DashboardState, FatigueScore, Insight, InsightRequest,
    InsightResponse, TrainingPattern,
};
pub use profile::UserProfile;

/// Accept identifiers sent either as JSON strings or numbers
pub(crate) mod string_or_number {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "expected string or number identifier, got {other}"
            ))),
        }
    }
}
