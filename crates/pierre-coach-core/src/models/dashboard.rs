// ABOUTME: Dashboard, AI insight, training pattern, and fatigue models
// ABOUTME: Implements card ordering and partial-update merging of insight responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AggregatedContext;

/// Call to action attached to a dashboard card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardCta {
    /// Button label
    pub label: String,
    /// Action identifier understood by the UI
    pub action: String,
    /// Optional action payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A card on the coaching dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardCard {
    /// Card kind (`workout`, `race`, `insight`, ...)
    #[serde(rename = "type")]
    pub card_type: String,
    /// Headline
    pub title: String,
    /// Secondary headline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Body text
    #[serde(default)]
    pub content: String,
    /// Optional call to action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<CardCta>,
    /// `high`, `medium`, or `low`
    #[serde(default)]
    pub priority: String,
    /// Display position, ascending
    #[serde(default)]
    pub order: i32,
}

/// An AI-generated coaching insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Insight identifier
    #[serde(deserialize_with = "super::string_or_number::deserialize")]
    pub id: String,
    /// Insight kind (`recovery`, `performance`, `motivation`, ...)
    #[serde(rename = "type")]
    pub insight_type: String,
    /// Headline
    pub title: String,
    /// Body text
    pub message: String,
    /// Model confidence between 0 and 1
    #[serde(default)]
    pub confidence: f64,
    /// `high`, `medium`, or `low`
    #[serde(default)]
    pub priority: String,
    /// Whether the athlete can act on it
    #[serde(default)]
    pub actionable: bool,
    /// Suggested next step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// What the dashboard shows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardState {
    /// Coaching mode (`build`, `taper`, `recovery`, ...)
    pub mode: String,
    /// Greeting line
    pub greeting: String,
    /// Line under the greeting
    pub subtitle: String,
    /// Cards, ascending by `order` once materialized
    pub cards: Vec<DashboardCard>,
    /// Latest AI insights
    pub insights: Vec<Insight>,
}

impl DashboardState {
    /// Return the state with cards sorted ascending by `order`
    ///
    /// The sort is stable so cards sharing an `order` keep their server ordering.
    #[must_use]
    pub fn with_sorted_cards(mut self) -> Self {
        self.cards.sort_by_key(|card| card.order);
        self
    }

    /// Merge an insight response using partial-update semantics
    ///
    /// `mode`, `greeting`, `subtitle` and `cards` are replaced only when present in the
    /// response. Insights are always replaced.
    #[must_use]
    pub fn merge_insights(mut self, response: InsightResponse) -> Self {
        if let Some(mode) = response.mode {
            self.mode = mode;
        }
        if let Some(greeting) = response.greeting {
            self.greeting = greeting;
        }
        if let Some(subtitle) = response.subtitle {
            self.subtitle = subtitle;
        }
        if let Some(cards) = response.cards {
            self.cards = cards;
        }
        self.insights = response.insights;
        self.with_sorted_cards()
    }
}

/// Body of the insight generation endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest<'a> {
    /// Aggregated athlete context
    pub context: &'a AggregatedContext,
    /// Upper bound on returned insights
    pub max_insights: u32,
}

/// Response of the insight generation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightResponse {
    /// Replacement coaching mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Replacement greeting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
    /// Replacement subtitle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Replacement cards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<DashboardCard>>,
    /// Generated insights
    pub insights: Vec<Insight>,
}

/// A detected training pattern (overtraining, monotony, skipped long runs, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPattern {
    /// Pattern identifier
    #[serde(deserialize_with = "super::string_or_number::deserialize")]
    pub id: String,
    /// Pattern kind
    #[serde(alias = "type")]
    pub pattern_type: String,
    /// Human-readable explanation
    #[serde(default)]
    pub description: String,
    /// `info`, `warning`, or `critical`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// When the pattern was detected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_at: Option<DateTime<Utc>>,
}

/// Current fatigue estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatigueScore {
    /// Score between 0 (fresh) and 100 (exhausted)
    pub score: f64,
    /// Qualitative level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// When the score was computed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computed_at: Option<DateTime<Utc>>,
}
