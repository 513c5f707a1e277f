// ABOUTME: Aggregated coaching context sent to AI insight generation
// ABOUTME: Every field always carries a value, defaulted when its source failed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Activity, ConversationMessage, RaceEvent, UserProfile, WeeklyStats};

/// Snapshot of everything the coach knows about the athlete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedContext {
    /// Athlete profile
    pub profile: UserProfile,
    /// Most recent activities, newest first, at most 20
    pub recent_activities: Vec<Activity>,
    /// Events within the next 90 days, soonest first
    pub upcoming_events: Vec<RaceEvent>,
    /// Current week's totals
    pub weekly_stats: WeeklyStats,
    /// Last conversation messages in chronological order, at most 10
    pub recent_messages: Vec<ConversationMessage>,
    /// Consecutive training days ending today or yesterday
    pub current_streak: u32,
    /// Intensity-weighted minutes over the trailing 7 days
    pub training_load: u32,
    /// When this snapshot was built
    pub aggregated_at: DateTime<Utc>,
}

impl AggregatedContext {
    /// Context with only a profile; every other field at its neutral default
    #[must_use]
    pub fn empty(profile: UserProfile, aggregated_at: DateTime<Utc>) -> Self {
        Self {
            profile,
            recent_activities: Vec::new(),
            upcoming_events: Vec::new(),
            weekly_stats: WeeklyStats::default(),
            recent_messages: Vec::new(),
            current_streak: 0,
            training_load: 0,
            aggregated_at,
        }
    }
}
