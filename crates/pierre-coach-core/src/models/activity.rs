// ABOUTME: Activity, race event, and weekly statistics models
// ABOUTME: Inputs to training load and streak computation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a workout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    /// Scheduled but not yet done
    #[default]
    Planned,
    /// Done and recorded
    Completed,
    /// Deliberately skipped
    Skipped,
    /// Removed from the plan
    Cancelled,
    /// Any status this client does not know about
    #[serde(other)]
    Other,
}

/// A planned or completed workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Activity identifier
    #[serde(deserialize_with = "super::string_or_number::deserialize")]
    pub id: String,
    /// Workout type (`easy_run`, `tempo_run`, `interval`, `race`, ...)
    #[serde(alias = "type", default)]
    pub activity_type: String,
    /// Lifecycle status
    #[serde(default)]
    pub status: ActivityStatus,
    /// Duration in seconds
    #[serde(default)]
    pub duration_seconds: u64,
    /// Distance in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    /// Day the workout was scheduled for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    /// When the workout was completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Activity {
    /// Completion time, only for activities in `completed` status
    #[must_use]
    pub fn completion_time(&self) -> Option<DateTime<Utc>> {
        if self.status == ActivityStatus::Completed {
            self.completed_at
        } else {
            None
        }
    }
}

/// A race or other dated event the athlete is training for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceEvent {
    /// Event identifier
    #[serde(deserialize_with = "super::string_or_number::deserialize")]
    pub id: String,
    /// Event name
    #[serde(default)]
    pub name: String,
    /// Start time of the event
    pub date: DateTime<Utc>,
    /// Race distance in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    /// A/B/C race priority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

/// Aggregate training volume for the current week
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeeklyStats {
    /// Total distance in meters
    pub total_distance_meters: f64,
    /// Total duration in seconds
    pub total_duration_seconds: u64,
    /// Activities scheduled this week
    pub activity_count: u32,
    /// Activities completed this week
    pub completed_count: u32,
}
