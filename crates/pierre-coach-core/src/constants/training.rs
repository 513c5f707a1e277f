// ABOUTME: Training metric constants for load and streak computation
// ABOUTME: Window sizes and the activity-type intensity factor table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Trailing window for training load, in days
pub const TRAINING_LOAD_WINDOW_DAYS: i64 = 7;

/// Window for upcoming events, in days
pub const UPCOMING_EVENT_WINDOW_DAYS: i64 = 90;

/// Number of recent activities requested for context
pub const RECENT_ACTIVITY_LIMIT: u32 = 20;

/// Intensity factor for activity types not in the table
pub const DEFAULT_INTENSITY_FACTOR: f64 = 0.8;

/// Intensity factor per normalized activity type
pub const INTENSITY_FACTORS: [(&str, f64); 6] = [
    ("easy", 0.6),
    ("long", 0.7),
    ("tempo", 1.2),
    ("interval", 1.5),
    ("intervals", 1.5),
    ("race", 1.5),
];

/// Insights requested per generation call unless configured otherwise
pub const DEFAULT_MAX_INSIGHTS: u32 = 5;
