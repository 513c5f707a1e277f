// ABOUTME: Derived training metrics computed from raw activity lists
// ABOUTME: Intensity-weighted training load, consecutive-day streak, and event window filtering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Duration, NaiveDate, Utc};
use pierre_coach_core::constants::training::{
    DEFAULT_INTENSITY_FACTOR, INTENSITY_FACTORS, TRAINING_LOAD_WINDOW_DAYS,
    UPCOMING_EVENT_WINDOW_DAYS,
};
use pierre_coach_core::models::{Activity, RaceEvent};

/// Intensity multiplier for an activity type
///
/// Matching ignores case and a trailing `_run`, so `tempo_run` and `Tempo` both map
/// to the tempo factor. Unknown types get the default factor.
#[must_use]
pub fn intensity_factor(activity_type: &str) -> f64 {
    let normalized = activity_type.trim().to_ascii_lowercase();
    let key = normalized.strip_suffix("_run").unwrap_or(&normalized);
    INTENSITY_FACTORS
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(DEFAULT_INTENSITY_FACTOR, |(_, factor)| *factor)
}

/// Intensity-weighted minutes completed in the trailing window ending at `now`
///
/// Each completed activity contributes `minutes * intensity_factor(type)`; the sum is
/// rounded to the nearest integer.
#[must_use]
pub fn training_load(activities: &[Activity], now: DateTime<Utc>) -> u32 {
    let window_start = now - Duration::days(TRAINING_LOAD_WINDOW_DAYS);

    let load: f64 = activities
        .iter()
        .filter(|activity| {
            activity
                .completion_time()
                .is_some_and(|at| at >= window_start && at <= now)
        })
        .map(|activity| {
            let minutes = activity.duration_seconds as f64 / 60.0;
            minutes * intensity_factor(&activity.activity_type)
        })
        .sum();

    load.round() as u32
}

/// Number of consecutive training days ending today or yesterday (UTC)
///
/// Completion days are walked newest first from a cursor starting at today. A day equal
/// to the cursor, or exactly one day before it, extends the streak and moves the cursor;
/// any larger gap ends the walk. Completions dated after `now` are ignored.
#[must_use]
pub fn current_streak(activities: &[Activity], now: DateTime<Utc>) -> u32 {
    let mut days: Vec<NaiveDate> = activities
        .iter()
        .filter_map(Activity::completion_time)
        .map(|at| at.date_naive())
        .collect();
    days.sort_unstable_by(|a, b| b.cmp(a));

    let mut cursor = now.date_naive();
    let mut streak = 0;
    for day in days {
        match (cursor - day).num_days() {
            gap if gap < 0 => {}
            0 | 1 => {
                streak += 1;
                cursor = day;
            }
            _ => break,
        }
    }
    streak
}

/// Events dated within `[now, now + 90 days]`, soonest first
#[must_use]
pub fn filter_upcoming_events(events: Vec<RaceEvent>, now: DateTime<Utc>) -> Vec<RaceEvent> {
    let horizon = now + Duration::days(UPCOMING_EVENT_WINDOW_DAYS);
    let mut upcoming: Vec<RaceEvent> = events
        .into_iter()
        .filter(|event| event.date >= now && event.date <= horizon)
        .collect();
    upcoming.sort_by_key(|event| event.date);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_factor_normalization() {
        assert!((intensity_factor("tempo_run") - 1.2).abs() < f64::EPSILON);
        assert!((intensity_factor("Interval") - 1.5).abs() < f64::EPSILON);
        assert!((intensity_factor("intervals") - 1.5).abs() < f64::EPSILON);
        assert!((intensity_factor("race") - 1.5).abs() < f64::EPSILON);
        assert!((intensity_factor("swim") - DEFAULT_INTENSITY_FACTOR).abs() < f64::EPSILON);
        assert!((intensity_factor("") - DEFAULT_INTENSITY_FACTOR).abs() < f64::EPSILON);
    }
}
