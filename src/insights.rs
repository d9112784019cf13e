//! Rule-Based Coaching Insights
//!
//! Three independent detectors run over a snapshot of the log:
//! - plateau: recent best below all-time best
//! - volume drop: recent volume well below the earlier baseline
//! - neglected muscle group: nothing in a group trained lately
//!
//! `today` is always passed in so results depend only on the inputs.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analysis::{max_weight_by_exercise, total_volume};
use crate::config::EngineConfig;
use crate::models::{MuscleGroupMap, WorkoutEntry};

// ---------------------------------------------------------------------------
/// Insight: One advisory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    /// Best weight inside the window is below the all-time best
    Plateau {
        exercise: String,
        recent_best: f64,
        all_time_best: f64,
    },
    /// Integer-truncated percentage drop versus the earlier baseline
    VolumeDrop { percent: i64 },
    /// No exercise from the group logged inside the window
    NeglectedGroup { group: String, days: i64 },
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plateau { exercise, .. } => write!(
                f,
                "Plateau on {}: Recent PR lower than your all-time best.",
                exercise
            ),
            Self::VolumeDrop { percent } => write!(
                f,
                "Volume dropped {}% compared to your previous week.",
                percent
            ),
            Self::NeglectedGroup { group, days } => {
                write!(f, "You haven't trained {} in over {} days.", group, days)
            }
        }
    }
}

/// `today - days`, with negative windows treated as zero and anything
/// reaching past the calendar clamped to its first day
fn window_start(today: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days.max(0))
        .and_then(|span| today.checked_sub_signed(span))
        .unwrap_or(NaiveDate::MIN)
}

/// Entries dated within `[today - days, today]`
fn in_window(entry: &WorkoutEntry, today: NaiveDate, days: i64) -> bool {
    entry.date() >= window_start(today, days) && entry.date() <= today
}

// ---------------------------------------------------------------------------
/// Detectors
// ---------------------------------------------------------------------------

/// Flag every exercise whose best weight in the last `window_days` is below
/// its all-time best.
///
/// An exercise with no entries in the window counts as a recent best of 0,
/// so anything not trained lately is flagged too. Results are in exercise
/// name order.
pub fn detect_plateaus(entries: &[WorkoutEntry], today: NaiveDate, window_days: i64) -> Vec<Insight> {
    let recent = max_weight_by_exercise(entries.iter().filter(|e| in_window(e, today, window_days)));
    let all_time = max_weight_by_exercise(entries.iter());

    all_time
        .into_iter()
        .filter_map(|(exercise, all_time_best)| {
            let recent_best = recent.get(&exercise).copied().unwrap_or(0.0);
            (recent_best < all_time_best).then_some(Insight::Plateau {
                exercise,
                recent_best,
                all_time_best,
            })
        })
        .collect()
}

/// Compare volume after `today - window_days` against everything on or
/// before it. Reports when the drop is strictly above `threshold_pct`.
pub fn detect_volume_drop(
    entries: &[WorkoutEntry],
    today: NaiveDate,
    window_days: i64,
    threshold_pct: f64,
) -> Vec<Insight> {
    let boundary = window_start(today, window_days);

    let recent = total_volume(entries.iter().filter(|e| e.date() > boundary));
    let past = total_volume(entries.iter().filter(|e| e.date() <= boundary));

    // No baseline to compare against
    if past == 0.0 {
        return Vec::new();
    }

    let drop_pct = 100.0 * (past - recent) / past;
    if drop_pct > threshold_pct {
        vec![Insight::VolumeDrop {
            percent: drop_pct.trunc() as i64,
        }]
    } else {
        Vec::new()
    }
}

/// One advisory per group, in map order, with no exact-name match among
/// entries in the last `window_days`. Groups with no exercises, or only
/// exercises never logged, are always reported.
pub fn detect_neglected_groups(
    entries: &[WorkoutEntry],
    groups: &MuscleGroupMap,
    today: NaiveDate,
    window_days: i64,
) -> Vec<Insight> {
    let recent: Vec<&WorkoutEntry> = entries
        .iter()
        .filter(|e| in_window(e, today, window_days))
        .collect();

    groups
        .iter()
        .filter(|group| !recent.iter().any(|e| group.includes(e.exercise())))
        .map(|group| Insight::NeglectedGroup {
            group: group.name.clone(),
            days: window_days,
        })
        .collect()
}

// ---------------------------------------------------------------------------
/// Engine
// ---------------------------------------------------------------------------

/// Plateaus, then volume drop, then neglected groups. No deduplication or
/// reordering.
pub fn generate_insights(
    entries: &[WorkoutEntry],
    groups: &MuscleGroupMap,
    today: NaiveDate,
    config: &EngineConfig,
) -> Vec<Insight> {
    let plateaus = detect_plateaus(entries, today, config.plateau_window_days);
    let volume = detect_volume_drop(
        entries,
        today,
        config.volume_drop_window_days,
        config.volume_drop_threshold_pct,
    );
    let neglected = detect_neglected_groups(entries, groups, today, config.neglect_window_days);

    tracing::debug!(
        entries = entries.len(),
        plateaus = plateaus.len(),
        volume = volume.len(),
        neglected = neglected.len(),
        "Generated insights"
    );

    let mut report = plateaus;
    report.extend(volume);
    report.extend(neglected);
    report
}

/// Human-readable advisories for the presentation layer
pub fn generate_report(
    entries: &[WorkoutEntry],
    groups: &MuscleGroupMap,
    today: NaiveDate,
    config: &EngineConfig,
) -> Vec<String> {
    generate_insights(entries, groups, today, config)
        .iter()
        .map(Insight::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
