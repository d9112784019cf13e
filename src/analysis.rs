//! Deterministic aggregation over a snapshot of workout entries
//!
//! Everything here is a pure function of the entries passed in: no entry is
//! mutated and empty input gives empty output. The dashboard and the insight
//! detectors share these numbers.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::WorkoutEntry;

/// ---------------------------------------------------------------------------
/// Grouped Sums and Maxima
/// ---------------------------------------------------------------------------

/// Total training volume per exercise name
pub fn volume_by_exercise(entries: &[WorkoutEntry]) -> BTreeMap<String, f64> {
  let mut totals = BTreeMap::new();
  for entry in entries {
    *totals.entry(entry.exercise().to_string()).or_insert(0.0) += entry.volume();
  }
  totals
}

/// Heaviest weight logged per exercise name
pub fn personal_records(entries: &[WorkoutEntry]) -> BTreeMap<String, f64> {
  max_weight_by_exercise(entries.iter())
}

/// Total training volume per calendar date
pub fn daily_volume(entries: &[WorkoutEntry]) -> BTreeMap<NaiveDate, f64> {
  let mut totals = BTreeMap::new();
  for entry in entries {
    *totals.entry(entry.date()).or_insert(0.0) += entry.volume();
  }
  totals
}

/// Max weight per exercise over any subset of entries (used for windowed PRs)
pub(crate) fn max_weight_by_exercise<'a>(
  entries: impl Iterator<Item = &'a WorkoutEntry>,
) -> BTreeMap<String, f64> {
  let mut maxima: BTreeMap<String, f64> = BTreeMap::new();
  for entry in entries {
    maxima
      .entry(entry.exercise().to_string())
      .and_modify(|best| *best = best.max(entry.weight()))
      .or_insert(entry.weight());
  }
  maxima
}

/// Sum of volume over any subset of entries
pub(crate) fn total_volume<'a>(entries: impl Iterator<Item = &'a WorkoutEntry>) -> f64 {
  entries.map(WorkoutEntry::volume).sum()
}

/// ---------------------------------------------------------------------------
/// Dashboard Views
/// ---------------------------------------------------------------------------

/// Exercises by total volume, largest first
pub fn ranked_volume(entries: &[WorkoutEntry]) -> Vec<(String, f64)> {
  rank_descending(volume_by_exercise(entries))
}

/// Exercises by personal record, heaviest first
pub fn ranked_records(entries: &[WorkoutEntry]) -> Vec<(String, f64)> {
  rank_descending(personal_records(entries))
}

/// Values descending; equal values keep name order
fn rank_descending(values: BTreeMap<String, f64>) -> Vec<(String, f64)> {
  let mut ranked: Vec<(String, f64)> = values.into_iter().collect();
  ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
  ranked
}

/// The `n` most recent entries, newest date first. Entries sharing a date
/// keep their snapshot order.
pub fn recent_sessions(entries: &[WorkoutEntry], n: usize) -> Vec<&WorkoutEntry> {
  let mut sorted: Vec<&WorkoutEntry> = entries.iter().collect();
  sorted.sort_by(|a, b| b.date().cmp(&a.date()));
  sorted.truncate(n);
  sorted
}
