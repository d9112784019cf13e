//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Entry factories
//! - A fixed "today" so date windows are reproducible
//! - Helper assertions

use chrono::{Duration, NaiveDate};
use sqlx::SqlitePool;

use crate::models::WorkoutEntry;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database with migrations applied
pub async fn setup_test_db() -> SqlitePool {
  crate::db::connect_in_memory()
    .await
    .expect("Failed to create in-memory database")
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// ---------------------------------------------------------------------------
/// Entry Factories
/// ---------------------------------------------------------------------------

pub fn entry(date: NaiveDate, exercise: &str, sets: u32, reps: u32, weight: f64) -> WorkoutEntry {
  WorkoutEntry::new(date, exercise, sets, reps, weight).expect("Test entry should be valid")
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(year, month, day).expect("Valid test date")
}

/// Fixed reference date for window tests
pub fn today() -> NaiveDate {
  date(2025, 6, 15)
}

/// The date N days before [`today`]
pub fn days_ago(days: i64) -> NaiveDate {
  today() - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> =
      sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = 'workouts'")
        .fetch_all(&pool)
        .await
        .expect("Failed to query tables");
    assert_eq!(tables.len(), 1);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_days_ago_counts_back_from_fixed_today() {
    assert_eq!(days_ago(0), today());
    assert_eq!(days_ago(15), date(2025, 5, 31));
  }
}
