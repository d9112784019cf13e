//! SQLite-backed workout log
//!
//! The insight engine never touches this module; callers read a snapshot
//! with [`snapshot`] and hand it over.

use chrono::NaiveDate;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::models::{EntryError, StoredEntry, WorkoutEntry};

pub type DbPool = SqlitePool;

#[derive(Error, Debug)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Failed to create data directory: {0}")]
  Io(#[from] std::io::Error),

  #[error("Stored entry {id} is invalid: {source}")]
  Corrupt {
    id: i64,
    #[source]
    source: EntryError,
  },
}

#[derive(Debug, sqlx::FromRow)]
struct WorkoutRow {
  id: i64,
  date: NaiveDate,
  exercise: String,
  sets: i64,
  reps: i64,
  weight: f64,
}

impl TryFrom<WorkoutRow> for StoredEntry {
  type Error = StoreError;

  fn try_from(row: WorkoutRow) -> Result<Self, Self::Error> {
    // Out-of-range counts become 0 and fail validation below
    let sets = u32::try_from(row.sets).unwrap_or(0);
    let reps = u32::try_from(row.reps).unwrap_or(0);

    let entry = WorkoutEntry::new(row.date, row.exercise, sets, reps, row.weight)
      .map_err(|source| StoreError::Corrupt { id: row.id, source })?;

    Ok(StoredEntry { id: row.id, entry })
  }
}

/// Open (creating if needed) the database file and run migrations
pub async fn initialize_db(db_path: &Path) -> Result<DbPool, StoreError> {
  if let Some(parent) = db_path.parent() {
    fs::create_dir_all(parent)?;
  }
  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

  tracing::info!(path = %db_path.display(), "Initializing workout log");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  Ok(pool)
}

/// In-memory log. A single connection, since each new connection to
/// `sqlite::memory:` would see its own empty database.
pub async fn connect_in_memory() -> Result<DbPool, StoreError> {
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  Ok(pool)
}

/// Append an entry, returning its new id
pub async fn append_entry(pool: &DbPool, entry: &WorkoutEntry) -> Result<i64, StoreError> {
  let result = sqlx::query(
    r#"
    INSERT INTO workouts (date, exercise, sets, reps, weight)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
  )
  .bind(entry.date())
  .bind(entry.exercise())
  .bind(i64::from(entry.sets()))
  .bind(i64::from(entry.reps()))
  .bind(entry.weight())
  .execute(pool)
  .await?;

  let id = result.last_insert_rowid();
  tracing::debug!(id, exercise = entry.exercise(), "Logged entry");
  Ok(id)
}

/// All entries, newest date first
pub async fn list_entries(pool: &DbPool) -> Result<Vec<StoredEntry>, StoreError> {
  let rows: Vec<WorkoutRow> = sqlx::query_as(
    "SELECT id, date, exercise, sets, reps, weight FROM workouts ORDER BY date DESC, id DESC",
  )
  .fetch_all(pool)
  .await?;

  rows.into_iter().map(StoredEntry::try_from).collect()
}

/// Delete by id. Returns false when no such entry existed.
pub async fn delete_entry(pool: &DbPool, id: i64) -> Result<bool, StoreError> {
  let result = sqlx::query("DELETE FROM workouts WHERE id = ?1")
    .bind(id)
    .execute(pool)
    .await?;

  Ok(result.rows_affected() > 0)
}

/// Entries without ids, as consumed by the analysis and insight modules
pub async fn snapshot(pool: &DbPool) -> Result<Vec<WorkoutEntry>, StoreError> {
  Ok(list_entries(pool).await?.into_iter().map(|stored| stored.entry).collect())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{date, entry, setup_test_db, teardown_test_db};

  #[tokio::test]
  async fn test_append_and_list_newest_first() {
    let pool = setup_test_db().await;

    let first = append_entry(&pool, &entry(date(2025, 3, 1), "Squat", 5, 5, 120.0))
      .await
      .expect("Should append");
    let second = append_entry(&pool, &entry(date(2025, 3, 4), "Bench Press", 3, 10, 100.0))
      .await
      .expect("Should append");
    assert_ne!(first, second);

    let stored = list_entries(&pool).await.expect("Should list");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, second);
    assert_eq!(stored[0].entry.exercise(), "Bench Press");
    assert_eq!(stored[0].entry.date(), date(2025, 3, 4));
    assert_eq!(stored[1].entry.sets(), 5);
    assert_eq!(stored[1].entry.weight(), 120.0);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_delete_entry() {
    let pool = setup_test_db().await;
    let id = append_entry(&pool, &entry(date(2025, 3, 1), "Squat", 5, 5, 120.0))
      .await
      .expect("Should append");

    assert!(delete_entry(&pool, id).await.expect("Should delete"));
    assert!(!delete_entry(&pool, id).await.expect("Second delete should succeed"));
    assert!(list_entries(&pool).await.expect("Should list").is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_snapshot_feeds_report() {
    let pool = setup_test_db().await;
    append_entry(&pool, &entry(date(2025, 3, 1), "Squat", 5, 5, 120.0))
      .await
      .expect("Should append");

    let entries = snapshot(&pool).await.expect("Should snapshot");
    let report = crate::insights::generate_report(
      &entries,
      &crate::models::MuscleGroupMap::default(),
      date(2025, 3, 2),
      &crate::config::EngineConfig::default(),
    );
    // Legs trained yesterday; the other four groups are neglected
    assert_eq!(report.len(), 4);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_schema_rejects_invalid_rows() {
    let pool = setup_test_db().await;

    let inserted = sqlx::query(
      "INSERT INTO workouts (date, exercise, sets, reps, weight) VALUES ('2025-03-01', 'Squat', 5, 5, -1.0)",
    )
    .execute(&pool)
    .await;
    assert!(inserted.is_err(), "Schema should reject negative weight");

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_invalid_row_converts_to_corrupt_error() {
    let row = WorkoutRow {
      id: 7,
      date: date(2025, 3, 1),
      exercise: "Squat".to_string(),
      sets: -3,
      reps: 5,
      weight: 100.0,
    };

    let err = StoredEntry::try_from(row).unwrap_err();
    assert!(matches!(
      err,
      StoreError::Corrupt { id: 7, source: EntryError::ZeroSets }
    ));
  }

  #[tokio::test]
  async fn test_initialize_db_creates_file() {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("nested").join("liftlog.db");

    let pool = initialize_db(&path).await.expect("Should initialize");
    append_entry(&pool, &entry(date(2025, 3, 1), "Deadlift", 1, 5, 180.0))
      .await
      .expect("Should append");
    assert!(path.exists());

    teardown_test_db(pool).await;
  }
}
