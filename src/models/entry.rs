use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryError {
  #[error("sets must be at least 1")]
  ZeroSets,

  #[error("reps must be at least 1")]
  ZeroReps,

  #[error("weight must be a non-negative number, got {0}")]
  InvalidWeight(f64),
}

/// One recorded set-group. Fields are private so a constructed entry always
/// satisfies sets > 0, reps > 0 and a finite, non-negative weight.
/// Deserialization goes through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkoutEntryRecord")]
pub struct WorkoutEntry {
  date: NaiveDate,
  exercise: String,
  sets: u32,
  reps: u32,
  weight: f64,
}

impl WorkoutEntry {
  pub fn new(
    date: NaiveDate,
    exercise: impl Into<String>,
    sets: u32,
    reps: u32,
    weight: f64,
  ) -> Result<Self, EntryError> {
    if sets == 0 {
      return Err(EntryError::ZeroSets);
    }
    if reps == 0 {
      return Err(EntryError::ZeroReps);
    }
    if !weight.is_finite() || weight < 0.0 {
      return Err(EntryError::InvalidWeight(weight));
    }

    Ok(Self {
      date,
      exercise: exercise.into(),
      sets,
      reps,
      weight,
    })
  }

  pub fn date(&self) -> NaiveDate {
    self.date
  }

  pub fn exercise(&self) -> &str {
    &self.exercise
  }

  pub fn sets(&self) -> u32 {
    self.sets
  }

  pub fn reps(&self) -> u32 {
    self.reps
  }

  /// Load per rep
  pub fn weight(&self) -> f64 {
    self.weight
  }

  /// sets × reps × weight
  pub fn volume(&self) -> f64 {
    f64::from(self.sets) * f64::from(self.reps) * self.weight
  }
}

/// Unchecked wire shape of [`WorkoutEntry`]
#[derive(Deserialize)]
struct WorkoutEntryRecord {
  date: NaiveDate,
  exercise: String,
  sets: u32,
  reps: u32,
  weight: f64,
}

impl TryFrom<WorkoutEntryRecord> for WorkoutEntry {
  type Error = EntryError;

  fn try_from(record: WorkoutEntryRecord) -> Result<Self, Self::Error> {
    Self::new(record.date, record.exercise, record.sets, record.reps, record.weight)
  }
}

/// An entry as held by the log store, with the store-owned identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEntry {
  pub id: i64,
  pub entry: WorkoutEntry,
}
