use serde::{Deserialize, Serialize};

const DEFAULT_EXERCISES: &[&str] = &[
  "Bench Press",
  "Incline Bench",
  "Dumbbell Press",
  "Deadlift",
  "Barbell Row",
  "Lat Pulldown",
  "Squat",
  "Leg Press",
  "Lunges",
  "Overhead Press",
  "Lateral Raise",
  "Barbell Curl",
  "Tricep Pushdown",
];

const DEFAULT_MUSCLE_GROUPS: &[(&str, &[&str])] = &[
  ("Chest", &["Bench Press", "Incline Bench", "Dumbbell Press"]),
  ("Back", &["Deadlift", "Barbell Row", "Lat Pulldown"]),
  ("Legs", &["Squat", "Leg Press", "Lunges"]),
  ("Shoulders", &["Overhead Press", "Lateral Raise"]),
  ("Arms", &["Barbell Curl", "Tricep Pushdown"]),
];

/// ---------------------------------------------------------------------------
/// Exercise Catalog
/// ---------------------------------------------------------------------------

/// Canonical exercise names in insertion order. Order only matters for
/// breaking ties when resolving a fuzzy name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ExerciseCatalog {
  names: Vec<String>,
}

impl ExerciseCatalog {
  /// Build a catalog, keeping the first occurrence of any repeated name
  pub fn new<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut unique: Vec<String> = Vec::new();
    for name in names {
      let name = name.into();
      if !unique.contains(&name) {
        unique.push(name);
      }
    }
    Self { names: unique }
  }

  pub fn names(&self) -> &[String] {
    &self.names
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.names.iter().map(String::as_str)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.names.iter().any(|n| n == name)
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

impl Default for ExerciseCatalog {
  fn default() -> Self {
    Self::new(DEFAULT_EXERCISES.iter().copied())
  }
}

impl From<Vec<String>> for ExerciseCatalog {
  fn from(names: Vec<String>) -> Self {
    Self::new(names)
  }
}

impl From<ExerciseCatalog> for Vec<String> {
  fn from(catalog: ExerciseCatalog) -> Self {
    catalog.names
  }
}

/// ---------------------------------------------------------------------------
/// Muscle Groups
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuscleGroup {
  pub name: String,
  pub exercises: Vec<String>,
}

impl MuscleGroup {
  /// Exact, case-sensitive membership
  pub fn includes(&self, exercise: &str) -> bool {
    self.exercises.iter().any(|e| e == exercise)
  }
}

/// Muscle-group label to exercise names, kept in insertion order. Stored as a
/// JSON array so config files keep their ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MuscleGroupMap {
  groups: Vec<MuscleGroup>,
}

impl MuscleGroupMap {
  pub fn new() -> Self {
    Self { groups: Vec::new() }
  }

  /// Add a group, or replace the exercises of an existing group in place
  pub fn insert<S: Into<String>>(&mut self, name: impl Into<String>, exercises: impl IntoIterator<Item = S>) {
    let name = name.into();
    let exercises: Vec<String> = exercises.into_iter().map(Into::into).collect();
    match self.groups.iter_mut().find(|g| g.name == name) {
      Some(group) => group.exercises = exercises,
      None => self.groups.push(MuscleGroup { name, exercises }),
    }
  }

  pub fn get(&self, name: &str) -> Option<&MuscleGroup> {
    self.groups.iter().find(|g| g.name == name)
  }

  pub fn iter(&self) -> impl Iterator<Item = &MuscleGroup> {
    self.groups.iter()
  }

  pub fn len(&self) -> usize {
    self.groups.len()
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }
}

impl Default for MuscleGroupMap {
  fn default() -> Self {
    let mut map = Self::new();
    for (name, exercises) in DEFAULT_MUSCLE_GROUPS {
      map.insert(*name, exercises.iter().copied());
    }
    map
  }
}
