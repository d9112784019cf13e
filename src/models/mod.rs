pub mod catalog;
pub mod entry;

pub use catalog::{ExerciseCatalog, MuscleGroup, MuscleGroupMap};
pub use entry::{EntryError, StoredEntry, WorkoutEntry};
