//! Strength-training log with natural-language entry and coaching insights
//!
//! - [`resolver::parse_workout_input`] turns "3x10 bench press at 100" into a
//!   structured lift with a canonical exercise name
//! - [`insights::generate_report`] runs the plateau, volume-drop and
//!   neglected-muscle-group detectors over a snapshot of the log
//! - [`db`] is a SQLite log store the engine itself never depends on

pub mod analysis;
pub mod config;
pub mod db;
pub mod insights;
pub mod models;
pub mod parser;
pub mod resolver;

#[cfg(test)]
mod test_utils;

pub use config::{ConfigError, EngineConfig};
pub use insights::{generate_insights, generate_report, Insight};
pub use models::{EntryError, ExerciseCatalog, MuscleGroupMap, StoredEntry, WorkoutEntry};
pub use parser::{extract, ExtractError, ParsedCandidate};
pub use resolver::{parse_workout_input, resolve, ParsedLift, SimilarityScorer, WeightedRatio};
