//! Exercise name resolution
//!
//! Maps a raw phrase onto the closest canonical catalog name. Scoring sits
//! behind [`SimilarityScorer`]; the only policy here is the acceptance
//! threshold and the earliest-entry-wins tie-break.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::config::EngineConfig;
use crate::models::{ExerciseCatalog, WorkoutEntry};
use crate::parser::{self, ExtractError};

// ---------------------------------------------------------------------------
/// Similarity Scoring
// ---------------------------------------------------------------------------

/// Approximate string similarity in `[0, 100]`
pub trait SimilarityScorer {
    fn score(&self, a: &str, b: &str) -> f64;
}

/// Weight applied to token-set matches so an exact match always ranks above a
/// subset match
const TOKEN_SET_WEIGHT: f64 = 0.95;

/// Case-insensitive Levenshtein ratio, combined with a token-set ratio so
/// word order and missing words ("bench" vs "Bench Press") still score well
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedRatio;

impl SimilarityScorer for WeightedRatio {
    fn score(&self, a: &str, b: &str) -> f64 {
        let a = a.to_lowercase();
        let b = b.to_lowercase();
        ratio(&a, &b).max(TOKEN_SET_WEIGHT * token_set_ratio(&a, &b))
    }
}

fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let shared = join(tokens_a.intersection(&tokens_b));
    let only_a = join(tokens_a.difference(&tokens_b));
    let only_b = join(tokens_b.difference(&tokens_a));

    if !shared.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 100.0;
    }

    let with_a = join_nonempty(&shared, &only_a);
    let with_b = join_nonempty(&shared, &only_b);

    let mut best = ratio(&with_a, &with_b);
    if !shared.is_empty() {
        best = best.max(ratio(&shared, &with_a)).max(ratio(&shared, &with_b));
    }
    best
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn join_nonempty(left: &str, right: &str) -> String {
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right.to_string(),
        (_, true) => left.to_string(),
        _ => format!("{} {}", left, right),
    }
}

// ---------------------------------------------------------------------------
/// Resolution
// ---------------------------------------------------------------------------

/// Collapse whitespace and title-case: a letter is uppercased when it follows
/// a non-letter, so "  t-bar ROW " -> "T-Bar Row"
pub fn normalize(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut out = String::with_capacity(collapsed.len());
    let mut after_letter = false;
    for c in collapsed.chars() {
        if after_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    out
}

/// Best catalog match for `raw`, or its normalized form when nothing scores
/// at least `threshold`. Never fails.
pub fn resolve(
    raw: &str,
    catalog: &ExerciseCatalog,
    scorer: &dyn SimilarityScorer,
    threshold: f64,
) -> String {
    let normalized = normalize(raw);

    let mut best: Option<(&str, f64)> = None;
    for name in catalog.iter() {
        let score = scorer.score(&normalized, name);
        // Strictly greater keeps the earliest entry on ties
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((name, score));
        }
    }

    match best {
        Some((name, score)) if score >= threshold => {
            tracing::debug!(raw, resolved = name, score, "Resolved exercise name");
            name.to_string()
        }
        _ => {
            tracing::debug!(raw, fallback = %normalized, "No catalog match above threshold");
            normalized
        }
    }
}

// ---------------------------------------------------------------------------
/// Full Pipeline
// ---------------------------------------------------------------------------

/// Extracted and resolved lift, ready to be dated and logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLift {
    pub exercise: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
}

impl ParsedLift {
    pub fn into_entry(self, date: chrono::NaiveDate) -> Result<WorkoutEntry, crate::models::EntryError> {
        WorkoutEntry::new(date, self.exercise, self.sets, self.reps, self.weight)
    }
}

impl fmt::Display for ParsedLift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug keeps the decimal point on whole weights: "100.0", "12.25"
        write!(f, "{}x{} {} at {:?}kg", self.sets, self.reps, self.exercise, self.weight)
    }
}

/// Extract a lift from free text and canonicalize its exercise name
pub fn parse_workout_input(
    text: &str,
    catalog: &ExerciseCatalog,
    config: &EngineConfig,
) -> Result<ParsedLift, ExtractError> {
    let candidate = parser::extract(text)?;
    let exercise = resolve(
        &candidate.exercise_phrase,
        catalog,
        &WeightedRatio,
        config.match_threshold,
    );

    Ok(ParsedLift {
        exercise,
        sets: candidate.sets,
        reps: candidate.reps,
        weight: candidate.weight,
    })
}
