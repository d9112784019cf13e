//! Natural-language workout extraction
//!
//! Turns sentences like "3x10 bench press at 100" or
//! "squat 4 sets of 6 reps at 100" into a [`ParsedCandidate`]. Phrasings are
//! an ordered list of strategies; the first one that matches wins, so a new
//! phrasing can be appended without changing how existing ones resolve.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use thiserror::Error;

// ---------------------------------------------------------------------------
/// Error Types
// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("couldn't understand that, try a format like '3x8 squat at 100'")]
    NoPatternMatch,
}

// ---------------------------------------------------------------------------
/// Parsed Candidate
// ---------------------------------------------------------------------------

/// Raw fields pulled out of the text. The exercise phrase is not yet
/// matched against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCandidate {
    pub exercise_phrase: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
}

// ---------------------------------------------------------------------------
/// Strategies
// ---------------------------------------------------------------------------

/// One structural phrasing with named groups `sets`, `reps`, `exercise`
/// and `weight`
struct Strategy {
    name: &'static str,
    pattern: Regex,
}

static STRATEGIES: LazyLock<Vec<Strategy>> = LazyLock::new(|| {
    vec![
        // 3x10 bench press at 100
        Strategy {
            name: "sets_x_reps",
            pattern: Regex::new(
                r"(?P<sets>\d+)\s*[xX×*]\s*(?P<reps>\d+)\s*(?P<exercise>.+?)\s*(?:\bat\b\s*)?(?P<weight>\d+(?:\.\d+)?)",
            )
            .expect("sets_x_reps pattern is valid"),
        },
        // bench press 3 sets of 10 reps at 100
        Strategy {
            name: "sets_of_reps",
            pattern: Regex::new(
                r"(?P<exercise>[a-z\s]+)\s*(?P<sets>\d+)\s*sets?\s*(?:of\s*)?(?P<reps>\d+)\s*reps?\s*(?:\bat\b\s*)?(?P<weight>\d+(?:\.\d+)?)",
            )
            .expect("sets_of_reps pattern is valid"),
        },
    ]
});

impl Strategy {
    /// `None` when the pattern is absent; `Some(Err)` when it matched but a
    /// captured number is unusable
    fn apply(&self, text: &str) -> Option<Result<ParsedCandidate, ExtractError>> {
        let caps = self.pattern.captures(text)?;
        Some(candidate_from(&caps))
    }
}

fn candidate_from(caps: &Captures<'_>) -> Result<ParsedCandidate, ExtractError> {
    let group = |name: &str| caps.name(name).map(|m| m.as_str()).ok_or(ExtractError::NoPatternMatch);

    let sets = parse_count(group("sets")?)?;
    let reps = parse_count(group("reps")?)?;
    let weight: f64 = group("weight")?
        .parse()
        .map_err(|_| ExtractError::NoPatternMatch)?;
    if !weight.is_finite() {
        return Err(ExtractError::NoPatternMatch);
    }

    let exercise_phrase = group("exercise")?.trim().to_string();
    if exercise_phrase.is_empty() {
        return Err(ExtractError::NoPatternMatch);
    }

    Ok(ParsedCandidate {
        exercise_phrase,
        sets,
        reps,
        weight,
    })
}

/// Sets and reps must be positive and fit in a u32
fn parse_count(raw: &str) -> Result<u32, ExtractError> {
    match raw.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ExtractError::NoPatternMatch),
    }
}

// ---------------------------------------------------------------------------
/// Extraction
// ---------------------------------------------------------------------------

/// Extract sets, reps, weight and the exercise phrase from free text.
///
/// The first strategy whose pattern occurs anywhere in the text decides the
/// outcome. A structural match whose numbers fail to parse is still a
/// failure; later strategies are not consulted for it.
pub fn extract(text: &str) -> Result<ParsedCandidate, ExtractError> {
    let lowered = text.to_lowercase();

    for strategy in STRATEGIES.iter() {
        if let Some(result) = strategy.apply(&lowered) {
            tracing::debug!(strategy = strategy.name, ok = result.is_ok(), "Extraction pattern matched");
            return result;
        }
    }

    tracing::debug!(input = text, "No extraction pattern matched");
    Err(ExtractError::NoPatternMatch)
}
