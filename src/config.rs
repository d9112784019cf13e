//! Engine configuration
//!
//! Thresholds and time windows are plain values passed into the engine, never
//! module-level state. `from_env` layers `LIFTLOG_*` overrides on top of the
//! defaults, after loading a `.env` file if one exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::models::MuscleGroupMap;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const DEFAULT_MATCH_THRESHOLD: f64 = 60.0;
pub const DEFAULT_PLATEAU_WINDOW_DAYS: i64 = 21;
pub const DEFAULT_VOLUME_DROP_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_VOLUME_DROP_THRESHOLD_PCT: f64 = 25.0;
pub const DEFAULT_NEGLECT_WINDOW_DAYS: i64 = 10;

/// Accepted window lengths, up to roughly a century
const WINDOW_DAYS_RANGE: RangeInclusive<i64> = 0..=36_500;

const ENV_MATCH_THRESHOLD: &str = "LIFTLOG_MATCH_THRESHOLD";
const ENV_PLATEAU_WINDOW_DAYS: &str = "LIFTLOG_PLATEAU_WINDOW_DAYS";
const ENV_VOLUME_DROP_WINDOW_DAYS: &str = "LIFTLOG_VOLUME_DROP_WINDOW_DAYS";
const ENV_VOLUME_DROP_THRESHOLD_PCT: &str = "LIFTLOG_VOLUME_DROP_THRESHOLD_PCT";
const ENV_NEGLECT_WINDOW_DAYS: &str = "LIFTLOG_NEGLECT_WINDOW_DAYS";
const ENV_MUSCLE_GROUPS_PATH: &str = "LIFTLOG_MUSCLE_GROUPS_PATH";

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("Invalid value for {var}: {value:?}")]
  Invalid { var: String, value: String },

  #[error("Failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to parse muscle groups: {0}")]
  Json(#[from] serde_json::Error),
}

/// ---------------------------------------------------------------------------
/// Engine Config
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  /// Minimum similarity score (0-100) for a catalog name to replace raw text
  pub match_threshold: f64,

  /// Lookback for "recent best" in the plateau detector
  pub plateau_window_days: i64,

  /// Boundary between "recent" and "past" volume
  pub volume_drop_window_days: i64,

  /// Drops strictly above this percentage are reported
  pub volume_drop_threshold_pct: f64,

  /// A muscle group untrained for this long is flagged
  pub neglect_window_days: i64,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      match_threshold: DEFAULT_MATCH_THRESHOLD,
      plateau_window_days: DEFAULT_PLATEAU_WINDOW_DAYS,
      volume_drop_window_days: DEFAULT_VOLUME_DROP_WINDOW_DAYS,
      volume_drop_threshold_pct: DEFAULT_VOLUME_DROP_THRESHOLD_PCT,
      neglect_window_days: DEFAULT_NEGLECT_WINDOW_DAYS,
    }
  }
}

impl EngineConfig {
  /// Defaults overridden by any `LIFTLOG_*` variables in the environment
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();

    let defaults = Self::default();
    Ok(Self {
      match_threshold: env_in_range(ENV_MATCH_THRESHOLD, defaults.match_threshold, 0.0..=100.0)?,
      plateau_window_days: env_in_range(
        ENV_PLATEAU_WINDOW_DAYS,
        defaults.plateau_window_days,
        WINDOW_DAYS_RANGE,
      )?,
      volume_drop_window_days: env_in_range(
        ENV_VOLUME_DROP_WINDOW_DAYS,
        defaults.volume_drop_window_days,
        WINDOW_DAYS_RANGE,
      )?,
      volume_drop_threshold_pct: env_in_range(
        ENV_VOLUME_DROP_THRESHOLD_PCT,
        defaults.volume_drop_threshold_pct,
        0.0..=100.0,
      )?,
      neglect_window_days: env_in_range(
        ENV_NEGLECT_WINDOW_DAYS,
        defaults.neglect_window_days,
        WINDOW_DAYS_RANGE,
      )?,
    })
  }
}

/// Parsed value of `var`, or `default` when unset. Values outside `range`
/// (including NaN) are rejected.
fn env_in_range<T>(var: &str, default: T, range: RangeInclusive<T>) -> Result<T, ConfigError>
where
  T: FromStr + PartialOrd,
{
  let raw = match env::var(var) {
    Ok(raw) => raw,
    Err(_) => return Ok(default),
  };

  match raw.trim().parse::<T>() {
    Ok(value) if range.contains(&value) => Ok(value),
    _ => Err(ConfigError::Invalid {
      var: var.to_string(),
      value: raw,
    }),
  }
}

/// ---------------------------------------------------------------------------
/// Muscle Group Loading
/// ---------------------------------------------------------------------------

/// Read a muscle-group map from a JSON file
pub fn load_muscle_groups(path: &Path) -> Result<MuscleGroupMap, ConfigError> {
  let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  let groups: MuscleGroupMap = serde_json::from_str(&raw)?;
  tracing::debug!(path = %path.display(), groups = groups.len(), "Loaded muscle groups");
  Ok(groups)
}

/// Muscle groups from `LIFTLOG_MUSCLE_GROUPS_PATH`, or the built-in map
pub fn muscle_groups_from_env() -> Result<MuscleGroupMap, ConfigError> {
  dotenvy::dotenv().ok();

  match env::var(ENV_MUSCLE_GROUPS_PATH) {
    Ok(path) => load_muscle_groups(Path::new(&path)),
    Err(_) => Ok(MuscleGroupMap::default()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use std::io::Write;

  #[test]
  #[serial]
  fn test_from_env_uses_defaults_when_unset() {
    temp_env::with_vars_unset(
      [
        ENV_MATCH_THRESHOLD,
        ENV_PLATEAU_WINDOW_DAYS,
        ENV_VOLUME_DROP_WINDOW_DAYS,
        ENV_VOLUME_DROP_THRESHOLD_PCT,
        ENV_NEGLECT_WINDOW_DAYS,
      ],
      || {
        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.plateau_window_days, 21);
        assert_eq!(config.volume_drop_window_days, 7);
        assert_eq!(config.neglect_window_days, 10);
      },
    );
  }

  #[test]
  #[serial]
  fn test_from_env_applies_overrides() {
    temp_env::with_vars(
      [
        (ENV_MATCH_THRESHOLD, Some("75")),
        (ENV_PLATEAU_WINDOW_DAYS, Some("28")),
        (ENV_VOLUME_DROP_THRESHOLD_PCT, Some(" 40.5 ")),
      ],
      || {
        let config = EngineConfig::from_env().unwrap();
        assert_eq!(config.match_threshold, 75.0);
        assert_eq!(config.plateau_window_days, 28);
        assert_eq!(config.volume_drop_threshold_pct, 40.5);
      },
    );
  }

  #[test]
  #[serial]
  fn test_from_env_rejects_unparsable_values() {
    temp_env::with_var(ENV_NEGLECT_WINDOW_DAYS, Some("ten"), || {
      let err = EngineConfig::from_env().unwrap_err();
      assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == ENV_NEGLECT_WINDOW_DAYS));
    });
  }

  #[test]
  #[serial]
  fn test_from_env_rejects_out_of_range_windows() {
    for (var, value) in [
      (ENV_NEGLECT_WINDOW_DAYS, "200000000"),
      (ENV_PLATEAU_WINDOW_DAYS, "-5"),
      (ENV_VOLUME_DROP_WINDOW_DAYS, "36501"),
    ] {
      temp_env::with_var(var, Some(value), || {
        let err = EngineConfig::from_env().unwrap_err();
        assert!(
          matches!(err, ConfigError::Invalid { var: ref v, .. } if v == var),
          "{}={} should be rejected, got {:?}",
          var,
          value,
          err
        );
      });
    }

    temp_env::with_var(ENV_PLATEAU_WINDOW_DAYS, Some("36500"), || {
      assert_eq!(EngineConfig::from_env().unwrap().plateau_window_days, 36_500);
    });
  }

  #[test]
  #[serial]
  fn test_from_env_rejects_out_of_range_thresholds() {
    for (var, value) in [
      (ENV_MATCH_THRESHOLD, "120"),
      (ENV_MATCH_THRESHOLD, "NaN"),
      (ENV_VOLUME_DROP_THRESHOLD_PCT, "-1"),
    ] {
      temp_env::with_var(var, Some(value), || {
        assert!(EngineConfig::from_env().is_err(), "{}={} should be rejected", var, value);
      });
    }
  }

  #[test]
  #[serial]
  fn test_muscle_groups_fall_back_to_defaults() {
    temp_env::with_var_unset(ENV_MUSCLE_GROUPS_PATH, || {
      let groups = muscle_groups_from_env().unwrap();
      assert_eq!(groups, MuscleGroupMap::default());
    });
  }

  #[test]
  #[serial]
  fn test_muscle_groups_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
      file,
      r#"[{{"name": "Posterior Chain", "exercises": ["Deadlift", "Good Morning"]}}]"#
    )
    .unwrap();
    let path = file.path().to_string_lossy().to_string();

    temp_env::with_var(ENV_MUSCLE_GROUPS_PATH, Some(path.as_str()), || {
      let groups = muscle_groups_from_env().unwrap();
      assert_eq!(groups.len(), 1);
      assert!(groups.get("Posterior Chain").unwrap().includes("Good Morning"));
    });
  }

  #[test]
  fn test_missing_file_is_io_error() {
    let err = load_muscle_groups(Path::new("/nonexistent/groups.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
  }
}
