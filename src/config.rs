use chrono::Duration;

use crate::environment::{get_env_var_or, get_env_var_parsed};
use crate::error::{ConfigError, ResolveError};

pub const DEFAULT_RECENCY_DAYS: i64 = 14;
pub const DEFAULT_W_TRGM: f64 = 0.75;
pub const DEFAULT_W_FT: f64 = 0.25;
pub const DEFAULT_MIN_TRGM: f64 = 0.35;
pub const DEFAULT_MIN_TS: f64 = 0.05;
pub const DEFAULT_MIN_SCORE: f64 = 0.42;
pub const DEFAULT_MIN_CANDIDATES: usize = 2;

/// Thresholds and weights for one resolution call.
///
/// These are passed explicitly with every call rather than read from globals,
/// so two tenants (or two tests) can resolve against the same store with
/// different policies.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveOptions {
    /// How far back from the ingestion time existing articles stay eligible.
    pub recency_window: Duration,
    /// Weight of the trigram signal in the combined score.
    pub w_trgm: f64,
    /// Weight of the normalized full-text signal in the combined score.
    pub w_ft: f64,
    /// Absolute trigram floor.
    pub min_trgm: f64,
    /// Absolute raw full-text floor.
    pub min_ts: f64,
    /// Combined score needed to join an existing story.
    pub min_score: f64,
    /// Minimum distinct candidate clusters before full-text scores are normalized.
    pub min_candidates: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            recency_window: Duration::days(DEFAULT_RECENCY_DAYS),
            w_trgm: DEFAULT_W_TRGM,
            w_ft: DEFAULT_W_FT,
            min_trgm: DEFAULT_MIN_TRGM,
            min_ts: DEFAULT_MIN_TS,
            min_score: DEFAULT_MIN_SCORE,
            min_candidates: DEFAULT_MIN_CANDIDATES,
        }
    }
}

impl ResolveOptions {
    /// Defaults overridden by any `STORY_*` environment variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut options = Self::default();

        if let Some(hours) = get_env_var_parsed::<i64>("STORY_RECENCY_HOURS")? {
            options.recency_window =
                Duration::try_hours(hours).ok_or_else(|| ConfigError::InvalidValue {
                    key: "STORY_RECENCY_HOURS".to_string(),
                    value: hours.to_string(),
                })?;
        }
        if let Some(value) = get_env_var_parsed("STORY_W_TRGM")? {
            options.w_trgm = value;
        }
        if let Some(value) = get_env_var_parsed("STORY_W_FT")? {
            options.w_ft = value;
        }
        if let Some(value) = get_env_var_parsed("STORY_MIN_TRGM")? {
            options.min_trgm = value;
        }
        if let Some(value) = get_env_var_parsed("STORY_MIN_TS")? {
            options.min_ts = value;
        }
        if let Some(value) = get_env_var_parsed("STORY_MIN_SCORE")? {
            options.min_score = value;
        }
        if let Some(value) = get_env_var_parsed("STORY_MIN_CANDIDATES")? {
            options.min_candidates = value;
        }

        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ResolveError> {
        if self.recency_window <= Duration::zero() {
            return Err(ResolveError::Validation(
                "recency_window must be positive".to_string(),
            ));
        }

        let numeric = [
            ("w_trgm", self.w_trgm),
            ("w_ft", self.w_ft),
            ("min_trgm", self.min_trgm),
            ("min_ts", self.min_ts),
            ("min_score", self.min_score),
        ];
        for (name, value) in numeric {
            if !value.is_finite() || value < 0.0 {
                return Err(ResolveError::Validation(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

/// Process-level settings for the binaries.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub log_dir: String,
    pub options: ResolveOptions,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            database_path: get_env_var_or("DATABASE_PATH", "storyline.db"),
            log_dir: get_env_var_or("LOG_DIR", "logs"),
            options: ResolveOptions::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ResolveOptions::default();
        assert_eq!(options.recency_window, Duration::days(14));
        assert_eq!(options.w_trgm, 0.75);
        assert_eq!(options.w_ft, 0.25);
        assert_eq!(options.min_trgm, 0.35);
        assert_eq!(options.min_ts, 0.05);
        assert_eq!(options.min_score, 0.42);
        assert_eq!(options.min_candidates, 2);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let negative_weight = ResolveOptions {
            w_ft: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            negative_weight.validate(),
            Err(ResolveError::Validation(_))
        ));

        let nan_threshold = ResolveOptions {
            min_score: f64::NAN,
            ..Default::default()
        };
        assert!(nan_threshold.validate().is_err());

        let empty_window = ResolveOptions {
            recency_window: Duration::zero(),
            ..Default::default()
        };
        assert!(empty_window.validate().is_err());
    }
}
