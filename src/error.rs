use thiserror::Error;

/// Errors surfaced by a resolution call.
///
/// Unique-key races on `(source_id, url)` are absorbed by the upsert and never
/// show up here; a degraded full-text scorer is logged, not returned.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Input rejected before the store was touched. Retrying will not help.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The store failed during retrieval or persistence. Nothing was committed,
    /// so the whole call can be retried.
    #[error("Database error: {0}")]
    Infra(#[from] sqlx::Error),
}

impl ResolveError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResolveError::Infra(_))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}
