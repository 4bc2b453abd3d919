use std::env;
use std::str::FromStr;

use crate::error::ConfigError;

/// Retrieves an environment variable, falling back to `default` when it is unset or blank.
///
/// # Arguments
/// - `var`: The name of the environment variable.
/// - `default`: The value used when the variable is missing.
///
/// # Returns
/// - `String`
pub fn get_env_var_or(var: &str, default: &str) -> String {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Retrieves an environment variable and parses it into `T`.
///
/// Returns `Ok(None)` when the variable is unset or blank, and a `ConfigError`
/// naming the variable when the value does not parse.
pub fn get_env_var_parsed<T: FromStr>(var: &str) -> Result<Option<T>, ConfigError> {
    let raw = match env::var(var) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => return Ok(None),
    };

    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|_| ConfigError::InvalidValue {
            key: var.to_string(),
            value: raw,
        })
}
