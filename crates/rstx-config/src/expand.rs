//! Environment variable and home directory expansion for config values.
//!
//! - `${VAR}` expands to the value of VAR and is an error if VAR is unset
//! - `${VAR:-default}` falls back to `default`
//! - a leading `~` in path values expands to the home directory

use crate::ConfigError;

/// Expand `${VAR}` references in a string value.
///
/// Bare `$VAR` is left untouched so interpreter paths like `$HOME/bin` need
/// braces to expand.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| match std::env::var(var) {
        Ok(val) => Ok(Some(val)),
        Err(_) => Err(Unset(var.to_owned())),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Expand `${VAR}` references, then a leading `~`.
pub(crate) fn expand_path(value: &str, field: &str) -> Result<String, ConfigError> {
    let expanded = expand_env(value, field)?;
    Ok(shellexpand::tilde(&expanded).into_owned())
}

/// Variable that was referenced but not set.
struct Unset(String);
