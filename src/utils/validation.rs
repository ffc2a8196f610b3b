use crate::utils::error::{ResolverError, Result};
use url::Url;

/// Upper bound for a provider's network timeout.
pub const MAX_TIMEOUT_SECONDS: u64 = 300;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> ResolverError {
    ResolverError::InvalidConfigValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Search endpoints must be absolute http(s) URLs with a host.
pub fn validate_endpoint(field: &str, endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint).map_err(|e| invalid(field, endpoint, e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(
            field,
            endpoint,
            format!("search endpoints must use http or https, not {}", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid(field, endpoint, "endpoint has no host"));
    }
    Ok(())
}

pub fn validate_timeout(field: &str, seconds: u64) -> Result<()> {
    if seconds == 0 || seconds > MAX_TIMEOUT_SECONDS {
        return Err(invalid(
            field,
            seconds,
            format!("timeout must be between 1 and {} seconds", MAX_TIMEOUT_SECONDS),
        ));
    }
    Ok(())
}

/// Names used in `resolver.providers` and `[sources.<name>]` keys.
pub fn validate_name(field: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(invalid(field, name, "name cannot be empty"));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(invalid(field, name, "name cannot contain whitespace"));
    }
    Ok(())
}

/// Paths of the entry batch file read and written by the engine.
pub fn validate_batch_path(field: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(ResolverError::MissingConfig {
            field: field.to_string(),
        });
    }
    if path.contains('\0') {
        return Err(invalid(field, path.escape_default(), "path contains null bytes"));
    }
    if path.ends_with('/') || path.ends_with('\\') {
        return Err(invalid(field, path, "path must name a file, not a directory"));
    }
    Ok(())
}
