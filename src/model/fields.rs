//! Field-level checks shared by the entity constructors.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

use super::ValidationError;

// Unreserved and sub-delim path characters, plus `{}` for path variables and `*` for wildcards.
static PATH_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^/[A-Za-z0-9\-._~!$&'()*+,;=:@%/{}]*$").ok());

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok());

/// Trims a required text field. Missing or blank values are rejected.
pub(super) fn require_text(value: Option<String>, field: &str) -> Result<String, ValidationError> {
    let Some(value) = value else {
        return Err(ValidationError::missing(field));
    };
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::missing(field));
    }
    Ok(value.to_string())
}

/// Trims an optional text field, collapsing blank values to `None`.
pub(super) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Validates a path pattern: it must start with `/` and contain only path characters.
pub(super) fn require_path(value: Option<String>, field: &str) -> Result<String, ValidationError> {
    let path = require_text(value, field)?;
    let valid = PATH_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(&path));
    if !valid {
        return Err(ValidationError::new(format!(
            "invalid {field}: must start with '/' and contain only URL path characters"
        )));
    }
    Ok(path)
}

/// Like [`require_path`], then drops trailing slashes so `/orders/` and `/orders` compare equal.
pub(super) fn require_base_path(
    value: Option<String>,
    field: &str,
) -> Result<String, ValidationError> {
    let path = require_path(value, field)?;
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok("/".to_string());
    }
    Ok(trimmed.to_string())
}

/// Requires an absolute `http(s)` URL.
pub(super) fn require_url(value: Option<String>, field: &str) -> Result<String, ValidationError> {
    let raw = require_text(value, field)?;
    let parsed = Url::parse(&raw)
        .map_err(|err| ValidationError::new(format!("invalid {field}: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::new(format!(
            "invalid {field}: scheme must be http or https"
        )));
    }
    Ok(raw)
}

/// Requires an email-shaped value and lower-cases it.
pub(super) fn require_email(value: Option<String>, field: &str) -> Result<String, ValidationError> {
    let email = require_text(value, field)?.to_lowercase();
    let valid = EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(&email));
    if !valid {
        return Err(ValidationError::new(format!("invalid {field}")));
    }
    Ok(email)
}

/// Trims reference ids, rejects blanks and drops repeats while keeping first-seen order.
pub(super) fn reference_ids(ids: Vec<String>, field: &str) -> Result<Vec<String>, ValidationError> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim();
        if id.is_empty() {
            return Err(ValidationError::new(format!("invalid {field}: blank id")));
        }
        if !out.iter().any(|seen| seen == id) {
            out.push(id.to_string());
        }
    }
    Ok(out)
}
