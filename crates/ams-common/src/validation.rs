//! Input validation utilities.
//!
//! Name rules shared by the console's client-side check and the backend's
//! authoritative one, plus the request-body helper used by API routes.

use validator::Validate;

use crate::error::AmsError;

/// Validate a request body, returning an AmsError::Validation on failure.
pub fn validate_request<T: Validate>(body: &T) -> Result<(), AmsError> {
    body.validate().map_err(|e| AmsError::Validation {
        message: format_validation_errors(e),
    })
}

/// Format validation errors into a human-readable string.
fn format_validation_errors(errors: validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for '{field}'"))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// True when a role name is empty or whitespace only.
pub fn is_blank_name(name: &str) -> bool {
    name.trim().is_empty()
}

/// Case-insensitive, whitespace-trimmed name comparison.
pub fn names_match(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
