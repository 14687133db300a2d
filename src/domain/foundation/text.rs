//! Helpers for required free-text fields.

use super::ValidationError;

/// Trims `value` and rejects it when nothing remains.
pub fn required_text(field: &str, value: impl AsRef<str>) -> Result<String, ValidationError> {
    let trimmed = value.as_ref().trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}
