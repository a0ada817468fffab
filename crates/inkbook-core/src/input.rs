//! Small normalisation helpers shared by the `New*` and `*Patch` types.

use crate::{Error, Result};

/// Trim `value` and reject it if nothing is left.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::validation(format!("{field} is required")));
  }
  Ok(trimmed.to_owned())
}

/// Trim optional free text; blank strings become `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}
