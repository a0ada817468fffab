//! Extractors and query-string parsing shared by the handlers.
//!
//! Query parameters arrive as raw strings and are parsed here so a malformed
//! value becomes a `validation` error naming the parameter, never a silently
//! ignored filter.

use std::str::FromStr;

use axum::{
  extract::{FromRequestParts, Path},
  http::request::Parts,
};
use uuid::Uuid;

use crate::error::ApiError;

/// A `{id}` path segment parsed as a UUID.
pub struct Id(pub Uuid);

impl<S: Send + Sync> FromRequestParts<S> for Id {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let Path(id) = Path::<Uuid>::from_request_parts(parts, state).await?;
    Ok(Id(id))
  }
}

/// Parse an optional query parameter; blank counts as absent.
pub fn optional<T: FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>, ApiError> {
  match raw.map(str::trim).filter(|s| !s.is_empty()) {
    None => Ok(None),
    Some(s) => s
      .parse()
      .map(Some)
      .map_err(|_| ApiError::malformed(format!("malformed {name}: {s:?}"))),
  }
}

/// Parse a required query parameter.
pub fn required<T: FromStr>(name: &str, raw: Option<&str>) -> Result<T, ApiError> {
  optional(name, raw)?.ok_or_else(|| ApiError::malformed(format!("{name} is required")))
}
