//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure is rendered as `{"kind": ..., "message": ...}` with a status
//! code chosen by kind.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection, QueryRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use inkbook_core::Error as DomainError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Domain(#[from] DomainError),

  /// The request could not be decoded (body, path or query string).
  #[error("malformed input: {0}")]
  Malformed(String),
}

impl ApiError {
  pub fn malformed(msg: impl Into<String>) -> Self { Self::Malformed(msg.into()) }

  /// Wire name and HTTP status for this error.
  pub fn kind(&self) -> (&'static str, StatusCode) {
    match self {
      Self::Malformed(_) => ("validation", StatusCode::BAD_REQUEST),
      Self::Domain(e) => match e {
        DomainError::Validation(_) => ("validation", StatusCode::BAD_REQUEST),
        DomainError::Conflict { .. } => ("conflict", StatusCode::CONFLICT),
        DomainError::NotFound { .. } => ("not_found", StatusCode::NOT_FOUND),
        DomainError::Reference { .. } => ("reference", StatusCode::BAD_REQUEST),
        DomainError::AvailabilityCheckFailed(_) => {
          ("availability_check_failed", StatusCode::INTERNAL_SERVER_ERROR)
        }
        DomainError::Duplicate(_) => ("duplicate", StatusCode::CONFLICT),
        DomainError::InUse(_) => ("in_use", StatusCode::CONFLICT),
        DomainError::Timeout(_) => ("timeout", StatusCode::GATEWAY_TIMEOUT),
        DomainError::Store(_) => ("store", StatusCode::INTERNAL_SERVER_ERROR),
      },
    }
  }
}

/// Lift a backend error into the API error via the core taxonomy.
pub fn store_err<E: Into<DomainError>>(e: E) -> ApiError { ApiError::Domain(e.into()) }

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { Self::Malformed(rejection.body_text()) }
}

impl From<QueryRejection> for ApiError {
  fn from(rejection: QueryRejection) -> Self { Self::Malformed(rejection.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(rejection: PathRejection) -> Self { Self::Malformed(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (kind, status) = self.kind();
    match &self {
      ApiError::Domain(DomainError::Store(e)) => {
        tracing::error!(error = %e, "store failure");
      }
      ApiError::Domain(DomainError::AvailabilityCheckFailed(msg)) => {
        tracing::error!(%msg, "availability check failed");
      }
      ApiError::Domain(DomainError::Timeout(after)) => {
        tracing::warn!(?after, "store call timed out");
      }
      _ => {}
    }
    (status, Json(json!({ "kind": kind, "message": self.to_string() }))).into_response()
  }
}
