//! Error type for `inkbook-store-sqlite`.

use std::time::Duration;

use rusqlite::ffi;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain rule rejected the operation (validation, conflict, missing
  /// record, ...).
  #[error(transparent)]
  Domain(#[from] inkbook_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored column holds a value the domain type cannot represent.
  #[error("cannot decode {column}: {value:?}")]
  Decode { column: &'static str, value: String },

  #[error("store call timed out after {0:?}")]
  Timeout(Duration),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The extended result code of a failed statement, if it was a constraint
/// failure.
fn constraint_code(e: &rusqlite::Error) -> Option<(i32, String)> {
  match e {
    rusqlite::Error::SqliteFailure(err, msg)
      if err.code == rusqlite::ErrorCode::ConstraintViolation =>
    {
      Some((
        err.extended_code,
        msg.clone().unwrap_or_else(|| err.to_string()),
      ))
    }
    _ => None,
  }
}

impl Error {
  fn as_sqlite(&self) -> Option<&rusqlite::Error> {
    match self {
      Self::Sqlite(e) | Self::Database(tokio_rusqlite::Error::Rusqlite(e)) => Some(e),
      _ => None,
    }
  }

  /// Rewrite a UNIQUE violation as [`inkbook_core::Error::Duplicate`] with a
  /// caller-supplied message; anything else passes through.
  pub(crate) fn on_unique(e: rusqlite::Error, message: impl FnOnce() -> String) -> Self {
    match constraint_code(&e) {
      Some((ffi::SQLITE_CONSTRAINT_UNIQUE, _)) => {
        inkbook_core::Error::Duplicate(message()).into()
      }
      _ => e.into(),
    }
  }
}

impl From<Error> for inkbook_core::Error {
  fn from(e: Error) -> Self {
    if let Some((code, msg)) = e.as_sqlite().and_then(constraint_code) {
      match code {
        ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
          return Self::Duplicate(msg);
        }
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return Self::InUse(msg),
        ffi::SQLITE_CONSTRAINT_CHECK | ffi::SQLITE_CONSTRAINT_NOTNULL => {
          return Self::Validation(msg);
        }
        _ => {}
      }
    }
    match e {
      Error::Domain(inner) => inner,
      Error::Timeout(after) => Self::Timeout(after),
      other => Self::Store(Box::new(other)),
    }
  }
}
