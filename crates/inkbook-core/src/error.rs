//! Error taxonomy shared by every Inkbook crate.
//!
//! Storage backends convert their own failures into this type so the HTTP
//! layer can pick a status code without knowing which backend it talks to.

use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

/// The kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Entity {
  Client,
  Artist,
  Appointment,
  Expense,
}

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or missing input. Raised before the store is touched.
  #[error("invalid input: {0}")]
  Validation(String),

  /// The proposed slot overlaps another active appointment of the artist.
  #[error("artist {artist_id} is already booked by appointment {existing}")]
  Conflict { artist_id: Uuid, existing: Uuid },

  #[error("{entity} not found: {id}")]
  NotFound { entity: Entity, id: Uuid },

  /// A foreign reference points at a record that does not exist.
  #[error("referenced {entity} does not exist: {id}")]
  Reference { entity: Entity, id: Uuid },

  /// The conflict check itself could not be computed.
  #[error("availability check failed: {0}")]
  AvailabilityCheckFailed(String),

  #[error("duplicate: {0}")]
  Duplicate(String),

  /// The record is still referenced and cannot be deleted.
  #[error("in use: {0}")]
  InUse(String),

  #[error("store call timed out after {0:?}")]
  Timeout(Duration),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }

  pub fn not_found(entity: Entity, id: Uuid) -> Self {
    Self::NotFound { entity, id }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
