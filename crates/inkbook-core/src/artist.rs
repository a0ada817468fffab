//! Artists: the people appointments are booked with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, input::required_text};

/// An artist. Names are unique (enforced by the store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
  pub id:         Uuid,
  pub name:       String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewArtist {
  pub name: String,
}

impl NewArtist {
  pub fn new(name: impl Into<String>) -> Self { Self { name: name.into() } }

  pub fn normalize(self) -> Result<Self> {
    Ok(Self { name: required_text("artist name", &self.name)? })
  }
}

/// Partial update for an artist. The name is the only mutable field, so the
/// patch is the same shape as the create body.
pub type ArtistPatch = NewArtist;

impl Artist {
  pub fn apply(&self, patch: ArtistPatch) -> Result<Self> {
    Ok(Self { name: patch.normalize()?.name, ..self.clone() })
  }
}
