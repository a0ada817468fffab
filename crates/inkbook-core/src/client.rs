//! Clients: the people appointments are booked for.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  input::{optional_text, required_text},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
  pub id:         Uuid,
  pub name:       String,
  pub phone:      Option<String>,
  /// Unique across clients when present.
  pub email:      Option<String>,
  pub notes:      Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::StudioStore::add_client`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
  pub name:  String,
  pub phone: Option<String>,
  pub email: Option<String>,
  pub notes: Option<String>,
}

impl NewClient {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  /// Trim every field and reject a blank name.
  pub fn normalize(self) -> Result<Self> {
    Ok(Self {
      name:  required_text("client name", &self.name)?,
      phone: optional_text(self.phone),
      email: optional_text(self.email),
      notes: optional_text(self.notes),
    })
  }
}

/// Partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
  pub name:  Option<String>,
  pub phone: Option<String>,
  pub email: Option<String>,
  pub notes: Option<String>,
}

impl ClientPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.phone.is_none()
      && self.email.is_none()
      && self.notes.is_none()
  }
}

impl Client {
  /// Merge `patch` over this record. Timestamps are left to the store.
  pub fn apply(&self, patch: ClientPatch) -> Result<Self> {
    if patch.is_empty() {
      return Err(Error::validation("at least one field is required"));
    }
    let name = match patch.name {
      Some(n) => required_text("client name", &n)?,
      None => self.name.clone(),
    };
    Ok(Self {
      name,
      phone: patch.phone.map_or_else(|| self.phone.clone(), |p| optional_text(Some(p))),
      email: patch.email.map_or_else(|| self.email.clone(), |e| optional_text(Some(e))),
      notes: patch.notes.map_or_else(|| self.notes.clone(), |n| optional_text(Some(n))),
      ..self.clone()
    })
  }
}
