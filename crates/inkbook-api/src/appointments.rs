//! Handlers for `/appointments` endpoints.
//!
//! | Method         | Path                         | Notes |
//! |----------------|------------------------------|-------|
//! | `GET`          | `/appointments`              | `?artistId&clientId&from&to&status` |
//! | `POST`         | `/appointments`              | 409 when the artist is already booked |
//! | `GET`          | `/appointments/availability` | `?artistId&start&durationMinutes&excluding` |
//! | `GET`          | `/appointments/{id}`         | With client and artist names |
//! | `PATCH`, `PUT` | `/appointments/{id}`         | Partial update; re-checks the slot when it moves |
//! | `DELETE`       | `/appointments/{id}`         | |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use inkbook_core::{
  Entity, Error as DomainError,
  appointment::{
    Appointment, AppointmentDetails, AppointmentPatch, AppointmentStatus,
    NewAppointment,
  },
  schedule::ConflictChecker,
  store::{AppointmentQuery, StudioStore},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  error::{ApiError, store_err},
  extract::{Id, optional, required},
};

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub artist_id: Option<String>,
  pub client_id: Option<String>,
  /// Earliest start, inclusive (RFC 3339).
  pub from:      Option<String>,
  /// Latest start, exclusive (RFC 3339).
  pub to:        Option<String>,
  pub status:    Option<String>,
}

impl ListParams {
  fn into_query(self) -> Result<AppointmentQuery, ApiError> {
    Ok(AppointmentQuery {
      artist_id: optional("artistId", self.artist_id.as_deref())?,
      client_id: optional("clientId", self.client_id.as_deref())?,
      starts_from: optional("from", self.from.as_deref())?,
      starts_before: optional("to", self.to.as_deref())?,
      statuses: optional::<AppointmentStatus>("status", self.status.as_deref())?
        .into_iter()
        .collect(),
      ..Default::default()
    })
  }
}

/// `GET /appointments`
pub async fn list<S: StudioStore>(
  State(store): State<Arc<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<AppointmentDetails>>, ApiError> {
  let Query(params) = params?;
  let query = params.into_query()?;
  Ok(Json(store.query_appointments(&query).await.map_err(store_err)?))
}

// ─── Create ──────────────────────────────────────────────────────────────────

/// `POST /appointments`
pub async fn create<S: StudioStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewAppointment>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = body?;
  let appointment: Appointment = store.create_appointment(input).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(appointment)))
}

// ─── Availability ────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityParams {
  pub artist_id:        Option<String>,
  pub start:            Option<String>,
  pub duration_minutes: Option<String>,
  pub excluding:        Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
  pub available: bool,
  /// The booking that occupies the slot, when there is one.
  pub conflict:  Option<AppointmentDetails>,
}

/// `GET /appointments/availability`
pub async fn availability<S: StudioStore>(
  State(store): State<Arc<S>>,
  params: Result<Query<AvailabilityParams>, QueryRejection>,
) -> Result<Json<Availability>, ApiError> {
  let Query(params) = params?;
  let artist_id: Uuid = required("artistId", params.artist_id.as_deref())?;
  let start: DateTime<Utc> = required("start", params.start.as_deref())?;
  let minutes: u32 = required("durationMinutes", params.duration_minutes.as_deref())?;
  let excluding: Option<Uuid> = optional("excluding", params.excluding.as_deref())?;

  let conflict = ConflictChecker::new(store.as_ref())
    .find_conflict(artist_id, start, minutes, excluding)
    .await?;
  tracing::debug!(%artist_id, %start, minutes, available = conflict.is_none(), "availability");
  Ok(Json(Availability { available: conflict.is_none(), conflict }))
}

// ─── Single appointment ──────────────────────────────────────────────────────

/// `GET /appointments/{id}`
pub async fn get_one<S: StudioStore>(
  State(store): State<Arc<S>>,
  Id(id): Id,
) -> Result<Json<AppointmentDetails>, ApiError> {
  let details = store
    .get_appointment(id)
    .await
    .map_err(store_err)?
    .ok_or(DomainError::not_found(Entity::Appointment, id))?;
  Ok(Json(details))
}

/// `PATCH /appointments/{id}` (also bound to `PUT`)
pub async fn update<S: StudioStore>(
  State(store): State<Arc<S>>,
  Id(id): Id,
  body: Result<Json<AppointmentPatch>, JsonRejection>,
) -> Result<Json<Appointment>, ApiError> {
  let Json(patch) = body?;
  Ok(Json(store.update_appointment(id, patch).await.map_err(store_err)?))
}

/// `DELETE /appointments/{id}`
pub async fn delete<S: StudioStore>(
  State(store): State<Arc<S>>,
  Id(id): Id,
) -> Result<StatusCode, ApiError> {
  store.delete_appointment(id).await.map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}
