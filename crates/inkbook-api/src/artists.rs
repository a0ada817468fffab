//! Handlers for `/artists` endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use inkbook_core::{
  Entity, Error as DomainError,
  artist::{Artist, ArtistPatch, NewArtist},
  store::StudioStore,
};

use crate::{
  error::{ApiError, store_err},
  extract::Id,
};

/// `GET /artists`
pub async fn list<S: StudioStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Artist>>, ApiError> {
  Ok(Json(store.list_artists().await.map_err(store_err)?))
}

/// `POST /artists` with body `{"name": "..."}`
pub async fn create<S: StudioStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewArtist>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = body?;
  let artist = store.add_artist(input).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(artist)))
}

/// `GET /artists/{id}`
pub async fn get_one<S: StudioStore>(
  State(store): State<Arc<S>>,
  Id(id): Id,
) -> Result<Json<Artist>, ApiError> {
  let artist = store
    .get_artist(id)
    .await
    .map_err(store_err)?
    .ok_or(DomainError::not_found(Entity::Artist, id))?;
  Ok(Json(artist))
}

/// `PATCH /artists/{id}`
pub async fn update<S: StudioStore>(
  State(store): State<Arc<S>>,
  Id(id): Id,
  body: Result<Json<ArtistPatch>, JsonRejection>,
) -> Result<Json<Artist>, ApiError> {
  let Json(patch) = body?;
  Ok(Json(store.update_artist(id, patch).await.map_err(store_err)?))
}

/// `DELETE /artists/{id}`; refused while appointments reference the artist.
pub async fn delete<S: StudioStore>(
  State(store): State<Arc<S>>,
  Id(id): Id,
) -> Result<StatusCode, ApiError> {
  store.delete_artist(id).await.map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}
