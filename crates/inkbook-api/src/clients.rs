//! Handlers for `/clients` endpoints.
//!
//! | Method   | Path            | Notes |
//! |----------|-----------------|-------|
//! | `GET`    | `/clients`      | Ordered by name |
//! | `POST`   | `/clients`      | Body: `{"name": "...", "phone"?, "email"?, "notes"?}` |
//! | `GET`    | `/clients/{id}` | 404 if not found |
//! | `PATCH`  | `/clients/{id}` | Partial update |
//! | `DELETE` | `/clients/{id}` | Also deletes the client's appointments |

use std::sync::Arc;

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use inkbook_core::{
  Entity, Error as DomainError,
  client::{Client, ClientPatch, NewClient},
  store::StudioStore,
};

use crate::{
  error::{ApiError, store_err},
  extract::Id,
};

/// `GET /clients`
pub async fn list<S: StudioStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Client>>, ApiError> {
  Ok(Json(store.list_clients().await.map_err(store_err)?))
}

/// `POST /clients`
pub async fn create<S: StudioStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewClient>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = body?;
  let client = store.add_client(input).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(client)))
}

/// `GET /clients/{id}`
pub async fn get_one<S: StudioStore>(
  State(store): State<Arc<S>>,
  Id(id): Id,
) -> Result<Json<Client>, ApiError> {
  let client = store
    .get_client(id)
    .await
    .map_err(store_err)?
    .ok_or(DomainError::not_found(Entity::Client, id))?;
  Ok(Json(client))
}

/// `PATCH /clients/{id}`
pub async fn update<S: StudioStore>(
  State(store): State<Arc<S>>,
  Id(id): Id,
  body: Result<Json<ClientPatch>, JsonRejection>,
) -> Result<Json<Client>, ApiError> {
  let Json(patch) = body?;
  Ok(Json(store.update_client(id, patch).await.map_err(store_err)?))
}

/// `DELETE /clients/{id}`
pub async fn delete<S: StudioStore>(
  State(store): State<Arc<S>>,
  Id(id): Id,
) -> Result<StatusCode, ApiError> {
  store.delete_client(id).await.map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}
