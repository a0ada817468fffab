//! Handlers for `/expenses` endpoints.

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
use inkbook_core::{
  Entity, Error as DomainError,
  expense::{Expense, ExpensePatch, NewExpense},
  store::{ExpenseQuery, StudioStore},
};
use serde::Deserialize;

use crate::{
  error::{ApiError, store_err},
  extract::{Id, optional},
};

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  /// Inclusive `YYYY-MM-DD`.
  pub from:     Option<String>,
  /// Inclusive `YYYY-MM-DD`.
  pub to:       Option<String>,
  pub category: Option<String>,
}

/// `GET /expenses[?from&to&category]`, newest first.
pub async fn list<S: StudioStore>(
  State(store): State<Arc<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Expense>>, ApiError> {
  let Query(params) = params?;
  let query = ExpenseQuery {
    from:         optional("from", params.from.as_deref())?,
    to:           optional("to", params.to.as_deref())?,
    category:     optional("category", params.category.as_deref())?,
    newest_first: true,
  };
  Ok(Json(store.query_expenses(&query).await.map_err(store_err)?))
}

/// `POST /expenses`
pub async fn create<S: StudioStore>(
  State(store): State<Arc<S>>,
  body: Result<Json<NewExpense>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(input) = body?;
  let expense = store.add_expense(input).await.map_err(store_err)?;
  Ok((StatusCode::CREATED, Json(expense)))
}

/// `GET /expenses/{id}`
pub async fn get_one<S: StudioStore>(
  State(store): State<Arc<S>>,
  Id(id): Id,
) -> Result<Json<Expense>, ApiError> {
  let expense = store
    .get_expense(id)
    .await
    .map_err(store_err)?
    .ok_or(DomainError::not_found(Entity::Expense, id))?;
  Ok(Json(expense))
}

/// `PATCH /expenses/{id}`
pub async fn update<S: StudioStore>(
  State(store): State<Arc<S>>,
  Id(id): Id,
  body: Result<Json<ExpensePatch>, JsonRejection>,
) -> Result<Json<Expense>, ApiError> {
  let Json(patch) = body?;
  Ok(Json(store.update_expense(id, patch).await.map_err(store_err)?))
}

/// `DELETE /expenses/{id}`
pub async fn delete<S: StudioStore>(
  State(store): State<Arc<S>>,
  Id(id): Id,
) -> Result<StatusCode, ApiError> {
  store.delete_expense(id).await.map_err(store_err)?;
  Ok(StatusCode::NO_CONTENT)
}
