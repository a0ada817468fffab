//! JSON REST API for Inkbook.
//!
//! Exposes an axum [`Router`] backed by any [`inkbook_core::store::StudioStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", inkbook_api::api_router(store.clone()))
//! ```

pub mod appointments;
pub mod artists;
pub mod clients;
pub mod error;
pub mod expenses;
pub mod extract;
pub mod reports;

use std::sync::Arc;

use axum::{Router, routing::get};
use inkbook_core::store::StudioStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: StudioStore + 'static,
{
  Router::new()
    // Clients
    .route("/clients", get(clients::list::<S>).post(clients::create::<S>))
    .route(
      "/clients/{id}",
      get(clients::get_one::<S>)
        .patch(clients::update::<S>)
        .delete(clients::delete::<S>),
    )
    // Artists
    .route("/artists", get(artists::list::<S>).post(artists::create::<S>))
    .route(
      "/artists/{id}",
      get(artists::get_one::<S>)
        .patch(artists::update::<S>)
        .delete(artists::delete::<S>),
    )
    // Appointments
    .route(
      "/appointments",
      get(appointments::list::<S>).post(appointments::create::<S>),
    )
    .route("/appointments/availability", get(appointments::availability::<S>))
    .route(
      "/appointments/{id}",
      get(appointments::get_one::<S>)
        .patch(appointments::update::<S>)
        .put(appointments::update::<S>)
        .delete(appointments::delete::<S>),
    )
    // Expenses
    .route("/expenses", get(expenses::list::<S>).post(expenses::create::<S>))
    .route(
      "/expenses/{id}",
      get(expenses::get_one::<S>)
        .patch(expenses::update::<S>)
        .delete(expenses::delete::<S>),
    )
    // Reports
    .route("/reports/summary", get(reports::summary::<S>))
    .route("/reports/daily", get(reports::daily::<S>))
    .route("/reports/monthly", get(reports::monthly::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
