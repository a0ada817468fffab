//! The `StudioStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `inkbook-store-sqlite`).
//! The HTTP layer, [`ConflictChecker`](crate::schedule::ConflictChecker) and
//! [`FinancialAggregator`](crate::finance::FinancialAggregator) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
  appointment::{
    Appointment, AppointmentDetails, AppointmentPatch, AppointmentStatus,
    NewAppointment, PaymentStatus,
  },
  artist::{Artist, ArtistPatch, NewArtist},
  client::{Client, ClientPatch, NewClient},
  expense::{Expense, ExpenseCategory, ExpensePatch, NewExpense},
  finance::Window,
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`StudioStore::query_appointments`]. Every set field
/// narrows the result; the default returns everything. Results are ordered
/// by `appointment_time` ascending.
#[derive(Debug, Clone, Default)]
pub struct AppointmentQuery {
  pub artist_id:       Option<Uuid>,
  pub client_id:       Option<Uuid>,
  /// `appointment_time >= starts_from`
  pub starts_from:     Option<DateTime<Utc>>,
  /// `appointment_time < starts_before`
  pub starts_before:   Option<DateTime<Utc>>,
  /// Restrict to these statuses; empty means any.
  pub statuses:        Vec<AppointmentStatus>,
  pub payment_status:  Option<PaymentStatus>,
  /// Appointments whose `deposit_paid_at` or `completed_at` lies in the
  /// window.
  pub income_within:   Option<Window>,
  /// Only appointments that can block a slot: not canceled, positive
  /// duration.
  pub active_only:     bool,
  pub excluding:       Option<Uuid>,
}

impl AppointmentQuery {
  /// Every appointment of `artist_id` that could collide with a slot ending
  /// at `ends_at`.
  pub fn blocking(artist_id: Uuid, ends_at: DateTime<Utc>, excluding: Option<Uuid>) -> Self {
    Self {
      artist_id: Some(artist_id),
      starts_before: Some(ends_at),
      active_only: true,
      excluding,
      ..Self::default()
    }
  }
}

/// Parameters for [`StudioStore::query_expenses`]. Results are ordered by
/// `expense_date` then creation order, ascending unless `newest_first`.
#[derive(Debug, Clone, Default)]
pub struct ExpenseQuery {
  /// Inclusive.
  pub from:         Option<NaiveDate>,
  /// Inclusive.
  pub to:           Option<NaiveDate>,
  pub category:     Option<ExpenseCategory>,
  pub newest_first: bool,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an Inkbook record store.
///
/// Backends must make [`create_appointment`](Self::create_appointment) and
/// [`update_appointment`](Self::update_appointment) atomic with respect to
/// the scheduling-conflict check: the check and the write happen under one
/// lock/transaction so two overlapping bookings can never both succeed.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait StudioStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── Clients ───────────────────────────────────────────────────────────

  fn add_client(
    &self,
    input: NewClient,
  ) -> impl Future<Output = Result<Client, Self::Error>> + Send + '_;

  fn get_client(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Client>, Self::Error>> + Send + '_;

  /// All clients ordered by name.
  fn list_clients(&self) -> impl Future<Output = Result<Vec<Client>, Self::Error>> + Send + '_;

  fn update_client(
    &self,
    id: Uuid,
    patch: ClientPatch,
  ) -> impl Future<Output = Result<Client, Self::Error>> + Send + '_;

  /// Deleting a client also deletes their appointments.
  fn delete_client(&self, id: Uuid) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Artists ───────────────────────────────────────────────────────────

  fn add_artist(
    &self,
    input: NewArtist,
  ) -> impl Future<Output = Result<Artist, Self::Error>> + Send + '_;

  fn get_artist(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Artist>, Self::Error>> + Send + '_;

  /// All artists ordered by name.
  fn list_artists(&self) -> impl Future<Output = Result<Vec<Artist>, Self::Error>> + Send + '_;

  fn update_artist(
    &self,
    id: Uuid,
    patch: ArtistPatch,
  ) -> impl Future<Output = Result<Artist, Self::Error>> + Send + '_;

  /// Fails while any appointment still references the artist.
  fn delete_artist(&self, id: Uuid) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Appointments ──────────────────────────────────────────────────────

  /// Check references and scheduling conflicts, then insert, atomically.
  fn create_appointment(
    &self,
    input: NewAppointment,
  ) -> impl Future<Output = Result<Appointment, Self::Error>> + Send + '_;

  fn get_appointment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<AppointmentDetails>, Self::Error>> + Send + '_;

  fn query_appointments<'a>(
    &'a self,
    query: &'a AppointmentQuery,
  ) -> impl Future<Output = Result<Vec<AppointmentDetails>, Self::Error>> + Send + 'a;

  /// Merge `patch` over the stored record; re-check conflicts when the slot
  /// moves. Atomic, like [`create_appointment`](Self::create_appointment).
  fn update_appointment(
    &self,
    id: Uuid,
    patch: AppointmentPatch,
  ) -> impl Future<Output = Result<Appointment, Self::Error>> + Send + '_;

  fn delete_appointment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Expenses ──────────────────────────────────────────────────────────

  fn add_expense(
    &self,
    input: NewExpense,
  ) -> impl Future<Output = Result<Expense, Self::Error>> + Send + '_;

  fn get_expense(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Expense>, Self::Error>> + Send + '_;

  fn query_expenses<'a>(
    &'a self,
    query: &'a ExpenseQuery,
  ) -> impl Future<Output = Result<Vec<Expense>, Self::Error>> + Send + 'a;

  fn update_expense(
    &self,
    id: Uuid,
    patch: ExpensePatch,
  ) -> impl Future<Output = Result<Expense, Self::Error>> + Send + '_;

  fn delete_expense(&self, id: Uuid) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
