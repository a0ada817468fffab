//! [`SqliteStore`], the SQLite implementation of [`StudioStore`].

use std::{
  path::Path,
  sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
  },
  time::Duration,
};

use chrono::{DateTime, Utc};
use inkbook_core::{
  Entity, Error as DomainError,
  appointment::{
    Appointment, AppointmentDetails, AppointmentPatch, AppointmentStatus,
    NewAppointment,
  },
  artist::{Artist, ArtistPatch, NewArtist},
  client::{Client, ClientPatch, NewClient},
  expense::{Expense, ExpensePatch, NewExpense},
  schedule::{Slot, find_conflict},
  store::{AppointmentQuery, ExpenseQuery, StudioStore},
};
use rusqlite::{Connection, OptionalExtension as _, TransactionBehavior, types::Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    APPOINTMENT_COLUMNS, APPOINTMENT_FROM, ARTIST_COLUMNS, CLIENT_COLUMNS,
    EXPENSE_COLUMNS, RawAppointment, RawArtist, RawClient, RawExpense,
    encode_date, encode_dt, encode_enum, encode_uuid, to_micros,
  },
  schema::SCHEMA,
};

/// How long a store call may wait for the connection thread before it is
/// abandoned. Also used as the SQLite busy timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

fn now() -> DateTime<Utc> { to_micros(Utc::now()) }

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Inkbook store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:    tokio_rusqlite::Connection,
  timeout: Duration,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>, timeout: Duration) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, timeout).await
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, DEFAULT_TIMEOUT).await
  }

  async fn init(conn: tokio_rusqlite::Connection, timeout: Duration) -> Result<Self> {
    let store = Self { conn, timeout };
    store
      .run(move |conn| {
        conn.busy_timeout(timeout)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(store)
  }

  /// Run `f` on the connection thread, bounded by the store timeout.
  ///
  /// A call that times out before `f` starts is abandoned: `f` never runs,
  /// so [`Error::Timeout`] means nothing was written. Once `f` has started
  /// it runs to completion and its own result is returned; lock waits
  /// inside it are bounded by `busy_timeout`.
  ///
  /// Domain errors raised inside `f` travel back as the inner result so
  /// they reach the caller unchanged.
  pub(crate) async fn run<T, F>(&self, f: F) -> Result<T>
  where
    F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    let claim = Claim::default();
    let worker = claim.clone();
    let timeout = self.timeout;
    let mut call = std::pin::pin!(self.conn.call(move |conn| {
      if !worker.start() {
        return Ok(Err(Error::Timeout(timeout)));
      }
      Ok(f(conn))
    }));

    match tokio::time::timeout(timeout, &mut call).await {
      Ok(result) => result?,
      Err(_) if claim.abandon() => {
        debug!(?timeout, "store call abandoned before it started");
        Err(Error::Timeout(timeout))
      }
      Err(_) => call.await?,
    }
  }
}

/// Hand-off between a caller waiting on a store call and the connection
/// thread running it. Exactly one side wins: either the work starts or the
/// caller abandons it.
#[derive(Clone, Default)]
struct Claim(Arc<AtomicU8>);

impl Claim {
  const PENDING: u8 = 0;
  const STARTED: u8 = 1;
  const ABANDONED: u8 = 2;

  fn start(&self) -> bool { self.swap_from_pending(Self::STARTED) }

  fn abandon(&self) -> bool { self.swap_from_pending(Self::ABANDONED) }

  fn swap_from_pending(&self, to: u8) -> bool {
    self
      .0
      .compare_exchange(Self::PENDING, to, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
  }
}

// ─── Statement helpers ───────────────────────────────────────────────────────

fn select_client(conn: &Connection, id: Uuid) -> Result<Option<Client>> {
  conn
    .query_row(
      &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE client_id = ?1"),
      [encode_uuid(id)],
      RawClient::from_row,
    )
    .optional()?
    .map(RawClient::into_client)
    .transpose()
}

fn select_artist(conn: &Connection, id: Uuid) -> Result<Option<Artist>> {
  conn
    .query_row(
      &format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE artist_id = ?1"),
      [encode_uuid(id)],
      RawArtist::from_row,
    )
    .optional()?
    .map(RawArtist::into_artist)
    .transpose()
}

fn select_appointment(conn: &Connection, id: Uuid) -> Result<Option<AppointmentDetails>> {
  conn
    .query_row(
      &format!(
        "SELECT {APPOINTMENT_COLUMNS} {APPOINTMENT_FROM} WHERE a.appointment_id = ?1"
      ),
      [encode_uuid(id)],
      RawAppointment::from_row,
    )
    .optional()?
    .map(RawAppointment::into_details)
    .transpose()
}

fn select_expense(conn: &Connection, id: Uuid) -> Result<Option<Expense>> {
  conn
    .query_row(
      &format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE expense_id = ?1"),
      [encode_uuid(id)],
      RawExpense::from_row,
    )
    .optional()?
    .map(RawExpense::into_expense)
    .transpose()
}

/// Fail with [`DomainError::Reference`] unless `id` names an existing record.
fn require_reference(conn: &Connection, entity: Entity, id: Uuid) -> Result<()> {
  let sql = match entity {
    Entity::Client => "SELECT 1 FROM clients WHERE client_id = ?1",
    Entity::Artist => "SELECT 1 FROM artists WHERE artist_id = ?1",
    Entity::Appointment => "SELECT 1 FROM appointments WHERE appointment_id = ?1",
    Entity::Expense => "SELECT 1 FROM expenses WHERE expense_id = ?1",
  };
  let found = conn
    .query_row(sql, [encode_uuid(id)], |_| Ok(()))
    .optional()?
    .is_some();
  if !found {
    return Err(DomainError::Reference { entity, id }.into());
  }
  Ok(())
}

fn where_clause(conds: &[String]) -> String {
  if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  }
}

fn select_appointments(
  conn: &Connection,
  query: &AppointmentQuery,
) -> Result<Vec<AppointmentDetails>> {
  let mut conds: Vec<String> = vec![];
  let mut params: Vec<Value> = vec![];

  if let Some(id) = query.artist_id {
    conds.push("a.artist_id = ?".into());
    params.push(Value::Text(encode_uuid(id)));
  }
  if let Some(id) = query.client_id {
    conds.push("a.client_id = ?".into());
    params.push(Value::Text(encode_uuid(id)));
  }
  if let Some(from) = query.starts_from {
    conds.push("a.appointment_time >= ?".into());
    params.push(Value::Text(encode_dt(from)));
  }
  if let Some(before) = query.starts_before {
    conds.push("a.appointment_time < ?".into());
    params.push(Value::Text(encode_dt(before)));
  }
  if !query.statuses.is_empty() {
    let marks = vec!["?"; query.statuses.len()].join(", ");
    conds.push(format!("a.status IN ({marks})"));
    params.extend(
      query
        .statuses
        .iter()
        .map(|s| Value::Text(encode_enum(*s).to_owned())),
    );
  }
  if let Some(payment) = query.payment_status {
    conds.push("a.payment_status = ?".into());
    params.push(Value::Text(encode_enum(payment).to_owned()));
  }
  if let Some(window) = query.income_within {
    conds.push(
      "((a.deposit_paid_at >= ? AND a.deposit_paid_at <= ?)
        OR (a.completed_at >= ? AND a.completed_at <= ?))"
        .into(),
    );
    let (start, end) = (encode_dt(window.start()), encode_dt(window.end()));
    params.extend([start.clone(), end.clone(), start, end].map(Value::Text));
  }
  if query.active_only {
    conds.push("a.status != ? AND a.duration_minutes > 0".into());
    params.push(Value::Text(encode_enum(AppointmentStatus::Canceled).to_owned()));
  }
  if let Some(id) = query.excluding {
    conds.push("a.appointment_id != ?".into());
    params.push(Value::Text(encode_uuid(id)));
  }

  let sql = format!(
    "SELECT {APPOINTMENT_COLUMNS} {APPOINTMENT_FROM} {}
     ORDER BY a.appointment_time, a.created_at, a.appointment_id",
    where_clause(&conds),
  );

  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(rusqlite::params_from_iter(params), RawAppointment::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(RawAppointment::into_details).collect()
}

/// Reject `appointment` if its slot collides with another active booking of
/// the same artist. Must run inside the write transaction.
fn ensure_available(conn: &Connection, appointment: &Appointment) -> Result<()> {
  let proposed = Slot::of(appointment)?;
  let query = AppointmentQuery::blocking(
    appointment.artist_id,
    proposed.end(),
    Some(appointment.id),
  );
  let candidates = select_appointments(conn, &query)?;

  let hit = find_conflict(
    &proposed,
    appointment.artist_id,
    candidates.iter().map(|d| &d.appointment),
    Some(appointment.id),
  )?;

  if let Some(existing) = hit {
    warn!(
      artist_id = %appointment.artist_id,
      existing = %existing.id,
      start = %proposed.start(),
      end = %proposed.end(),
      "booking rejected: slot already taken"
    );
    return Err(
      DomainError::Conflict { artist_id: appointment.artist_id, existing: existing.id }
        .into(),
    );
  }

  debug!(
    artist_id = %appointment.artist_id,
    start = %proposed.start(),
    checked = candidates.len(),
    "slot available"
  );
  Ok(())
}

/// Insert or overwrite `a`. Both statements bind the same fourteen
/// parameters; the update leaves `created_at` (?13) unused.
fn write_appointment(conn: &Connection, a: &Appointment, insert: bool) -> Result<()> {
  let sql = if insert {
    "INSERT INTO appointments (
       appointment_id, client_id, artist_id, appointment_time, duration_minutes,
       description, status, payment_status, total_price, amount_paid,
       deposit_paid_at, completed_at, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)"
  } else {
    "UPDATE appointments SET
       client_id = ?2, artist_id = ?3, appointment_time = ?4,
       duration_minutes = ?5, description = ?6, status = ?7,
       payment_status = ?8, total_price = ?9, amount_paid = ?10,
       deposit_paid_at = ?11, completed_at = ?12, updated_at = ?14
     WHERE appointment_id = ?1"
  };
  conn.execute(
    sql,
    rusqlite::params![
      encode_uuid(a.id),
      encode_uuid(a.client_id),
      encode_uuid(a.artist_id),
      encode_dt(a.appointment_time),
      a.duration_minutes,
      a.description,
      encode_enum(a.status),
      encode_enum(a.payment_status),
      a.total_price.map(|p| p.get()),
      a.amount_paid.get(),
      a.deposit_paid_at.map(encode_dt),
      a.completed_at.map(encode_dt),
      encode_dt(a.created_at),
      encode_dt(a.updated_at),
    ],
  )?;
  Ok(())
}

fn duplicate_email(email: Option<&str>) -> String {
  format!("a client with email {} already exists", email.unwrap_or_default())
}

fn duplicate_artist(name: &str) -> String {
  format!("an artist named {name:?} already exists")
}

// ─── StudioStore impl ────────────────────────────────────────────────────────

impl StudioStore for SqliteStore {
  type Error = Error;

  // ── Clients ───────────────────────────────────────────────────────────────

  async fn add_client(&self, input: NewClient) -> Result<Client> {
    let input = input.normalize()?;
    let at = now();
    let client = Client {
      id:         Uuid::new_v4(),
      name:       input.name,
      phone:      input.phone,
      email:      input.email,
      notes:      input.notes,
      created_at: at,
      updated_at: at,
    };

    let row = client.clone();
    self
      .run(move |conn| {
        conn
          .execute(
            "INSERT INTO clients (client_id, name, phone, email, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
              encode_uuid(row.id),
              row.name,
              row.phone,
              row.email,
              row.notes,
              encode_dt(row.created_at),
              encode_dt(row.updated_at),
            ],
          )
          .map_err(|e| Error::on_unique(e, || duplicate_email(row.email.as_deref())))?;
        Ok(())
      })
      .await?;

    debug!(client_id = %client.id, "client added");
    Ok(client)
  }

  async fn get_client(&self, id: Uuid) -> Result<Option<Client>> {
    self.run(move |conn| select_client(conn, id)).await
  }

  async fn list_clients(&self) -> Result<Vec<Client>> {
    self
      .run(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY name, client_id"
        ))?;
        let raws = stmt
          .query_map([], RawClient::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawClient::into_client).collect()
      })
      .await
  }

  async fn update_client(&self, id: Uuid, patch: ClientPatch) -> Result<Client> {
    let at = now();
    self
      .run(move |conn| {
        let tx = conn.transaction()?;
        let current = select_client(&tx, id)?
          .ok_or(DomainError::not_found(Entity::Client, id))?;
        let mut next = current.apply(patch)?;
        next.updated_at = at;

        tx.execute(
          "UPDATE clients
           SET name = ?2, phone = ?3, email = ?4, notes = ?5, updated_at = ?6
           WHERE client_id = ?1",
          rusqlite::params![
            encode_uuid(id),
            next.name,
            next.phone,
            next.email,
            next.notes,
            encode_dt(next.updated_at),
          ],
        )
        .map_err(|e| Error::on_unique(e, || duplicate_email(next.email.as_deref())))?;

        tx.commit()?;
        Ok(next)
      })
      .await
  }

  async fn delete_client(&self, id: Uuid) -> Result<()> {
    let removed = self
      .run(move |conn| {
        Ok(conn.execute("DELETE FROM clients WHERE client_id = ?1", [encode_uuid(id)])?)
      })
      .await?;
    if removed == 0 {
      return Err(DomainError::not_found(Entity::Client, id).into());
    }
    info!(client_id = %id, "client deleted with their appointments");
    Ok(())
  }

  // ── Artists ───────────────────────────────────────────────────────────────

  async fn add_artist(&self, input: NewArtist) -> Result<Artist> {
    let input = input.normalize()?;
    let at = now();
    let artist = Artist {
      id:         Uuid::new_v4(),
      name:       input.name,
      created_at: at,
      updated_at: at,
    };

    let row = artist.clone();
    self
      .run(move |conn| {
        conn
          .execute(
            "INSERT INTO artists (artist_id, name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
              encode_uuid(row.id),
              row.name,
              encode_dt(row.created_at),
              encode_dt(row.updated_at),
            ],
          )
          .map_err(|e| Error::on_unique(e, || duplicate_artist(&row.name)))?;
        Ok(())
      })
      .await?;

    debug!(artist_id = %artist.id, "artist added");
    Ok(artist)
  }

  async fn get_artist(&self, id: Uuid) -> Result<Option<Artist>> {
    self.run(move |conn| select_artist(conn, id)).await
  }

  async fn list_artists(&self) -> Result<Vec<Artist>> {
    self
      .run(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ARTIST_COLUMNS} FROM artists ORDER BY name, artist_id"
        ))?;
        let raws = stmt
          .query_map([], RawArtist::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawArtist::into_artist).collect()
      })
      .await
  }

  async fn update_artist(&self, id: Uuid, patch: ArtistPatch) -> Result<Artist> {
    let at = now();
    self
      .run(move |conn| {
        let tx = conn.transaction()?;
        let current = select_artist(&tx, id)?
          .ok_or(DomainError::not_found(Entity::Artist, id))?;
        let mut next = current.apply(patch)?;
        next.updated_at = at;

        tx.execute(
          "UPDATE artists SET name = ?2, updated_at = ?3 WHERE artist_id = ?1",
          rusqlite::params![encode_uuid(id), next.name, encode_dt(next.updated_at)],
        )
        .map_err(|e| Error::on_unique(e, || duplicate_artist(&next.name)))?;

        tx.commit()?;
        Ok(next)
      })
      .await
  }

  async fn delete_artist(&self, id: Uuid) -> Result<()> {
    self
      .run(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if select_artist(&tx, id)?.is_none() {
          return Err(DomainError::not_found(Entity::Artist, id).into());
        }
        let booked: i64 = tx.query_row(
          "SELECT COUNT(*) FROM appointments WHERE artist_id = ?1",
          [encode_uuid(id)],
          |r| r.get(0),
        )?;
        if booked > 0 {
          return Err(
            DomainError::InUse(format!(
              "artist {id} is still referenced by {booked} appointment(s)"
            ))
            .into(),
          );
        }
        tx.execute("DELETE FROM artists WHERE artist_id = ?1", [encode_uuid(id)])?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    info!(artist_id = %id, "artist deleted");
    Ok(())
  }

  // ── Appointments ──────────────────────────────────────────────────────────

  async fn create_appointment(&self, mut input: NewAppointment) -> Result<Appointment> {
    input.validate()?;
    input.appointment_time = to_micros(input.appointment_time);
    let appointment = input.into_appointment(Uuid::new_v4(), now())?;

    let row = appointment.clone();
    self
      .run(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        require_reference(&tx, Entity::Client, row.client_id)?;
        require_reference(&tx, Entity::Artist, row.artist_id)?;
        ensure_available(&tx, &row)?;
        write_appointment(&tx, &row, true)?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    info!(
      appointment_id = %appointment.id,
      artist_id = %appointment.artist_id,
      start = %appointment.appointment_time,
      minutes = appointment.duration_minutes,
      "appointment booked"
    );
    Ok(appointment)
  }

  async fn get_appointment(&self, id: Uuid) -> Result<Option<AppointmentDetails>> {
    self.run(move |conn| select_appointment(conn, id)).await
  }

  async fn query_appointments<'a>(
    &'a self,
    query: &'a AppointmentQuery,
  ) -> Result<Vec<AppointmentDetails>> {
    let query = query.clone();
    self.run(move |conn| select_appointments(conn, &query)).await
  }

  async fn update_appointment(
    &self,
    id: Uuid,
    mut patch: AppointmentPatch,
  ) -> Result<Appointment> {
    patch.validate()?;
    patch.appointment_time = patch.appointment_time.map(to_micros);
    let at = now();

    let updated = self
      .run(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current = select_appointment(&tx, id)?
          .ok_or(DomainError::not_found(Entity::Appointment, id))?
          .appointment;
        let next = current.apply(patch, at)?;

        if next.client_id != current.client_id {
          require_reference(&tx, Entity::Client, next.client_id)?;
        }
        if next.artist_id != current.artist_id {
          require_reference(&tx, Entity::Artist, next.artist_id)?;
        }
        if current.schedule_differs(&next) {
          ensure_available(&tx, &next)?;
        }

        write_appointment(&tx, &next, false)?;
        tx.commit()?;
        Ok(next)
      })
      .await?;

    info!(
      appointment_id = %updated.id,
      status = %updated.status,
      payment_status = %updated.payment_status,
      "appointment updated"
    );
    Ok(updated)
  }

  async fn delete_appointment(&self, id: Uuid) -> Result<()> {
    let removed = self
      .run(move |conn| {
        Ok(conn.execute(
          "DELETE FROM appointments WHERE appointment_id = ?1",
          [encode_uuid(id)],
        )?)
      })
      .await?;
    if removed == 0 {
      return Err(DomainError::not_found(Entity::Appointment, id).into());
    }
    info!(appointment_id = %id, "appointment deleted");
    Ok(())
  }

  // ── Expenses ──────────────────────────────────────────────────────────────

  async fn add_expense(&self, input: NewExpense) -> Result<Expense> {
    let at = now();
    let input = input.normalize(at.date_naive())?;
    let expense = Expense {
      id:           Uuid::new_v4(),
      description:  input.description,
      amount:       input.amount,
      category:     input.category,
      expense_date: input.expense_date.unwrap_or(at.date_naive()),
      created_at:   at,
      updated_at:   at,
    };

    let row = expense.clone();
    self
      .run(move |conn| {
        conn.execute(
          "INSERT INTO expenses (
             expense_id, description, amount, category, expense_date,
             created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            encode_uuid(row.id),
            row.description,
            row.amount.get(),
            encode_enum(row.category),
            encode_date(row.expense_date),
            encode_dt(row.created_at),
            encode_dt(row.updated_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    debug!(expense_id = %expense.id, amount = %expense.amount, "expense recorded");
    Ok(expense)
  }

  async fn get_expense(&self, id: Uuid) -> Result<Option<Expense>> {
    self.run(move |conn| select_expense(conn, id)).await
  }

  async fn query_expenses<'a>(&'a self, query: &'a ExpenseQuery) -> Result<Vec<Expense>> {
    let query = query.clone();
    self
      .run(move |conn| {
        let mut conds: Vec<String> = vec![];
        let mut params: Vec<Value> = vec![];
        if let Some(from) = query.from {
          conds.push("expense_date >= ?".into());
          params.push(Value::Text(encode_date(from)));
        }
        if let Some(to) = query.to {
          conds.push("expense_date <= ?".into());
          params.push(Value::Text(encode_date(to)));
        }
        if let Some(category) = query.category {
          conds.push("category = ?".into());
          params.push(Value::Text(encode_enum(category).to_owned()));
        }
        let dir = if query.newest_first { "DESC" } else { "ASC" };
        let sql = format!(
          "SELECT {EXPENSE_COLUMNS} FROM expenses {}
           ORDER BY expense_date {dir}, created_at {dir}, rowid {dir}",
          where_clause(&conds),
        );

        let mut stmt = conn.prepare(&sql)?;
        let raws = stmt
          .query_map(rusqlite::params_from_iter(params), RawExpense::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        raws.into_iter().map(RawExpense::into_expense).collect()
      })
      .await
  }

  async fn update_expense(&self, id: Uuid, patch: ExpensePatch) -> Result<Expense> {
    let at = now();
    self
      .run(move |conn| {
        let tx = conn.transaction()?;
        let current = select_expense(&tx, id)?
          .ok_or(DomainError::not_found(Entity::Expense, id))?;
        let mut next = current.apply(patch)?;
        next.updated_at = at;

        tx.execute(
          "UPDATE expenses
           SET description = ?2, amount = ?3, category = ?4, expense_date = ?5,
               updated_at = ?6
           WHERE expense_id = ?1",
          rusqlite::params![
            encode_uuid(id),
            next.description,
            next.amount.get(),
            encode_enum(next.category),
            encode_date(next.expense_date),
            encode_dt(next.updated_at),
          ],
        )?;

        tx.commit()?;
        Ok(next)
      })
      .await
  }

  async fn delete_expense(&self, id: Uuid) -> Result<()> {
    let removed = self
      .run(move |conn| {
        Ok(conn.execute("DELETE FROM expenses WHERE expense_id = ?1", [encode_uuid(id)])?)
      })
      .await?;
    if removed == 0 {
      return Err(DomainError::not_found(Entity::Expense, id).into());
    }
    debug!(expense_id = %id, "expense deleted");
    Ok(())
  }
}
