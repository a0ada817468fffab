//! Encoding and decoding helpers between Rust domain types and the plain
//! column representations stored in SQLite.
//!
//! UUIDs are hyphenated lowercase text. Instants are RFC 3339 UTC with six
//! fractional digits; dates are `YYYY-MM-DD`. Amounts are integers and enums
//! use their wire names.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound as _, Utc};
use inkbook_core::{
  Money,
  appointment::{Appointment, AppointmentDetails},
  artist::Artist,
  client::Client,
  expense::Expense,
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

/// Drop precision the column cannot hold.
pub fn to_micros(dt: DateTime<Utc>) -> DateTime<Utc> { dt.trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn encode_enum<T: Into<&'static str>>(value: T) -> &'static str { value.into() }

pub fn decode_enum<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  s.parse().map_err(|_| Error::Decode { column, value: s.to_owned() })
}

pub fn decode_money(column: &'static str, v: i64) -> Result<Money> {
  Money::new(v).map_err(|_| Error::Decode { column, value: v.to_string() })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const CLIENT_COLUMNS: &str =
  "client_id, name, phone, email, notes, created_at, updated_at";

/// Raw values read directly from a `clients` row.
pub struct RawClient {
  pub client_id:  String,
  pub name:       String,
  pub phone:      Option<String>,
  pub email:      Option<String>,
  pub notes:      Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawClient {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      client_id:  row.get(0)?,
      name:       row.get(1)?,
      phone:      row.get(2)?,
      email:      row.get(3)?,
      notes:      row.get(4)?,
      created_at: row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  pub fn into_client(self) -> Result<Client> {
    Ok(Client {
      id:         decode_uuid(&self.client_id)?,
      name:       self.name,
      phone:      self.phone,
      email:      self.email,
      notes:      self.notes,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub const ARTIST_COLUMNS: &str = "artist_id, name, created_at, updated_at";

/// Raw values read directly from an `artists` row.
pub struct RawArtist {
  pub artist_id:  String,
  pub name:       String,
  pub created_at: String,
  pub updated_at: String,
}

impl RawArtist {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      artist_id:  row.get(0)?,
      name:       row.get(1)?,
      created_at: row.get(2)?,
      updated_at: row.get(3)?,
    })
  }

  pub fn into_artist(self) -> Result<Artist> {
    Ok(Artist {
      id:         decode_uuid(&self.artist_id)?,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Select list for [`RawAppointment::from_row`]; expects `appointments a`
/// joined with `clients c` and `artists r`.
pub const APPOINTMENT_COLUMNS: &str = "
  a.appointment_id, a.client_id, a.artist_id, a.appointment_time,
  a.duration_minutes, a.description, a.status, a.payment_status,
  a.total_price, a.amount_paid, a.deposit_paid_at, a.completed_at,
  a.created_at, a.updated_at,
  c.name AS client_name,
  r.name AS artist_name";

pub const APPOINTMENT_FROM: &str = "
  FROM appointments a
  JOIN clients c ON c.client_id = a.client_id
  JOIN artists r ON r.artist_id = a.artist_id";

/// Raw values read from an `appointments` row joined with both names.
pub struct RawAppointment {
  pub appointment_id:   String,
  pub client_id:        String,
  pub artist_id:        String,
  pub appointment_time: String,
  pub duration_minutes: i64,
  pub description:      Option<String>,
  pub status:           String,
  pub payment_status:   String,
  pub total_price:      Option<i64>,
  pub amount_paid:      i64,
  pub deposit_paid_at:  Option<String>,
  pub completed_at:     Option<String>,
  pub created_at:       String,
  pub updated_at:       String,
  pub client_name:      String,
  pub artist_name:      String,
}

impl RawAppointment {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      appointment_id:   row.get(0)?,
      client_id:        row.get(1)?,
      artist_id:        row.get(2)?,
      appointment_time: row.get(3)?,
      duration_minutes: row.get(4)?,
      description:      row.get(5)?,
      status:           row.get(6)?,
      payment_status:   row.get(7)?,
      total_price:      row.get(8)?,
      amount_paid:      row.get(9)?,
      deposit_paid_at:  row.get(10)?,
      completed_at:     row.get(11)?,
      created_at:       row.get(12)?,
      updated_at:       row.get(13)?,
      client_name:      row.get(14)?,
      artist_name:      row.get(15)?,
    })
  }

  pub fn into_details(self) -> Result<AppointmentDetails> {
    let duration_minutes = u32::try_from(self.duration_minutes).map_err(|_| {
      Error::Decode {
        column: "duration_minutes",
        value:  self.duration_minutes.to_string(),
      }
    })?;

    let appointment = Appointment {
      id: decode_uuid(&self.appointment_id)?,
      client_id: decode_uuid(&self.client_id)?,
      artist_id: decode_uuid(&self.artist_id)?,
      appointment_time: decode_dt(&self.appointment_time)?,
      duration_minutes,
      description: self.description,
      status: decode_enum("status", &self.status)?,
      payment_status: decode_enum("payment_status", &self.payment_status)?,
      total_price: self
        .total_price
        .map(|v| decode_money("total_price", v))
        .transpose()?,
      amount_paid: decode_money("amount_paid", self.amount_paid)?,
      deposit_paid_at: self.deposit_paid_at.as_deref().map(decode_dt).transpose()?,
      completed_at: self.completed_at.as_deref().map(decode_dt).transpose()?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    };

    Ok(AppointmentDetails {
      appointment,
      client_name: self.client_name,
      artist_name: self.artist_name,
    })
  }
}

pub const EXPENSE_COLUMNS: &str =
  "expense_id, description, amount, category, expense_date, created_at, updated_at";

/// Raw values read directly from an `expenses` row.
pub struct RawExpense {
  pub expense_id:   String,
  pub description:  String,
  pub amount:       i64,
  pub category:     String,
  pub expense_date: String,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawExpense {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      expense_id:   row.get(0)?,
      description:  row.get(1)?,
      amount:       row.get(2)?,
      category:     row.get(3)?,
      expense_date: row.get(4)?,
      created_at:   row.get(5)?,
      updated_at:   row.get(6)?,
    })
  }

  pub fn into_expense(self) -> Result<Expense> {
    Ok(Expense {
      id:           decode_uuid(&self.expense_id)?,
      description:  self.description,
      amount:       decode_money("amount", self.amount)?,
      category:     decode_enum("category", &self.category)?,
      expense_date: decode_date(&self.expense_date)?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}
