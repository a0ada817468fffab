//! Appointments and the rules that govern how they change.
//!
//! Two timestamps on an appointment are write-once: `deposit_paid_at` records
//! the first moment the appointment held a paid deposit, and `completed_at`
//! the first moment it was marked completed. Income is recognised at those
//! instants (see [`crate::finance`]), so once set they never move.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, input::optional_text, money::Money};

// ─── Status enums ────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AppointmentStatus {
  #[default]
  Scheduled,
  Completed,
  Canceled,
  #[serde(rename = "no-show")]
  #[strum(serialize = "no-show")]
  NoShow,
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
  #[default]
  Pending,
  DepositPaid,
  FullyPaid,
}

// ─── Appointment ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
  pub id:               Uuid,
  pub client_id:        Uuid,
  pub artist_id:        Uuid,
  /// Start of the booked interval.
  pub appointment_time: DateTime<Utc>,
  pub duration_minutes: u32,
  pub description:      Option<String>,
  pub status:           AppointmentStatus,
  pub payment_status:   PaymentStatus,
  pub total_price:      Option<Money>,
  pub amount_paid:      Money,
  /// Write-once.
  pub deposit_paid_at:  Option<DateTime<Utc>>,
  /// Write-once.
  pub completed_at:     Option<DateTime<Utc>>,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

impl Appointment {
  /// `true` when the appointment currently holds a paid deposit.
  pub fn has_paid_deposit(&self) -> bool {
    self.payment_status == PaymentStatus::DepositPaid && !self.amount_paid.is_zero()
  }

  /// What the client still owes, if a price is set.
  pub fn outstanding(&self) -> Option<i64> {
    self
      .total_price
      .map(|price| price.get() - self.amount_paid.get())
  }

  /// Whether `other` occupies a different slot than `self`: a different
  /// artist, start, or duration.
  pub fn schedule_differs(&self, other: &Self) -> bool {
    self.artist_id != other.artist_id
      || self.appointment_time != other.appointment_time
      || self.duration_minutes != other.duration_minutes
  }

  /// Record the first entry into the paid-deposit and completed states.
  /// Existing stamps are never touched.
  fn stamp(&mut self, now: DateTime<Utc>) {
    if self.deposit_paid_at.is_none() && self.has_paid_deposit() {
      self.deposit_paid_at = Some(now);
    }
    if self.completed_at.is_none() && self.status == AppointmentStatus::Completed {
      self.completed_at = Some(now);
    }
  }

  fn check(&self) -> Result<()> {
    check_duration(self.duration_minutes)?;
    if let Some(price) = self.total_price
      && self.amount_paid > price
    {
      return Err(Error::validation(format!(
        "amount paid ({}) exceeds total price ({price})",
        self.amount_paid
      )));
    }
    Ok(())
  }

  /// Merge `patch` over this record and apply the write-once stamping rules
  /// at `now`. `updated_at` is set to `now`.
  pub fn apply(&self, patch: AppointmentPatch, now: DateTime<Utc>) -> Result<Self> {
    if patch.is_empty() {
      return Err(Error::validation("at least one field is required"));
    }

    let mut merged = Self {
      client_id:        patch.client_id.unwrap_or(self.client_id),
      artist_id:        patch.artist_id.unwrap_or(self.artist_id),
      appointment_time: patch.appointment_time.unwrap_or(self.appointment_time),
      duration_minutes: patch.duration_minutes.unwrap_or(self.duration_minutes),
      description:      match patch.description {
        Some(d) => optional_text(Some(d)),
        None => self.description.clone(),
      },
      status:           patch.status.unwrap_or(self.status),
      payment_status:   patch.payment_status.unwrap_or(self.payment_status),
      total_price:      patch.total_price.or(self.total_price),
      amount_paid:      patch.amount_paid.unwrap_or(self.amount_paid),
      updated_at:       now,
      ..self.clone()
    };

    merged.check()?;
    merged.stamp(now);
    Ok(merged)
  }
}

fn check_duration(minutes: u32) -> Result<()> {
  if minutes == 0 {
    return Err(Error::validation("duration must be a positive number of minutes"));
  }
  Ok(())
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// An appointment joined with the display names of its client and artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDetails {
  #[serde(flatten)]
  pub appointment: Appointment,
  pub client_name: String,
  pub artist_name: String,
}

// ─── NewAppointment ──────────────────────────────────────────────────────────

/// Input to [`crate::store::StudioStore::create_appointment`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
  pub client_id:        Uuid,
  pub artist_id:        Uuid,
  pub appointment_time: DateTime<Utc>,
  pub duration_minutes: u32,
  pub description:      Option<String>,
  pub total_price:      Option<Money>,
  pub amount_paid:      Option<Money>,
  pub payment_status:   Option<PaymentStatus>,
  pub status:           Option<AppointmentStatus>,
}

impl NewAppointment {
  /// Convenience constructor with all optional fields unset.
  pub fn new(
    client_id: Uuid,
    artist_id: Uuid,
    appointment_time: DateTime<Utc>,
    duration_minutes: u32,
  ) -> Self {
    Self {
      client_id,
      artist_id,
      appointment_time,
      duration_minutes,
      description: None,
      total_price: None,
      amount_paid: None,
      payment_status: None,
      status: None,
    }
  }

  /// Reject input that can never be stored.
  pub fn validate(&self) -> Result<()> {
    check_duration(self.duration_minutes)
  }

  /// Build the record to persist, applying defaults and the stamping rules.
  pub fn into_appointment(self, id: Uuid, now: DateTime<Utc>) -> Result<Appointment> {
    let mut appointment = Appointment {
      id,
      client_id: self.client_id,
      artist_id: self.artist_id,
      appointment_time: self.appointment_time,
      duration_minutes: self.duration_minutes,
      description: optional_text(self.description),
      status: self.status.unwrap_or_default(),
      payment_status: self.payment_status.unwrap_or_default(),
      total_price: self.total_price,
      amount_paid: self.amount_paid.unwrap_or_default(),
      deposit_paid_at: None,
      completed_at: None,
      created_at: now,
      updated_at: now,
    };
    appointment.check()?;
    appointment.stamp(now);
    Ok(appointment)
  }
}

// ─── AppointmentPatch ────────────────────────────────────────────────────────

/// Partial update; `None` (absent or `null` in JSON) leaves a field as is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentPatch {
  pub client_id:        Option<Uuid>,
  pub artist_id:        Option<Uuid>,
  pub appointment_time: Option<DateTime<Utc>>,
  pub duration_minutes: Option<u32>,
  pub description:      Option<String>,
  pub total_price:      Option<Money>,
  pub amount_paid:      Option<Money>,
  pub payment_status:   Option<PaymentStatus>,
  pub status:           Option<AppointmentStatus>,
}

impl AppointmentPatch {
  pub fn is_empty(&self) -> bool {
    self.client_id.is_none()
      && self.artist_id.is_none()
      && self.appointment_time.is_none()
      && self.duration_minutes.is_none()
      && self.description.is_none()
      && self.total_price.is_none()
      && self.amount_paid.is_none()
      && self.payment_status.is_none()
      && self.status.is_none()
  }

  /// Checks that do not need the stored record.
  pub fn validate(&self) -> Result<()> {
    if self.is_empty() {
      return Err(Error::validation("at least one field is required"));
    }
    if let Some(minutes) = self.duration_minutes {
      check_duration(minutes)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeDelta, TimeZone};

  use super::*;

  fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, h, m, 0).unwrap()
  }

  fn money(v: i64) -> Money { Money::new(v).unwrap() }

  fn booked() -> Appointment {
    let mut input = NewAppointment::new(Uuid::new_v4(), Uuid::new_v4(), at(14, 0), 60);
    input.total_price = Some(money(100_000));
    input.into_appointment(Uuid::new_v4(), at(9, 0)).unwrap()
  }

  #[test]
  fn defaults_on_create() {
    let a = booked();
    assert_eq!(a.status, AppointmentStatus::Scheduled);
    assert_eq!(a.payment_status, PaymentStatus::Pending);
    assert_eq!(a.amount_paid, Money::ZERO);
    assert!(a.deposit_paid_at.is_none());
    assert!(a.completed_at.is_none());
  }

  #[test]
  fn create_with_deposit_stamps_immediately() {
    let mut input = NewAppointment::new(Uuid::new_v4(), Uuid::new_v4(), at(14, 0), 60);
    input.amount_paid = Some(money(30_000));
    input.payment_status = Some(PaymentStatus::DepositPaid);
    let a = input.into_appointment(Uuid::new_v4(), at(9, 0)).unwrap();
    assert_eq!(a.deposit_paid_at, Some(at(9, 0)));
  }

  #[test]
  fn deposit_status_without_money_does_not_stamp() {
    let mut input = NewAppointment::new(Uuid::new_v4(), Uuid::new_v4(), at(14, 0), 60);
    input.payment_status = Some(PaymentStatus::DepositPaid);
    let a = input.into_appointment(Uuid::new_v4(), at(9, 0)).unwrap();
    assert!(a.deposit_paid_at.is_none());
  }

  #[test]
  fn create_rejects_zero_duration_and_overpayment() {
    let zero = NewAppointment::new(Uuid::new_v4(), Uuid::new_v4(), at(14, 0), 0);
    assert!(zero.validate().is_err());
    assert!(zero.into_appointment(Uuid::new_v4(), at(9, 0)).is_err());

    let mut over = NewAppointment::new(Uuid::new_v4(), Uuid::new_v4(), at(14, 0), 60);
    over.total_price = Some(money(100));
    over.amount_paid = Some(money(101));
    assert!(matches!(
      over.into_appointment(Uuid::new_v4(), at(9, 0)),
      Err(Error::Validation(_))
    ));
  }

  #[test]
  fn patch_leaves_unspecified_fields_alone() {
    let a = booked();
    let patch = AppointmentPatch {
      description: Some("sleeve, session 2".into()),
      ..Default::default()
    };
    let b = a.apply(patch, at(10, 0)).unwrap();
    assert_eq!(b.description.as_deref(), Some("sleeve, session 2"));
    assert_eq!(b.appointment_time, a.appointment_time);
    assert_eq!(b.total_price, a.total_price);
    assert_eq!(b.created_at, a.created_at);
    assert_eq!(b.updated_at, at(10, 0));
    assert!(!a.schedule_differs(&b));
  }

  #[test]
  fn empty_patch_is_rejected() {
    assert!(AppointmentPatch::default().validate().is_err());
    assert!(booked().apply(AppointmentPatch::default(), at(10, 0)).is_err());
  }

  #[test]
  fn deposit_timestamp_is_write_once() {
    let a = booked();
    let paid = a
      .apply(
        AppointmentPatch {
          amount_paid: Some(money(30_000)),
          payment_status: Some(PaymentStatus::DepositPaid),
          ..Default::default()
        },
        at(10, 0),
      )
      .unwrap();
    assert_eq!(paid.deposit_paid_at, Some(at(10, 0)));

    let away = paid
      .apply(
        AppointmentPatch { payment_status: Some(PaymentStatus::Pending), ..Default::default() },
        at(11, 0),
      )
      .unwrap();
    let back = away
      .apply(
        AppointmentPatch {
          payment_status: Some(PaymentStatus::DepositPaid),
          ..Default::default()
        },
        at(12, 0),
      )
      .unwrap();
    assert_eq!(away.deposit_paid_at, Some(at(10, 0)));
    assert_eq!(back.deposit_paid_at, Some(at(10, 0)));
  }

  #[test]
  fn completion_timestamp_is_write_once() {
    let a = booked();
    let done = a
      .apply(
        AppointmentPatch { status: Some(AppointmentStatus::Completed), ..Default::default() },
        at(15, 0),
      )
      .unwrap();
    assert_eq!(done.completed_at, Some(at(15, 0)));

    let reverted = done
      .apply(
        AppointmentPatch { status: Some(AppointmentStatus::Scheduled), ..Default::default() },
        at(16, 0),
      )
      .unwrap();
    let redone = reverted
      .apply(
        AppointmentPatch { status: Some(AppointmentStatus::Completed), ..Default::default() },
        at(17, 0),
      )
      .unwrap();
    assert_eq!(redone.completed_at, Some(at(15, 0)));
  }

  #[test]
  fn moving_the_slot_is_a_schedule_change() {
    let a = booked();
    let moved = a
      .apply(
        AppointmentPatch {
          appointment_time: Some(a.appointment_time + TimeDelta::minutes(30)),
          ..Default::default()
        },
        at(10, 0),
      )
      .unwrap();
    assert!(a.schedule_differs(&moved));
  }

  #[test]
  fn patch_cannot_overpay() {
    let a = booked();
    let patch = AppointmentPatch { amount_paid: Some(money(100_001)), ..Default::default() };
    assert!(matches!(a.apply(patch, at(10, 0)), Err(Error::Validation(_))));
  }

  #[test]
  fn status_wire_names() {
    assert_eq!(serde_json::to_string(&AppointmentStatus::NoShow).unwrap(), "\"no-show\"");
    assert_eq!(
      serde_json::to_string(&PaymentStatus::DepositPaid).unwrap(),
      "\"deposit_paid\""
    );
    let s: &'static str = AppointmentStatus::NoShow.into();
    assert_eq!(s, "no-show");
    assert_eq!("deposit_paid".parse::<PaymentStatus>().unwrap(), PaymentStatus::DepositPaid);
  }
}
