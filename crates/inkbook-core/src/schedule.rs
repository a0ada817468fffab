//! Scheduling-conflict detection.
//!
//! Appointments occupy half-open intervals `[start, start + duration)`. Two
//! appointments of the same artist conflict when their intervals overlap;
//! back-to-back bookings (one ending exactly when the next begins) do not.
//! Canceled appointments never block a slot.

use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::{
  Error, Result,
  appointment::{Appointment, AppointmentDetails, AppointmentStatus},
  store::{AppointmentQuery, StudioStore},
};

// ─── Slot ────────────────────────────────────────────────────────────────────

/// A validated half-open time interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
  start: DateTime<Utc>,
  end:   DateTime<Utc>,
}

impl Slot {
  /// A zero duration is a validation error; an end instant that cannot be
  /// represented fails with [`Error::AvailabilityCheckFailed`].
  pub fn new(start: DateTime<Utc>, duration_minutes: u32) -> Result<Self> {
    if duration_minutes == 0 {
      return Err(Error::validation("duration must be a positive number of minutes"));
    }
    let end = start
      .checked_add_signed(TimeDelta::minutes(i64::from(duration_minutes)))
      .ok_or_else(|| {
        Error::AvailabilityCheckFailed(format!(
          "end of a {duration_minutes}-minute slot starting at {start} is out of range"
        ))
      })?;
    Ok(Self { start, end })
  }

  /// The slot an existing appointment occupies.
  pub fn of(appointment: &Appointment) -> Result<Self> {
    Self::new(appointment.appointment_time, appointment.duration_minutes)
  }

  pub fn start(&self) -> DateTime<Utc> { self.start }

  pub fn end(&self) -> DateTime<Utc> { self.end }

  /// Touching endpoints do not overlap.
  pub fn overlaps(&self, other: &Self) -> bool {
    self.start < other.end && self.end > other.start
  }
}

// ─── Pure predicate ──────────────────────────────────────────────────────────

/// Whether `appointment` can block a slot at all.
pub fn blocks(appointment: &Appointment) -> bool {
  appointment.status != AppointmentStatus::Canceled && appointment.duration_minutes > 0
}

/// Find the first appointment in `existing` that belongs to `artist_id`,
/// is not `excluding`, can block, and overlaps `proposed`.
pub fn find_conflict<'a, I>(
  proposed: &Slot,
  artist_id: Uuid,
  existing: I,
  excluding: Option<Uuid>,
) -> Result<Option<&'a Appointment>>
where
  I: IntoIterator<Item = &'a Appointment>,
{
  for appointment in existing {
    if appointment.artist_id != artist_id
      || Some(appointment.id) == excluding
      || !blocks(appointment)
    {
      continue;
    }
    let occupied = Slot::of(appointment).map_err(|e| match e {
      Error::AvailabilityCheckFailed(_) => e,
      other => Error::AvailabilityCheckFailed(format!(
        "stored appointment {} has an unusable slot: {other}",
        appointment.id
      )),
    })?;
    if proposed.overlaps(&occupied) {
      return Ok(Some(appointment));
    }
  }
  Ok(None)
}

// ─── Store-backed checker ────────────────────────────────────────────────────

/// Read-only conflict check against the current contents of a store.
///
/// Writers do not go through this type: backends run [`find_conflict`] inside
/// their own write transaction. This is the standalone predicate used to
/// answer availability queries.
pub struct ConflictChecker<'a, S> {
  store: &'a S,
}

impl<'a, S: StudioStore> ConflictChecker<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// The first appointment of `artist_id` that collides with the proposed
  /// slot, if any.
  pub async fn find_conflict(
    &self,
    artist_id: Uuid,
    proposed_start: DateTime<Utc>,
    proposed_duration_minutes: u32,
    excluding: Option<Uuid>,
  ) -> Result<Option<AppointmentDetails>> {
    let proposed = Slot::new(proposed_start, proposed_duration_minutes)?;
    let query = AppointmentQuery::blocking(artist_id, proposed.end(), excluding);
    let candidates = self
      .store
      .query_appointments(&query)
      .await
      .map_err(Into::into)?;

    let hit = find_conflict(
      &proposed,
      artist_id,
      candidates.iter().map(|d| &d.appointment),
      excluding,
    )?
    .map(|a| a.id);

    Ok(hit.and_then(|id| candidates.into_iter().find(|d| d.appointment.id == id)))
  }

  pub async fn has_conflict(
    &self,
    artist_id: Uuid,
    proposed_start: DateTime<Utc>,
    proposed_duration_minutes: u32,
    excluding: Option<Uuid>,
  ) -> Result<bool> {
    Ok(
      self
        .find_conflict(artist_id, proposed_start, proposed_duration_minutes, excluding)
        .await?
        .is_some(),
    )
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::{appointment::NewAppointment, money::Money};

  fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, h, m, 0).unwrap()
  }

  fn slot(h: u32, m: u32, minutes: u32) -> Slot { Slot::new(at(h, m), minutes).unwrap() }

  fn booking(artist_id: Uuid, h: u32, m: u32, minutes: u32) -> Appointment {
    NewAppointment::new(Uuid::new_v4(), artist_id, at(h, m), minutes)
      .into_appointment(Uuid::new_v4(), at(8, 0))
      .unwrap()
  }

  #[test]
  fn touching_is_not_overlapping() {
    let ten_to_eleven = slot(10, 0, 60);
    assert!(!slot(11, 0, 60).overlaps(&ten_to_eleven));
    assert!(!slot(9, 0, 60).overlaps(&ten_to_eleven));
    assert!(slot(10, 59, 2).overlaps(&ten_to_eleven));
  }

  #[test]
  fn overlap_is_symmetric() {
    let slots = [
      slot(10, 0, 60),
      slot(10, 30, 30),
      slot(11, 0, 15),
      slot(9, 0, 180),
      slot(10, 59, 2),
      slot(12, 0, 1),
    ];
    for a in &slots {
      for b in &slots {
        assert_eq!(a.overlaps(b), b.overlaps(a), "{a:?} vs {b:?}");
      }
    }
  }

  #[test]
  fn containment_overlaps() {
    assert!(slot(9, 0, 180).overlaps(&slot(10, 0, 15)));
    assert!(slot(10, 0, 15).overlaps(&slot(9, 0, 180)));
  }

  #[test]
  fn zero_duration_is_a_validation_error() {
    assert!(matches!(Slot::new(at(10, 0), 0), Err(Error::Validation(_))));
  }

  #[test]
  fn unrepresentable_end_fails_the_check() {
    let result = Slot::new(DateTime::<Utc>::MAX_UTC, 1);
    assert!(matches!(result, Err(Error::AvailabilityCheckFailed(_))));
  }

  #[test]
  fn other_artists_never_conflict() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let existing = [booking(a, 10, 0, 60)];
    let hit = find_conflict(&slot(10, 0, 60), b, &existing, None).unwrap();
    assert!(hit.is_none());
  }

  #[test]
  fn canceled_appointments_never_block() {
    let artist = Uuid::new_v4();
    let mut canceled = booking(artist, 10, 0, 60);
    canceled.status = AppointmentStatus::Canceled;
    let existing = [canceled];
    assert!(find_conflict(&slot(10, 0, 60), artist, &existing, None).unwrap().is_none());
  }

  #[test]
  fn no_show_and_completed_still_block() {
    let artist = Uuid::new_v4();
    let mut no_show = booking(artist, 10, 0, 60);
    no_show.status = AppointmentStatus::NoShow;
    let mut done = booking(artist, 12, 0, 60);
    done.status = AppointmentStatus::Completed;
    done.total_price = Some(Money::ZERO);
    let existing = [no_show, done];
    assert!(find_conflict(&slot(10, 30, 10), artist, &existing, None).unwrap().is_some());
    assert!(find_conflict(&slot(12, 30, 10), artist, &existing, None).unwrap().is_some());
  }

  #[test]
  fn excluded_appointment_does_not_conflict_with_itself() {
    let artist = Uuid::new_v4();
    let own = booking(artist, 10, 0, 60);
    let own_id = own.id;
    let existing = [own];
    let moved = slot(10, 30, 60);
    assert!(find_conflict(&moved, artist, &existing, None).unwrap().is_some());
    assert!(find_conflict(&moved, artist, &existing, Some(own_id)).unwrap().is_none());
  }

  #[test]
  fn reports_the_colliding_appointment() {
    let artist = Uuid::new_v4();
    let early = booking(artist, 9, 0, 30);
    let late = booking(artist, 14, 0, 60);
    let late_id = late.id;
    let existing = [early, late];
    let hit = find_conflict(&slot(14, 30, 30), artist, &existing, None).unwrap();
    assert_eq!(hit.map(|a| a.id), Some(late_id));
  }
}
