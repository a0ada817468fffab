//! Financial aggregation over appointments and expenses.
//!
//! Income is recognised per event, not per appointment:
//!
//! - a **deposit** event contributes `amount_paid` at `deposit_paid_at`, while
//!   the appointment still holds a paid deposit;
//! - a **completion** event contributes the full `total_price` (or zero) at
//!   `completed_at`, once the appointment is completed.
//!
//! Each event counts in the window containing its own instant. An appointment
//! whose deposit and completion both land in one window contributes twice;
//! the studio books the deposit as cash received and the full price as
//! revenue on completion.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  appointment::{Appointment, AppointmentDetails, AppointmentStatus, PaymentStatus},
  expense::Expense,
  money::Money,
  store::{AppointmentQuery, ExpenseQuery, StudioStore},
};

// ─── Window ──────────────────────────────────────────────────────────────────

/// An inclusive `[start, end]` range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
  start: DateTime<Utc>,
  end:   DateTime<Utc>,
}

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

fn check_year(year: i32) -> Result<()> {
  if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
    return Err(Error::validation(format!("year out of range: {year}")));
  }
  Ok(())
}

fn check_month(month: u32) -> Result<()> {
  if !(1..=12).contains(&month) {
    return Err(Error::validation(format!("month out of range: {month}")));
  }
  Ok(())
}

fn midnight(date: NaiveDate) -> DateTime<Utc> { date.and_time(NaiveTime::MIN).and_utc() }

/// Midnight UTC at the start of the day containing `now`.
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> { midnight(now.date_naive()) }

impl Window {
  pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
    if start > end {
      return Err(Error::validation(format!(
        "window start {start} is after its end {end}"
      )));
    }
    Ok(Self { start, end })
  }

  /// The whole calendar day (UTC), from midnight to its last nanosecond.
  pub fn day(year: i32, month: u32, day: u32) -> Result<Self> {
    check_year(year)?;
    check_month(month)?;
    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
      Error::validation(format!("no such date: {year:04}-{month:02}-{day:02}"))
    })?;
    Self::between_dates(date, date)
  }

  /// The whole calendar month (UTC).
  pub fn month(year: i32, month: u32) -> Result<Self> {
    check_year(year)?;
    check_month(month)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)
      .ok_or_else(|| Error::validation(format!("no such month: {year:04}-{month:02}")))?;
    let last = first
      .checked_add_months(chrono::Months::new(1))
      .and_then(|d| d.pred_opt())
      .ok_or_else(|| Error::validation(format!("no such month: {year:04}-{month:02}")))?;
    Self::between_dates(first, last)
  }

  fn between_dates(first: NaiveDate, last: NaiveDate) -> Result<Self> {
    let after = last
      .succ_opt()
      .ok_or_else(|| Error::validation(format!("date out of range: {last}")))?;
    Self::new(midnight(first), midnight(after) - TimeDelta::nanoseconds(1))
  }

  pub fn start(&self) -> DateTime<Utc> { self.start }

  pub fn end(&self) -> DateTime<Utc> { self.end }

  pub fn contains(&self, instant: DateTime<Utc>) -> bool {
    self.start <= instant && instant <= self.end
  }

  /// A calendar date belongs to the window when its midnight does.
  pub fn contains_date(&self, date: NaiveDate) -> bool { self.contains(midnight(date)) }

  /// The inclusive range of dates whose midnight lies in the window, or
  /// `None` when there is none.
  pub fn dates(&self) -> Option<(NaiveDate, NaiveDate)> {
    let first = if midnight(self.start.date_naive()) == self.start {
      self.start.date_naive()
    } else {
      self.start.date_naive().succ_opt()?
    };
    let last = self.end.date_naive();
    (first <= last).then_some((first, last))
  }
}

// ─── Income events ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeKind {
  Deposit,
  Completion,
}

/// One income-recognition event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeEvent {
  pub kind:           IncomeKind,
  pub appointment_id: Uuid,
  pub client_name:    String,
  pub artist_name:    String,
  pub amount:         Money,
  pub at:             DateTime<Utc>,
}

impl IncomeEvent {
  fn new(kind: IncomeKind, details: &AppointmentDetails, amount: Money, at: DateTime<Utc>) -> Self {
    Self {
      kind,
      appointment_id: details.appointment.id,
      client_name: details.client_name.clone(),
      artist_name: details.artist_name.clone(),
      amount,
      at,
    }
  }
}

/// The deposit event of `details`, if one falls inside `window`.
pub fn deposit_event(details: &AppointmentDetails, window: &Window) -> Option<IncomeEvent> {
  let a = &details.appointment;
  let paid_at = a.deposit_paid_at?;
  (a.payment_status == PaymentStatus::DepositPaid
    && !a.amount_paid.is_zero()
    && window.contains(paid_at))
  .then(|| IncomeEvent::new(IncomeKind::Deposit, details, a.amount_paid, paid_at))
}

/// The completion event of `details`, if one falls inside `window`.
pub fn completion_event(details: &AppointmentDetails, window: &Window) -> Option<IncomeEvent> {
  let a = &details.appointment;
  let completed_at = a.completed_at?;
  (a.status == AppointmentStatus::Completed && window.contains(completed_at)).then(|| {
    IncomeEvent::new(
      IncomeKind::Completion,
      details,
      a.total_price.unwrap_or_default(),
      completed_at,
    )
  })
}

fn event_order(a: &IncomeEvent, b: &IncomeEvent) -> Ordering {
  a.at
    .cmp(&b.at)
    .then(a.kind.cmp(&b.kind))
    .then(a.appointment_id.cmp(&b.appointment_id))
}

/// Classify every record and return the events inside `window`, oldest first.
pub fn income_events<'a, I>(records: I, window: &Window) -> Vec<IncomeEvent>
where
  I: IntoIterator<Item = &'a AppointmentDetails>,
{
  let mut events: Vec<IncomeEvent> = records
    .into_iter()
    .flat_map(|d| [deposit_event(d, window), completion_event(d, window)])
    .flatten()
    .collect();
  events.sort_by(event_order);
  events
}

// ─── Totals ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
  pub income:            i64,
  pub deposit_income:    i64,
  pub completion_income: i64,
  pub expenses:          i64,
  /// Signed; negative when expenses exceed income.
  pub profit:            i64,
}

impl Totals {
  /// Sum `events` and `expenses`. Fails rather than wrapping if a sum leaves
  /// the `i64` range.
  pub fn from_parts(events: &[IncomeEvent], expenses: &[Expense]) -> Result<Self> {
    let sum_kind = |kind: IncomeKind| {
      checked_sum(
        events
          .iter()
          .filter(|e| e.kind == kind)
          .map(|e| e.amount.get()),
      )
    };
    let deposit_income = sum_kind(IncomeKind::Deposit)?;
    let completion_income = sum_kind(IncomeKind::Completion)?;
    let income = deposit_income
      .checked_add(completion_income)
      .ok_or_else(|| out_of_range("income"))?;
    let expenses = checked_sum(expenses.iter().map(|e| e.amount.get()))?;
    let profit = income
      .checked_sub(expenses)
      .ok_or_else(|| out_of_range("profit"))?;
    Ok(Self {
      income,
      deposit_income,
      completion_income,
      expenses,
      profit,
    })
  }
}

fn out_of_range(what: &str) -> Error {
  Error::Store(format!("{what} total is out of range").into())
}

fn checked_sum(amounts: impl IntoIterator<Item = i64>) -> Result<i64> {
  amounts
    .into_iter()
    .try_fold(0i64, i64::checked_add)
    .ok_or_else(|| out_of_range("amount"))
}

/// Money still owed on upcoming, scheduled appointments that hold a deposit.
pub fn pending_balance<'a, I>(appointments: I, today_start: DateTime<Utc>) -> Result<i64>
where
  I: IntoIterator<Item = &'a Appointment>,
{
  let owed = appointments
    .into_iter()
    .filter(|a| {
      a.status == AppointmentStatus::Scheduled
        && a.payment_status == PaymentStatus::DepositPaid
        && a.appointment_time >= today_start
    })
    .filter_map(Appointment::outstanding)
    .filter(|owed| *owed > 0);
  checked_sum(owed).map_err(|_| out_of_range("pending balance"))
}

// ─── Reports ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
  #[serde(flatten)]
  pub totals:          Totals,
  pub pending_balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedReport {
  pub income_details:  Vec<IncomeEvent>,
  pub expense_details: Vec<Expense>,
  pub totals:          Totals,
}

// ─── Aggregator ──────────────────────────────────────────────────────────────

/// Computes summaries and reports from the contents of a store.
pub struct FinancialAggregator<'a, S> {
  store: &'a S,
}

impl<'a, S: StudioStore> FinancialAggregator<'a, S> {
  pub fn new(store: &'a S) -> Self { Self { store } }

  /// Totals for `window` plus the pending balance as of `now`.
  pub async fn summary(&self, window: &Window, now: DateTime<Utc>) -> Result<Summary> {
    let events = self.income_events(window).await?;
    let expenses = self.expenses(window).await?;
    let pending_balance = self.pending_balance(now).await?;
    let totals = Totals::from_parts(&events, &expenses)?;
    Ok(Summary { totals, pending_balance })
  }

  /// Totals for `window` with every contributing event and expense.
  pub async fn detailed_report(&self, window: &Window) -> Result<DetailedReport> {
    let income_details = self.income_events(window).await?;
    let expense_details = self.expenses(window).await?;
    let totals = Totals::from_parts(&income_details, &expense_details)?;
    Ok(DetailedReport { income_details, expense_details, totals })
  }

  pub async fn income_events(&self, window: &Window) -> Result<Vec<IncomeEvent>> {
    let query = AppointmentQuery { income_within: Some(*window), ..Default::default() };
    let records = self
      .store
      .query_appointments(&query)
      .await
      .map_err(Into::into)?;
    Ok(income_events(&records, window))
  }

  /// Expenses dated inside `window`, by date then creation order.
  pub async fn expenses(&self, window: &Window) -> Result<Vec<Expense>> {
    let Some((from, to)) = window.dates() else {
      return Ok(Vec::new());
    };
    let query = ExpenseQuery { from: Some(from), to: Some(to), ..Default::default() };
    let mut expenses = self
      .store
      .query_expenses(&query)
      .await
      .map_err(Into::into)?;
    expenses.retain(|e| window.contains_date(e.expense_date));
    expenses.sort_by_key(|e| (e.expense_date, e.created_at));
    Ok(expenses)
  }

  pub async fn pending_balance(&self, now: DateTime<Utc>) -> Result<i64> {
    let today_start = start_of_day(now);
    let query = AppointmentQuery {
      starts_from: Some(today_start),
      statuses: vec![AppointmentStatus::Scheduled],
      payment_status: Some(PaymentStatus::DepositPaid),
      ..Default::default()
    };
    let records = self
      .store
      .query_appointments(&query)
      .await
      .map_err(Into::into)?;
    pending_balance(records.iter().map(|d| &d.appointment), today_start)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::{appointment::NewAppointment, expense::ExpenseCategory};

  fn ts(d: u32, h: u32) -> DateTime<Utc> { Utc.with_ymd_and_hms(2025, 6, d, h, 0, 0).unwrap() }

  fn money(v: i64) -> Money { Money::new(v).unwrap() }

  fn details(appointment: Appointment) -> AppointmentDetails {
    AppointmentDetails {
      appointment,
      client_name: "Alice".into(),
      artist_name: "Rin".into(),
    }
  }

  fn appointment(start: DateTime<Utc>) -> Appointment {
    NewAppointment::new(Uuid::new_v4(), Uuid::new_v4(), start, 60)
      .into_appointment(Uuid::new_v4(), ts(1, 8))
      .unwrap()
  }

  fn deposit_only(paid_at: DateTime<Utc>) -> Appointment {
    let mut a = appointment(ts(20, 14));
    a.total_price = Some(money(100_000));
    a.amount_paid = money(30_000);
    a.payment_status = PaymentStatus::DepositPaid;
    a.deposit_paid_at = Some(paid_at);
    a
  }

  fn expense(date: NaiveDate, amount: i64) -> Expense {
    Expense {
      id:           Uuid::new_v4(),
      description:  "Needles".into(),
      amount:       money(amount),
      category:     ExpenseCategory::Supplies,
      expense_date: date,
      created_at:   ts(1, 8),
      updated_at:   ts(1, 8),
    }
  }

  #[test]
  fn day_window_is_inclusive_to_the_last_instant() {
    let w = Window::day(2025, 6, 10).unwrap();
    assert_eq!(w.start(), ts(10, 0));
    assert!(w.contains(ts(10, 0)));
    assert!(w.contains(ts(11, 0) - TimeDelta::nanoseconds(1)));
    assert!(!w.contains(ts(11, 0)));
  }

  #[test]
  fn month_window_spans_the_calendar_month() {
    let w = Window::month(2024, 2).unwrap();
    assert_eq!(w.start(), Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
    assert_eq!(w.end().date_naive(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    let dec = Window::month(2025, 12).unwrap();
    assert_eq!(dec.end().date_naive(), NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
  }

  #[test]
  fn invalid_calendar_input_is_rejected() {
    assert!(matches!(Window::month(2025, 13), Err(Error::Validation(_))));
    assert!(matches!(Window::month(2025, 0), Err(Error::Validation(_))));
    assert!(matches!(Window::day(2025, 2, 30), Err(Error::Validation(_))));
    assert!(matches!(Window::day(2025, 6, 0), Err(Error::Validation(_))));
    assert!(matches!(Window::day(0, 6, 1), Err(Error::Validation(_))));
    assert!(Window::new(ts(2, 0), ts(1, 0)).is_err());
  }

  #[test]
  fn window_dates_cover_midnights_only() {
    let w = Window::month(2025, 6).unwrap();
    let (from, to) = w.dates().unwrap();
    assert_eq!(from, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    assert_eq!(to, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());

    let afternoon = Window::new(ts(3, 12), ts(3, 18)).unwrap();
    assert!(afternoon.dates().is_none());
  }

  #[test]
  fn single_deposit_counts_as_income() {
    let records = [details(deposit_only(ts(5, 10)))];
    let w = Window::month(2025, 6).unwrap();
    let events = income_events(&records, &w);
    let totals = Totals::from_parts(&events, &[]).unwrap();
    assert_eq!(totals.income, 30_000);
    assert_eq!(totals.deposit_income, 30_000);
    assert_eq!(totals.completion_income, 0);
  }

  #[test]
  fn deposit_and_completion_in_one_window_both_count() {
    let mut a = deposit_only(ts(1, 10));
    a.status = AppointmentStatus::Completed;
    a.completed_at = Some(ts(5, 16));
    let records = [details(a)];
    let events = income_events(&records, &Window::month(2025, 6).unwrap());
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, IncomeKind::Deposit);
    assert_eq!(events[1].kind, IncomeKind::Completion);
    assert_eq!(Totals::from_parts(&events, &[]).unwrap().income, 130_000);
  }

  #[test]
  fn events_count_in_their_own_window() {
    let mut a = deposit_only(ts(1, 10));
    a.status = AppointmentStatus::Completed;
    a.completed_at = Some(ts(5, 16));
    let records = [details(a)];

    let day_one = income_events(&records, &Window::day(2025, 6, 1).unwrap());
    assert_eq!(day_one.len(), 1);
    assert_eq!(day_one[0].amount.get(), 30_000);

    let day_five = income_events(&records, &Window::day(2025, 6, 5).unwrap());
    assert_eq!(day_five.len(), 1);
    assert_eq!(day_five[0].amount.get(), 100_000);

    assert!(income_events(&records, &Window::day(2025, 6, 3).unwrap()).is_empty());
  }

  #[test]
  fn deposit_is_dropped_once_payment_status_moves_on() {
    let mut a = deposit_only(ts(1, 10));
    a.payment_status = PaymentStatus::FullyPaid;
    let records = [details(a)];
    assert!(income_events(&records, &Window::month(2025, 6).unwrap()).is_empty());
  }

  #[test]
  fn completion_without_price_counts_zero() {
    let mut a = appointment(ts(4, 10));
    a.status = AppointmentStatus::Completed;
    a.completed_at = Some(ts(4, 11));
    let records = [details(a)];
    let events = income_events(&records, &Window::day(2025, 6, 4).unwrap());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].amount, Money::ZERO);
  }

  #[test]
  fn profit_may_be_negative() {
    let d = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let totals = Totals::from_parts(&[], &[expense(d, 500), expense(d, 250)]).unwrap();
    assert_eq!(totals.expenses, 750);
    assert_eq!(totals.profit, -750);
  }

  #[test]
  fn largest_amounts_sum_without_wrapping() {
    let d = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
    let max = Money::MAX.get();
    let totals = Totals::from_parts(&[], &[expense(d, max), expense(d, max)]).unwrap();
    assert_eq!(totals.expenses, 2 * max);
    assert_eq!(totals.profit, -2 * max);
  }

  #[test]
  fn overflowing_sum_is_an_error() {
    assert!(matches!(checked_sum([i64::MAX, 1]), Err(Error::Store(_))));
    assert_eq!(checked_sum([i64::MAX - 1, 1]).unwrap(), i64::MAX);
  }

  #[test]
  fn pending_balance_skips_past_and_settled_appointments() {
    let today = ts(10, 0);

    let upcoming = {
      let mut a = deposit_only(ts(1, 10));
      a.appointment_time = ts(12, 14);
      a
    };
    let past = {
      let mut a = deposit_only(ts(1, 10));
      a.appointment_time = ts(9, 14);
      a
    };
    let later_today = {
      let mut a = deposit_only(ts(1, 10));
      a.appointment_time = ts(10, 9);
      a
    };
    let settled = {
      let mut a = deposit_only(ts(1, 10));
      a.appointment_time = ts(12, 14);
      a.amount_paid = money(100_000);
      a
    };
    let no_price = {
      let mut a = deposit_only(ts(1, 10));
      a.appointment_time = ts(12, 14);
      a.total_price = None;
      a
    };
    let all = [upcoming, past, later_today, settled, no_price];
    assert_eq!(pending_balance(&all, today).unwrap(), 140_000);
  }

  #[test]
  fn start_of_day_truncates_to_midnight() {
    assert_eq!(start_of_day(ts(10, 17)), ts(10, 0));
  }
}
