//! Application state machine and event dispatcher.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use inkbook_core::finance::{DetailedReport, Summary};

use crate::client::ApiClient;

// ─── Period ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Monthly,
  Daily,
}

/// The reporting period on screen: a whole month, or a single day.
///
/// In monthly mode only the year and month of `date` matter; the day is kept
/// so that toggling back to daily mode returns to the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
  pub mode: Mode,
  pub date: NaiveDate,
}

impl Period {
  pub fn new(mode: Mode, date: NaiveDate) -> Self { Self { mode, date } }

  /// The period containing `now`. Days are UTC days, as on the server.
  pub fn containing(mode: Mode, now: DateTime<Utc>) -> Self {
    Self::new(mode, now.date_naive())
  }

  pub fn today(mode: Mode) -> Self { Self::containing(mode, Utc::now()) }

  pub fn toggled(self) -> Self {
    let mode = match self.mode {
      Mode::Monthly => Mode::Daily,
      Mode::Daily => Mode::Monthly,
    };
    Self { mode, ..self }
  }

  /// The following period, or `self` at the end of the calendar.
  pub fn next(self) -> Self {
    let date = match self.mode {
      Mode::Monthly => self.date.checked_add_months(Months::new(1)),
      Mode::Daily => self.date.succ_opt(),
    };
    Self { date: date.unwrap_or(self.date), ..self }
  }

  /// The preceding period, or `self` at the start of the calendar.
  pub fn prev(self) -> Self {
    let date = match self.mode {
      Mode::Monthly => self.date.checked_sub_months(Months::new(1)),
      Mode::Daily => self.date.pred_opt(),
    };
    Self { date: date.unwrap_or(self.date), ..self }
  }

  pub fn label(&self) -> String {
    match self.mode {
      Mode::Monthly => self.date.format("%B %Y").to_string(),
      Mode::Daily => self.date.format("%a %Y-%m-%d").to_string(),
    }
  }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Selected period.
  pub period: Period,

  /// Summary for the month containing the selected period.
  pub summary: Option<Summary>,

  /// Detailed report for the selected period.
  pub report: Option<DetailedReport>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,

  pub client: ApiClient,
}

impl App {
  pub fn new(client: ApiClient) -> Self {
    Self {
      period: Period::today(Mode::Monthly),
      summary: None,
      report: None,
      status_msg: String::new(),
      client,
    }
  }

  // ── Data loading ──────────────────────────────────────────────────────────

  /// Fetch the summary and report for the selected period.
  pub async fn load(&mut self) -> anyhow::Result<()> {
    let date = self.period.date;
    let (year, month) = (date.year(), date.month());

    let report = match self.period.mode {
      Mode::Monthly => self.client.monthly(year, month).await?,
      Mode::Daily => self.client.daily(year, month, date.day()).await?,
    };
    let summary = self.client.summary(year, month).await?;

    tracing::debug!(
      period = %self.period.label(),
      income = report.income_details.len(),
      expenses = report.expense_details.len(),
      "loaded report"
    );
    self.report = Some(report);
    self.summary = Some(summary);
    self.status_msg.clear();
    Ok(())
  }

  /// Like [`App::load`], but failures land in the status bar.
  async fn reload(&mut self) {
    if let Err(e) = self.load().await {
      tracing::warn!(error = %e, "reload failed");
      self.report = None;
      self.summary = None;
      self.status_msg = format!("error: {e:#}");
    }
  }

  async fn select(&mut self, period: Period) {
    if period != self.period {
      self.period = period;
      self.reload().await;
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Tab => self.select(self.period.toggled()).await,
      KeyCode::Left | KeyCode::Char('h') => self.select(self.period.prev()).await,
      KeyCode::Right | KeyCode::Char('l') => self.select(self.period.next()).await,
      KeyCode::Char('t') => self.select(Period::today(self.period.mode)).await,
      KeyCode::Char('r') => self.reload().await,

      _ => {}
    }
    Ok(true)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn monthly_navigation_crosses_years() {
    let p = Period::new(Mode::Monthly, date(2025, 12, 15));
    assert_eq!(p.next().date, date(2026, 1, 15));
    assert_eq!(p.next().prev(), p);

    let jan = Period::new(Mode::Monthly, date(2025, 1, 1));
    assert_eq!(jan.prev().date, date(2024, 12, 1));
  }

  #[test]
  fn monthly_navigation_clamps_day() {
    let p = Period::new(Mode::Monthly, date(2024, 1, 31));
    assert_eq!(p.next().date, date(2024, 2, 29));
  }

  #[test]
  fn daily_navigation_crosses_months() {
    let p = Period::new(Mode::Daily, date(2024, 2, 28));
    assert_eq!(p.next().date, date(2024, 2, 29));
    assert_eq!(p.next().next().date, date(2024, 3, 1));
    assert_eq!(Period::new(Mode::Daily, date(2024, 3, 1)).prev().date, date(2024, 2, 29));
  }

  #[test]
  fn navigation_stops_at_calendar_edge() {
    let p = Period::new(Mode::Daily, NaiveDate::MAX);
    assert_eq!(p.next(), p);
    let p = Period::new(Mode::Monthly, NaiveDate::MIN);
    assert_eq!(p.prev(), p);
  }

  #[test]
  fn toggle_keeps_date() {
    let p = Period::new(Mode::Monthly, date(2025, 6, 14));
    let d = p.toggled();
    assert_eq!(d.mode, Mode::Daily);
    assert_eq!(d.date, p.date);
    assert_eq!(d.toggled(), p);
  }

  #[test]
  fn today_follows_the_utc_calendar() {
    use chrono::{FixedOffset, TimeZone};

    // 23:30 on the 14th in UTC-05:00 is already the 15th in UTC.
    let late = FixedOffset::west_opt(5 * 3600)
      .unwrap()
      .with_ymd_and_hms(2025, 6, 14, 23, 30, 0)
      .unwrap()
      .with_timezone(&Utc);
    assert_eq!(Period::containing(Mode::Daily, late).date, date(2025, 6, 15));

    let june_end = Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap();
    assert_eq!(Period::containing(Mode::Monthly, june_end).date.month(), 6);
  }

  #[test]
  fn labels() {
    assert_eq!(Period::new(Mode::Monthly, date(2025, 6, 14)).label(), "June 2025");
    assert_eq!(Period::new(Mode::Daily, date(2025, 6, 14)).label(), "Sat 2025-06-14");
  }
}
