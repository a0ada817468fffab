//! Handlers for `/reports` endpoints.
//!
//! All parameters are required and parsed strictly: a non-numeric value is a
//! `validation` error, as is an out-of-range month or a day the month does
//! not have.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use chrono::{NaiveDate, Utc};
use inkbook_core::{
  finance::{DetailedReport, FinancialAggregator, Summary, Window},
  store::StudioStore,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, extract::required};

#[derive(Debug, Default, Deserialize)]
pub struct PeriodParams {
  pub year:  Option<String>,
  pub month: Option<String>,
  pub day:   Option<String>,
}

impl PeriodParams {
  fn year_month(&self) -> Result<(i32, u32), ApiError> {
    Ok((
      required("year", self.year.as_deref())?,
      required("month", self.month.as_deref())?,
    ))
  }
}

// ─── Response bodies ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
  pub year:    i32,
  pub month:   u32,
  #[serde(flatten)]
  pub summary: Summary,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReportResponse {
  Daily {
    date:   NaiveDate,
    #[serde(flatten)]
    report: DetailedReport,
  },
  Monthly {
    year:   i32,
    month:  u32,
    #[serde(flatten)]
    report: DetailedReport,
  },
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `GET /reports/summary?year&month`
pub async fn summary<S: StudioStore>(
  State(store): State<Arc<S>>,
  params: Result<Query<PeriodParams>, QueryRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
  let Query(params) = params?;
  let (year, month) = params.year_month()?;
  let window = Window::month(year, month)?;
  tracing::debug!(year, month, start = %window.start(), end = %window.end(), "summary");

  let summary = FinancialAggregator::new(store.as_ref())
    .summary(&window, Utc::now())
    .await?;
  Ok(Json(SummaryResponse { year, month, summary }))
}

/// `GET /reports/daily?year&month&day`
pub async fn daily<S: StudioStore>(
  State(store): State<Arc<S>>,
  params: Result<Query<PeriodParams>, QueryRejection>,
) -> Result<Json<ReportResponse>, ApiError> {
  let Query(params) = params?;
  let (year, month) = params.year_month()?;
  let day: u32 = required("day", params.day.as_deref())?;
  let window = Window::day(year, month, day)?;
  let date = window.start().date_naive();
  tracing::debug!(%date, "daily report");

  let report = FinancialAggregator::new(store.as_ref())
    .detailed_report(&window)
    .await?;
  Ok(Json(ReportResponse::Daily { date, report }))
}

/// `GET /reports/monthly?year&month`
pub async fn monthly<S: StudioStore>(
  State(store): State<Arc<S>>,
  params: Result<Query<PeriodParams>, QueryRejection>,
) -> Result<Json<ReportResponse>, ApiError> {
  let Query(params) = params?;
  let (year, month) = params.year_month()?;
  let window = Window::month(year, month)?;
  tracing::debug!(year, month, "monthly report");

  let report = FinancialAggregator::new(store.as_ref())
    .detailed_report(&window)
    .await?;
  Ok(Json(ReportResponse::Monthly { year, month, report }))
}
