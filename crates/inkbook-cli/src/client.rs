//! Async HTTP client for the inkbook report endpoints.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use inkbook_core::finance::{DetailedReport, Summary};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

/// Connection settings for the inkbook API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub token:    String,
}

/// Error body returned by the server on any non-2xx response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
  kind:    String,
  message: String,
}

/// Async HTTP client for the `/api/reports` endpoints.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.token.is_empty() {
      req
    } else {
      req.bearer_auth(&self.config.token)
    }
  }

  async fn get<T: serde::de::DeserializeOwned>(
    &self,
    path: &str,
    query: &[(&str, String)],
  ) -> Result<T> {
    let resp = self
      .auth(self.client.get(self.url(path)))
      .query(query)
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;
    let resp = check(path, resp).await?;
    resp
      .json()
      .await
      .with_context(|| format!("deserialising {path}"))
  }

  // ── Reports ───────────────────────────────────────────────────────────────

  /// `GET /api/reports/summary?year&month`
  pub async fn summary(&self, year: i32, month: u32) -> Result<Summary> {
    self
      .get("/reports/summary", &[
        ("year", year.to_string()),
        ("month", month.to_string()),
      ])
      .await
  }

  /// `GET /api/reports/monthly?year&month`
  pub async fn monthly(&self, year: i32, month: u32) -> Result<DetailedReport> {
    self
      .get("/reports/monthly", &[
        ("year", year.to_string()),
        ("month", month.to_string()),
      ])
      .await
  }

  /// `GET /api/reports/daily?year&month&day`
  pub async fn daily(&self, year: i32, month: u32, day: u32) -> Result<DetailedReport> {
    self
      .get("/reports/daily", &[
        ("year", year.to_string()),
        ("month", month.to_string()),
        ("day", day.to_string()),
      ])
      .await
  }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check(path: &str, resp: Response) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  match resp.json::<ErrorBody>().await {
    Ok(body) => Err(anyhow!("GET {path} → {status}: {} ({})", body.message, body.kind)),
    Err(_) => Err(anyhow!("GET {path} → {status}")),
  }
}
