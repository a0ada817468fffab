//! HTTP server for Inkbook.
//!
//! Composes the JSON API from `inkbook-api` under `/api` behind the bearer
//! token gate, adds an unauthenticated `/health` probe, and wraps everything
//! in request tracing.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, middleware, routing::get};
use inkbook_core::store::StudioStore;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use auth::AuthConfig;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `INKBOOK_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:             String,
  #[serde(default = "default_port")]
  pub port:             u16,
  pub store_path:       PathBuf,
  pub auth_token_hash:  String,
  /// Upper bound on each store call, in milliseconds.
  #[serde(default = "default_store_timeout_ms")]
  pub store_timeout_ms: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8787 }

fn default_store_timeout_ms() -> u64 { 5_000 }

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs, shared across requests.
#[derive(Clone)]
pub struct AppState<S: StudioStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: StudioStore + 'static,
{
  let api = inkbook_api::api_router(state.store)
    .layer(middleware::from_fn_with_state(state.auth, auth::require_token));

  Router::new()
    .route("/health", get(health))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use inkbook_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  async fn make_state() -> (AppState<SqliteStore>, String) {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let (token, hash) = auth::generate_token().unwrap();
    let state = AppState {
      store: Arc::new(store),
      auth:  Arc::new(AuthConfig { token_hash: hash }),
    };
    (state, token)
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, String)>,
    body:    &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  fn bearer(token: &str) -> Vec<(header::HeaderName, String)> {
    vec![(header::AUTHORIZATION, format!("Bearer {token}"))]
  }

  #[tokio::test]
  async fn health_needs_no_token() {
    let (state, _) = make_state().await;
    let resp = oneshot_raw(state, "GET", "/health", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn api_without_token_is_unauthorized() {
    let (state, _) = make_state().await;
    let resp = oneshot_raw(state, "GET", "/api/clients", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["kind"], "unauthorized");
  }

  #[tokio::test]
  async fn api_with_wrong_token_is_unauthorized() {
    let (state, _) = make_state().await;
    let resp = oneshot_raw(state, "GET", "/api/clients", bearer("guess"), "").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn api_with_token_reaches_handlers() {
    let (state, token) = make_state().await;
    let resp = oneshot_raw(state.clone(), "GET", "/api/clients", bearer(&token), "").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let mut headers = bearer(&token);
    headers.push((header::CONTENT_TYPE, "application/json".into()));
    let resp = oneshot_raw(state, "POST", "/api/artists", headers, r#"{"name":"Rin"}"#).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
  }

  #[test]
  fn config_defaults_apply() {
    let cfg: ServerConfig = serde_json::from_value(json!({
      "store_path": "~/inkbook.db",
      "auth_token_hash": "$argon2id$placeholder",
    }))
    .unwrap();
    assert_eq!(cfg.port, 8787);
    assert_eq!(cfg.store_timeout_ms, 5_000);
    assert_eq!(cfg.host, "127.0.0.1");
  }
}
