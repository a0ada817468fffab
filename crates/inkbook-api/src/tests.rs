//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use inkbook_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  api_router(Arc::new(store))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app
    .clone()
    .oneshot(builder.body(body).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

async fn create(app: &Router, uri: &str, body: Value) -> Value {
  let (status, json) = send(app, "POST", uri, Some(body)).await;
  assert_eq!(status, StatusCode::CREATED, "{json}");
  json
}

fn id(v: &Value) -> String { v["id"].as_str().unwrap().to_owned() }

struct Seed {
  alice: String,
  bob:   String,
  rin:   String,
  kai:   String,
}

async fn seed(app: &Router) -> Seed {
  Seed {
    alice: id(&create(app, "/clients", json!({ "name": "Alice" })).await),
    bob:   id(&create(app, "/clients", json!({ "name": "Bob" })).await),
    rin:   id(&create(app, "/artists", json!({ "name": "Rin" })).await),
    kai:   id(&create(app, "/artists", json!({ "name": "Kai" })).await),
  }
}

fn booking(client: &str, artist: &str, time: &str) -> Value {
  json!({
    "clientId": client,
    "artistId": artist,
    "appointmentTime": time,
    "durationMinutes": 60,
  })
}

// ─── Clients & artists ───────────────────────────────────────────────────────

#[tokio::test]
async fn client_crud() {
  let app = app().await;
  let client = create(&app, "/clients", json!({ "name": "Alice", "email": "a@ink.test" })).await;
  let uri = format!("/clients/{}", id(&client));

  let (status, fetched) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched["email"], "a@ink.test");
  assert!(fetched["createdAt"].is_string());

  let (status, patched) = send(&app, "PATCH", &uri, Some(json!({ "phone": "555" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(patched["phone"], "555");
  assert_eq!(patched["name"], "Alice");

  let (status, _) = send(&app, "DELETE", &uri, None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (status, body) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["kind"], "not_found");
}

#[tokio::test]
async fn malformed_path_id_is_a_validation_error() {
  let app = app().await;
  let (status, body) = send(&app, "GET", "/clients/not-a-uuid", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn missing_client_name_is_rejected() {
  let app = app().await;
  let (status, body) = send(&app, "POST", "/clients", Some(json!({ "phone": "1" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["kind"], "validation");

  let (status, _) = send(&app, "POST", "/clients", Some(json!({ "name": "  " }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_artist_is_a_conflict_kind() {
  let app = app().await;
  create(&app, "/artists", json!({ "name": "Rin" })).await;
  let (status, body) = send(&app, "POST", "/artists", Some(json!({ "name": "Rin" }))).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["kind"], "duplicate");
}

#[tokio::test]
async fn busy_artist_cannot_be_deleted() {
  let app = app().await;
  let s = seed(&app).await;
  create(&app, "/appointments", booking(&s.alice, &s.rin, "2025-06-10T14:00:00Z")).await;

  let (status, body) = send(&app, "DELETE", &format!("/artists/{}", s.rin), None).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["kind"], "in_use");
}

// ─── Appointments ────────────────────────────────────────────────────────────

#[tokio::test]
async fn booking_day_over_http() {
  let app = app().await;
  let s = seed(&app).await;

  let first = create(&app, "/appointments", booking(&s.alice, &s.rin, "2025-06-10T14:00:00Z")).await;
  assert_eq!(first["status"], "scheduled");
  assert_eq!(first["paymentStatus"], "pending");

  let (status, body) = send(
    &app,
    "POST",
    "/appointments",
    Some(booking(&s.bob, &s.rin, "2025-06-10T14:30:00Z")),
  )
  .await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["kind"], "conflict");

  create(&app, "/appointments", booking(&s.bob, &s.rin, "2025-06-10T15:00:00Z")).await;
  create(&app, "/appointments", booking(&s.bob, &s.kai, "2025-06-10T14:30:00Z")).await;

  let (status, list) = send(&app, "GET", &format!("/appointments?artistId={}", s.rin), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(list.as_array().unwrap().len(), 2);
  assert_eq!(list[0]["clientName"], "Alice");
}

#[tokio::test]
async fn availability_reports_the_blocking_booking() {
  let app = app().await;
  let s = seed(&app).await;
  let first = create(&app, "/appointments", booking(&s.alice, &s.rin, "2025-06-10T14:00:00Z")).await;

  let uri = format!(
    "/appointments/availability?artistId={}&start=2025-06-10T14:30:00Z&durationMinutes=30",
    s.rin
  );
  let (status, body) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["available"], false);
  assert_eq!(body["conflict"]["id"], first["id"]);

  let uri = format!(
    "/appointments/availability?artistId={}&start=2025-06-10T15:00:00Z&durationMinutes=60",
    s.rin
  );
  let (_, body) = send(&app, "GET", &uri, None).await;
  assert_eq!(body["available"], true);

  let uri = format!(
    "/appointments/availability?artistId={}&start=2025-06-10T15:00:00Z&durationMinutes=0",
    s.rin
  );
  let (status, body) = send(&app, "GET", &uri, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["kind"], "validation");

  let (status, _) = send(&app, "GET", "/appointments/availability?artistId=x", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_client_is_a_reference_error() {
  let app = app().await;
  let s = seed(&app).await;
  let ghost = uuid::Uuid::new_v4().to_string();
  let (status, body) = send(
    &app,
    "POST",
    "/appointments",
    Some(booking(&ghost, &s.rin, "2025-06-10T14:00:00Z")),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["kind"], "reference");
}

#[tokio::test]
async fn money_is_parsed_strictly() {
  let app = app().await;
  let s = seed(&app).await;

  for bad in [json!("12.5"), json!(-5), json!(12.5), json!("1,000"), json!("")] {
    let mut body = booking(&s.alice, &s.rin, "2025-06-10T09:00:00Z");
    body["totalPrice"] = bad.clone();
    let (status, err) = send(&app, "POST", "/appointments", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {bad}");
    assert_eq!(err["kind"], "validation");
  }

  let mut body = booking(&s.alice, &s.rin, "2025-06-10T09:00:00Z");
  body["totalPrice"] = json!("100000");
  body["amountPaid"] = json!(30000);
  body["paymentStatus"] = json!("deposit_paid");
  let created = create(&app, "/appointments", body).await;
  assert_eq!(created["totalPrice"], 100000);
  assert!(created["depositPaidAt"].is_string());
}

#[tokio::test]
async fn put_is_an_alias_for_patch() {
  let app = app().await;
  let s = seed(&app).await;
  let a = create(&app, "/appointments", booking(&s.alice, &s.rin, "2025-06-10T14:00:00Z")).await;
  let uri = format!("/appointments/{}", id(&a));

  let (status, body) = send(&app, "PUT", &uri, Some(json!({ "status": "completed" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "completed");
  assert!(body["completedAt"].is_string());

  let (status, body) = send(&app, "PATCH", &uri, Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["kind"], "validation");

  let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "status": "postponed" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["kind"], "validation");
}

// ─── Expenses & reports ──────────────────────────────────────────────────────

#[tokio::test]
async fn expenses_are_listed_newest_first() {
  let app = app().await;
  for (desc, date) in [("Rent", "2025-06-01"), ("Ink", "2025-06-20"), ("Gloves", "2025-06-05")] {
    create(
      &app,
      "/expenses",
      json!({ "description": desc, "amount": 1000, "category": "supplies", "expenseDate": date }),
    )
    .await;
  }
  let (status, list) = send(&app, "GET", "/expenses", None).await;
  assert_eq!(status, StatusCode::OK);
  let names: Vec<_> = list
    .as_array()
    .unwrap()
    .iter()
    .map(|e| e["description"].as_str().unwrap().to_owned())
    .collect();
  assert_eq!(names, ["Ink", "Gloves", "Rent"]);

  let (status, body) = send(&app, "GET", "/expenses?from=June", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["kind"], "validation");

  let (status, _) = send(
    &app,
    "POST",
    "/expenses",
    Some(json!({ "description": "Free", "amount": 0, "category": "other" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_expenses_are_rejected_and_reports_stay_sound() {
  let app = app().await;

  let half = i64::MAX / 2 + 1;
  for amount in [json!(half), json!(half.to_string()), json!(u64::MAX)] {
    let (status, err) = send(
      &app,
      "POST",
      "/expenses",
      Some(json!({ "description": "Huge", "amount": amount, "category": "other", "expenseDate": "2025-06-03" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {amount}");
    assert_eq!(err["kind"], "validation");
  }

  for _ in 0..2 {
    create(
      &app,
      "/expenses",
      json!({ "description": "Lease", "amount": 1_000_000_000_000i64, "category": "rent", "expenseDate": "2025-06-03" }),
    )
    .await;
  }
  let (status, report) = send(&app, "GET", "/reports/monthly?year=2025&month=6", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(report["totals"]["expenses"], 2_000_000_000_000i64);
  assert_eq!(report["totals"]["profit"], -2_000_000_000_000i64);
}

#[tokio::test]
async fn report_parameters_are_validated() {
  let app = app().await;
  for uri in [
    "/reports/summary?year=2025&month=13",
    "/reports/summary?year=abc&month=6",
    "/reports/summary?year=2025",
    "/reports/daily?year=2025&month=2&day=30",
    "/reports/monthly?year=2025&month=0",
  ] {
    let (status, body) = send(&app, "GET", uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    assert_eq!(body["kind"], "validation", "{uri}");
  }
}

#[tokio::test]
async fn report_shapes() {
  let app = app().await;
  create(
    &app,
    "/expenses",
    json!({ "description": "Rent", "amount": "50000", "category": "rent", "expenseDate": "2025-06-01" }),
  )
  .await;

  let (status, summary) = send(&app, "GET", "/reports/summary?year=2025&month=6", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(summary["year"], 2025);
  assert_eq!(summary["month"], 6);
  assert_eq!(summary["expenses"], 50000);
  assert_eq!(summary["profit"], -50000);
  assert_eq!(summary["depositIncome"], 0);
  assert!(summary["pendingBalance"].is_number());

  let (_, daily) = send(&app, "GET", "/reports/daily?year=2025&month=6&day=1", None).await;
  assert_eq!(daily["type"], "daily");
  assert_eq!(daily["date"], "2025-06-01");
  assert_eq!(daily["expenseDetails"].as_array().unwrap().len(), 1);
  assert_eq!(daily["totals"]["expenses"], 50000);

  let (_, monthly) = send(&app, "GET", "/reports/monthly?year=2025&month=6", None).await;
  assert_eq!(monthly["type"], "monthly");
  assert_eq!(monthly["incomeDetails"], json!([]));
}
