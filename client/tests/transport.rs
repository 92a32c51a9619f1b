//! Real reqwest transport against an in-process axum backend.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use finance_client::core::ApiError;
use finance_client::services::api::{
    auth, budgets, transactions, ApiClient, MemorySessionStore, RecordingNavigator, RecordingSleeper,
    ReqwestTransport, RetryPolicy, SessionManager,
};
use finance_client::QueryClient;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Default)]
struct Backend {
    transaction_hits: Arc<AtomicUsize>,
    request_ids: Arc<parking_lot::Mutex<Vec<String>>>,
}

async fn me(headers: HeaderMap) -> Response {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer good-token") => {
            Json(json!({ "id": 1, "email": "ada@example.com", "fullName": "Ada Lovelace" })).into_response()
        }
        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid token" }))).into_response(),
    }
}

/// Fails twice with 500, then answers.
async fn flaky_transactions(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        backend.request_ids.lock().push(id.to_string());
    }
    let hit = backend.transaction_hits.fetch_add(1, Ordering::SeqCst);
    if hit < 2 {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "database busy" }))).into_response();
    }
    Json(json!([
        { "id": 1, "name": "COFFEE 123", "merchantName": "Cafe", "amount": 4.5, "date": "2025-03-02" }
    ]))
    .into_response()
}

async fn upsert_budget(Json(body): Json<Value>) -> Response {
    if body["amount"].as_f64().unwrap_or(0.0) <= 0.0 {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Amount must be positive" }))).into_response();
    }
    Json(json!({
        "id": 9,
        "category": body["category"],
        "amount": body["amount"],
        "month": body["month"],
    }))
    .into_response()
}

async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/api/users/me", get(me))
        .route("/api/transactions", get(flaky_transactions))
        .route("/api/budgets", post(upsert_budget))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

struct Client {
    api: ApiClient,
    sleeper: Arc<RecordingSleeper>,
    navigator: Arc<RecordingNavigator>,
}

fn client(base_url: &str, token: &str) -> Client {
    let sleeper = Arc::new(RecordingSleeper::new());
    let navigator = Arc::new(RecordingNavigator::default());
    let session = Arc::new(SessionManager::new(
        Arc::new(MemorySessionStore::with_token(token)),
        navigator.clone(),
    ));
    let transport = Arc::new(ReqwestTransport::new(base_url, Duration::from_secs(5)));
    let api = ApiClient::builder(transport, session)
        .retry_policy(RetryPolicy::default())
        .sleeper(sleeper.clone())
        .build();
    Client { api, sleeper, navigator }
}

#[tokio::test]
async fn test_bearer_token_reaches_backend() {
    let base_url = spawn_backend(Backend::default()).await;
    let c = client(&base_url, "good-token");

    let user = auth::current_user(&c.api).await.unwrap();

    assert_eq!(user.full_name, "Ada Lovelace");
    assert_eq!(c.navigator.redirects(), 0);
}

#[tokio::test]
async fn test_rejected_token_ends_session() {
    let base_url = spawn_backend(Backend::default()).await;
    let c = client(&base_url, "revoked");

    let err = auth::current_user(&c.api).await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized("Invalid token".to_string()));
    assert!(c.api.session().token().is_none());
    assert_eq!(c.navigator.redirects(), 1);
}

#[tokio::test]
async fn test_server_errors_are_retried_with_backoff() {
    let backend = Backend::default();
    let base_url = spawn_backend(backend.clone()).await;
    let c = client(&base_url, "good-token");

    let listed = transactions::list(&c.api, None).await.unwrap();

    assert_eq!(listed[0].display_name(), "Cafe");
    assert_eq!(backend.transaction_hits.load(Ordering::SeqCst), 3);
    assert_eq!(
        c.sleeper.calls(),
        vec![Duration::from_millis(1000), Duration::from_millis(2000)]
    );
    let ids = backend.request_ids.lock().clone();
    assert_eq!(ids.len(), 3);
    assert!(ids.iter().all(|id| id == &ids[0]));
}

#[tokio::test]
async fn test_unknown_route_is_not_found_without_retry() {
    let base_url = spawn_backend(Backend::default()).await;
    let c = client(&base_url, "good-token");

    let err = budgets::current(&c.api).await.unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
    assert!(c.sleeper.calls().is_empty());
}

#[tokio::test]
async fn test_validation_message_survives_the_cache() {
    let base_url = spawn_backend(Backend::default()).await;
    let c = client(&base_url, "good-token");
    let api = Arc::new(c.api);
    let cache = QueryClient::new();

    let request = shared::BudgetRequest {
        category: "Groceries".to_string(),
        amount: 0.0,
        month: chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        notes: None,
        alert_threshold: None,
    };
    let err = cache
        .mutate(&finance_client::queries::budgets::save(&api), request)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Request rejected (400): Amount must be positive");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    // Nothing listens on port 9 (discard) on the loopback interface.
    let c = client("http://127.0.0.1:9/api", "good-token");

    let err = auth::current_user(&c.api).await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(c.sleeper.calls().len(), 2);
    assert!(c.api.session().token().is_some());
}
