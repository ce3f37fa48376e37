#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use budget_client::{Client, QueryCache, QueryClient};
use serde_json::{Value, json};

pub const TOKEN: &str = "secret";
pub const TOTAL_TRANSACTIONS: u64 = 45;
/// A `search_query` with this value makes the transactions list answer late.
pub const SLOW_SEARCH: &str = "slow";
pub const ITEM_ID: &str = "8d1f2f0e-0a0b-4c1e-9a0a-3f2b1c0d9e8f";

/// Counters and switches shared with the fake backend.
#[derive(Clone, Default)]
pub struct Backend {
    pub transaction_lists: Arc<AtomicUsize>,
    pub transaction_creates: Arc<AtomicUsize>,
    pub insight_calls: Arc<AtomicUsize>,
    pub fail_next_insights: Arc<AtomicBool>,
}

impl Backend {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("budget_client=debug")
        .with_test_writer()
        .try_init();
}

fn transaction(id: u64) -> Value {
    json!({
        "id": id,
        "amount": 10.0,
        "transaction_type": "expense",
        "category_id": 1,
        "transaction_date": "2024-03-01",
        "payment_method": "card",
        "description": null
    })
}

fn param(query: &HashMap<String, String>, name: &str, default: u64) -> u64 {
    query
        .get(name)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

async fn list_transactions(
    State(backend): State<Backend>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    backend.transaction_lists.fetch_add(1, Ordering::SeqCst);
    if query.get("search_query").map(String::as_str) == Some(SLOW_SEARCH) {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    let skip = param(&query, "skip", 0);
    let limit = param(&query, "limit", 20);
    let end = (skip + limit).min(TOTAL_TRANSACTIONS);
    let items: Vec<Value> = (skip..end).map(|idx| transaction(idx + 1)).collect();
    Json(json!({ "items": items, "total": TOTAL_TRANSACTIONS }))
}

async fn create_transaction(
    State(backend): State<Backend>,
    Json(body): Json<Value>,
) -> Response {
    backend.transaction_creates.fetch_add(1, Ordering::SeqCst);
    let amount = body["amount"].as_f64().unwrap_or_default();
    if amount > 1000.0 {
        let detail = json!({
            "detail": [{ "loc": ["body", "amount"], "msg": "Amount exceeds the limit", "type": "value_error" }]
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(detail)).into_response();
    }
    let mut created = transaction(99);
    created["amount"] = json!(amount);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn delete_transaction(Path(id): Path<u64>) -> Response {
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Transaction not found" })),
        )
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn category_spending() -> Json<Value> {
    Json(json!([
        { "category_id": 1, "category_name": "Food", "total_amount": 120.5, "transaction_count": 4 },
        { "category_id": 2, "category_name": "Rent", "total_amount": 900.0, "transaction_count": 1 }
    ]))
}

async fn list_categories() -> Json<Value> {
    Json(json!([
        { "id": 1, "name": "Food", "description": null },
        { "id": 2, "name": "Rent" }
    ]))
}

async fn list_items(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let skip = param(&query, "skip", 0);
    Json(json!({
        "data": [{
            "id": ITEM_ID,
            "title": format!("item at {skip}"),
            "description": null,
            "tags": ["a", "b", "c", "d"],
            "owner_id": null
        }],
        "count": 7
    }))
}

async fn list_comments(Query(query): Query<HashMap<String, String>>) -> Response {
    if query.get("item_id").map(String::as_str) != Some(ITEM_ID) {
        return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Item not found" }))).into_response();
    }
    Json(json!({
        "data": [{
            "id": "5f0c6a52-8f5e-4d4b-9a53-0d7c4f7c1a11",
            "item_id": ITEM_ID,
            "author_id": "0c9b8a7f-6e5d-4c3b-2a19-080706050403",
            "author_name": "Ada",
            "content": "first!",
            "created_at": "2024-01-01T10:00:00Z",
            "updated_at": "2024-01-01T10:00:00Z"
        }],
        "count": 1
    }))
    .into_response()
}

async fn behavior_insights(State(backend): State<Backend>) -> Response {
    backend.insight_calls.fetch_add(1, Ordering::SeqCst);
    if backend.fail_next_insights.swap(false, Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "analytics unavailable" })),
        )
            .into_response();
    }
    Json(json!({
        "total_items": 12,
        "total_comments": 30,
        "average_items_per_day": 1.5,
        "most_active_hour": 14,
        "most_active_day": 2,
        "activity_trend": "increasing",
        "top_tags": ["rust"],
        "predicted_next_tags": []
    }))
    .into_response()
}

async fn current_user(headers: HeaderMap) -> Response {
    let expected = format!("Bearer {TOKEN}");
    match headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()) {
        Some(value) if value == expected => Json(json!({
            "id": "0c9b8a7f-6e5d-4c3b-2a19-080706050403",
            "email": "ada@example.com",
            "full_name": "Ada"
        }))
        .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Not authenticated" })),
        )
            .into_response(),
    }
}

fn router(backend: Backend) -> Router {
    let api = Router::new()
        .route(
            "/transactions/",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/{id}", delete(delete_transaction))
        .route(
            "/transactions/statistics/category-spending",
            get(category_spending),
        )
        .route("/categories/", get(list_categories))
        .route("/items/", get(list_items))
        .route("/comments/", get(list_comments))
        .route("/analytics/behavior-insights", get(behavior_insights))
        .route("/users/me", get(current_user))
        .with_state(backend);
    Router::new().nest("/api/v1", api)
}

/// Serves the fake API on an ephemeral port.
pub async fn spawn_backend() -> (SocketAddr, Backend) {
    init_tracing();
    let backend = Backend::default();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(backend.clone());
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app).await {
            tracing::error!("test backend failed: {err}");
        }
    });
    (addr, backend)
}

pub fn client_for(addr: SocketAddr) -> Client {
    Client::builder(format!("http://{addr}/api/v1"))
        .token(Some(TOKEN.to_string()))
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

pub fn query_client_for(addr: SocketAddr) -> QueryClient {
    QueryClient::new(client_for(addr), Arc::new(QueryCache::new()))
}
