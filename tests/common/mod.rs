//! In-process stub of the Stock AI backend

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use stock_ai_client::config::Config;
use tempfile::TempDir;

/// History requests for this period are answered late
pub const SLOW_PERIOD: &str = "1mo";

/// Quote requests for this symbol are answered late
pub const SLOW_SYMBOL: &str = "SLOW";

#[derive(Default)]
pub struct StubData {
    pub summary_calls: usize,
    pub price_calls: usize,
    pub chat_requests: Vec<Value>,
    pub history_periods: Vec<String>,
    pub schedulers: Vec<Value>,
    pub updates: Vec<Value>,
    pub fail_ai: bool,
    pub fail_updates: bool,
    pub email_configured: bool,
}

#[derive(Clone, Default)]
pub struct Stub {
    data: Arc<Mutex<StubData>>,
}

impl Stub {
    pub fn with<R>(&self, f: impl FnOnce(&mut StubData) -> R) -> R {
        f(&mut self.data.lock())
    }
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn ok(body: Value) -> Response {
    reply(StatusCode::OK, body)
}

async fn echo_content_type(headers: HeaderMap) -> Response {
    let value = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let count = headers.get_all("content-type").iter().count();
    ok(json!({"content_type": value, "count": count}))
}

async fn echo_authorization(headers: HeaderMap) -> Response {
    let value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    ok(json!({"authorization": value}))
}

async fn value() -> Response {
    ok(json!({"value": 42}))
}

async fn missing() -> Response {
    reply(StatusCode::NOT_FOUND, json!({"detail": "not found"}))
}

async fn boom() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

async fn not_json() -> Response {
    (StatusCode::OK, "<html>ok</html>").into_response()
}

async fn market_summary(State(stub): State<Stub>) -> Response {
    let calls = stub.with(|d| {
        d.summary_calls += 1;
        d.summary_calls
    });
    ok(json!({
        "market_status": "open",
        "major_indices": [
            {"symbol": "^GSPC", "name": "S&P 500", "price": 5123.41, "change": 12.5, "change_percent": 0.24},
            {"symbol": "^DJI", "name": "Dow Jones", "price": 38654.42, "change": -45.1, "change_percent": -0.12}
        ],
        "top_gainers": [
            {"symbol": "NVDA", "name": "NVIDIA", "price": 880.0 + calls as f64, "change": 20.1, "change_percent": 2.34}
        ],
        "top_losers": [
            {"symbol": "TSLA", "name": "Tesla", "price": 170.0, "change": -5.0, "change_percent": -2.86}
        ],
        "last_updated": "2024-03-01T14:05:09.000001"
    }))
}

async fn ai_summary(State(stub): State<Stub>) -> Response {
    if stub.with(|d| d.fail_ai) {
        return reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"detail": "OpenAI API key not configured"}),
        );
    }
    ok(json!({"summary": "Markets are mixed.", "generated_at": "2024-03-01T14:05:09"}))
}

async fn indices() -> Response {
    ok(json!({"indices": [{"symbol": "^IXIC", "name": "NASDAQ", "price": 16000.0, "change": 1.0, "change_percent": 0.01}]}))
}

async fn movers(Query(q): Query<HashMap<String, String>>) -> Response {
    let market_type = q.get("market_type").cloned().unwrap_or_default();
    let limit: usize = q.get("limit").and_then(|l| l.parse().ok()).unwrap_or(0);
    let symbol = if market_type == "etf" { "SPY" } else { "AAPL" };
    let gainers: Vec<Value> = (0..limit.min(2))
        .map(|i| json!({"symbol": format!("{}{}", symbol, i), "price": 100.0, "change": 1.0, "change_percent": 1.0}))
        .collect();
    ok(json!({"gainers": gainers, "losers": []}))
}

async fn stock_info(State(stub): State<Stub>, Path(symbol): Path<String>) -> Response {
    if symbol == "FAIL" {
        return reply(StatusCode::NOT_FOUND, json!({"detail": "Stock FAIL not found"}));
    }
    if symbol == SLOW_SYMBOL {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    let calls = stub.with(|d| {
        d.price_calls += 1;
        d.price_calls
    });
    ok(json!({
        "symbol": symbol,
        "name": format!("{} Corp", symbol),
        "sector": "Technology",
        "industry": "Software",
        "current_price": 110.0 + calls as f64,
        "previous_close": 100.0,
        "open": 101.0,
        "day_high": 112.0,
        "day_low": 99.5,
        "volume": 1500000.0,
        "market_cap": 45000000000.0,
        "pe_ratio": 28.123
    }))
}

async fn stock_history(
    State(stub): State<Stub>,
    Path(symbol): Path<String>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    let period = q.get("period").cloned().unwrap_or_default();
    stub.with(|d| d.history_periods.push(period.clone()));
    if period == SLOW_PERIOD {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    ok(json!({
        "symbol": symbol,
        "period": period,
        "interval": q.get("interval"),
        "data": [
            {"date": format!("{}-start", period), "open": 10.0, "high": 11.0, "low": 9.0, "close": 10.0, "volume": 100},
            {"date": format!("{}-end", period), "open": 12.0, "high": 13.0, "low": 11.0, "close": 12.0, "volume": 100}
        ]
    }))
}

async fn stock_news(Path(symbol): Path<String>) -> Response {
    ok(json!({
        "symbol": symbol,
        "news": [{"title": format!("{} beats estimates", symbol), "publisher": "Wire", "link": "https://example.com/a", "published": "2024-03-01"}]
    }))
}

async fn stock_technicals(Path(symbol): Path<String>) -> Response {
    ok(json!({"symbol": symbol, "rsi": 72.5, "sma_20": 105.0, "sma_50": 101.0, "signals": ["RSI overbought"]}))
}

async fn stock_ai_analysis(State(stub): State<Stub>, Path(symbol): Path<String>) -> Response {
    if stub.with(|d| d.fail_ai) {
        return reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"detail": "OpenAI API key not configured"}),
        );
    }
    ok(json!({"symbol": symbol, "analysis": format!("{} looks strong", symbol)}))
}

async fn search(Query(q): Query<HashMap<String, String>>) -> Response {
    let query = q.get("query").cloned().unwrap_or_default();
    ok(json!({"query": query, "results": [{"symbol": query.to_uppercase(), "name": "Match"}]}))
}

async fn chat(State(stub): State<Stub>, Json(body): Json<Value>) -> Response {
    stub.with(|d| d.chat_requests.push(body.clone()));
    let message = body["message"].as_str().unwrap_or_default().to_string();
    if message == "fail" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "oops").into_response();
    }
    ok(json!({"response": format!("You asked: {}", message), "symbol": body["symbol"]}))
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] != "secret" {
        return reply(StatusCode::UNAUTHORIZED, json!({"detail": "Invalid email or password"}));
    }
    ok(json!({
        "user": {"id": "u-1", "email": body["email"], "name": "Ada"},
        "message": "Login successful"
    }))
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        return reply(StatusCode::BAD_REQUEST, json!({"detail": "Email already registered"}));
    }
    ok(json!({"id": "u-2", "email": body["email"], "name": body["name"], "created_at": "2024-03-01T00:00:00"}))
}

async fn scheduler_create(State(stub): State<Stub>, Json(body): Json<Value>) -> Response {
    let created = stub.with(|d| {
        let mut record = body.clone();
        record["id"] = json!(format!("s-{}", d.schedulers.len() + 1));
        record["next_run"] = json!("2024-03-02T08:00:00");
        d.schedulers.push(record.clone());
        record
    });
    ok(created)
}

async fn scheduler_user(State(stub): State<Stub>, Path(user_id): Path<String>) -> Response {
    let list: Vec<Value> = stub.with(|d| {
        d.schedulers
            .iter()
            .filter(|s| s["user_id"] == user_id.as_str())
            .cloned()
            .collect()
    });
    ok(json!({"schedulers": list}))
}

async fn scheduler_next_runs() -> Response {
    ok(json!({"morning": "2024-03-02T08:00:00", "evening": "2024-03-01T17:00:00"}))
}

async fn scheduler_get(State(stub): State<Stub>, Path(id): Path<String>) -> Response {
    match stub.with(|d| d.schedulers.iter().find(|s| s["id"] == id.as_str()).cloned()) {
        Some(s) => ok(s),
        None => reply(StatusCode::NOT_FOUND, json!({"detail": "Scheduler not found"})),
    }
}

async fn scheduler_update(
    State(stub): State<Stub>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let updated = stub.with(|d| {
        d.updates.push(body.clone());
        if d.fail_updates {
            return Err(());
        }
        let record = d.schedulers.iter_mut().find(|s| s["id"] == id.as_str()).ok_or(())?;
        if let (Some(target), Some(fields)) = (record.as_object_mut(), body.as_object()) {
            for (k, v) in fields {
                target.insert(k.clone(), v.clone());
            }
        }
        Ok(record.clone())
    });
    match updated {
        Ok(record) => ok(record),
        Err(()) => reply(StatusCode::INTERNAL_SERVER_ERROR, json!({"detail": "Database unavailable"})),
    }
}

async fn scheduler_delete(State(stub): State<Stub>, Path(id): Path<String>) -> Response {
    let removed = stub.with(|d| {
        let before = d.schedulers.len();
        d.schedulers.retain(|s| s["id"] != id.as_str());
        before != d.schedulers.len()
    });
    if removed {
        ok(json!({"message": "Scheduler deleted successfully"}))
    } else {
        reply(StatusCode::NOT_FOUND, json!({"detail": "Scheduler not found"}))
    }
}

async fn scheduler_test(State(stub): State<Stub>, Path(id): Path<String>) -> Response {
    if id == "missing" {
        return reply(StatusCode::NOT_FOUND, json!({"detail": "Scheduler not found"}));
    }
    let email_sent = stub.with(|d| d.email_configured);
    ok(json!({"success": true, "email_sent": email_sent, "content": "Analysis"}))
}

fn router(stub: Stub) -> Router {
    Router::new()
        .route("/echo/content-type", post(echo_content_type).get(echo_content_type))
        .route("/echo/authorization", get(echo_authorization))
        .route("/value", get(value))
        .route("/missing", get(missing))
        .route("/boom", get(boom))
        .route("/not-json", get(not_json))
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/chat", post(chat))
        .route("/api/market/summary", get(market_summary))
        .route("/api/market/ai-summary", get(ai_summary))
        .route("/api/market/indices", get(indices))
        .route("/api/market/movers", get(movers))
        .route("/api/stocks/:symbol", get(stock_info))
        .route("/api/stocks/:symbol/history", get(stock_history))
        .route("/api/stocks/:symbol/news", get(stock_news))
        .route("/api/stocks/:symbol/technicals", get(stock_technicals))
        .route("/api/stocks/:symbol/ai-analysis", get(stock_ai_analysis))
        .route("/api/search", get(search))
        .route("/api/scheduler", post(scheduler_create))
        .route("/api/scheduler/next-runs", get(scheduler_next_runs))
        .route("/api/scheduler/user/:user_id", get(scheduler_user))
        .route(
            "/api/scheduler/:id",
            get(scheduler_get).put(scheduler_update).delete(scheduler_delete),
        )
        .route("/api/scheduler/:id/test", post(scheduler_test))
        .with_state(stub)
}

/// Running stub plus a scratch data directory
pub struct Backend {
    pub base_url: String,
    pub stub: Stub,
    pub dir: TempDir,
}

impl Backend {
    pub async fn start() -> Self {
        let stub = Stub::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(stub.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            stub,
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn config(&self) -> Config {
        Config::with_base_url(&self.base_url, self.dir.path()).unwrap()
    }
}
