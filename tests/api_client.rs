mod common;

use common::Backend;
use serde_json::{json, Value};
use stock_ai_client::api::types::{MarketType, SchedulerCreate, SchedulerUpdate, TriggerTime};
use stock_ai_client::api::{ApiClient, HttpMethod, RequestOptions};
use stock_ai_client::config::Config;

async fn client() -> (Backend, ApiClient) {
    let backend = Backend::start().await;
    let client = ApiClient::new(&backend.config()).unwrap();
    (backend, client)
}

#[tokio::test]
async fn test_caller_content_type_replaces_default() {
    let (_backend, client) = client().await;

    let options = RequestOptions::new()
        .method(HttpMethod::Post)
        .header("Content-Type", "text/plain")
        .body("hello");
    let echoed = client.request("/echo/content-type", options).await.unwrap();
    assert_eq!(echoed, json!({"content_type": "text/plain", "count": 1}));

    let echoed: Value = client.get("/echo/content-type").await.unwrap();
    assert_eq!(echoed["content_type"], "application/json");
}

#[tokio::test]
async fn test_configured_authorization_header() {
    let backend = Backend::start().await;
    let mut config = backend.config();
    config.api_auth = Some("Bearer abc".to_string());
    let client = ApiClient::new(&config).unwrap();

    let echoed: Value = client.get("/echo/authorization").await.unwrap();
    assert_eq!(echoed["authorization"], "Bearer abc");
}

#[tokio::test]
async fn test_success_body_decoded_unchanged() {
    let (_backend, client) = client().await;
    let value = client.request("/value", RequestOptions::new()).await.unwrap();
    assert_eq!(value, json!({"value": 42}));
}

#[tokio::test]
async fn test_failure_detail_becomes_message() {
    let (_backend, client) = client().await;
    let err = client.get::<Value>("/missing").await.unwrap_err();
    assert_eq!(err.message(), "not found");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_unparseable_failure_mentions_status() {
    let (_backend, client) = client().await;
    let err = client.get::<Value>("/boom").await.unwrap_err();
    assert!(err.message().contains("500"));
    assert!(err.is_application());
}

#[tokio::test]
async fn test_non_json_success_is_decode_error() {
    let (_backend, client) = client().await;
    let err = client.get::<Value>("/not-json").await.unwrap_err();
    assert!(err.is_decode());
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    // Bind then drop a listener to get a port nobody answers on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_base_url(&format!("http://{}", addr), dir.path()).unwrap();
    let client = ApiClient::new(&config).unwrap();

    let err = client.market().summary().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status(), None);
    assert!(!err.message().is_empty());
}

#[tokio::test]
async fn test_market_helpers() {
    let (_backend, client) = client().await;

    let etf = client.market().movers(MarketType::Etf, 5).await.unwrap();
    assert_eq!(etf.gainers[0].symbol, "SPY0");

    let summary = client.market().summary().await.unwrap();
    assert_eq!(summary.major_indices.len(), 2);
    assert_eq!(summary.top_losers[0].symbol, "TSLA");

    let indices = client.market().indices().await.unwrap();
    assert_eq!(indices.indices[0].name, "NASDAQ");
}

#[tokio::test]
async fn test_stock_helpers() {
    let (backend, client) = client().await;
    let stocks = client.stocks();

    let history = stocks.history("MSFT", "6mo", "1d").await.unwrap();
    assert_eq!(history.period, "6mo");
    assert_eq!(history.data.len(), 2);
    assert!(history.is_positive());
    assert_eq!(backend.stub.with(|d| d.history_periods.clone()), vec!["6mo"]);

    let err = stocks.info("FAIL").await.unwrap_err();
    assert_eq!(err.message(), "Stock FAIL not found");

    let analysis = stocks.ai_analysis("NVDA").await.unwrap();
    assert_eq!(analysis.analysis, "NVDA looks strong");
}

#[tokio::test]
async fn test_search_query_is_encoded() {
    let (_backend, client) = client().await;
    let found = client.search().stocks("s&p 500", 10).await.unwrap();
    assert_eq!(found.query, "s&p 500");
}

#[tokio::test]
async fn test_scheduler_crud() {
    let (_backend, client) = client().await;
    let scheduler = client.scheduler();

    let created = scheduler
        .create(&SchedulerCreate {
            user_id: "u-1".to_string(),
            trigger_time: TriggerTime::Evening,
            symbols: vec!["AAPL".to_string()],
            prompt: "Tech focus".to_string(),
            is_active: true,
        })
        .await
        .unwrap();
    assert_eq!(created.id, "s-1");
    assert_eq!(created.trigger_time, TriggerTime::Evening);

    let updated = scheduler
        .update(&created.id, &SchedulerUpdate::active(false))
        .await
        .unwrap();
    assert!(!updated.is_active);
    assert_eq!(scheduler.get("s-1").await.unwrap().prompt, "Tech focus");

    let listed = scheduler.user_schedulers("u-1").await.unwrap();
    assert_eq!(listed.schedulers.len(), 1);

    let tested = scheduler.test("s-1").await.unwrap();
    assert!(tested.success);

    scheduler.delete("s-1").await.unwrap();
    assert!(scheduler.user_schedulers("u-1").await.unwrap().schedulers.is_empty());

    let err = scheduler.delete("s-1").await.unwrap_err();
    assert_eq!(err.message(), "Scheduler not found");

    let runs = scheduler.next_runs().await.unwrap();
    assert_eq!(runs.for_trigger(TriggerTime::Morning), Some("2024-03-02T08:00:00"));
}

#[tokio::test]
async fn test_auth_helpers() {
    let (_backend, client) = client().await;

    let logged_in = client.auth().login("ada@example.com", "secret").await.unwrap();
    assert_eq!(logged_in.user.id, "u-1");

    let err = client.auth().login("ada@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.message(), "Invalid email or password");
    assert_eq!(err.status(), Some(401));

    let created = client
        .auth()
        .register("Grace", "grace@example.com", "pw")
        .await
        .unwrap();
    assert_eq!(created.name, "Grace");
}
