use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use configuration::Config;
use database::MemoryStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;
use web_server::{build_router, AppState};

// ==================================================================================
// Test Helpers
// ==================================================================================

const ADMIN_EMAIL: &str = "coach@example.com";

fn app() -> Router {
    let mut config = Config::default();
    config.auth.admin_email = Some(ADMIN_EMAIL.to_string());
    config.dashboard.recent_trades_limit = 2;
    let state = AppState { store: Arc::new(MemoryStore::new()), config };
    build_router(Arc::new(state))
}

struct Caller {
    user_id: Uuid,
    email: Option<&'static str>,
}

impl Caller {
    fn user() -> Self {
        Self { user_id: Uuid::new_v4(), email: Some("trader@example.com") }
    }

    fn admin() -> Self {
        Self { user_id: Uuid::new_v4(), email: Some(ADMIN_EMAIL) }
    }
}

async fn send(app: &Router, caller: Option<&Caller>, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder.header("x-user-id", caller.user_id.to_string());
        if let Some(email) = caller.email {
            builder = builder.header("x-user-email", email);
        }
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    (status, value)
}

fn trade_body(date: &str, symbol: &str, side: &str, entry: f64, exit: f64, qty: f64) -> Value {
    json!({
        "date": date,
        "symbol": symbol,
        "side": side,
        "quantity": qty,
        "entryPrice": entry,
        "exitPrice": exit,
    })
}

// ==================================================================================
// Identity
// ==================================================================================

#[tokio::test]
async fn test_health_needs_no_identity() {
    let app = app();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_or_invalid_user_header_is_unauthorized() {
    let app = app();
    let (status, body) = send(&app, None, Method::GET, "/api/trades", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("x-user-id"));

    let request = Request::builder()
        .uri("/api/trades")
        .header("x-user-id", "not-a-uuid")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ==================================================================================
// Trades and Dashboard
// ==================================================================================

#[tokio::test]
async fn test_create_trade_derives_pl_and_outcome() {
    let app = app();
    let caller = Caller::user();
    let mut body = trade_body("2024-03-01", "aapl", "long", 100.0, 110.0, 10.0);
    body["stopLoss"] = json!(95.0);

    let (status, trade) = send(&app, Some(&caller), Method::POST, "/api/trades", Some(body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(trade["symbol"], "AAPL");
    assert_eq!(trade["pl"].as_f64(), Some(100.0));
    assert_eq!(trade["rMultiple"].as_f64(), Some(2.0));
    assert_eq!(trade["outcome"], "win");
}

#[tokio::test]
async fn test_invalid_trade_body_is_bad_request() {
    let app = app();
    let caller = Caller::user();

    let (status, body) = send(&app, Some(&caller), Method::POST, "/api/trades", Some(json!({ "symbol": "X" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let zero_qty = trade_body("2024-03-01", "AAPL", "long", 100.0, 110.0, 0.0);
    let (status, _) = send(&app, Some(&caller), Method::POST, "/api/trades", Some(zero_qty)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_trade_is_bad_request_not_a_crash() {
    let app = app();
    let caller = Caller::user();

    let huge = trade_body("2024-03-01", "AAPL", "long", 0.0, 1e15, 1e15);
    let (status, body) = send(&app, Some(&caller), Method::POST, "/api/trades", Some(huge)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("out of range"));

    let (status, bundle) = send(
        &app,
        Some(&caller),
        Method::POST,
        "/api/import",
        Some(json!({ "trades": [trade_body("2024-03-01", "AAPL", "short", 1e15, 0.0, 1e15)] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(bundle["error"].is_string());

    // The server is still serving and nothing was stored.
    let (status, trades) = send(&app, Some(&caller), Method::GET, "/api/trades", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(trades.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_rederives_and_delete_removes() {
    let app = app();
    let caller = Caller::user();
    let (_, created) = send(
        &app,
        Some(&caller),
        Method::POST,
        "/api/trades",
        Some(trade_body("2024-03-01", "TSLA", "long", 200.0, 210.0, 1.0)),
    )
    .await;
    let uri = format!("/api/trades/{}", created["id"].as_str().unwrap());

    let edited = trade_body("2024-03-01", "TSLA", "short", 200.0, 210.0, 1.0);
    let (status, updated) = send(&app, Some(&caller), Method::PUT, &uri, Some(edited)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["pl"].as_f64(), Some(-10.0));
    assert_eq!(updated["outcome"], "loss");

    let (status, _) = send(&app, Some(&caller), Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Some(&caller), Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_trades_of_other_users_are_not_found() {
    let app = app();
    let owner = Caller::user();
    let stranger = Caller::user();
    let (_, created) = send(
        &app,
        Some(&owner),
        Method::POST,
        "/api/trades",
        Some(trade_body("2024-03-01", "AMD", "long", 10.0, 11.0, 1.0)),
    )
    .await;
    let uri = format!("/api/trades/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, Some(&stranger), Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Some(&stranger), Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, list) = send(&app, Some(&stranger), Method::GET, "/api/trades", None).await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_trade_list_search_and_filter() {
    let app = app();
    let caller = Caller::user();
    for body in [
        trade_body("2024-03-01", "AAPL", "long", 100.0, 110.0, 1.0),
        trade_body("2024-03-02", "MSFT", "long", 100.0, 90.0, 1.0),
        trade_body("2024-03-03", "AMZN", "long", 100.0, 100.0, 1.0),
    ] {
        send(&app, Some(&caller), Method::POST, "/api/trades", Some(body)).await;
    }

    let (_, all) = send(&app, Some(&caller), Method::GET, "/api/trades", None).await;
    let symbols: Vec<&str> = all.as_array().unwrap().iter().map(|t| t["symbol"].as_str().unwrap()).collect();
    assert_eq!(symbols, vec!["AMZN", "MSFT", "AAPL"]);

    let (_, losing) = send(&app, Some(&caller), Method::GET, "/api/trades?filter=losing", None).await;
    assert_eq!(losing.as_array().unwrap().len(), 1);
    assert_eq!(losing[0]["symbol"], "MSFT");

    let (_, searched) = send(&app, Some(&caller), Method::GET, "/api/trades?search=am", None).await;
    assert_eq!(searched.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Some(&caller), Method::GET, "/api/trades?filter=sideways", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_dashboard_metrics_and_recent_trades() {
    let app = app();
    let caller = Caller::user();
    for body in [
        trade_body("2024-01-01", "A", "long", 100.0, 200.0, 1.0),
        trade_body("2024-01-02", "B", "long", 100.0, 50.0, 1.0),
        trade_body("2024-01-03", "C", "long", 100.0, 130.0, 1.0),
    ] {
        send(&app, Some(&caller), Method::POST, "/api/trades", Some(body)).await;
    }

    let (status, body) = send(&app, Some(&caller), Method::GET, "/api/dashboard", None).await;

    assert_eq!(status, StatusCode::OK);
    let metrics = &body["metrics"];
    assert_eq!(metrics["totalTrades"], 3);
    assert_eq!(metrics["totalPL"].as_f64(), Some(80.0));
    assert_eq!(metrics["maxDrawdown"].as_f64(), Some(50.0));
    assert_eq!(metrics["equityCurve"].as_array().unwrap().len(), 3);

    let recent = body["recentTrades"].as_array().unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0]["symbol"], "C");
}

#[tokio::test]
async fn test_reports_by_kind() {
    let app = app();
    let caller = Caller::user();
    send(
        &app,
        Some(&caller),
        Method::POST,
        "/api/trades",
        Some(trade_body("2024-01-01", "A", "long", 100.0, 200.0, 1.0)),
    )
    .await;

    let (status, report) = send(&app, Some(&caller), Method::GET, "/api/reports/day_of_week", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["kind"], "day_of_week");

    let (status, _) = send(&app, Some(&caller), Method::GET, "/api/reports/astrology", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ==================================================================================
// Playbooks and Journal
// ==================================================================================

#[tokio::test]
async fn test_playbook_lifecycle() {
    let app = app();
    let caller = Caller::user();

    let (status, _) = send(&app, Some(&caller), Method::POST, "/api/playbooks", Some(json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, playbook) = send(
        &app,
        Some(&caller),
        Method::POST,
        "/api/playbooks",
        Some(json!({ "name": "Gap and go", "entryCriteria": "Gap above 3%" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(playbook["entryCriteria"], "Gap above 3%");

    let uri = format!("/api/playbooks/{}", playbook["id"].as_str().unwrap());
    let (status, _) = send(&app, Some(&caller), Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, list) = send(&app, Some(&caller), Method::GET, "/api/playbooks", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_journal_entries_listed_newest_first() {
    let app = app();
    let caller = Caller::user();
    send(&app, Some(&caller), Method::POST, "/api/journal", Some(json!({ "date": "2024-02-01", "title": "old" }))).await;
    send(&app, Some(&caller), Method::POST, "/api/journal", Some(json!({ "date": "2024-02-05", "entry": "new" }))).await;

    let (_, list) = send(&app, Some(&caller), Method::GET, "/api/journal", None).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["entry"], "new");
    assert_eq!(list[1]["title"], "old");
}

// ==================================================================================
// University
// ==================================================================================

#[tokio::test]
async fn test_university_shows_defaults_to_readers() {
    let app = app();
    let caller = Caller::user();

    let (status, body) = send(&app, Some(&caller), Method::GET, "/api/university", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usingDefaults"], true);
    assert_eq!(body["canEdit"], false);
    assert_eq!(body["content"]["courses"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_non_admin_cannot_edit_university() {
    let app = app();
    let caller = Caller::user();
    send(&app, Some(&caller), Method::POST, "/api/profile", None).await;

    let (status, body) = send(
        &app,
        Some(&caller),
        Method::POST,
        "/api/university/links",
        Some(json!({ "title": "Docs", "url": "https://example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, Some(&caller), Method::DELETE, "/api/university/courses/0", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_non_admin_with_malformed_body_is_still_forbidden() {
    let app = app();
    let caller = Caller::user();
    send(&app, Some(&caller), Method::POST, "/api/profile", None).await;

    for (method, uri) in [(Method::POST, "/api/university/links"), (Method::PUT, "/api/university/links/0")] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-user-id", caller.user_id.to_string())
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }

    // An administrator sending the same body gets the parse error.
    let admin = Caller::admin();
    send(&app, Some(&admin), Method::POST, "/api/profile", None).await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/university/links")
        .header("x-user-id", admin.user_id.to_string())
        .header("x-user-email", ADMIN_EMAIL)
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_first_edit_seeds_defaults() {
    let app = app();
    let admin = Caller::admin();
    let (_, profile) = send(&app, Some(&admin), Method::POST, "/api/profile", None).await;
    assert_eq!(profile["role"], "admin");

    let (status, body) = send(
        &app,
        Some(&admin),
        Method::POST,
        "/api/university/links",
        Some(json!({ "title": "Exchange rules", "url": "https://example.com/rules" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["usingDefaults"], false);
    assert_eq!(body["canEdit"], true);
    assert_eq!(body["content"]["courses"].as_array().unwrap().len(), 6);
    assert_eq!(body["content"]["readingList"].as_array().unwrap().len(), 4);
    assert_eq!(body["content"]["externalLinks"].as_array().unwrap().len(), 5);

    // Every reader now sees the stored content.
    let reader = Caller::user();
    let (_, seen) = send(&app, Some(&reader), Method::GET, "/api/university", None).await;
    assert_eq!(seen["usingDefaults"], false);
    assert_eq!(seen["content"]["externalLinks"][4]["title"], "Exchange rules");
}

#[tokio::test]
async fn test_admin_update_and_delete_by_index() {
    let app = app();
    let admin = Caller::admin();
    send(&app, Some(&admin), Method::POST, "/api/profile", None).await;

    let (status, body) = send(
        &app,
        Some(&admin),
        Method::PUT,
        "/api/university/reading/0",
        Some(json!({ "title": "Market Wizards", "author": "Jack Schwager" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["readingList"][0]["title"], "Market Wizards");

    let (status, body) = send(&app, Some(&admin), Method::DELETE, "/api/university/courses/0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"]["courses"].as_array().unwrap().len(), 5);

    let (status, _) = send(&app, Some(&admin), Method::DELETE, "/api/university/courses/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Some(&admin), Method::DELETE, "/api/university/podcasts/0", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Some(&admin),
        Method::POST,
        "/api/university/links",
        Some(json!({ "title": "Bad", "url": "ftp://example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ==================================================================================
// Settings, Export, Import, Reset
// ==================================================================================

#[tokio::test]
async fn test_settings_roundtrip_with_defaults() {
    let app = app();
    let caller = Caller::user();

    let (_, settings) = send(&app, Some(&caller), Method::GET, "/api/settings", None).await;
    assert_eq!(settings["currency"], "USD");
    assert_eq!(settings["educationalEnabled"], true);

    let (status, _) = send(&app, Some(&caller), Method::PUT, "/api/settings", Some(json!({ "currency": "EUR" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, settings) = send(&app, Some(&caller), Method::GET, "/api/settings", None).await;
    assert_eq!(settings["currency"], "EUR");
    assert_eq!(settings["platformName"], "Tradebook");
}

#[tokio::test]
async fn test_export_then_import_rederives_with_fresh_ids() {
    let app = app();
    let source = Caller::user();
    send(
        &app,
        Some(&source),
        Method::POST,
        "/api/trades",
        Some(trade_body("2024-01-01", "A", "long", 100.0, 120.0, 2.0)),
    )
    .await;
    send(&app, Some(&source), Method::POST, "/api/playbooks", Some(json!({ "name": "Trend" }))).await;
    send(&app, Some(&source), Method::POST, "/api/journal", Some(json!({ "date": "2024-01-01", "title": "Day one" }))).await;

    let (_, mut export) = send(&app, Some(&source), Method::GET, "/api/export", None).await;
    let original_id = export["trades"][0]["id"].clone();
    // Tampered derived fields must not survive the import.
    export["trades"][0]["pl"] = json!(999999);
    export["trades"][0]["outcome"] = json!("loss");

    let target = Caller::user();
    let (status, summary) = send(&app, Some(&target), Method::POST, "/api/import", Some(export)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary, json!({ "trades": 1, "playbooks": 1, "journal": 1 }));

    let (_, trades) = send(&app, Some(&target), Method::GET, "/api/trades", None).await;
    assert_eq!(trades[0]["pl"].as_f64(), Some(40.0));
    assert_eq!(trades[0]["outcome"], "win");
    assert_ne!(trades[0]["id"], original_id);
}

#[tokio::test]
async fn test_import_preserves_same_day_order() {
    let app = app();
    let source = Caller::user();
    for body in [
        trade_body("2024-01-05", "FIRST", "long", 100.0, 200.0, 1.0),
        trade_body("2024-01-05", "SECOND", "long", 100.0, 50.0, 1.0),
        trade_body("2024-01-05", "THIRD", "long", 100.0, 130.0, 1.0),
    ] {
        send(&app, Some(&source), Method::POST, "/api/trades", Some(body)).await;
    }

    let equity_of = |dashboard: &Value| -> Vec<f64> {
        dashboard["metrics"]["equityCurve"]
            .as_array()
            .unwrap()
            .iter()
            .map(|point| point["cumulativePL"].as_f64().unwrap())
            .collect()
    };
    let symbols_of = |trades: &Value| -> Vec<String> {
        trades.as_array().unwrap().iter().map(|t| t["symbol"].as_str().unwrap().to_string()).collect()
    };

    let (_, before) = send(&app, Some(&source), Method::GET, "/api/dashboard", None).await;
    assert_eq!(equity_of(&before), vec![100.0, 50.0, 80.0]);

    let (_, export) = send(&app, Some(&source), Method::GET, "/api/export", None).await;
    let target = Caller::user();
    let (status, _) = send(&app, Some(&target), Method::POST, "/api/import", Some(export)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = send(&app, Some(&target), Method::GET, "/api/dashboard", None).await;
    assert_eq!(equity_of(&after), equity_of(&before));
    assert_eq!(symbols_of(&after["recentTrades"]), vec!["THIRD", "SECOND"]);

    let (_, trades) = send(&app, Some(&target), Method::GET, "/api/trades", None).await;
    assert_eq!(symbols_of(&trades), vec!["THIRD", "SECOND", "FIRST"]);
}

#[tokio::test]
async fn test_reset_requires_confirmation() {
    let app = app();
    let caller = Caller::user();
    send(
        &app,
        Some(&caller),
        Method::POST,
        "/api/trades",
        Some(trade_body("2024-01-01", "A", "long", 1.0, 2.0, 1.0)),
    )
    .await;

    let (status, _) = send(&app, Some(&caller), Method::POST, "/api/reset", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, trades) = send(&app, Some(&caller), Method::GET, "/api/trades", None).await;
    assert_eq!(trades.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Some(&caller), Method::POST, "/api/reset", Some(json!({ "confirm": true }))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, trades) = send(&app, Some(&caller), Method::GET, "/api/trades", None).await;
    assert!(trades.as_array().unwrap().is_empty());
}
