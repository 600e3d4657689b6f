//! End-to-end tests for a greeting run against one local server standing in
//! for both the Supabase REST interface and the Z-API gateway.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use common::LogCapture;
use greeter_core::config::DEFAULT_MESSAGE_TEMPLATE;
use greeter_core::{AppConfig, GatewayConfig, SupabaseConfig};
use greeter_worker::{run, PipelineError, RunSummary};

#[derive(Clone)]
struct Backend {
    rows: Arc<Value>,
    send_status: StatusCode,
    queries: Arc<AtomicUsize>,
    sends: Arc<AtomicUsize>,
}

async fn rows(State(backend): State<Backend>) -> Json<Value> {
    backend.queries.fetch_add(1, Ordering::SeqCst);
    Json((*backend.rows).clone())
}

async fn send_text(State(backend): State<Backend>) -> StatusCode {
    backend.sends.fetch_add(1, Ordering::SeqCst);
    backend.send_status
}

async fn start(rows_body: Value, send_status: StatusCode) -> (String, Backend) {
    let backend = Backend {
        rows: Arc::new(rows_body),
        send_status,
        queries: Arc::new(AtomicUsize::new(0)),
        sends: Arc::new(AtomicUsize::new(0)),
    };
    let app = Router::new()
        .route("/rest/v1/contacts", get(rows))
        .route(
            "/instances/{instance}/token/{token}/send-text",
            post(send_text),
        )
        .with_state(backend.clone());
    (common::spawn(app).await, backend)
}

fn config(supabase_url: &str, gateway_url: &str, client_token: &str) -> AppConfig {
    AppConfig {
        supabase: SupabaseConfig {
            url: supabase_url.to_string(),
            key: "service-key".to_string(),
            table: "contacts".to_string(),
            name_field: "name".to_string(),
            number_field: "number".to_string(),
        },
        gateway: GatewayConfig {
            base_url: gateway_url.to_string(),
            instance_id: "inst-1".to_string(),
            api_token: "tok-1".to_string(),
            client_token: client_token.to_string(),
            message_template: DEFAULT_MESSAGE_TEMPLATE.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Test: happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn two_contacts_both_delivered_counts_two() {
    let (base, backend) = start(
        json!([
            {"name": "Ana", "number": "5511900000001"},
            {"name": "Bruno", "number": "5511900000002"},
        ]),
        StatusCode::OK,
    )
    .await;

    let logs = LogCapture::default();
    let _guard = logs.install();

    let summary = run(&config(&base, &base, "secret")).await.unwrap();

    assert_eq!(summary, RunSummary { fetched: 2, sent: 2 });
    assert_eq!(backend.queries.load(Ordering::SeqCst), 1);
    assert_eq!(backend.sends.load(Ordering::SeqCst), 2);

    let output = logs.contents();
    assert!(output.contains("2 messages sent successfully"), "{output}");
}

// ---------------------------------------------------------------------------
// Test: send failures lower the count but do not abort
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rejected_sends_count_zero_without_aborting() {
    let (base, backend) = start(
        json!([
            {"name": "Ana", "number": "5511900000001"},
            {"name": "Bruno", "number": "5511900000002"},
        ]),
        StatusCode::NOT_FOUND,
    )
    .await;

    let summary = run(&config(&base, &base, "secret")).await.unwrap();

    assert_eq!(summary, RunSummary { fetched: 2, sent: 0 });
    assert_eq!(backend.sends.load(Ordering::SeqCst), 2, "one attempt per contact");
}

#[tokio::test]
async fn missing_client_token_sends_nothing() {
    let (base, backend) = start(
        json!([{"name": "Ana", "number": "5511900000001"}]),
        StatusCode::OK,
    )
    .await;

    let summary = run(&config(&base, &base, "")).await.unwrap();

    assert_eq!(summary, RunSummary { fetched: 1, sent: 0 });
    assert_eq!(backend.sends.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Test: fetch failure degrades to an empty run
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_table_runs_with_zero_contacts() {
    let (base, backend) = start(json!([]), StatusCode::OK).await;
    let mut cfg = config(&base, &base, "secret");
    cfg.supabase.table = "missing_table".to_string();

    let summary = run(&cfg).await.unwrap();

    assert_eq!(summary, RunSummary { fetched: 0, sent: 0 });
    assert_eq!(backend.sends.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Test: connection failure aborts before fetch or send
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_supabase_url_aborts_before_any_request() {
    let (base, backend) = start(
        json!([{"name": "Ana", "number": "5511900000001"}]),
        StatusCode::OK,
    )
    .await;

    let result = run(&config("not a url", &base, "secret")).await;

    assert_matches!(result, Err(PipelineError::Connection(_)));
    assert_eq!(backend.queries.load(Ordering::SeqCst), 0);
    assert_eq!(backend.sends.load(Ordering::SeqCst), 0);
}
