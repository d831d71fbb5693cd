//! End-to-end tests against a running relay and database.
//!
//! Start the stack first, then run with `cargo test -- --ignored`.

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::json;
use std::env;
use std::time::Duration;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Reading {
    id: String,
    human_presence: String,
    motion: String,
    move_range: f64,
    avg_move_range: f64,
    alert_active: bool,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct IngestResponse {
    message: String,
    data: Reading,
}

fn base_url() -> String {
    env::var("RELAY_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

fn live_url() -> String {
    let base = base_url()
        .replacen("http://", "ws://", 1)
        .replacen("https://", "wss://", 1);
    format!("{}/api/live", base)
}

fn data_url() -> String {
    format!("{}/api/human-data", base_url())
}

async fn fetch_readings(client: &reqwest::Client) -> Vec<Reading> {
    client
        .get(data_url())
        .send()
        .await
        .expect("query endpoint unreachable")
        .json()
        .await
        .expect("query endpoint returned malformed JSON")
}

#[tokio::test]
#[ignore]
async fn test_ingest_then_query() {
    let client = reqwest::Client::new();
    let before = Utc::now();

    let response = client
        .post(data_url())
        .json(&json!({
            "humanPresence": "Detected",
            "motion": "Moving",
            "moveRange": 12.5,
            "avgMoveRange": 9.0,
            "alertActive": true
        }))
        .send()
        .await
        .expect("ingest endpoint unreachable");

    assert_eq!(response.status(), 200);

    let ingested: IngestResponse = response.json().await.unwrap();
    let after = Utc::now();

    assert_eq!(ingested.message, "Data saved successfully");
    assert_eq!(ingested.data.human_presence, "Detected");
    assert_eq!(ingested.data.motion, "Moving");
    assert_eq!(ingested.data.move_range, 12.5);
    assert_eq!(ingested.data.avg_move_range, 9.0);
    assert!(ingested.data.alert_active);
    assert!(
        ingested.data.timestamp >= before - chrono::Duration::seconds(5)
            && ingested.data.timestamp <= after + chrono::Duration::seconds(5),
        "timestamp {} outside test execution window",
        ingested.data.timestamp
    );

    let readings = fetch_readings(&client).await;
    assert!(!readings.is_empty());
    assert_eq!(readings[0].id, ingested.data.id);

    // The full set comes back strictly newest-first
    for pair in readings.windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
}

#[tokio::test]
#[ignore]
async fn test_missing_field_writes_nothing() {
    let client = reqwest::Client::new();
    let count_before = fetch_readings(&client).await.len();

    let response = client
        .post(data_url())
        .json(&json!({
            "humanPresence": "Detected",
            "motion": "Moving",
            "moveRange": 12.5,
            "avgMoveRange": 9.0
        }))
        .send()
        .await
        .expect("ingest endpoint unreachable");

    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body.get("message").is_some());
    assert!(body.get("error").is_some());

    let count_after = fetch_readings(&client).await.len();
    assert_eq!(count_before, count_after);
}

#[tokio::test]
#[ignore]
async fn test_blank_presence_rejected() {
    let client = reqwest::Client::new();

    let response = client
        .post(data_url())
        .json(&json!({
            "humanPresence": "",
            "motion": "Still",
            "moveRange": 0.0,
            "avgMoveRange": 0.0,
            "alertActive": false
        }))
        .send()
        .await
        .expect("ingest endpoint unreachable");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_live_broadcast_reaches_connected_viewer() {
    let client = reqwest::Client::new();

    let (mut early, _) = connect_async(live_url())
        .await
        .expect("live endpoint unreachable");

    let response = client
        .post(data_url())
        .json(&json!({
            "humanPresence": "Not Detected",
            "motion": "Still",
            "moveRange": 0.4,
            "avgMoveRange": 0.6,
            "alertActive": false
        }))
        .send()
        .await
        .expect("ingest endpoint unreachable");

    assert_eq!(response.status(), 200);
    let ingested: IngestResponse = response.json().await.unwrap();

    let frame = timeout(Duration::from_secs(5), early.next())
        .await
        .expect("no broadcast within 5s")
        .expect("live stream closed")
        .expect("live stream errored");

    let pushed: Reading = match frame {
        Message::Text(text) => serde_json::from_str(&text).unwrap(),
        other => panic!("unexpected frame: {:?}", other),
    };

    assert_eq!(pushed.id, ingested.data.id);
    assert_eq!(pushed.human_presence, "Not Detected");

    // A viewer connecting after the publish gets nothing retroactively
    let (mut late, _) = connect_async(live_url())
        .await
        .expect("live endpoint unreachable");

    let nothing = timeout(Duration::from_secs(1), late.next()).await;
    assert!(nothing.is_err(), "late viewer received a stale broadcast");
}
