use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted presence reading, including the store-assigned id and timestamp
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: Uuid,
    pub human_presence: String,
    pub motion: String,
    pub move_range: f64,
    pub avg_move_range: f64,
    pub alert_active: bool,
    pub timestamp: DateTime<Utc>,
}

/// Ingest request body; all five fields are required
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReading {
    pub human_presence: String,
    pub motion: String,
    pub move_range: f64,
    pub avg_move_range: f64,
    pub alert_active: bool,
}

/// Ingest response wrapper
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub message: String,
    pub data: Reading,
}
