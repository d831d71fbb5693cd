use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

/// Reading as delivered by the relay, over both the query endpoint and the
/// live channel
#[derive(Debug, Clone, Deserialize)]
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
