use crate::broadcast::Broadcaster;
use crate::db;
use crate::errors::{ApiError, Error};
use crate::metrics::{
    BROADCASTS_TOTAL, DB_FAILURES_TOTAL, INGEST_LATENCY_SECONDS, INGEST_TOTAL,
    VALIDATION_FAILURES_TOTAL,
};
use crate::model::{IngestResponse, NewReading, Reading};
use crate::validate::validate;
use axum::{
    extract::{rejection::JsonRejection, ws::WebSocketUpgrade, State},
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    response::Response,
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use std::time::Duration;
use tokio::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
struct AppState {
    pool: PgPool,
    broadcaster: Broadcaster,
    retention: Duration,
}

pub fn create_router(
    pool: PgPool,
    broadcaster: Broadcaster,
    retention: Duration,
    allowed_origin: Option<&str>,
) -> Router {
    let state = AppState {
        pool,
        broadcaster,
        retention,
    };

    Router::new()
        .route("/api/human-data", get(list_readings).post(ingest_reading))
        .route("/api/live", get(live_upgrade))
        .layer(cors_layer(allowed_origin))
        .with_state(state)
}

/// Write path: decode, validate, persist, then fan out. The store write
/// strictly precedes the publish so the broadcast carries assigned fields.
async fn ingest_reading(
    State(state): State<AppState>,
    payload: Result<Json<NewReading>, JsonRejection>,
) -> Result<Json<IngestResponse>, ApiError> {
    let Json(new_reading) = payload.map_err(|e| {
        VALIDATION_FAILURES_TOTAL.inc();
        Error::Validation(e.body_text())
    })?;

    validate(&new_reading).map_err(|e| {
        VALIDATION_FAILURES_TOTAL.inc();
        e
    })?;

    let start = Instant::now();
    let reading = db::insert_reading(&state.pool, &new_reading)
        .await
        .map_err(|e| {
            DB_FAILURES_TOTAL.inc();
            e
        })?;
    INGEST_LATENCY_SECONDS.observe(start.elapsed().as_secs_f64());
    INGEST_TOTAL.inc();

    // Best-effort fan-out; zero connected viewers is a no-op
    let delivered = state.broadcaster.publish(&reading);
    BROADCASTS_TOTAL.inc();
    debug!("Broadcast reading {} to {} viewers", reading.id, delivered);

    Ok(Json(IngestResponse {
        message: "Data saved successfully".to_string(),
        data: reading,
    }))
}

/// Read path: the full live set, newest first, bounded by the retention
/// window. No pagination, no filtering.
async fn list_readings(State(state): State<AppState>) -> Result<Json<Vec<Reading>>, ApiError> {
    let readings = db::recent_readings(&state.pool, state.retention)
        .await
        .map_err(|e| {
            DB_FAILURES_TOTAL.inc();
            e
        })?;

    Ok(Json(readings))
}

async fn live_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| crate::live::handle_viewer(socket, state.broadcaster))
}

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let origin = match allowed_origin {
        Some(raw) => match raw.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                warn!("Invalid ALLOWED_ORIGIN {:?}, allowing any origin", raw);
                AllowOrigin::any()
            }
        },
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(origin)
}
