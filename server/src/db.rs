use crate::errors::Result;
use crate::metrics::{DB_FAILURES_TOTAL, READINGS_PURGED_TOTAL};
use crate::model::{NewReading, Reading};
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tokio::time::interval;
use tracing::{debug, error, info};

pub async fn make_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await?;

    info!("Database connection established");
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Migrations completed");

    Ok(pool)
}

/// Persists one reading; id and timestamp are assigned by the store.
/// Failures surface directly, there is no retry on the ingest path.
pub async fn insert_reading(pool: &PgPool, new: &NewReading) -> Result<Reading> {
    let reading = sqlx::query_as::<_, Reading>(
        r#"
        INSERT INTO readings (human_presence, motion, move_range, avg_move_range, alert_active)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, human_presence, motion, move_range, avg_move_range, alert_active,
                  ts AS timestamp
        "#,
    )
    .bind(&new.human_presence)
    .bind(&new.motion)
    .bind(new.move_range)
    .bind(new.avg_move_range)
    .bind(new.alert_active)
    .fetch_one(pool)
    .await?;

    Ok(reading)
}

/// All readings younger than the retention window, newest first.
/// The cutoff filter keeps expired rows out of results between sweeps.
pub async fn recent_readings(pool: &PgPool, retention: Duration) -> Result<Vec<Reading>> {
    let cutoff = retention_cutoff(retention);

    let readings = sqlx::query_as::<_, Reading>(
        r#"
        SELECT id, human_presence, motion, move_range, avg_move_range, alert_active,
               ts AS timestamp
        FROM readings
        WHERE ts > $1
        ORDER BY ts DESC
        "#,
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await?;

    Ok(readings)
}

pub async fn purge_expired(pool: &PgPool, retention: Duration) -> Result<u64> {
    let cutoff = retention_cutoff(retention);

    let result = sqlx::query("DELETE FROM readings WHERE ts <= $1")
        .bind(cutoff)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Background task enforcing the retention window. Request handlers never
/// issue deletes; expiry is the storage layer's job.
pub async fn run_retention_sweeper(pool: PgPool, retention: Duration, sweep_interval: Duration) {
    info!(
        "Starting retention sweeper: window={}s, interval={}s",
        retention.as_secs(),
        sweep_interval.as_secs()
    );

    let mut ticker = interval(sweep_interval);

    loop {
        ticker.tick().await;

        match purge_expired(&pool, retention).await {
            Ok(0) => {}
            Ok(purged) => {
                READINGS_PURGED_TOTAL.inc_by(purged as f64);
                debug!("Purged {} expired readings", purged);
            }
            Err(e) => {
                DB_FAILURES_TOTAL.inc();
                error!("Retention sweep failed: {}", e);
            }
        }
    }
}

fn retention_cutoff(retention: Duration) -> DateTime<Utc> {
    Utc::now() - chrono::Duration::seconds(retention.as_secs() as i64)
}
