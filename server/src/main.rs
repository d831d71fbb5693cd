mod broadcast;
mod config;
mod db;
mod errors;
mod live;
mod metrics;
mod model;
mod rest;
mod validate;

use axum::{routing::get, Router};
use broadcast::Broadcaster;
use config::Config;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting presence relay");
    info!("HTTP server: {}", config.http_addr);
    info!(
        "Database: {}",
        config.database_url.split('@').last().unwrap_or("***")
    );
    info!("Retention window: {}s", config.retention.as_secs());

    // Initialize metrics
    metrics::init_metrics();

    // Connect to database
    let pool = match db::make_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // Fan-out channel for live viewers, injected into the router
    let broadcaster = Broadcaster::new(config.channel_capacity);

    // Spawn retention sweeper task
    let sweeper_pool = pool.clone();
    let retention = config.retention;
    let sweep_interval = config.sweep_interval;
    let sweeper_handle = tokio::spawn(async move {
        db::run_retention_sweeper(sweeper_pool, retention, sweep_interval).await;
    });

    // Build HTTP app with REST API, live channel and metrics endpoint
    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(rest::create_router(
            pool,
            broadcaster,
            config.retention,
            config.allowed_origin.as_deref(),
        ));

    // Start HTTP server
    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .unwrap_or_else(|e| {
            error!("Failed to bind to {}: {}", config.http_addr, e);
            std::process::exit(1);
        });

    info!("HTTP server listening on {}", config.http_addr);

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap_or_else(|e| {
            error!("HTTP server error: {}", e);
        });
    });

    tokio::select! {
        _ = sweeper_handle => {
            error!("Retention sweeper terminated");
        }
        _ = server_handle => {
            error!("HTTP server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down");
}

async fn metrics_handler() -> String {
    metrics::gather_metrics()
}
