mod feed;
mod model;
mod status;

use anyhow::{Context, Result};
use feed::ReadingFeed;
use futures_util::StreamExt;
use model::Reading;
use status::StatusIndicators;
use std::env;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::Instant;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

struct ViewerConfig {
    data_url: String,
    live_url: String,
    refresh: Option<Duration>,
}

impl ViewerConfig {
    fn from_env() -> Self {
        let server_url =
            env::var("SERVER_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
        let live_url = env::var("LIVE_URL").unwrap_or_else(|_| {
            let base = server_url
                .replacen("http://", "ws://", 1)
                .replacen("https://", "wss://", 1);
            format!("{}/api/live", base)
        });
        let refresh_secs: u64 = env::var("REFRESH_SECS")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .unwrap_or(0);

        Self {
            data_url: format!("{}/api/human-data", server_url),
            live_url,
            refresh: (refresh_secs > 0).then(|| Duration::from_secs(refresh_secs)),
        }
    }
}

#[tokio::main]
async fn main() {
    let config = ViewerConfig::from_env();

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting presence viewer");
    info!("Query endpoint: {}", config.data_url);
    info!("Live channel: {}", config.live_url);

    let client = reqwest::Client::new();
    let mut feed = ReadingFeed::new();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if let Err(e) = run_session(&client, &config, &mut feed, &mut stdin).await {
            error!("Live session ended: {:#}", e);
        }

        info!("Reconnecting in 2s");
        tokio::time::sleep(Duration::from_secs(2)).await;
    }
}

/// One connected session: load the list, then merge live pushes into it.
/// Returns when the live channel drops, so the caller can reconnect.
async fn run_session(
    client: &reqwest::Client,
    config: &ViewerConfig,
    feed: &mut ReadingFeed,
    stdin: &mut Lines<BufReader<Stdin>>,
) -> Result<()> {
    refresh(client, config, feed).await;

    let (mut socket, _) = connect_async(config.live_url.as_str())
        .await
        .context("connecting to live channel")?;
    info!("Subscribed to live channel");

    let refresh_period = config.refresh.unwrap_or(Duration::from_secs(1));
    let mut refresh_ticker =
        tokio::time::interval_at(Instant::now() + refresh_period, refresh_period);
    let mut stdin_open = true;

    loop {
        tokio::select! {
            frame = socket.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<Reading>(&text) {
                            Ok(reading) => {
                                feed.insert(reading);
                                render(feed);
                            }
                            Err(e) => warn!("Ignoring malformed push: {}", e),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return Err(anyhow::anyhow!("live channel closed"));
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        return Err(e).context("reading live channel");
                    }
                }
            }

            // Manual refresh: a newline re-invokes the initial load
            line = stdin.next_line(), if stdin_open => {
                match line {
                    Ok(Some(_)) => refresh(client, config, feed).await,
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        warn!("Stdin unavailable: {}", e);
                        stdin_open = false;
                    }
                }
            }

            _ = refresh_ticker.tick(), if config.refresh.is_some() => {
                refresh(client, config, feed).await;
            }
        }
    }
}

/// Re-invokes the initial load, replacing the local list with the
/// descending-sorted result. Fetch failures keep the current list.
async fn refresh(client: &reqwest::Client, config: &ViewerConfig, feed: &mut ReadingFeed) {
    match fetch_all(client, &config.data_url).await {
        Ok(readings) => {
            feed.replace(readings);
            render(feed);
        }
        Err(e) => warn!("Refresh failed: {:#}", e),
    }
}

async fn fetch_all(client: &reqwest::Client, data_url: &str) -> Result<Vec<Reading>> {
    let readings = client
        .get(data_url)
        .send()
        .await
        .context("querying readings")?
        .error_for_status()
        .context("query endpoint returned an error")?
        .json()
        .await
        .context("decoding readings")?;

    Ok(readings)
}

fn render(feed: &ReadingFeed) {
    if feed.is_empty() {
        info!("No readings yet");
        return;
    }

    if let Some(latest) = feed.latest() {
        let indicators = StatusIndicators::from_reading(latest);
        info!(
            "Presence: {} | Motion: {} | Alert: {} | {} readings",
            indicators.presence,
            indicators.motion,
            indicators.alert,
            feed.len()
        );
    }

    for reading in feed.entries() {
        debug!(
            "{} {} presence={:?} motion={:?} move={:.2} avg={:.2} alert={}",
            reading.timestamp,
            reading.id,
            reading.human_presence,
            reading.motion,
            reading.move_range,
            reading.avg_move_range,
            reading.alert_active
        );
    }
}
