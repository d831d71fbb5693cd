use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref INGEST_TOTAL: Counter = Counter::with_opts(Opts::new(
        "relay_ingest_total",
        "Total readings accepted and persisted"
    ))
    .unwrap();
    pub static ref VALIDATION_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "relay_validation_failures_total",
        "Total ingest payloads rejected before persistence"
    ))
    .unwrap();
    pub static ref DB_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "relay_db_failures_total",
        "Total database operation failures"
    ))
    .unwrap();
    pub static ref BROADCASTS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "relay_broadcasts_total",
        "Total readings published to the live channel"
    ))
    .unwrap();
    pub static ref CONNECTED_VIEWERS: Gauge = Gauge::with_opts(Opts::new(
        "relay_connected_viewers",
        "Currently connected live viewers"
    ))
    .unwrap();
    pub static ref READINGS_PURGED_TOTAL: Counter = Counter::with_opts(Opts::new(
        "relay_readings_purged_total",
        "Total readings removed by the retention sweeper"
    ))
    .unwrap();
    pub static ref INGEST_LATENCY_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "relay_ingest_latency_seconds",
            "Time taken to persist one reading"
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0
        ])
    )
    .unwrap();
}

pub fn init_metrics() {
    REGISTRY.register(Box::new(INGEST_TOTAL.clone())).unwrap();
    REGISTRY
        .register(Box::new(VALIDATION_FAILURES_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(DB_FAILURES_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(BROADCASTS_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(CONNECTED_VIEWERS.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(READINGS_PURGED_TOTAL.clone()))
        .unwrap();
    REGISTRY
        .register(Box::new(INGEST_LATENCY_SECONDS.clone()))
        .unwrap();
}

pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
