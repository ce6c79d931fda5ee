//! Prometheus metrics for the evaluation engine.

use std::sync::LazyLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Wall-clock duration of a single sandbox run, by outcome status.
pub static RUN_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        "evalcore_run_duration_seconds",
        "Wall-clock time spent in a single sandboxed run",
    )
    .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]);
    HistogramVec::new(opts, &["status"]).expect("failed to create histogram")
});

/// Peak memory observed for a single test, by outcome status.
pub static RUN_MEMORY_KB: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        "evalcore_run_memory_kb",
        "Peak resident memory observed for a sandboxed run",
    )
    .buckets(vec![
        1024.0, 16384.0, 65536.0, 131072.0, 262144.0, 524288.0, 1048576.0,
    ]);
    HistogramVec::new(opts, &["status"]).expect("failed to create histogram")
});

/// Per-test verdict counter.
pub static TEST_VERDICTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new("evalcore_test_verdicts_total", "Per-test verdicts issued"),
        &["status"],
    )
    .expect("failed to create counter")
});

/// Overall-submission verdict counter.
pub static SUBMISSION_VERDICTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "evalcore_submission_verdicts_total",
            "Overall verdicts issued per submission",
        ),
        &["status"],
    )
    .expect("failed to create counter")
});

/// Submissions currently being evaluated.
pub static ACTIVE_SUBMISSIONS: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "evalcore_active_submissions",
        "Submissions currently being evaluated",
    )
    .expect("failed to create gauge")
});

/// Workspaces removed by the background sweep.
pub static WORKSPACES_SWEPT_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "evalcore_workspaces_swept_total",
        "Workspace directories removed by the background sweep",
    )
    .expect("failed to create counter")
});

/// Register every metric with the global registry. Safe to call more than
/// once only in tests; production code calls this exactly once at startup.
pub fn init_metrics() {
    REGISTRY
        .register(Box::new(RUN_DURATION.clone()))
        .expect("failed to register metric");
    REGISTRY
        .register(Box::new(RUN_MEMORY_KB.clone()))
        .expect("failed to register metric");
    REGISTRY
        .register(Box::new(TEST_VERDICTS_TOTAL.clone()))
        .expect("failed to register metric");
    REGISTRY
        .register(Box::new(SUBMISSION_VERDICTS_TOTAL.clone()))
        .expect("failed to register metric");
    REGISTRY
        .register(Box::new(ACTIVE_SUBMISSIONS.clone()))
        .expect("failed to register metric");
    REGISTRY
        .register(Box::new(WORKSPACES_SWEPT_TOTAL.clone()))
        .expect("failed to register metric");
}

/// Record one test's outcome.
pub fn record_test(status: &str, duration_secs: f64, memory_kb: u64) {
    RUN_DURATION.with_label_values(&[status]).observe(duration_secs);
    RUN_MEMORY_KB
        .with_label_values(&[status])
        .observe(memory_kb as f64);
    TEST_VERDICTS_TOTAL.with_label_values(&[status]).inc();
}

/// Record one submission's overall outcome.
pub fn record_submission(status: &str) {
    SUBMISSION_VERDICTS_TOTAL.with_label_values(&[status]).inc();
}

/// Record the background sweep removing `count` stale workspaces.
pub fn record_sweep(count: usize) {
    WORKSPACES_SWEPT_TOTAL.inc_by(count as u64);
}

/// HTTP server exposing the Prometheus text format on its own port,
/// independent of the main evaluation API.
pub struct MetricsServer;

impl MetricsServer {
    pub async fn run(port: u16) -> anyhow::Result<()> {
        use axum::{routing::get, Router};
        use std::net::SocketAddr;

        let app = Router::new().route("/metrics", get(Self::metrics_handler));

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        tracing::info!("metrics server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    async fn metrics_handler() -> String {
        let encoder = TextEncoder::new();
        let metric_families = REGISTRY.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .expect("prometheus encoding is infallible for well-formed metrics");
        String::from_utf8(buffer).expect("prometheus text format is valid utf-8")
    }
}
