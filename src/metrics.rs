//! Lightweight metrics collection with Prometheus text exposition and health endpoint.
//!
//! Histograms use logarithmic 1-2-5 buckets from 1ms to 10s, which spans both
//! a local render (sub-millisecond to a few ms) and a feed download over a
//! slow link. No external metrics crate: atomic counters rendered directly as
//! Prometheus text format.

use std::fmt::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering::Relaxed};
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

// ---------------------------------------------------------------------------
// Prometheus histogram with millisecond-resolution logarithmic buckets
// ---------------------------------------------------------------------------

const NUM_BUCKETS: usize = 13;

/// Upper bounds in microseconds + Prometheus `le` label strings.
const BUCKETS: [(u64, &str); NUM_BUCKETS] = [
    (1_000, "0.001"),
    (2_000, "0.002"),
    (5_000, "0.005"),
    (10_000, "0.01"),
    (20_000, "0.02"),
    (50_000, "0.05"),
    (100_000, "0.1"),
    (200_000, "0.2"),
    (500_000, "0.5"),
    (1_000_000, "1"),
    (2_000_000, "2"),
    (5_000_000, "5"),
    (10_000_000, "10"),
];

pub struct PromHistogram {
    /// Cumulative bucket counters. Index i counts observations <= BUCKETS[i].
    buckets: [AtomicU64; NUM_BUCKETS],
    /// Sum of all observed values in microseconds.
    sum_us: AtomicU64,
    count: AtomicU64,
}

impl Default for PromHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl PromHistogram {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
            sum_us: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Record a duration observation. Increments all cumulative buckets
    /// whose upper bound >= the observed value.
    pub fn record(&self, duration: Duration) {
        let micros = duration.as_micros() as u64;

        if let Some(i) = BUCKETS.iter().position(|&(bound, _)| micros <= bound) {
            for bucket in &self.buckets[i..] {
                bucket.fetch_add(1, Relaxed);
            }
        }

        self.sum_us.fetch_add(micros, Relaxed);
        self.count.fetch_add(1, Relaxed);
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Relaxed)
    }

    fn render(&self, name: &str, out: &mut String) {
        for (i, &(_, le)) in BUCKETS.iter().enumerate() {
            let count = self.buckets[i].load(Relaxed);
            let _ = writeln!(out, "{name}_bucket{{le=\"{le}\"}} {count}");
        }
        let total = self.count.load(Relaxed);
        let _ = writeln!(out, "{name}_bucket{{le=\"+Inf\"}} {total}");

        let sum_secs = self.sum_us.load(Relaxed) as f64 / 1_000_000.0;
        let _ = writeln!(out, "{name}_sum {sum_secs}");
        let _ = writeln!(out, "{name}_count {total}");
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

pub struct Metrics {
    // Counters
    pub fetches: AtomicU64,
    pub fetch_errors: AtomicU64,
    pub renders: AtomicU64,
    pub markers_drawn: AtomicU64,

    // Gauges
    /// Feature count reported by the most recent successful fetch.
    pub last_feed_count: AtomicU64,
    /// Whether the most recent fetch succeeded.
    pub feed_up: AtomicBool,
    start_time: Instant,

    // Latency histograms
    pub fetch_latency: PromHistogram,
    pub render_latency: PromHistogram,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            fetches: AtomicU64::new(0),
            fetch_errors: AtomicU64::new(0),
            renders: AtomicU64::new(0),
            markers_drawn: AtomicU64::new(0),
            last_feed_count: AtomicU64::new(0),
            feed_up: AtomicBool::new(false),
            start_time: Instant::now(),
            fetch_latency: PromHistogram::new(),
            render_latency: PromHistogram::new(),
        }
    }
}

impl Metrics {
    /// Record the outcome of one feed fetch.
    pub fn observe_fetch(&self, elapsed: Duration, feed_count: Option<usize>) {
        self.fetches.fetch_add(1, Relaxed);
        self.fetch_latency.record(elapsed);
        match feed_count {
            Some(count) => {
                self.last_feed_count.store(count as u64, Relaxed);
                self.feed_up.store(true, Relaxed);
            }
            None => {
                self.fetch_errors.fetch_add(1, Relaxed);
                self.feed_up.store(false, Relaxed);
            }
        }
    }

    /// Record one completed render pass.
    pub fn observe_render(&self, elapsed: Duration, markers: usize) {
        self.renders.fetch_add(1, Relaxed);
        self.markers_drawn.fetch_add(markers as u64, Relaxed);
        self.render_latency.record(elapsed);
    }

    /// Render all metrics in Prometheus text exposition format.
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        let mut out = String::with_capacity(2048);

        // -- Counters --
        let _ = writeln!(out, "# HELP quakemap_fetches_total Feed fetch attempts");
        let _ = writeln!(out, "# TYPE quakemap_fetches_total counter");
        let _ = writeln!(out, "quakemap_fetches_total {}", self.fetches.load(Relaxed));

        let _ = writeln!(out, "# HELP quakemap_fetch_errors_total Failed feed fetches");
        let _ = writeln!(out, "# TYPE quakemap_fetch_errors_total counter");
        let _ = writeln!(out, "quakemap_fetch_errors_total {}", self.fetch_errors.load(Relaxed));

        let _ = writeln!(out, "# HELP quakemap_renders_total Completed render passes");
        let _ = writeln!(out, "# TYPE quakemap_renders_total counter");
        let _ = writeln!(out, "quakemap_renders_total {}", self.renders.load(Relaxed));

        let _ = writeln!(out, "# HELP quakemap_markers_drawn_total Markers emitted across all renders");
        let _ = writeln!(out, "# TYPE quakemap_markers_drawn_total counter");
        let _ = writeln!(out, "quakemap_markers_drawn_total {}", self.markers_drawn.load(Relaxed));

        // -- Gauges --
        let _ = writeln!(out, "# HELP quakemap_feed_count Feature count reported by the last successful fetch");
        let _ = writeln!(out, "# TYPE quakemap_feed_count gauge");
        let _ = writeln!(out, "quakemap_feed_count {}", self.last_feed_count.load(Relaxed));

        let _ = writeln!(out, "# HELP quakemap_feed_up Last fetch status (1=ok)");
        let _ = writeln!(out, "# TYPE quakemap_feed_up gauge");
        let _ = writeln!(out, "quakemap_feed_up {}", u8::from(self.feed_up.load(Relaxed)));

        let _ = writeln!(out, "# HELP quakemap_uptime_seconds Seconds since process start");
        let _ = writeln!(out, "# TYPE quakemap_uptime_seconds gauge");
        let _ = writeln!(out, "quakemap_uptime_seconds {}", self.start_time.elapsed().as_secs());

        // -- Histograms --
        let _ = writeln!(out, "# HELP quakemap_fetch_duration_seconds Feed download and decode latency");
        let _ = writeln!(out, "# TYPE quakemap_fetch_duration_seconds histogram");
        self.fetch_latency.render("quakemap_fetch_duration_seconds", &mut out);

        let _ = writeln!(out, "# HELP quakemap_render_duration_seconds Marker build and render latency");
        let _ = writeln!(out, "# TYPE quakemap_render_duration_seconds histogram");
        self.render_latency.render("quakemap_render_duration_seconds", &mut out);

        out
    }
}

// ---------------------------------------------------------------------------
// HTTP server
// ---------------------------------------------------------------------------

#[must_use]
pub fn router(metrics: Arc<Metrics>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(prom_metrics))
        .with_state(metrics)
}

/// Serve `/health` and `/metrics` on the given port.
pub async fn serve_http(port: u16, metrics: Arc<Metrics>, cancel: CancellationToken) {
    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", port)).await {
        Ok(l) => l,
        Err(e) => {
            error!(port, error = %e, "failed to bind metrics port");
            return;
        }
    };

    info!(port, "metrics/health HTTP server listening");

    axum::serve(listener, router(metrics))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .ok();
}

/// `OK` before the first fetch and after a good one, `DEGRADED` when the
/// last fetch failed. The map server itself stays up either way.
async fn health(State(m): State<Arc<Metrics>>) -> (StatusCode, &'static str) {
    let fetched = m.fetches.load(Relaxed) > 0;
    match (fetched, m.feed_up.load(Relaxed)) {
        (false, _) | (true, true) => (StatusCode::OK, "OK\n"),
        (true, false) => (StatusCode::OK, "DEGRADED\n"),
    }
}

async fn prom_metrics(State(m): State<Arc<Metrics>>) -> String {
    m.to_prometheus()
}
