//! In-memory request latency histograms, one per matched route.
//! Recorded by the latency middleware, read by `/api/stats/latency`.

use std::sync::Mutex;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;

/// Latency stats for one route. Values stored in microseconds.
pub struct LatencyStats {
    inner: Mutex<hdrhistogram::Histogram<u64>>,
}

impl LatencyStats {
    /// Create a new histogram. Tracks 1us to 100s, 3 significant figures.
    pub fn new() -> Self {
        let histogram = hdrhistogram::Histogram::new_with_bounds(1, 100_000_000, 3)
            .expect("valid histogram bounds");
        Self {
            inner: Mutex::new(histogram),
        }
    }

    pub fn record_us(&self, us: u64) {
        if let Ok(mut h) = self.inner.lock() {
            h.saturating_record(us.max(1));
        }
    }

    pub fn record(&self, d: Duration) {
        let us = d.as_micros().min(u128::from(u64::MAX)) as u64;
        self.record_us(us);
    }

    /// Return (p50_us, p95_us, p99_us). None if no samples.
    pub fn percentiles(&self) -> (Option<u64>, Option<u64>, Option<u64>) {
        let Ok(h) = self.inner.lock() else {
            return (None, None, None);
        };
        if h.len() == 0 {
            return (None, None, None);
        }
        (
            Some(h.value_at_quantile(0.5)),
            Some(h.value_at_quantile(0.95)),
            Some(h.value_at_quantile(0.99)),
        )
    }

    pub fn len(&self) -> u64 {
        self.inner.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl Default for LatencyStats {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteLatencyReport {
    pub route: String,
    pub samples: u64,
    pub p50_us: Option<u64>,
    pub p95_us: Option<u64>,
    pub p99_us: Option<u64>,
}

/// route → histogram
#[derive(Default)]
pub struct RouteLatency {
    routes: DashMap<String, LatencyStats>,
}

impl RouteLatency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, route: &str, d: Duration) {
        if let Some(stats) = self.routes.get(route) {
            stats.record(d);
            return;
        }
        self.routes.entry(route.to_string()).or_default().record(d);
    }

    /// Per-route report, sorted by route.
    pub fn report(&self) -> Vec<RouteLatencyReport> {
        let mut report: Vec<RouteLatencyReport> = self
            .routes
            .iter()
            .map(|entry| {
                let (p50_us, p95_us, p99_us) = entry.value().percentiles();
                RouteLatencyReport {
                    route: entry.key().clone(),
                    samples: entry.value().len(),
                    p50_us,
                    p95_us,
                    p99_us,
                }
            })
            .collect();
        report.sort_by(|a, b| a.route.cmp(&b.route));
        report
    }
}
