//! Request statistics for the prediction service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

use crate::error::ServiceError;
use crate::types::prediction::{LoanStatus, Prediction};

/// Metrics collector for the serving path
pub struct ServiceMetrics {
    /// Total prediction requests answered successfully
    pub predictions_served: AtomicU64,
    /// Approvals
    pub approved: AtomicU64,
    /// Rejections
    pub rejected: AtomicU64,
    /// Requests rejected by validation
    pub validation_failures: AtomicU64,
    /// Backend failures (model or upstream)
    pub backend_failures: AtomicU64,
    /// Request latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Confidence distribution buckets
    confidence_buckets: RwLock<[u64; 10]>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ServiceMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            predictions_served: AtomicU64::new(0),
            approved: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            validation_failures: AtomicU64::new(0),
            backend_failures: AtomicU64::new(0),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            confidence_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a served prediction
    pub fn record_prediction(&self, latency: Duration, prediction: &Prediction) {
        self.predictions_served.fetch_add(1, Ordering::Relaxed);
        match prediction.prediction {
            LoanStatus::Approved => self.approved.fetch_add(1, Ordering::Relaxed),
            LoanStatus::Rejected => self.rejected.fetch_add(1, Ordering::Relaxed),
        };

        if let Ok(mut latencies) = self.latencies.write() {
            latencies.push(latency.as_micros() as u64);
            // Keep only the recent window for memory efficiency
            if latencies.len() > 10_000 {
                latencies.drain(0..5_000);
            }
        }

        let bucket = (prediction.confidence * 10.0).min(9.0) as usize;
        if let Ok(mut buckets) = self.confidence_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Record a failed request by error kind
    pub fn record_failure(&self, error: &ServiceError) {
        match error {
            ServiceError::Validation(_) => {
                self.validation_failures.fetch_add(1, Ordering::Relaxed);
            }
            _ => {
                self.backend_failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Latency statistics over the recent window
    pub fn get_latency_stats(&self) -> LatencyStats {
        let latencies = match self.latencies.read() {
            Ok(l) => l,
            Err(_) => return LatencyStats::default(),
        };
        if latencies.is_empty() {
            return LatencyStats::default();
        }

        let mut sorted: Vec<u64> = latencies.clone();
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[(count as f64 * 0.95) as usize],
            p99_us: sorted[(count as f64 * 0.99) as usize],
            max_us: *sorted.last().unwrap_or(&0),
        }
    }

    /// Current throughput (requests per second since start)
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.predictions_served.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Confidence distribution buckets (0.0-0.1 through 0.9-1.0)
    pub fn get_confidence_distribution(&self) -> [u64; 10] {
        self.confidence_buckets
            .read()
            .map(|b| *b)
            .unwrap_or([0; 10])
    }

    /// Log a summary of service activity
    pub fn print_summary(&self) {
        let served = self.predictions_served.load(Ordering::Relaxed);
        let approved = self.approved.load(Ordering::Relaxed);
        let rejected = self.rejected.load(Ordering::Relaxed);
        let invalid = self.validation_failures.load(Ordering::Relaxed);
        let failed = self.backend_failures.load(Ordering::Relaxed);
        let stats = self.get_latency_stats();

        let approval_rate = if served > 0 {
            (approved as f64 / served as f64) * 100.0
        } else {
            0.0
        };

        info!(
            served,
            approved,
            rejected,
            approval_rate = format!("{:.1}%", approval_rate),
            validation_failures = invalid,
            backend_failures = failed,
            throughput = format!("{:.1} req/s", self.get_throughput()),
            "Service metrics summary"
        );
        info!(
            mean_us = stats.mean_us,
            p50_us = stats.p50_us,
            p95_us = stats.p95_us,
            p99_us = stats.p99_us,
            max_us = stats.max_us,
            "Request latency (recent window)"
        );
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Request latency statistics
#[derive(Debug, Default)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Periodic reporter that logs metric summaries
pub struct MetricsReporter {
    metrics: std::sync::Arc<ServiceMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: std::sync::Arc<ServiceMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
