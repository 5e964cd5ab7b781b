//! # Metrics
//!
//! Prometheus instruments for the todo service, registered on a registry
//! owned by each [`TodoMetrics`] instance.
//!
//! ## Instruments
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  grpc_requests_total{method, status}        IntCounterVec              │
//! │  grpc_request_duration_seconds{method}      HistogramVec               │
//! │  todos_total                                IntGauge                   │
//! │  todos_completed_total                      IntGauge                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The gauges are written only through [`CountsObserver::publish`], which the
//! store calls while holding its write lock.

use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

use tally_core::{Operation, Outcome, TodoCounts};
use tally_store::CountsObserver;

use crate::config::MetricsConfig;

const REQUESTS_TOTAL: &str = "grpc_requests_total";
const REQUEST_DURATION: &str = "grpc_request_duration_seconds";
const TODOS_TOTAL: &str = "todos_total";
const TODOS_COMPLETED: &str = "todos_completed_total";

/// Metrics errors.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("Exposition is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Result type for metrics operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// The four service instruments and the registry that owns them.
pub struct TodoMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration: HistogramVec,
    todos_total: IntGauge,
    todos_completed: IntGauge,
}

impl TodoMetrics {
    /// Creates and registers the instruments.
    ///
    /// Every `method`/`status` series is created up front at zero so that
    /// scrapes see the full label set before the first request.
    pub fn new(config: &MetricsConfig) -> MetricsResult<Self> {
        let opts = |name: &str, help: &str| {
            let opts = Opts::new(name, help);
            match config.namespace {
                Some(ref ns) => opts.namespace(ns.clone()),
                None => opts,
            }
        };

        let requests_total = IntCounterVec::new(
            opts(REQUESTS_TOTAL, "Total number of todo service requests"),
            &["method", "status"],
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::from(opts(REQUEST_DURATION, "Duration of todo service requests"))
                .buckets(config.buckets.clone()),
            &["method"],
        )?;
        let todos_total = IntGauge::with_opts(opts(TODOS_TOTAL, "Total number of todos"))?;
        let todos_completed = IntGauge::with_opts(opts(
            TODOS_COMPLETED,
            "Total number of completed todos",
        ))?;

        let registry = Registry::new();
        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;
        registry.register(Box::new(todos_total.clone()))?;
        registry.register(Box::new(todos_completed.clone()))?;

        // Bucket layout is only checked when a histogram child is created
        for operation in Operation::ALL {
            request_duration.get_metric_with_label_values(&[operation.as_str()])?;
            for outcome in Outcome::ALL {
                requests_total
                    .get_metric_with_label_values(&[operation.as_str(), outcome.as_str()])?;
            }
        }

        Ok(TodoMetrics {
            registry,
            requests_total,
            request_duration,
            todos_total,
            todos_completed,
        })
    }

    /// Records one finished request.
    pub fn observe(&self, operation: Operation, outcome: Outcome, elapsed: Duration) {
        self.requests_total
            .with_label_values(&[operation.as_str(), outcome.as_str()])
            .inc();
        self.request_duration
            .with_label_values(&[operation.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    /// Sets both gauges.
    ///
    /// The gauge that moves down is written first, so a concurrent scrape
    /// never reads `completed > total`.
    pub fn publish_counts(&self, counts: TodoCounts) {
        let total = to_gauge(counts.total);
        let completed = to_gauge(counts.completed);

        if completed <= self.todos_completed.get() {
            self.todos_completed.set(completed);
            self.todos_total.set(total);
        } else {
            self.todos_total.set(total);
            self.todos_completed.set(completed);
        }
    }

    /// Prometheus text exposition of every instrument.
    pub fn render(&self) -> MetricsResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn request_count(&self, operation: Operation, outcome: Outcome) -> u64 {
        self.requests_total
            .with_label_values(&[operation.as_str(), outcome.as_str()])
            .get()
    }

    pub fn duration_sample_count(&self, operation: Operation) -> u64 {
        self.request_duration
            .with_label_values(&[operation.as_str()])
            .get_sample_count()
    }

    pub fn total_gauge(&self) -> i64 {
        self.todos_total.get()
    }

    pub fn completed_gauge(&self) -> i64 {
        self.todos_completed.get()
    }
}

impl std::fmt::Debug for TodoMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoMetrics")
            .field("todos_total", &self.todos_total.get())
            .field("todos_completed", &self.todos_completed.get())
            .finish_non_exhaustive()
    }
}

impl CountsObserver for TodoMetrics {
    fn publish(&self, counts: TodoCounts) {
        self.publish_counts(counts);
    }
}

fn to_gauge(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}
