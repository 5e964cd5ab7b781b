//! # Tally Service
//!
//! Todo operations with live Prometheus instrumentation.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Tally Service                                   │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  TodoService   │  │  TodoMetrics   │  │  ServiceConfig             ││
//! │  │                │  │                │  │                            ││
//! │  │ • CreateTodo   │  │ • requests     │  │ • metrics namespace        ││
//! │  │ • GetTodo      │  │ • durations    │  │ • histogram buckets        ││
//! │  │ • UpdateTodo   │  │ • todos_total  │  │ • log filter / format      ││
//! │  │ • DeleteTodo   │  │ • completed    │  │                            ││
//! │  │ • ListTodos    │  │                │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There are no process-wide singletons. Each [`TodoService`] owns its store
//! and builds its own [`TodoMetrics`] registry, so any number of independent
//! instances can coexist and each one's gauges describe only its own store.
//!
//! ## Configuration
//! Environment variables:
//! - `TALLY_METRICS_NAMESPACE` - Prefix for every metric name (default: none)
//! - `TALLY_HISTOGRAM_BUCKETS` - Comma-separated latency buckets in seconds
//! - `TALLY_LOG_FILTER` - tracing filter directive (default: info)
//! - `TALLY_LOG_FORMAT` - `pretty` or `compact` (default: pretty)
//!
//! ## Example
//! ```rust
//! use tally_core::{CreateTodoRequest, GetTodoRequest};
//! use tally_service::{ServiceConfig, TodoService};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let service = TodoService::from_config(&ServiceConfig::default()).unwrap();
//!
//! let created = service
//!     .create_todo(CreateTodoRequest { title: "Learn X".into(), description: None })
//!     .await?
//!     .todo;
//!
//! let fetched = service.get_todo(GetTodoRequest { id: created.id.clone() }).await?.todo;
//! assert_eq!(fetched, created);
//! assert_eq!(service.metrics().total_gauge(), 1);
//! # Ok::<(), tally_service::ServiceError>(())
//! # }).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod metrics;
pub mod service;
pub mod telemetry;

// Re-exports
pub use config::{LogConfig, LogFormat, MetricsConfig, ServiceConfig};
pub use error::{ServiceError, ServiceResult};
pub use metrics::{MetricsError, TodoMetrics};
pub use service::TodoService;
