//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (JSON on stdout in production, human format in dev)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all log lines and the upstream request
//! - Metric updates are cheap (atomic increments)
//! - The metrics endpoint is optional and off the request path

pub mod logging;
pub mod metrics;
