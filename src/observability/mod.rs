//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! fetcher / cache produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → spans.rs (request-scoped spans with correlation IDs)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every candidate attempt
//! - Metrics are cheap and silent without an installed recorder

pub mod logging;
pub mod metrics;
pub mod spans;
