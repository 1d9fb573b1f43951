//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters for admission outcomes)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging via tracing; level configurable through the
//!   environment
//! - Metrics are cheap (atomic increments), labeled by outcome so
//!   store outages are distinguishable from ordinary quota exhaustion
//! - Log fields never carry full message content or credential-like
//!   values; untrusted text is reduced to a bounded preview first

pub mod logging;
pub mod metrics;
