//! Admission subsystem.
//!
//! # Data Flow
//! ```text
//! admit(message, session_id, role)
//!     → stage 1: RequestValidator (pure, synchronous)
//!     → stage 2: RateLimiter (one store round-trip)
//!     → Admitted — caller forwards the unmodified message downstream
//! ```
//!
//! # Design Decisions
//! - Stage order is fixed and each stage can short-circuit; rejection
//!   is a value, not an exception path
//! - One admit call consumes at most one unit of quota; client retries
//!   are new requests (no idempotency keys in this layer)

pub mod pipeline;

pub use pipeline::{AdmissionOutcome, AdmissionPipeline, Rejection, RejectionCode, Role};
