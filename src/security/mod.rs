//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → validation.rs (session id format, length limits, deny-list scan)
//!     → rate_limit.rs (per-identifier daily quota against the store)
//!     → pass to the chat backend
//!
//! Outgoing response:
//!     → headers.rs (append fixed security header set)
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure, including a
//!   quota store that cannot be reached
//! - No trust in client input: a malformed session id never reaches
//!   the quota store as a key
//! - Deny-list, not a sanitizer: patterns classify, they never rewrite

pub mod headers;
pub mod rate_limit;
pub mod validation;

pub use rate_limit::{DenialCause, RateLimitDecision, RateLimiter};
pub use validation::{RejectReason, RequestValidator, ValidationPolicy, ValidationResult};
