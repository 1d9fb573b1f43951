//! Quota store subsystem.
//!
//! # Data Flow
//! ```text
//! RateLimiter
//!     → store.rs (QuotaStore trait: atomic conditional increment)
//!     → memory.rs (in-process keyed counters, per-key critical section)
//! ```
//!
//! # Design Decisions
//! - The store supplies the conditional-increment primitive, so the
//!   read-check-write sequence is atomic per (identifier, date) key
//!   and correctness never depends on caller-side locking
//! - Counts are never cached outside the store; it is the single
//!   source of truth
//! - Records for past dates are never consulted again; pruning them is
//!   a retention concern, not a correctness one

pub mod memory;
pub mod store;

pub use memory::InMemoryQuotaStore;
pub use store::{QuotaStore, QuotaUsage, RateLimitRecord, StoreError};
