//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, connection cap)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Bounded accept: a semaphore permit is acquired before accept and
//!   held for the connection's lifetime, so `max_connections` is real
//!   backpressure rather than advisory
//! - Accept errors are logged and retried; they never kill the loop

pub mod listener;

pub use listener::BoundedListener;
