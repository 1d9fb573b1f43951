//! Lifecycle management subsystem.
//!
//! # Design Decisions
//! - Shutdown is a broadcast: every long-running task subscribes and
//!   drains on signal
//! - SIGINT/ctrl-c triggers graceful shutdown; in-flight requests
//!   finish, new connections stop being accepted

pub mod shutdown;

pub use shutdown::Shutdown;
