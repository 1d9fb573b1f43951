//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/public/chat/message
//!     → server.rs (extract, assign session id if absent)
//!     → admission::AdmissionPipeline (validate → rate-limit)
//!     → chat::ChatBackend (admitted requests only)
//!     → response.rs (client-facing JSON shapes)
//!     → security::headers (fixed header set on every response)
//! ```

pub mod response;
pub mod server;

pub use server::HttpServer;
