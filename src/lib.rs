//! Public chat admission gateway.
//!
//! Sits in front of an unauthenticated chat endpoint and decides, per
//! request, whether the request reaches the chat backend at all:
//! deny-list input validation first, then a per-identifier daily quota
//! enforced against a keyed counter store.

pub mod admission;
pub mod chat;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod quota;
pub mod security;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
