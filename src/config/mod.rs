//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart (no
//!   hot reload, so in-flight validation never races a pattern swap)
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::AdmissionConfig;
pub use schema::ChatBackendConfig;
pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::QuotaStoreConfig;
