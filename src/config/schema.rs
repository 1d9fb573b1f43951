//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! gateway. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the chat gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, connection cap).
    pub listener: ListenerConfig,

    /// Admission settings: validation limits and daily quotas.
    pub admission: AdmissionConfig,

    /// Quota store settings (timeouts, retry).
    pub quota_store: QuotaStoreConfig,

    /// Upstream chat backend settings.
    pub chat_backend: ChatBackendConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Admission settings: message/session-id limits and per-role daily
/// request quotas. The deny-list pattern set itself is fixed at compile
/// time; see `security::validation`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Maximum message length in characters.
    pub max_message_length: usize,

    /// Maximum session id length in characters.
    pub max_session_id_length: usize,

    /// Daily request limit for anonymous (public) identifiers.
    pub daily_request_limit: u32,

    /// Daily request limit for authenticated students.
    pub student_daily_limit: u32,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            max_message_length: 2000,
            max_session_id_length: 100,
            daily_request_limit: 20,
            student_daily_limit: 100,
        }
    }
}

/// Quota store access settings.
///
/// Every store operation is bounded by `op_timeout_ms`; a failed or
/// timed-out operation is retried at most once before the limiter
/// fails closed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuotaStoreConfig {
    /// Per-operation timeout in milliseconds.
    pub op_timeout_ms: u64,

    /// Whether a failed store operation is retried once.
    pub retry_once: bool,
}

impl Default for QuotaStoreConfig {
    fn default() -> Self {
        Self {
            op_timeout_ms: 250,
            retry_once: true,
        }
    }
}

/// Upstream chat backend (OpenAI-style completions API).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatBackendConfig {
    /// Base URL of the completions API.
    pub base_url: String,

    /// Model name sent with every request.
    pub model: String,

    /// Environment variable holding the API key, if the upstream
    /// requires one.
    pub api_key_env: Option<String>,

    /// Upstream request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ChatBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434/v1".to_string(),
            model: "deepseek-chat".to_string(),
            api_key_env: None,
            request_timeout_secs: 60,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 90 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Whether the Prometheus exporter is started.
    pub metrics_enabled: bool,

    /// Address the metrics endpoint binds to.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
