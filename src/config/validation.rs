//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, timeouts > 0)
//! - Check bind addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("listener.max_connections must be greater than zero")]
    ZeroMaxConnections,

    #[error("admission.{0} must be greater than zero")]
    ZeroLimit(&'static str),

    #[error("quota_store.op_timeout_ms must be greater than zero")]
    ZeroStoreTimeout,

    #[error("chat_backend.base_url must not be empty")]
    EmptyBackendUrl,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,
}

/// Validate a deserialized configuration, collecting every problem.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
    }

    if config.admission.max_message_length == 0 {
        errors.push(ValidationError::ZeroLimit("max_message_length"));
    }
    if config.admission.max_session_id_length == 0 {
        errors.push(ValidationError::ZeroLimit("max_session_id_length"));
    }
    if config.admission.daily_request_limit == 0 {
        errors.push(ValidationError::ZeroLimit("daily_request_limit"));
    }
    if config.admission.student_daily_limit == 0 {
        errors.push(ValidationError::ZeroLimit("student_daily_limit"));
    }

    if config.quota_store.op_timeout_ms == 0 {
        errors.push(ValidationError::ZeroStoreTimeout);
    }

    if config.chat_backend.base_url.is_empty() {
        errors.push(ValidationError::EmptyBackendUrl);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
