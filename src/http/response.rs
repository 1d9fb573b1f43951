//! Client-facing JSON shapes.
//!
//! Internal reason codes never appear here: clients see only the
//! generic error strings plus, for quota denials, the numeric quota
//! state. Detailed reasons live in server-side logs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::chat::ChatReply;
use crate::security::rate_limit::{next_reset_utc, RateLimitDecision};

/// Quota state block attached to 200 and 429 responses.
#[derive(Debug, Serialize)]
pub struct RateLimitBody {
    pub limit: u32,
    pub used: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

impl From<&RateLimitDecision> for RateLimitBody {
    fn from(decision: &RateLimitDecision) -> Self {
        Self {
            limit: decision.limit,
            used: decision.used,
            remaining: decision.remaining,
            reset_at: next_reset_utc(),
        }
    }
}

/// Body for rejected requests (400 and 429).
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: &'static str,
    pub error_code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitBody>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorBody {
    pub fn invalid_input() -> Self {
        Self {
            success: false,
            error: "Invalid input detected",
            error_code: "INVALID_INPUT",
            rate_limit: None,
            timestamp: Utc::now(),
        }
    }

    pub fn rate_limit_exceeded(decision: Option<&RateLimitDecision>) -> Self {
        Self {
            success: false,
            error: "Rate limit exceeded. Please try again tomorrow.",
            error_code: "RATE_LIMIT_EXCEEDED",
            rate_limit: decision.map(RateLimitBody::from),
            timestamp: Utc::now(),
        }
    }

    pub fn generation_failed() -> Self {
        Self {
            success: false,
            error: "Failed to generate response",
            error_code: "AI_GENERATION_FAILED",
            rate_limit: None,
            timestamp: Utc::now(),
        }
    }
}

/// Body for admitted requests.
#[derive(Debug, Serialize)]
pub struct ChatBody {
    pub success: bool,
    pub answer: String,
    pub model: String,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimitBody>,
    pub timestamp: DateTime<Utc>,
}

impl ChatBody {
    pub fn new(reply: ChatReply, session_id: String, quota: Option<&RateLimitDecision>) -> Self {
        Self {
            success: true,
            answer: reply.answer,
            model: reply.model,
            session_id,
            rate_limit: quota.map(RateLimitBody::from),
            timestamp: Utc::now(),
        }
    }
}
