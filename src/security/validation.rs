//! Request validation against an immutable deny-list policy.
//!
//! # Responsibilities
//! - Enforce session id format and length limits
//! - Enforce message length bounds
//! - Scan messages against ordered deny-list pattern categories
//!
//! # Design Decisions
//! - Deny-list, not a parser-based sanitizer: O(pattern-count) per
//!   request and every rule is auditable. Creative encodings can slip
//!   past it; downstream consumers must not treat admitted text as safe
//!   HTML/SQL.
//! - Patterns are compiled once at startup and immutable for the life
//!   of the process; changing them means a restart.
//! - The validator classifies, it never rewrites the input, and it
//!   never logs more than a bounded prefix of the message.

use regex::Regex;

/// Why a request was rejected by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Message empty or over the length limit.
    Length,
    /// Session id empty, too long, or outside the permitted charset.
    SessionFormat,
    /// Script markup, `javascript:` URIs, inline event handlers.
    Xss,
    /// SQL keywords or tautologies in suspicious combination.
    Sqli,
    /// `../` or `..\` sequences.
    PathTraversal,
    /// Anything else on the deny-list not cleanly classified.
    Generic,
}

impl RejectReason {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Length => "length",
            RejectReason::SessionFormat => "session_format",
            RejectReason::Xss => "xss",
            RejectReason::Sqli => "sqli",
            RejectReason::PathTraversal => "path_traversal",
            RejectReason::Generic => "generic",
        }
    }
}

/// Outcome of validating one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Accept,
    Reject(RejectReason),
}

/// Deny-list pattern categories, in evaluation order. The first
/// matching category determines the reported reason.
const DENY_PATTERNS: &[(RejectReason, &str)] = &[
    (RejectReason::Xss, r"(?i)<\s*script[^>]*>"),
    (RejectReason::Xss, r"(?i)<\s*/\s*script\s*>"),
    (RejectReason::Xss, r"(?i)javascript\s*:"),
    (RejectReason::Xss, r"(?i)\bon\w+\s*="),
    (
        RejectReason::Sqli,
        r"(?i)\b(union|select|insert|update|delete|drop|create|alter|exec|execute)\s",
    ),
    (RejectReason::Sqli, r"(?i)\b(or|and)\b\s+\d+\s*=\s*\d+"),
    (RejectReason::Sqli, r"(?i)'\s*(or|and)\s"),
    (RejectReason::Sqli, r"--\s*$"),
    (RejectReason::PathTraversal, r"\.\./"),
    (RejectReason::PathTraversal, r"\.\.\\"),
    (RejectReason::Generic, "\x00"),
    (RejectReason::Generic, r"\$\{[^}]*\}"),
];

/// Permitted session id charset: alphanumeric plus dash/underscore.
const SESSION_ID_FORMAT: &str = r"^[A-Za-z0-9_-]+$";

struct DenyRule {
    reason: RejectReason,
    pattern: Regex,
}

/// Immutable validation configuration: length limits, session id
/// format rule, and the compiled deny-list.
pub struct ValidationPolicy {
    max_message_length: usize,
    max_session_id_length: usize,
    session_id_format: Regex,
    deny_rules: Vec<DenyRule>,
}

impl ValidationPolicy {
    /// Compile the built-in pattern set with the given length limits.
    ///
    /// The patterns are compile-time constants, so `Regex` construction
    /// cannot fail for user-supplied reasons.
    pub fn new(max_message_length: usize, max_session_id_length: usize) -> Self {
        let deny_rules = DENY_PATTERNS
            .iter()
            .map(|(reason, pattern)| DenyRule {
                reason: *reason,
                pattern: Regex::new(pattern).expect("built-in deny pattern compiles"),
            })
            .collect();

        Self {
            max_message_length,
            max_session_id_length,
            session_id_format: Regex::new(SESSION_ID_FORMAT)
                .expect("session id format pattern compiles"),
            deny_rules,
        }
    }

}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self::new(2000, 100)
    }
}

/// Applies a [`ValidationPolicy`] to single requests. Pure and
/// stateless: no I/O, no mutation of the input.
pub struct RequestValidator {
    policy: ValidationPolicy,
}

impl RequestValidator {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    /// Validate one request. Checks run in fixed order and the first
    /// failure wins:
    ///
    /// 1. session id non-empty, within length, permitted charset
    /// 2. message non-empty and within length
    /// 3. deny-list scan, category order XSS → SQLI → PATH_TRAVERSAL → GENERIC
    pub fn validate(&self, message: &str, session_id: &str) -> ValidationResult {
        // A malformed identifier must never reach the quota store as a
        // key, so the id is checked before the message is inspected.
        if session_id.is_empty()
            || session_id.chars().count() > self.policy.max_session_id_length
            || !self.policy.session_id_format.is_match(session_id)
        {
            return ValidationResult::Reject(RejectReason::SessionFormat);
        }

        if message.is_empty() || message.chars().count() > self.policy.max_message_length {
            return ValidationResult::Reject(RejectReason::Length);
        }

        for rule in &self.policy.deny_rules {
            if rule.pattern.is_match(message) {
                return ValidationResult::Reject(rule.reason);
            }
        }

        ValidationResult::Accept
    }
}

/// Bounded prefix of untrusted content, safe to put in a log field.
/// Never log the full message.
pub fn content_preview(content: &str) -> String {
    const PREVIEW_CHARS: usize = 64;
    content.chars().take(PREVIEW_CHARS).collect()
}
