//! The validate → rate-limit → forward pipeline.

use std::sync::Arc;

use crate::config::AdmissionConfig;
use crate::observability::metrics;
use crate::quota::QuotaStore;
use crate::security::validation::content_preview;
use crate::security::{
    RateLimitDecision, RateLimiter, RequestValidator, ValidationPolicy, ValidationResult,
};

/// Caller role, selecting which daily limit applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Anonymous caller on the public endpoint.
    Public,
    /// Authenticated student.
    Student,
    /// Administrative caller; no quota.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Public => "public",
            Role::Student => "student",
            Role::Admin => "admin",
        }
    }

    /// Daily limit for this role, `None` meaning unlimited.
    fn daily_limit(&self, config: &AdmissionConfig) -> Option<u32> {
        match self {
            Role::Public => Some(config.daily_request_limit),
            Role::Student => Some(config.student_daily_limit),
            Role::Admin => None,
        }
    }
}

/// Structured rejection code. Only these two values (plus the quota
/// numbers on the second) are ever echoed to clients; the validator's
/// detailed reason stays in server-side logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionCode {
    InvalidInput,
    RateLimitExceeded,
}

/// A terminal pipeline result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub code: RejectionCode,
    /// Quota state at rejection time, present for quota denials so the
    /// client can display limit/used/remaining.
    pub quota: Option<RateLimitDecision>,
}

/// Outcome of one admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionOutcome {
    /// Both stages passed; forward the original, unmodified message.
    /// `quota` is `None` for unlimited roles.
    Admitted { quota: Option<RateLimitDecision> },
    Rejected(Rejection),
}

/// Orchestrates the fixed stage order, short-circuiting on the first
/// rejection. Owns the request only for the duration of admission; the
/// downstream chat call belongs to the caller.
pub struct AdmissionPipeline {
    validator: RequestValidator,
    limiter: RateLimiter,
    config: AdmissionConfig,
}

impl AdmissionPipeline {
    pub fn new(
        config: AdmissionConfig,
        quota_config: &crate::config::QuotaStoreConfig,
        store: Arc<dyn QuotaStore>,
    ) -> Self {
        let policy =
            ValidationPolicy::new(config.max_message_length, config.max_session_id_length);
        Self {
            validator: RequestValidator::new(policy),
            limiter: RateLimiter::new(store, quota_config),
            config,
        }
    }

    /// Run the admission stages for one request.
    ///
    /// The quota counter moves at most once per call, and only after
    /// validation has passed, so a rejected message never consumes
    /// quota.
    pub async fn admit(&self, message: &str, session_id: &str, role: Role) -> AdmissionOutcome {
        // Stage 1: validation. Pure and synchronous; no store traffic.
        if let ValidationResult::Reject(reason) = self.validator.validate(message, session_id) {
            tracing::warn!(
                session = %content_preview(session_id),
                reason = reason.as_str(),
                preview = %content_preview(message),
                "Request rejected by validator"
            );
            metrics::record_rejected_input(reason.as_str());
            return AdmissionOutcome::Rejected(Rejection {
                code: RejectionCode::InvalidInput,
                quota: None,
            });
        }

        // Stage 2: quota. Unlimited roles skip the store entirely.
        let quota = match role.daily_limit(&self.config) {
            None => None,
            Some(limit) => {
                let decision = self.limiter.check_and_increment(session_id, limit).await;
                if !decision.allowed {
                    return AdmissionOutcome::Rejected(Rejection {
                        code: RejectionCode::RateLimitExceeded,
                        quota: Some(decision),
                    });
                }
                Some(decision)
            }
        };

        metrics::record_admission(role.as_str());
        AdmissionOutcome::Admitted { quota }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuotaStoreConfig;
    use crate::quota::InMemoryQuotaStore;
    use chrono::Utc;

    fn pipeline_with(store: Arc<InMemoryQuotaStore>, limit: u32) -> AdmissionPipeline {
        let config = AdmissionConfig {
            daily_request_limit: limit,
            ..AdmissionConfig::default()
        };
        AdmissionPipeline::new(config, &QuotaStoreConfig::default(), store)
    }

    #[tokio::test]
    async fn test_rejected_input_never_touches_quota() {
        let store = Arc::new(InMemoryQuotaStore::new());
        let pipeline = pipeline_with(store.clone(), 20);

        let outcome = pipeline
            .admit("<script>alert(1)</script>", "s1", Role::Public)
            .await;
        assert_eq!(
            outcome,
            AdmissionOutcome::Rejected(Rejection {
                code: RejectionCode::InvalidInput,
                quota: None,
            })
        );
        assert_eq!(
            store.usage("s1", Utc::now().date_naive()).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_admit_consumes_exactly_one_unit() {
        let store = Arc::new(InMemoryQuotaStore::new());
        let pipeline = pipeline_with(store.clone(), 20);

        let outcome = pipeline.admit("hello", "s1", Role::Public).await;
        match outcome {
            AdmissionOutcome::Admitted { quota: Some(d) } => {
                assert_eq!(d.used, 1);
                assert_eq!(d.remaining, 19);
            }
            other => panic!("expected admission, got {other:?}"),
        }
        assert_eq!(
            store.usage("s1", Utc::now().date_naive()).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_quota_denial_carries_decision() {
        let store = Arc::new(InMemoryQuotaStore::new());
        let pipeline = pipeline_with(store, 1);

        pipeline.admit("first", "s1", Role::Public).await;
        let outcome = pipeline.admit("second", "s1", Role::Public).await;

        match outcome {
            AdmissionOutcome::Rejected(rejection) => {
                assert_eq!(rejection.code, RejectionCode::RateLimitExceeded);
                let quota = rejection.quota.unwrap();
                assert_eq!(quota.limit, 1);
                assert_eq!(quota.used, 1);
                assert_eq!(quota.remaining, 0);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_admin_is_unlimited_and_skips_store() {
        let store = Arc::new(InMemoryQuotaStore::new());
        let pipeline = pipeline_with(store.clone(), 1);

        for _ in 0..5 {
            let outcome = pipeline.admit("hello", "admin-1", Role::Admin).await;
            assert_eq!(outcome, AdmissionOutcome::Admitted { quota: None });
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_student_uses_student_limit() {
        let store = Arc::new(InMemoryQuotaStore::new());
        let config = AdmissionConfig {
            daily_request_limit: 1,
            student_daily_limit: 3,
            ..AdmissionConfig::default()
        };
        let pipeline = AdmissionPipeline::new(config, &QuotaStoreConfig::default(), store);

        for _ in 0..3 {
            let outcome = pipeline.admit("hi", "stud-1", Role::Student).await;
            assert!(matches!(outcome, AdmissionOutcome::Admitted { .. }));
        }
        let outcome = pipeline.admit("hi", "stud-1", Role::Student).await;
        assert!(matches!(
            outcome,
            AdmissionOutcome::Rejected(Rejection {
                code: RejectionCode::RateLimitExceeded,
                ..
            })
        ));
    }
}
