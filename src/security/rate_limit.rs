//! Per-identifier daily quota enforcement.
//!
//! # Responsibilities
//! - Apply a daily request limit against the quota store
//! - Bound every store operation with a tight timeout, retrying once
//! - Fail closed when the store stays unreachable
//!
//! # Design Decisions
//! - Day keys are UTC calendar dates, applied uniformly; mixing local
//!   and UTC dates across instances would break the daily boundary
//! - Day rollover is implicit: a new date key hits the "no record"
//!   branch of the store, no reset job involved
//! - Quota consumption is tied to admission, not response delivery: an
//!   increment is never rolled back if the client disconnects before
//!   the response is sent

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::config::QuotaStoreConfig;
use crate::observability::metrics;
use crate::quota::{QuotaStore, QuotaUsage, StoreError};

/// Why a quota check denied a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialCause {
    /// The daily limit is spent. Expected, user-facing.
    Exceeded,
    /// The store could not answer in time. Infrastructure fault,
    /// fail-closed.
    StoreUnavailable,
}

/// Outcome of one quota check. `used` and `remaining` are always
/// populated, including on denial, so callers can report quota state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub used: u32,
    pub remaining: u32,
    pub denial: Option<DenialCause>,
}

impl RateLimitDecision {
    fn from_usage(usage: QuotaUsage, limit: u32) -> Self {
        Self {
            allowed: usage.allowed,
            limit,
            used: usage.used,
            remaining: limit.saturating_sub(usage.used),
            denial: if usage.allowed {
                None
            } else {
                Some(DenialCause::Exceeded)
            },
        }
    }

    /// Fail-closed decision used when the store cannot be consulted.
    /// The true count is unknown, so the quota is reported as spent.
    fn store_unavailable(limit: u32) -> Self {
        Self {
            allowed: false,
            limit,
            used: limit,
            remaining: 0,
            denial: Some(DenialCause::StoreUnavailable),
        }
    }
}

/// Applies a daily quota policy against a [`QuotaStore`] for one
/// identifier at a time. The store's conditional increment carries the
/// atomicity; this type adds the date policy, the timeout budget, and
/// the fail-closed behavior.
pub struct RateLimiter {
    store: Arc<dyn QuotaStore>,
    op_timeout: Duration,
    retry_once: bool,
    clock: fn() -> NaiveDate,
}

fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Midnight UTC of the following day, when every daily counter
/// logically resets.
pub fn next_reset_utc() -> DateTime<Utc> {
    let tomorrow = today_utc().succ_opt().unwrap_or_else(today_utc);
    DateTime::from_naive_utc_and_offset(tomorrow.and_time(NaiveTime::MIN), Utc)
}

impl RateLimiter {
    pub fn new(store: Arc<dyn QuotaStore>, config: &QuotaStoreConfig) -> Self {
        Self {
            store,
            op_timeout: Duration::from_millis(config.op_timeout_ms),
            retry_once: config.retry_once,
            clock: today_utc,
        }
    }

    #[cfg(test)]
    fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    /// Check and consume one unit of quota for `identifier`.
    ///
    /// The Nth admitted request, where N equals the limit, is the last
    /// one admitted for the day; the store guarantees no race admits
    /// more. A store that stays unreachable yields a denied decision
    /// rather than a quota bypass.
    pub async fn check_and_increment(
        &self,
        identifier: &str,
        limit_per_day: u32,
    ) -> RateLimitDecision {
        let date = (self.clock)();

        match self.increment_with_retry(identifier, date, limit_per_day).await {
            Ok(usage) => {
                let decision = RateLimitDecision::from_usage(usage, limit_per_day);
                if !decision.allowed {
                    tracing::warn!(
                        identifier = %identifier,
                        limit = limit_per_day,
                        used = decision.used,
                        "Daily quota exhausted"
                    );
                    metrics::record_rate_limited("exceeded");
                }
                decision
            }
            Err(e) => {
                tracing::error!(
                    identifier = %identifier,
                    error = %e,
                    "Quota store unavailable, failing closed"
                );
                metrics::record_rate_limited("store_unavailable");
                RateLimitDecision::store_unavailable(limit_per_day)
            }
        }
    }

    async fn increment_with_retry(
        &self,
        identifier: &str,
        date: NaiveDate,
        limit: u32,
    ) -> Result<QuotaUsage, StoreError> {
        match self.increment_once(identifier, date, limit).await {
            Ok(usage) => Ok(usage),
            Err(e) if self.retry_once => {
                tracing::warn!(
                    identifier = %identifier,
                    error = %e,
                    "Quota store operation failed, retrying once"
                );
                self.increment_once(identifier, date, limit).await
            }
            Err(e) => Err(e),
        }
    }

    async fn increment_once(
        &self,
        identifier: &str,
        date: NaiveDate,
        limit: u32,
    ) -> Result<QuotaUsage, StoreError> {
        tokio::time::timeout(
            self.op_timeout,
            self.store.try_increment(identifier, date, limit),
        )
        .await
        .map_err(|_| StoreError::Timeout(self.op_timeout))?
    }
}
