//! Durable keyed counter abstraction behind the rate limiter.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// The persisted counter for one `(identifier, date)` key.
///
/// At most one live record exists per key. `request_count` is
/// monotonically non-decreasing within a date and never exceeds the
/// configured limit; a new date simply produces a new record, which is
/// what resets the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRecord {
    pub request_count: u32,
    pub last_request_at: DateTime<Utc>,
}

/// Result of one conditional increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaUsage {
    /// Whether the increment was applied.
    pub allowed: bool,
    /// The count after the operation. Unchanged when denied.
    pub used: u32,
}

/// Errors surfaced by a quota store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or refused the operation.
    #[error("quota store unavailable: {0}")]
    Unavailable(String),

    /// The operation did not complete within the limiter's budget.
    #[error("quota store operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Keyed counter store consulted and mutated atomically per
/// `(identifier, date)` key.
///
/// Implementations must make `try_increment` a single atomic
/// read-check-write: under concurrent calls for the same key, exactly
/// `limit` increments succeed and no admission is double-counted or
/// lost. The critical section is scoped to the key; operations on
/// unrelated identifiers must not serialize against each other.
#[async_trait]
pub trait QuotaStore: Send + Sync {
    /// Increment the counter for `(identifier, date)` if and only if
    /// it is below `limit`. Creates the record with a count of 1 when
    /// none exists.
    async fn try_increment(
        &self,
        identifier: &str,
        date: NaiveDate,
        limit: u32,
    ) -> Result<QuotaUsage, StoreError>;

    /// Current count for `(identifier, date)`, zero when no record
    /// exists. Never mutates.
    async fn usage(&self, identifier: &str, date: NaiveDate) -> Result<u32, StoreError>;
}
