//! In-process quota store backed by a concurrent map.
//!
//! Suitable for a single service instance. Deployments running several
//! instances need a store implementation backed by shared storage with
//! a native conditional-write primitive; the trait contract is the
//! same either way.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;

use crate::quota::store::{QuotaStore, QuotaUsage, RateLimitRecord, StoreError};

type QuotaKey = (String, NaiveDate);

/// Keyed counters held in a sharded concurrent map. The entry guard
/// holds the shard lock for the duration of the read-check-write, which
/// makes the increment atomic per key without a map-wide lock.
#[derive(Default)]
pub struct InMemoryQuotaStore {
    records: DashMap<QuotaKey, RateLimitRecord>,
}

impl InMemoryQuotaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records, across all dates.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop records older than `cutoff`. Retention housekeeping only;
    /// correctness never depends on it since past dates are never
    /// consulted again.
    pub fn prune_before(&self, cutoff: NaiveDate) -> usize {
        let before = self.records.len();
        self.records.retain(|(_, date), _| *date >= cutoff);
        before - self.records.len()
    }
}

#[async_trait]
impl QuotaStore for InMemoryQuotaStore {
    async fn try_increment(
        &self,
        identifier: &str,
        date: NaiveDate,
        limit: u32,
    ) -> Result<QuotaUsage, StoreError> {
        let mut entry = self
            .records
            .entry((identifier.to_string(), date))
            .or_insert(RateLimitRecord {
                request_count: 0,
                last_request_at: Utc::now(),
            });

        if entry.request_count < limit {
            entry.request_count += 1;
            entry.last_request_at = Utc::now();
            Ok(QuotaUsage {
                allowed: true,
                used: entry.request_count,
            })
        } else {
            Ok(QuotaUsage {
                allowed: false,
                used: entry.request_count,
            })
        }
    }

    async fn usage(&self, identifier: &str, date: NaiveDate) -> Result<u32, StoreError> {
        Ok(self
            .records
            .get(&(identifier.to_string(), date))
            .map(|r| r.request_count)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_counts_up_to_limit_then_denies() {
        let store = InMemoryQuotaStore::new();
        let d = day("2025-06-01");

        for expected in 1..=3 {
            let usage = store.try_increment("s1", d, 3).await.unwrap();
            assert!(usage.allowed);
            assert_eq!(usage.used, expected);
        }

        let usage = store.try_increment("s1", d, 3).await.unwrap();
        assert!(!usage.allowed);
        assert_eq!(usage.used, 3, "denied request must not change the count");
        assert_eq!(store.usage("s1", d).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_identifiers_are_independent() {
        let store = InMemoryQuotaStore::new();
        let d = day("2025-06-01");

        store.try_increment("s1", d, 1).await.unwrap();
        let usage = store.try_increment("s2", d, 1).await.unwrap();
        assert!(usage.allowed);
        assert_eq!(usage.used, 1);
    }

    #[tokio::test]
    async fn test_new_date_starts_fresh() {
        let store = InMemoryQuotaStore::new();
        let d1 = day("2025-06-01");
        let d2 = day("2025-06-02");

        for _ in 0..2 {
            store.try_increment("s1", d1, 2).await.unwrap();
        }
        assert!(!store.try_increment("s1", d1, 2).await.unwrap().allowed);

        assert_eq!(store.usage("s1", d2).await.unwrap(), 0);
        let usage = store.try_increment("s1", d2, 2).await.unwrap();
        assert!(usage.allowed);
        assert_eq!(usage.used, 1);
    }

    #[tokio::test]
    async fn test_zero_limit_denies_first_request() {
        let store = InMemoryQuotaStore::new();
        let usage = store
            .try_increment("s1", day("2025-06-01"), 0)
            .await
            .unwrap();
        assert!(!usage.allowed);
        assert_eq!(usage.used, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_burst_admits_exactly_limit() {
        let store = Arc::new(InMemoryQuotaStore::new());
        let d = day("2025-06-01");
        let limit = 20u32;
        let requests = 50usize;

        let mut handles = Vec::with_capacity(requests);
        for _ in 0..requests {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.try_increment("s1", d, limit).await.unwrap().allowed
            }));
        }

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, limit);
        assert_eq!(store.usage("s1", d).await.unwrap(), limit);
    }

    #[tokio::test]
    async fn test_prune_before_drops_only_old_records() {
        let store = InMemoryQuotaStore::new();
        store.try_increment("s1", day("2025-05-01"), 5).await.unwrap();
        store.try_increment("s1", day("2025-06-01"), 5).await.unwrap();

        let dropped = store.prune_before(day("2025-05-15"));
        assert_eq!(dropped, 1);
        assert_eq!(store.usage("s1", day("2025-06-01")).await.unwrap(), 1);
    }
}
