//! Lock coordinator
//!
//! Implements the check/insert/recheck protocol over the shared lock
//! table. The store provides no unique constraint on `lock_name`; the
//! post-insert recheck is what guarantees that of all concurrent
//! acquirers exactly one keeps its record.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::TimeDelta;
use tracing::{debug, warn};
use uuid::Uuid;

use rowlock_common::{AesTokenCodec, CommandTimeout, LockError, OwnerTokenCodec};
use rowlock_persistence::{LockRecord, LockStore, SqlLockStore};

use crate::model::{AcquireOutcome, ReleaseFailure, ReleaseOutcome};
use crate::settings::LockSettings;
use crate::traits::AppLock;

/// Command budget for release and verify, which do not take a
/// caller-supplied timeout.
const RELEASE_COMMAND_TIMEOUT_MILLIS: i32 = 1000;

/// Coordinates named locks over a shared relational store.
///
/// Exclusion is delegated entirely to the store: no in-process locking,
/// no retries, no polling. Each operation performs a bounded number of
/// store calls and reports busy/mismatch outcomes as values.
pub struct LockCoordinator {
    store: Arc<dyn LockStore>,
    codec: Arc<dyn OwnerTokenCodec>,
}

impl LockCoordinator {
    /// Wire a coordinator from explicit collaborators.
    pub fn new(store: Arc<dyn LockStore>, codec: Arc<dyn OwnerTokenCodec>) -> Self {
        LockCoordinator { store, codec }
    }

    /// Build the production wiring (SQL store + AES token codec) from
    /// settings. No global registry is involved.
    pub fn from_settings(settings: &LockSettings) -> anyhow::Result<Self> {
        let codec = AesTokenCodec::from_base64(&settings.token_key, &settings.token_nonce)?;
        let store = SqlLockStore::from_url(settings.db_url.clone());
        Ok(LockCoordinator::new(Arc::new(store), Arc::new(codec)))
    }
}

#[async_trait]
impl AppLock for LockCoordinator {
    async fn try_acquire(
        &self,
        lock_name: &str,
        timeout: TimeDelta,
    ) -> Result<AcquireOutcome, LockError> {
        // Validate the timeout before any store access.
        let budget = CommandTimeout::from_acquire_timeout(timeout)?;

        if self.store.count_by_name(lock_name, budget).await? > 0 {
            debug!(lock_name = %lock_name, "lock busy");
            return Ok(AcquireOutcome::Busy);
        }

        let id = Uuid::new_v4();
        let status = self
            .store
            .insert(LockRecord::new(id, lock_name), budget)
            .await?;
        if !status.accepted() {
            debug!(lock_name = %lock_name, code = status.code(), "lock insert rejected");
            return Ok(AcquireOutcome::Busy);
        }

        let owner = self.codec.encode(id)?;

        // Race resolution: a concurrent acquirer may have inserted between
        // our existence check and our insert. Whoever still sees more than
        // one record loses and evicts its own row.
        if self.store.count_by_name(lock_name, budget).await? > 1 {
            warn!(lock_name = %lock_name, "lost acquisition race, evicting own record");
            let _ = self.release_lock(lock_name, owner.as_str()).await;
            return Ok(AcquireOutcome::Busy);
        }

        debug!(lock_name = %lock_name, "lock acquired");
        Ok(AcquireOutcome::Acquired(owner))
    }

    async fn release_lock(
        &self,
        lock_name: &str,
        lock_owner: &str,
    ) -> Result<ReleaseOutcome, LockError> {
        let id = self.codec.decode(lock_owner)?;
        let budget = CommandTimeout::from_millis(RELEASE_COMMAND_TIMEOUT_MILLIS);

        if self.store.count_by_owner(lock_name, id, budget).await? == 0 {
            debug!(lock_name = %lock_name, "release refused, owner not matching");
            return Ok(ReleaseOutcome::Failed(ReleaseFailure::OwnerNotMatching));
        }

        let status = self.store.delete(lock_name, id, budget).await?;
        if status.accepted() {
            debug!(lock_name = %lock_name, "lock released");
            Ok(ReleaseOutcome::Released)
        } else {
            warn!(lock_name = %lock_name, code = status.code(), "lock delete rejected");
            Ok(ReleaseOutcome::Failed(ReleaseFailure::ReleaseError))
        }
    }

    async fn verify_lock_ownership(
        &self,
        lock_name: &str,
        lock_owner: &str,
    ) -> Result<bool, LockError> {
        let id = self.codec.decode(lock_owner)?;
        let budget = CommandTimeout::from_millis(RELEASE_COMMAND_TIMEOUT_MILLIS);
        Ok(self.store.count_by_owner(lock_name, id, budget).await? > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rowlock_persistence::StoreStatus;

    use super::*;

    /// In-memory stand-in for the SQL store, with switches to drive the
    /// rejection and race paths deterministically.
    #[derive(Default)]
    struct MemoryLockStore {
        records: Mutex<Vec<LockRecord>>,
        calls: AtomicUsize,
        reject_inserts: bool,
        reject_deletes: bool,
        /// Simulate a concurrent acquirer committing its insert inside our
        /// race window: a rival record appears together with ours.
        rival_on_insert: bool,
    }

    impl MemoryLockStore {
        fn with_record(lock_name: &str) -> (Self, Uuid) {
            let id = Uuid::new_v4();
            let store = MemoryLockStore::default();
            store
                .records
                .lock()
                .unwrap()
                .push(LockRecord::new(id, lock_name));
            (store, id)
        }

        fn store_calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn record_count(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LockStore for MemoryLockStore {
        async fn count_by_name(
            &self,
            lock_name: &str,
            _timeout: CommandTimeout,
        ) -> Result<u64, LockError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let records = self.records.lock().unwrap();
            Ok(records.iter().filter(|r| r.lock_name == lock_name).count() as u64)
        }

        async fn count_by_owner(
            &self,
            lock_name: &str,
            id: Uuid,
            _timeout: CommandTimeout,
        ) -> Result<u64, LockError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let records = self.records.lock().unwrap();
            Ok(records
                .iter()
                .filter(|r| r.lock_name == lock_name && r.id == id)
                .count() as u64)
        }

        async fn insert(
            &self,
            record: LockRecord,
            _timeout: CommandTimeout,
        ) -> Result<StoreStatus, LockError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject_inserts {
                return Ok(StoreStatus::REJECTED);
            }
            let lock_name = record.lock_name.clone();
            let mut records = self.records.lock().unwrap();
            records.push(record);
            if self.rival_on_insert {
                records.push(LockRecord::new(Uuid::new_v4(), lock_name));
            }
            Ok(StoreStatus::ACCEPTED)
        }

        async fn delete(
            &self,
            lock_name: &str,
            id: Uuid,
            _timeout: CommandTimeout,
        ) -> Result<StoreStatus, LockError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.reject_deletes {
                return Ok(StoreStatus::REJECTED);
            }
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| !(r.lock_name == lock_name && r.id == id));
            Ok(StoreStatus::from_rows_affected((before - records.len()) as u64))
        }
    }

    fn test_codec() -> Arc<AesTokenCodec> {
        let key = AesTokenCodec::generate_base64_key();
        let nonce = AesTokenCodec::generate_base64_nonce();
        Arc::new(AesTokenCodec::from_base64(&key, &nonce).unwrap())
    }

    fn coordinator(store: Arc<MemoryLockStore>) -> LockCoordinator {
        LockCoordinator::new(store, test_codec())
    }

    #[tokio::test]
    async fn test_acquire_verify_release_lifecycle() {
        let store = Arc::new(MemoryLockStore::default());
        let lock = coordinator(store.clone());

        let outcome = lock
            .try_acquire("jobs/nightly", TimeDelta::zero())
            .await
            .unwrap();
        let token = outcome.owner().expect("lock should be acquired").clone();
        assert_eq!(store.record_count(), 1);

        assert!(
            lock.verify_lock_ownership("jobs/nightly", token.as_str())
                .await
                .unwrap()
        );

        let released = lock
            .release_lock("jobs/nightly", token.as_str())
            .await
            .unwrap();
        assert!(released.is_released());
        assert_eq!(store.record_count(), 0);

        assert!(
            !lock
                .verify_lock_ownership("jobs/nightly", token.as_str())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_acquire_busy_when_already_held() {
        let (store, _) = MemoryLockStore::with_record("jobs/nightly");
        let store = Arc::new(store);
        let lock = coordinator(store.clone());

        let outcome = lock
            .try_acquire("jobs/nightly", TimeDelta::zero())
            .await
            .unwrap();
        assert_eq!(outcome, AcquireOutcome::Busy);
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn test_release_makes_lock_acquirable_again() {
        let store = Arc::new(MemoryLockStore::default());
        let lock = coordinator(store.clone());

        let first = lock
            .try_acquire("jobs/nightly", TimeDelta::zero())
            .await
            .unwrap();
        let token = first.owner().unwrap().clone();
        lock.release_lock("jobs/nightly", token.as_str())
            .await
            .unwrap();

        let second = lock
            .try_acquire("jobs/nightly", TimeDelta::zero())
            .await
            .unwrap();
        assert!(second.is_acquired());
    }

    #[tokio::test]
    async fn test_invalid_timeout_fails_without_store_access() {
        let store = Arc::new(MemoryLockStore::default());
        let lock = coordinator(store.clone());

        let result = lock
            .try_acquire("jobs/nightly", TimeDelta::milliseconds(-2))
            .await;
        assert!(matches!(result, Err(LockError::TimeoutOutOfRange(-2))));
        assert_eq!(store.store_calls(), 0);
    }

    #[tokio::test]
    async fn test_infinite_timeout_is_valid() {
        let store = Arc::new(MemoryLockStore::default());
        let lock = coordinator(store);

        let outcome = lock
            .try_acquire("jobs/nightly", TimeDelta::milliseconds(-1))
            .await
            .unwrap();
        assert!(outcome.is_acquired());
    }

    #[tokio::test]
    async fn test_rejected_insert_reports_busy() {
        let store = Arc::new(MemoryLockStore {
            reject_inserts: true,
            ..Default::default()
        });
        let lock = coordinator(store.clone());

        let outcome = lock
            .try_acquire("jobs/nightly", TimeDelta::zero())
            .await
            .unwrap();
        assert_eq!(outcome, AcquireOutcome::Busy);
        assert_eq!(store.record_count(), 0);
    }

    #[tokio::test]
    async fn test_race_loser_self_evicts() {
        let store = Arc::new(MemoryLockStore {
            rival_on_insert: true,
            ..Default::default()
        });
        let lock = coordinator(store.clone());

        let outcome = lock
            .try_acquire("jobs/nightly", TimeDelta::zero())
            .await
            .unwrap();
        assert_eq!(outcome, AcquireOutcome::Busy);
        // Only the rival's record survives; our own row was evicted.
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn test_race_winner_keeps_sole_record() {
        // The winner's recheck sees exactly its own record.
        let store = Arc::new(MemoryLockStore::default());
        let lock = coordinator(store.clone());

        let outcome = lock
            .try_acquire("jobs/nightly", TimeDelta::zero())
            .await
            .unwrap();
        let token = outcome.owner().unwrap();
        assert_eq!(store.record_count(), 1);
        assert!(
            lock.verify_lock_ownership("jobs/nightly", token.as_str())
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_release_with_foreign_token_leaves_record_untouched() {
        let store = Arc::new(MemoryLockStore::default());
        let lock = coordinator(store.clone());

        let outcome = lock
            .try_acquire("jobs/nightly", TimeDelta::zero())
            .await
            .unwrap();
        assert!(outcome.is_acquired());

        // A token issued for a different name never matches this record.
        let other = lock
            .try_acquire("jobs/weekly", TimeDelta::zero())
            .await
            .unwrap();
        let foreign = other.owner().unwrap();

        let released = lock
            .release_lock("jobs/nightly", foreign.as_str())
            .await
            .unwrap();
        assert_eq!(
            released,
            ReleaseOutcome::Failed(ReleaseFailure::OwnerNotMatching)
        );
        assert_eq!(store.record_count(), 2);
    }

    #[tokio::test]
    async fn test_rejected_delete_reports_release_error() {
        let lock_name = "jobs/nightly";
        let (store, id) = MemoryLockStore::with_record(lock_name);
        let store = Arc::new(MemoryLockStore {
            reject_deletes: true,
            records: Mutex::new(store.records.into_inner().unwrap()),
            ..Default::default()
        });
        let codec = test_codec();
        let lock = LockCoordinator::new(store.clone(), codec.clone());

        let token = codec.encode(id).unwrap();
        let released = lock.release_lock(lock_name, token.as_str()).await.unwrap();
        assert_eq!(released, ReleaseOutcome::Failed(ReleaseFailure::ReleaseError));
        assert_eq!(store.record_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_token_propagates_decode_error() {
        let store = Arc::new(MemoryLockStore::default());
        let lock = coordinator(store);

        let result = lock.release_lock("jobs/nightly", "not-a-token").await;
        assert!(matches!(result, Err(LockError::Decode(_))));
    }

    #[tokio::test]
    async fn test_token_never_exposes_raw_identifier() {
        let (store, id) = MemoryLockStore::with_record("jobs/nightly");
        let _ = store;
        let codec = test_codec();
        let token = codec.encode(id).unwrap();
        assert!(!token.as_str().contains(&id.to_string()));
    }
}
