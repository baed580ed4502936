//! Lock store abstraction
//!
//! The coordinator talks to storage exclusively through `LockStore`. A
//! single concrete implementation exists (`SqlLockStore`); the trait is the
//! seam for constructor injection and for test doubles.

use async_trait::async_trait;
use uuid::Uuid;

use rowlock_common::{CommandTimeout, LockError};

use crate::model::{LockRecord, StoreStatus};

/// Parameterized operations against the shared lock table.
///
/// Every operation acquires a scoped connection, executes exactly one
/// statement under the given command-timeout budget, and releases the
/// connection on every exit path.
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Number of records currently persisted for `lock_name`.
    async fn count_by_name(
        &self,
        lock_name: &str,
        timeout: CommandTimeout,
    ) -> Result<u64, LockError>;

    /// Number of records matching both `lock_name` and a decoded owner id.
    async fn count_by_owner(
        &self,
        lock_name: &str,
        id: Uuid,
        timeout: CommandTimeout,
    ) -> Result<u64, LockError>;

    /// Insert a new lock record, reporting whether the insert took effect.
    async fn insert(
        &self,
        record: LockRecord,
        timeout: CommandTimeout,
    ) -> Result<StoreStatus, LockError>;

    /// Delete the record matching `lock_name` and `id`, reporting whether
    /// the delete took effect.
    async fn delete(
        &self,
        lock_name: &str,
        id: Uuid,
        timeout: CommandTimeout,
    ) -> Result<StoreStatus, LockError>;
}
