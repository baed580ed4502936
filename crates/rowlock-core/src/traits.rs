//! Application lock contract
//!
//! The surface consumed by callers (and by any external retry/polling
//! wrapper that turns single-shot attempts into a bounded wait). A single
//! concrete implementation exists: `LockCoordinator`.

use async_trait::async_trait;
use chrono::TimeDelta;

use rowlock_common::LockError;

use crate::model::{AcquireOutcome, ReleaseOutcome};

/// Named mutual exclusion backed by the shared store.
#[async_trait]
pub trait AppLock: Send + Sync {
    /// Attempt to take the named lock once.
    ///
    /// `timeout` bounds only the underlying store commands; the call never
    /// retries or polls. Valid values are `-1` ms (no timeout) up to
    /// `i32::MAX` ms; anything else fails with
    /// `LockError::TimeoutOutOfRange` before the store is touched.
    async fn try_acquire(
        &self,
        lock_name: &str,
        timeout: TimeDelta,
    ) -> Result<AcquireOutcome, LockError>;

    /// Release a held lock, proving ownership with the token issued at
    /// acquisition.
    async fn release_lock(
        &self,
        lock_name: &str,
        lock_owner: &str,
    ) -> Result<ReleaseOutcome, LockError>;

    /// Whether the token still owns a live record for the name. Read-only.
    async fn verify_lock_ownership(
        &self,
        lock_name: &str,
        lock_owner: &str,
    ) -> Result<bool, LockError>;
}
