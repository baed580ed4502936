//! Rowlock Core - Lock coordination protocol
//!
//! Mutual exclusion across independent process instances, arbitrated by a
//! shared relational store. This crate provides:
//! - The `AppLock` contract (`try_acquire` / `release_lock` /
//!   `verify_lock_ownership`)
//! - `LockCoordinator`, the check/insert/recheck protocol implementation
//! - Configuration wiring (`LockSettings`, `ConfigProvider`)
//!
//! The coordinator never blocks or retries; turning single-shot attempts
//! into a bounded wait is the job of an external wrapper.

pub mod coordinator;
pub mod model;
pub mod settings;
pub mod traits;

// Re-exports for convenience
pub use coordinator::LockCoordinator;
pub use model::{AcquireOutcome, ReleaseFailure, ReleaseOutcome};
pub use settings::{ConfigProvider, FileConfigProvider, LockSettings};
pub use traits::AppLock;

pub use rowlock_common::{LockError, MAX_LOCK_NAME_LEN, OwnerToken, to_safe_lock_name};
