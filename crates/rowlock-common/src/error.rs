//! Error types for Rowlock
//!
//! This module defines:
//! - `LockError`: failures surfaced to callers of the lock protocol
//! - Expected protocol outcomes (lock busy, owner mismatch) are *not*
//!   errors; they are reported through result values by `rowlock-core`.

use std::time::Duration;

use crate::crypto::CryptoError;

/// Failures surfaced by lock-protocol operations.
///
/// Environmental failures (bad connection, store unavailable, command
/// timeout) are reported here; protocol-level outcomes such as "lock busy"
/// or "owner not matching" are plain result values.
#[derive(thiserror::Error, Debug)]
pub enum LockError {
    /// Caller-supplied acquisition timeout outside `[-1, i32::MAX]` ms.
    #[error("timeout of {0}ms is outside the valid range [-1, {max}]", max = i32::MAX)]
    TimeoutOutOfRange(i64),

    /// An externally supplied store connection is absent or not open.
    #[error("connection state error: {0}")]
    ConnectionState(String),

    /// The owner token could not be decoded into a lock identifier.
    #[error("owner token decode error: {0}")]
    Decode(#[from] CryptoError),

    /// The store command did not complete within its timeout budget.
    #[error("store command timed out after {0:?}")]
    CommandTimeout(Duration),

    /// Any underlying store failure, propagated unmodified.
    ///
    /// The original error (e.g. a SeaORM `DbErr`) remains downcastable
    /// through the `anyhow` chain.
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl LockError {
    /// Downcast the underlying store error, if this is a `Store` variant.
    pub fn store_cause<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        match self {
            LockError::Store(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}
