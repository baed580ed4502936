//! Lock operation outcomes
//!
//! Expected protocol results (lock busy, owner mismatch, rejected delete)
//! are values, never errors; `LockError` is reserved for environmental
//! failures.

use serde::{Deserialize, Serialize};

use rowlock_common::OwnerToken;

/// Result of a single-shot acquisition attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AcquireOutcome {
    /// The lock was taken; the token is the caller's proof of ownership.
    Acquired(OwnerToken),
    /// The lock is held by another owner, or this attempt lost the
    /// post-insert race.
    Busy,
}

impl AcquireOutcome {
    pub fn is_acquired(&self) -> bool {
        matches!(self, AcquireOutcome::Acquired(_))
    }

    /// The owner token, if the lock was taken.
    pub fn owner(&self) -> Option<&OwnerToken> {
        match self {
            AcquireOutcome::Acquired(token) => Some(token),
            AcquireOutcome::Busy => None,
        }
    }
}

/// Why a release attempt did not take effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseFailure {
    /// No record matches the lock name and the decoded owner id.
    OwnerNotMatching,
    /// A matching record exists but the delete was not accepted.
    ReleaseError,
}

/// Result of a release attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseOutcome {
    Released,
    Failed(ReleaseFailure),
}

impl ReleaseOutcome {
    pub fn is_released(&self) -> bool {
        matches!(self, ReleaseOutcome::Released)
    }
}
