//! Rowlock Common - Shared types, errors, and the owner-token codec
//!
//! This crate provides the foundational pieces used across all Rowlock
//! components:
//! - Error types for the lock protocol
//! - The owner-token codec (reversible identifier obfuscation)
//! - Acquisition-timeout normalization
//! - Lock-name utilities

pub mod crypto;
pub mod error;
pub mod timeout;
pub mod utils;

// Re-exports for convenience
pub use crypto::{AesTokenCodec, CryptoError, OwnerTokenCodec};
pub use error::LockError;
pub use timeout::{CommandTimeout, INFINITE_TIMEOUT_MILLIS, to_i32_timeout};
pub use utils::{MAX_LOCK_NAME_LEN, to_safe_lock_name};

use serde::{Deserialize, Serialize};

/// Opaque, reversibly encoded proof of lock ownership.
///
/// Issued by a successful acquisition; presented back to release and
/// verify operations. The raw record identifier never leaves the core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerToken(String);

impl OwnerToken {
    pub fn new(encoded: impl Into<String>) -> Self {
        OwnerToken(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for OwnerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OwnerToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
