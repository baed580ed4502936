//! Domain model types for the lock store abstraction
//!
//! These types are used across the `LockStore` trait boundary, decoupled
//! from the SeaORM entity of the SQL backend.

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted named-lock row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Fresh per acquisition attempt, never reused.
    pub id: Uuid,
    pub lock_name: String,
    pub acquired_at_utc: NaiveDateTime,
}

impl LockRecord {
    /// Build a record for a new acquisition attempt, stamped with the
    /// current UTC time.
    pub fn new(id: Uuid, lock_name: impl Into<String>) -> Self {
        LockRecord {
            id,
            lock_name: lock_name.into(),
            acquired_at_utc: Utc::now().naive_utc(),
        }
    }
}

/// Status code returned by mutating store operations.
///
/// Zero means the mutation was accepted and applied to exactly one row;
/// any other value means it did not take effect (for example a
/// server-side rejection that suppressed the row without raising an
/// error).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus(i32);

impl StoreStatus {
    /// The mutation was applied.
    pub const ACCEPTED: StoreStatus = StoreStatus(0);

    /// The mutation did not take effect.
    pub const REJECTED: StoreStatus = StoreStatus(1);

    /// Derive the status from the number of rows a statement affected.
    pub fn from_rows_affected(rows: u64) -> Self {
        if rows == 1 {
            StoreStatus::ACCEPTED
        } else {
            StoreStatus::REJECTED
        }
    }

    pub fn accepted(self) -> bool {
        self.0 == 0
    }

    pub fn code(self) -> i32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_rows_affected() {
        assert!(StoreStatus::from_rows_affected(1).accepted());
        assert!(!StoreStatus::from_rows_affected(0).accepted());
        assert!(!StoreStatus::from_rows_affected(2).accepted());
    }

    #[test]
    fn test_accepted_code_is_zero() {
        assert_eq!(StoreStatus::ACCEPTED.code(), 0);
        assert_ne!(StoreStatus::REJECTED.code(), 0);
    }

    #[test]
    fn test_new_record_carries_name_and_id() {
        let id = Uuid::new_v4();
        let record = LockRecord::new(id, "jobs/rebuild-index");
        assert_eq!(record.id, id);
        assert_eq!(record.lock_name, "jobs/rebuild-index");
    }
}
