//! Rowlock Persistence - Lock table entity and SQL-backed lock store
//!
//! This crate provides:
//! - The SeaORM entity for the `application_lock` table
//! - The `LockStore` trait the coordinator depends on
//! - The SQL backend with scoped connection handling

pub mod entity;
pub mod model;
pub mod sql;
pub mod traits;

// Re-export sea-orm for convenience
pub use sea_orm;

// Re-export entity prelude
pub use entity::prelude::*;

// Re-export the store abstraction and its SQL backend
pub use model::{LockRecord, StoreStatus};
pub use sql::SqlLockStore;
pub use traits::LockStore;
