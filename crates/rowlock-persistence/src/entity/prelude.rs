//! `SeaORM` entity prelude

pub use super::application_lock::Entity as ApplicationLock;
