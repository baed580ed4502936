//! `SeaORM` entity definitions

pub mod prelude;

pub mod application_lock;
