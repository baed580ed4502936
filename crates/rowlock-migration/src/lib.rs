//! Rowlock Migration - schema for the shared lock table

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_application_lock;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m20250101_000001_create_application_lock::Migration,
        )]
    }
}
