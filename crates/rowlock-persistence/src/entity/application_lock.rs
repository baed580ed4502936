//! `SeaORM` Entity for the application_lock table
//!
//! One row per currently-held (or about-to-be-resolved) named lock.
//! `lock_name` deliberately carries no unique constraint; duplicate rows
//! are resolved by the coordination protocol, not by the schema.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "application_lock")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub lock_name: String,
    pub acquired_at_utc: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
