use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApplicationLock::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ApplicationLock::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ApplicationLock::LockName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApplicationLock::AcquiredAtUtc)
                            .date_time()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Deliberately non-unique: duplicate rows for one lock_name appear
        // mid-protocol and are resolved by the coordinator, not the schema.
        manager
            .create_index(
                Index::create()
                    .name("idx_application_lock_lock_name")
                    .table(ApplicationLock::Table)
                    .col(ApplicationLock::LockName)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ApplicationLock::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ApplicationLock {
    Table,
    Id,
    LockName,
    AcquiredAtUtc,
}
