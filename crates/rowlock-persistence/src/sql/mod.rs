//! SQL-backed lock store (MySQL/PostgreSQL via SeaORM)
//!
//! Implements the `LockStore` trait on top of the `application_lock`
//! table. Each operation runs exactly one statement inside a scoped
//! connection: either one opened from the configured connection URL and
//! dropped when the operation ends, or an externally supplied connection
//! whose lifecycle stays with its owner.

use std::future::Future;

use async_trait::async_trait;
use sea_orm::*;
use uuid::Uuid;

use rowlock_common::{CommandTimeout, LockError};

use crate::entity::application_lock;
use crate::entity::prelude::ApplicationLock;
use crate::model::{LockRecord, StoreStatus};
use crate::traits::LockStore;

/// Where the store obtains its connections from.
enum ConnectionSource {
    /// Open a fresh connection per operation.
    Url(String),
    /// Reuse a connection owned by the caller; never closed here.
    External(DatabaseConnection),
}

/// A connection whose lifetime is bound to a single store operation.
///
/// Owned connections are released when the scope drops, on every exit
/// path. Borrowed connections belong to the caller and are left alone.
enum ScopedConnection<'a> {
    Owned(DatabaseConnection),
    Borrowed(&'a DatabaseConnection),
}

impl ScopedConnection<'_> {
    fn conn(&self) -> &DatabaseConnection {
        match self {
            ScopedConnection::Owned(conn) => conn,
            ScopedConnection::Borrowed(conn) => conn,
        }
    }
}

/// SQL lock store over the shared `application_lock` table.
pub struct SqlLockStore {
    source: ConnectionSource,
}

impl SqlLockStore {
    /// Store that opens a scoped connection per operation from `url`.
    pub fn from_url(url: impl Into<String>) -> Self {
        SqlLockStore {
            source: ConnectionSource::Url(url.into()),
        }
    }

    /// Store that reuses an externally owned connection.
    ///
    /// The connection is health-checked before each operation and is
    /// never closed by the store.
    pub fn with_connection(db: DatabaseConnection) -> Self {
        SqlLockStore {
            source: ConnectionSource::External(db),
        }
    }

    async fn scope(&self) -> Result<ScopedConnection<'_>, LockError> {
        match &self.source {
            ConnectionSource::Url(url) => {
                let conn = Database::connect(url.as_str())
                    .await
                    .map_err(|e| LockError::Store(e.into()))?;
                Ok(ScopedConnection::Owned(conn))
            }
            ConnectionSource::External(db) => {
                db.ping()
                    .await
                    .map_err(|e| LockError::ConnectionState(e.to_string()))?;
                Ok(ScopedConnection::Borrowed(db))
            }
        }
    }
}

/// Run one statement under the command-timeout budget.
async fn with_budget<T, F>(timeout: CommandTimeout, op: F) -> Result<T, LockError>
where
    F: Future<Output = Result<T, DbErr>>,
{
    match timeout.budget() {
        Some(limit) => match tokio::time::timeout(limit, op).await {
            Ok(result) => result.map_err(|e| LockError::Store(e.into())),
            Err(_) => Err(LockError::CommandTimeout(limit)),
        },
        None => op.await.map_err(|e| LockError::Store(e.into())),
    }
}

#[async_trait]
impl LockStore for SqlLockStore {
    async fn count_by_name(
        &self,
        lock_name: &str,
        timeout: CommandTimeout,
    ) -> Result<u64, LockError> {
        let scope = self.scope().await?;
        with_budget(
            timeout,
            ApplicationLock::find()
                .filter(application_lock::Column::LockName.eq(lock_name))
                .count(scope.conn()),
        )
        .await
    }

    async fn count_by_owner(
        &self,
        lock_name: &str,
        id: Uuid,
        timeout: CommandTimeout,
    ) -> Result<u64, LockError> {
        let scope = self.scope().await?;
        with_budget(
            timeout,
            ApplicationLock::find()
                .filter(application_lock::Column::LockName.eq(lock_name))
                .filter(application_lock::Column::Id.eq(id))
                .count(scope.conn()),
        )
        .await
    }

    async fn insert(
        &self,
        record: LockRecord,
        timeout: CommandTimeout,
    ) -> Result<StoreStatus, LockError> {
        let scope = self.scope().await?;
        let row = application_lock::ActiveModel {
            id: Set(record.id),
            lock_name: Set(record.lock_name),
            acquired_at_utc: Set(record.acquired_at_utc),
        };
        let rows = with_budget(
            timeout,
            ApplicationLock::insert(row).exec_without_returning(scope.conn()),
        )
        .await?;
        Ok(StoreStatus::from_rows_affected(rows))
    }

    async fn delete(
        &self,
        lock_name: &str,
        id: Uuid,
        timeout: CommandTimeout,
    ) -> Result<StoreStatus, LockError> {
        let scope = self.scope().await?;
        let result = with_budget(
            timeout,
            ApplicationLock::delete_many()
                .filter(application_lock::Column::LockName.eq(lock_name))
                .filter(application_lock::Column::Id.eq(id))
                .exec(scope.conn()),
        )
        .await?;
        Ok(StoreStatus::from_rows_affected(result.rows_affected))
    }
}
