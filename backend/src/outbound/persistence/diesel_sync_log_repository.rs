//! PostgreSQL-backed `SyncLogRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SyncLogEntry, SyncLogError, SyncLogRepository};

use super::models::NewSyncLogRow;
use super::pool::{DbPool, PoolError};
use super::schema::sync_log;

/// Diesel-backed implementation of the `SyncLogRepository` port.
#[derive(Clone)]
pub struct DieselSyncLogRepository {
    pool: DbPool,
}

impl DieselSyncLogRepository {
    /// Create a repository over the given pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SyncLogError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            SyncLogError::connection(message)
        }
    }
}

#[async_trait]
impl SyncLogRepository for DieselSyncLogRepository {
    async fn record(&self, entry: &SyncLogEntry) -> Result<(), SyncLogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewSyncLogRow {
            job_name: &entry.job_name,
            status: entry.status.as_str(),
            details: entry.details.as_deref(),
            started_at: entry.started_at,
            finished_at: entry.finished_at,
        };
        diesel::insert_into(sync_log::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| SyncLogError::query(err.to_string()))?;
        Ok(())
    }
}
