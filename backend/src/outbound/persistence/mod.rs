//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Thin adapters only: repository implementations translate between Diesel
//! rows and domain types and map storage failures to typed port errors.
//! Row structs and schema definitions stay internal to this module.

mod diesel_district_repository;
mod diesel_metrics_repository;
mod diesel_sync_log_repository;
mod models;
mod pool;
mod schema;

use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub use diesel_district_repository::DieselDistrictRepository;
pub use diesel_metrics_repository::DieselMetricsRepository;
pub use diesel_sync_log_repository::DieselSyncLogRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures applying embedded migrations at startup.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The database could not be reached.
    #[error("failed to connect for migrations: {message}")]
    Connection {
        /// Underlying failure description.
        message: String,
    },
    /// A migration failed to apply.
    #[error("failed to run migrations: {message}")]
    Migration {
        /// Underlying failure description.
        message: String,
    },
}

/// Apply any pending embedded migrations.
///
/// Runs on a blocking thread: Diesel's migration harness is synchronous.
///
/// # Errors
///
/// Returns [`MigrationError`] when the connection or a migration fails.
pub async fn run_migrations(database_url: &str) -> Result<(), MigrationError> {
    let database_url = database_url.to_owned();
    let outcome = tokio::task::spawn_blocking(move || {
        let mut conn = diesel::PgConnection::establish(&database_url).map_err(|err| {
            MigrationError::Connection {
                message: err.to_string(),
            }
        })?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|err| MigrationError::Migration {
                message: err.to_string(),
            })
    })
    .await;
    outcome.map_err(|err| MigrationError::Migration {
        message: format!("migration task panicked: {err}"),
    })?
}
