//! Port abstraction for the ingestion audit trail.
//!
//! The log is append-only and never read by the dashboard; it exists so
//! operators can reconstruct what an ingestion run did.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Outcome of an ingestion job run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// The run completed and its rows were applied.
    Succeeded,
    /// The run aborted; details carry the failure description.
    Failed,
}

impl SyncStatus {
    /// Stable label stored in the audit trail.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// One audit row describing an ingestion job run.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncLogEntry {
    /// Name of the job that ran.
    pub job_name: String,
    /// Run outcome.
    pub status: SyncStatus,
    /// Free-text run details (row counts, failure description).
    pub details: Option<String>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

/// Persistence errors raised by sync log adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncLogError {
    /// Repository connection could not be established.
    #[error("sync log connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Append failed during execution.
    #[error("sync log append failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl SyncLogError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Append access to the ingestion audit trail.
#[async_trait]
pub trait SyncLogRepository: Send + Sync {
    /// Record one run.
    async fn record(&self, entry: &SyncLogEntry) -> Result<(), SyncLogError>;
}
