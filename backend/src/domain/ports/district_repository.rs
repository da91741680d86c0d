//! Port abstraction for district directory persistence.

use async_trait::async_trait;

use crate::domain::district::{District, DistrictId, NewDistrict};

/// Persistence errors raised by district repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DistrictRepositoryError {
    /// Repository connection could not be established.
    #[error("district repository connection failed: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("district repository query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
}

impl DistrictRepositoryError {
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

/// Read and seed access to the district directory.
#[async_trait]
pub trait DistrictRepository: Send + Sync {
    /// List the districts of a state, ordered by name.
    async fn list_by_state(&self, state: &str)
    -> Result<Vec<District>, DistrictRepositoryError>;

    /// Fetch a district by surrogate id.
    async fn find_by_id(
        &self,
        id: DistrictId,
    ) -> Result<Option<District>, DistrictRepositoryError>;

    /// Fetch a district by its stable external code.
    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<District>, DistrictRepositoryError>;

    /// Fetch a district by exact name, case-insensitively.
    async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<District>, DistrictRepositoryError>;

    /// All districts that carry centroid data, in id order.
    async fn all_with_centroids(&self) -> Result<Vec<District>, DistrictRepositoryError>;

    /// Number of districts in the directory.
    async fn count(&self) -> Result<u64, DistrictRepositoryError>;

    /// Insert a district at seeding time and return its assigned id.
    async fn insert(
        &self,
        district: &NewDistrict,
    ) -> Result<DistrictId, DistrictRepositoryError>;

    /// Remove a district. Metric records referencing it are removed with it.
    /// Returns whether a row was deleted.
    async fn remove(&self, id: DistrictId) -> Result<bool, DistrictRepositoryError>;
}
