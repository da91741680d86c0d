//! PostgreSQL-backed `DistrictRepository` implementation using Diesel ORM.
//!
//! A thin adapter: translates between Diesel rows and domain districts and
//! maps storage failures to the port's error type. No business logic lives
//! here.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DistrictRepository, DistrictRepositoryError};
use crate::domain::{Coordinates, District, DistrictId, NewDistrict};

use super::models::{DistrictRow, NewDistrictRow};
use super::pool::{DbPool, PoolError};
use super::schema::districts;

/// Diesel-backed implementation of the `DistrictRepository` port.
#[derive(Clone)]
pub struct DieselDistrictRepository {
    pool: DbPool,
}

impl DieselDistrictRepository {
    /// Create a repository over the given pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(super) fn map_pool_error(error: PoolError) -> DistrictRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DistrictRepositoryError::connection(message)
        }
    }
}

pub(super) fn map_diesel_error(error: diesel::result::Error) -> DistrictRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            DistrictRepositoryError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => {
            DistrictRepositoryError::query(info.message().to_owned())
        }
        other => DistrictRepositoryError::query(other.to_string()),
    }
}

pub(super) fn row_to_district(row: DistrictRow) -> District {
    let centroid = match (row.centroid_lat, row.centroid_lon) {
        (Some(lat), Some(lon)) => Coordinates::try_new(lat, lon).ok(),
        _ => None,
    };
    District {
        id: DistrictId::new(row.id),
        state: row.state,
        code: row.district_code,
        name: row.district_name,
        name_hindi: row.district_name_hindi,
        centroid,
    }
}

/// Escape LIKE metacharacters so a name matches literally under `ILIKE`.
fn literal_pattern(name: &str) -> String {
    name.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl DistrictRepository for DieselDistrictRepository {
    async fn list_by_state(
        &self,
        state: &str,
    ) -> Result<Vec<District>, DistrictRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DistrictRow> = districts::table
            .filter(districts::state.eq(state))
            .order(districts::district_name.asc())
            .select(DistrictRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_district).collect())
    }

    async fn find_by_id(
        &self,
        id: DistrictId,
    ) -> Result<Option<District>, DistrictRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DistrictRow> = districts::table
            .filter(districts::id.eq(id.get()))
            .select(DistrictRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_district))
    }

    async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<District>, DistrictRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DistrictRow> = districts::table
            .filter(districts::district_code.eq(code))
            .select(DistrictRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_district))
    }

    async fn find_by_name(
        &self,
        name: &str,
    ) -> Result<Option<District>, DistrictRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DistrictRow> = districts::table
            .filter(districts::district_name.ilike(literal_pattern(name)))
            .order(districts::id.asc())
            .select(DistrictRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_district))
    }

    async fn all_with_centroids(&self) -> Result<Vec<District>, DistrictRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DistrictRow> = districts::table
            .filter(districts::centroid_lat.is_not_null())
            .filter(districts::centroid_lon.is_not_null())
            .order(districts::id.asc())
            .select(DistrictRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_district).collect())
    }

    async fn count(&self) -> Result<u64, DistrictRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = districts::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(total.unsigned_abs())
    }

    async fn insert(
        &self,
        district: &NewDistrict,
    ) -> Result<DistrictId, DistrictRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewDistrictRow {
            state: &district.state,
            district_code: &district.code,
            district_name: &district.name,
            district_name_hindi: district.name_hindi.as_deref(),
            centroid_lat: district.centroid.map(|c| c.latitude()),
            centroid_lon: district.centroid.map(|c| c.longitude()),
        };
        let id: i32 = diesel::insert_into(districts::table)
            .values(&row)
            .returning(districts::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(DistrictId::new(id))
    }

    async fn remove(&self, id: DistrictId) -> Result<bool, DistrictRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(districts::table.filter(districts::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}
