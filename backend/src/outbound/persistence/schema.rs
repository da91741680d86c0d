//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the embedded migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// District reference directory.
    ///
    /// Seeded once at provisioning time; `district_code` is unique across
    /// all rows.
    districts (id) {
        /// Primary key.
        id -> Int4,
        /// State the district belongs to.
        state -> Varchar,
        /// Stable external code, unique.
        district_code -> Varchar,
        /// Human-readable name.
        district_name -> Varchar,
        /// Hindi rendering of the name.
        district_name_hindi -> Nullable<Varchar>,
        /// Centroid latitude in decimal degrees.
        centroid_lat -> Nullable<Float8>,
        /// Centroid longitude in decimal degrees.
        centroid_lon -> Nullable<Float8>,
    }
}

diesel::table! {
    /// Monthly metric records, one per district and calendar month.
    ///
    /// `UNIQUE (district_id, year, month)`; rows cascade-delete with their
    /// parent district.
    monthly_metrics (id) {
        /// Primary key.
        id -> Int4,
        /// Owning district; cascade delete.
        district_id -> Int4,
        /// Calendar year.
        year -> Int4,
        /// Calendar month, 1-12.
        month -> Int4,
        /// Total person-days worked.
        person_days -> Int8,
        /// Households provided employment.
        households -> Int8,
        /// Average daily wage in rupees.
        avg_wage -> Float8,
        /// Individual beneficiaries.
        beneficiaries -> Int8,
        /// Free-form extension payload from the source.
        other_json -> Nullable<Jsonb>,
        /// Timestamp reported by the upstream source.
        source_updated_at -> Nullable<Timestamptz>,
        /// Ingestion timestamp, stamped by the database.
        fetched_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit trail of ingestion job runs.
    sync_log (id) {
        /// Primary key.
        id -> Int4,
        /// Name of the job that ran.
        job_name -> Varchar,
        /// Run outcome label.
        status -> Varchar,
        /// Free-text run details.
        details -> Nullable<Text>,
        /// When the run started.
        started_at -> Timestamptz,
        /// When the run finished.
        finished_at -> Timestamptz,
    }
}

diesel::joinable!(monthly_metrics -> districts (district_id));

diesel::allow_tables_to_appear_in_same_query!(districts, monthly_metrics);
