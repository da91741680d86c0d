//! Port abstraction for the selection cache.
//!
//! A best-effort key-value store with per-entry absolute expiry. It is never
//! a source of truth: resolution results and the last-selected district are
//! remembered here to skip redundant lookups, nothing more.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key under which the most recent successful selection is remembered.
pub const LAST_SELECTION_KEY: &str = "last_selected_district";

/// Freshness window for the last-selected district.
pub const LAST_SELECTION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default freshness window for location lookups.
pub const DEFAULT_LOCATION_TTL: Duration = Duration::from_secs(60 * 60);

/// Build the cache key for an IP-derived resolution.
#[must_use]
pub fn ip_cache_key(ip: std::net::IpAddr) -> String {
    format!("location:ip:{ip}")
}

/// Cached record of a resolved district selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSelection {
    /// Code of the resolved district.
    pub district_code: String,
    /// When the resolution happened.
    pub resolved_at: DateTime<Utc>,
}

/// Key-value store with per-entry expiry and lazy eviction.
pub trait SelectionCache: Send + Sync {
    /// Store `value` under `key` with absolute expiry `now + ttl`.
    fn put(&self, key: &str, value: CachedSelection, ttl: Duration);

    /// Return the value under `key` when the current time is before its
    /// expiry; evict the entry and return `None` otherwise.
    fn get(&self, key: &str) -> Option<CachedSelection>;
}
