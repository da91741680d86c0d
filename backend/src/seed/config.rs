//! Seeding configuration read from the environment.

use std::env;

const DEFAULT_SEED: u64 = 2024;
const DEFAULT_MONTHS: u32 = 6;

/// Controls deterministic district data seeding at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSettings {
    /// Apply seed data when the directory is empty.
    pub enabled: bool,
    /// RNG seed for demo metric generation.
    pub seed: u64,
    /// Number of trailing months of demo metrics to generate.
    pub months: u32,
}

impl SeedSettings {
    /// Read settings from `SEED_DISTRICT_DATA`, `SEED_VALUE`, and
    /// `SEED_MONTHS`; unset or unparsable values fall back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let enabled = env::var("SEED_DISTRICT_DATA")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let seed = env::var("SEED_VALUE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SEED);
        let months = env::var("SEED_MONTHS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MONTHS);
        Self {
            enabled,
            seed,
            months,
        }
    }
}
