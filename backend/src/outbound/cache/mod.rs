//! In-process selection cache adapter.
//!
//! Entries carry an absolute expiry computed from the injected clock and are
//! evicted lazily on the first read past it. Best-effort only: the cache is
//! process-local and never a source of truth.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{CachedSelection, SelectionCache};

#[derive(Debug, Clone)]
struct Entry {
    value: CachedSelection,
    expires_at: DateTime<Utc>,
}

/// Mutex-guarded map implementing the `SelectionCache` port.
pub struct InMemorySelectionCache {
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemorySelectionCache {
    /// Create an empty cache reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored entries, including any not yet lazily evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl SelectionCache for InMemorySelectionCache {
    fn put(&self, key: &str, value: CachedSelection, ttl: Duration) {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        let expires_at = self
            .clock
            .utc()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.lock()
            .insert(key.to_owned(), Entry { value, expires_at });
    }

    fn get(&self, key: &str) -> Option<CachedSelection> {
        let now = self.clock.utc();
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if now < entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use chrono::{Local, TimeZone};
    use rstest::rstest;

    use super::*;

    /// Clock that tests can advance manually.
    struct SteppingClock(StdMutex<DateTime<Utc>>);

    impl SteppingClock {
        fn new() -> Self {
            let start = Utc
                .with_ymd_and_hms(2025, 9, 15, 8, 0, 0)
                .single()
                .unwrap_or_default();
            Self(StdMutex::new(start))
        }

        fn advance(&self, delta: TimeDelta) {
            let mut now = self.0.lock().unwrap_or_else(PoisonError::into_inner);
            *now += delta;
        }
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    fn selection(code: &str, clock: &SteppingClock) -> CachedSelection {
        CachedSelection {
            district_code: code.to_owned(),
            resolved_at: clock.utc(),
        }
    }

    #[rstest]
    fn get_before_expiry_returns_the_value() {
        let clock = Arc::new(SteppingClock::new());
        let cache = InMemorySelectionCache::new(clock.clone());

        cache.put("k", selection("GJ13", &clock), Duration::from_secs(60));
        clock.advance(TimeDelta::seconds(59));

        let value = cache.get("k").expect("still fresh");
        assert_eq!(value.district_code, "GJ13");
    }

    #[rstest]
    fn get_after_expiry_evicts_and_returns_absent() {
        let clock = Arc::new(SteppingClock::new());
        let cache = InMemorySelectionCache::new(clock.clone());

        cache.put("k", selection("GJ13", &clock), Duration::from_secs(60));
        clock.advance(TimeDelta::seconds(61));

        assert!(cache.get("k").is_none());
        assert!(cache.is_empty(), "expired entry should be evicted");
    }

    #[rstest]
    fn put_replaces_the_previous_entry_and_expiry() {
        let clock = Arc::new(SteppingClock::new());
        let cache = InMemorySelectionCache::new(clock.clone());

        cache.put("k", selection("GJ13", &clock), Duration::from_secs(10));
        clock.advance(TimeDelta::seconds(9));
        cache.put("k", selection("GJ29", &clock), Duration::from_secs(10));
        clock.advance(TimeDelta::seconds(9));

        let value = cache.get("k").expect("replacement still fresh");
        assert_eq!(value.district_code, "GJ29");
        assert_eq!(cache.len(), 1);
    }

    #[rstest]
    fn missing_keys_return_absent() {
        let clock = Arc::new(SteppingClock::new());
        let cache = InMemorySelectionCache::new(clock);
        assert!(cache.get("unknown").is_none());
    }
}
