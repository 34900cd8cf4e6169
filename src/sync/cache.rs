//! In-memory response cache.
//!
//! Entries are keyed by the resource they came from plus the request
//! parameters, so a mutation can drop every entry of one resource without
//! guessing from key strings. Entries have no eviction besides that: they
//! live until invalidated and are only trusted while younger than the TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// Source of "now" for freshness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Leads,
    CallStatuses,
    AllCallStatuses,
    Products,
    Budgets,
    UnitTypes,
    TeamLeads,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub resource: Resource,
    pub params: String,
}

impl CacheKey {
    pub fn new(resource: Resource, params: impl Into<String>) -> Self {
        CacheKey {
            resource,
            params: params.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: serde_json::Value,
    pub stored_at: DateTime<Utc>,
}

pub struct ResponseCache {
    entries: HashMap<CacheKey, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        ResponseCache {
            entries: HashMap::new(),
            ttl,
            clock,
        }
    }

    /// Stored value regardless of age.
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let entry = self.entries.get(key)?;
        match serde_json::from_value(entry.data.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(?key, "Cached value has unexpected shape: {}", e);
                None
            }
        }
    }

    /// Stored value only while it is still fresh.
    pub fn get_fresh<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        if self.is_fresh(key) {
            self.get(key)
        } else {
            None
        }
    }

    pub fn put<T: Serialize>(&mut self, key: CacheKey, value: &T) {
        match serde_json::to_value(value) {
            Ok(data) => {
                let stored_at = self.clock.now();
                self.entries.insert(key, CacheEntry { data, stored_at });
            }
            Err(e) => tracing::warn!(?key, "Not caching unserializable value: {}", e),
        }
    }

    /// `false` for keys never stored and for entries at least `ttl` old.
    pub fn is_fresh(&self, key: &CacheKey) -> bool {
        let Some(entry) = self.entries.get(key) else {
            return false;
        };
        let age = self.clock.now().signed_duration_since(entry.stored_at);
        match age.to_std() {
            Ok(age) => age < self.ttl,
            // Stored "in the future" means the clock went backwards; trust it.
            Err(_) => true,
        }
    }

    /// Drops every entry for `resource`, returning how many were removed.
    pub fn invalidate(&mut self, resource: Resource) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.resource != resource);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hand-driven clock for freshness tests.
#[cfg(test)]
pub struct ManualClock {
    now: std::sync::Mutex<DateTime<Utc>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        ManualClock {
            now: std::sync::Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += chrono::Duration::from_std(by).unwrap();
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TTL: Duration = Duration::from_secs(300);

    fn cache() -> (ResponseCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()));
        (ResponseCache::new(TTL, clock.clone()), clock)
    }

    #[test]
    fn test_unknown_key_is_not_fresh() {
        let (cache, _) = cache();
        let key = CacheKey::new(Resource::Budgets, "");
        assert!(!cache.is_fresh(&key));
        assert_eq!(cache.get::<Vec<String>>(&key), None);
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let (mut cache, clock) = cache();
        let key = CacheKey::new(Resource::CallStatuses, "callby=ravi");
        cache.put(key.clone(), &vec!["Warm".to_string(), "Cold".to_string()]);

        clock.advance(Duration::from_secs(299));
        assert!(cache.is_fresh(&key));
        assert_eq!(cache.get_fresh::<Vec<String>>(&key).unwrap().len(), 2);

        clock.advance(Duration::from_secs(2));
        assert!(!cache.is_fresh(&key));
        assert_eq!(cache.get_fresh::<Vec<String>>(&key), None);
        // Stale data is still readable on request
        assert!(cache.get::<Vec<String>>(&key).is_some());
    }

    #[test]
    fn test_exactly_ttl_old_is_stale() {
        let (mut cache, clock) = cache();
        let key = CacheKey::new(Resource::UnitTypes, "");
        cache.put(key.clone(), &vec!["2BHK".to_string()]);
        clock.advance(TTL);
        assert!(!cache.is_fresh(&key));
    }

    #[test]
    fn test_put_refreshes_timestamp() {
        let (mut cache, clock) = cache();
        let key = CacheKey::new(Resource::Products, "");
        cache.put(key.clone(), &vec!["Skyline Towers".to_string()]);
        clock.advance(Duration::from_secs(280));
        cache.put(key.clone(), &vec!["Skyline Towers".to_string()]);
        clock.advance(Duration::from_secs(280));
        assert!(cache.is_fresh(&key));
    }

    #[test]
    fn test_invalidate_only_touches_one_resource() {
        let (mut cache, _) = cache();
        cache.put(CacheKey::new(Resource::Leads, "page=1"), &Vec::<String>::new());
        cache.put(CacheKey::new(Resource::Leads, "page=2"), &Vec::<String>::new());
        cache.put(CacheKey::new(Resource::CallStatuses, ""), &Vec::<String>::new());
        cache.put(CacheKey::new(Resource::Budgets, ""), &Vec::<String>::new());

        assert_eq!(cache.invalidate(Resource::Leads), 2);
        assert_eq!(cache.invalidate(Resource::CallStatuses), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.is_fresh(&CacheKey::new(Resource::Budgets, "")));
    }
}
