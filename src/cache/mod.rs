//! Time-bounded cache of external lookups, layered over a [`KeyValueStore`].
//!
//! Entries are written as `{"timestamp": <unix millis>, "data": <payload>}` under
//! `<namespace prefix><key>`. Reads and writes never fail: a broken or expired entry
//! reads as absent, and a rejected write is dropped so the caller simply fetches again.

use std::sync::Arc;

use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};

use crate::persistence::KeyValueStore;

pub const CACHE_TTL_MS: i64 = 5 * 60 * 1000;
const SHARED_PREFIX: &str = "gbif_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheNamespace {
    SpeciesMatch,
    Vernacular,
    Occurrence,
    Images,
}

impl CacheNamespace {
    pub fn prefix(&self) -> &'static str {
        match self {
            CacheNamespace::SpeciesMatch => "gbif_species_match_",
            CacheNamespace::Vernacular => "gbif_vernacular_",
            CacheNamespace::Occurrence => "gbif_occurrence_",
            CacheNamespace::Images => "gbif_images_",
        }
    }
}

pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[derive(Serialize, Deserialize)]
struct CacheEntry<T> {
    timestamp: i64,
    data: T,
}

#[derive(Clone)]
pub struct TtlCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl TtlCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn storage_key(namespace: CacheNamespace, key: &str) -> String {
        format!("{}{}", namespace.prefix(), key)
    }

    fn is_expired(&self, timestamp: i64) -> bool {
        self.clock.now_millis() - timestamp > CACHE_TTL_MS
    }

    pub fn get<T: DeserializeOwned>(&self, namespace: CacheNamespace, key: &str) -> Option<T> {
        let storage_key = Self::storage_key(namespace, key);
        let raw = self.store.get(&storage_key)?;

        match serde_json::from_str::<CacheEntry<T>>(&raw) {
            Ok(entry) if self.is_expired(entry.timestamp) => {
                self.store.remove(&storage_key);
                None
            }
            Ok(entry) => Some(entry.data),
            Err(e) => {
                tracing::warn!(key = %storage_key, "Cache read error: {}", e);
                self.store.remove(&storage_key);
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, namespace: CacheNamespace, key: &str, data: &T) {
        let storage_key = Self::storage_key(namespace, key);
        let entry = CacheEntry { timestamp: self.clock.now_millis(), data };

        let result = serde_json::to_string(&entry)
            .map_err(crate::core::FloraError::from)
            .and_then(|json| self.store.set(&storage_key, json));

        if let Err(e) = result {
            tracing::warn!(key = %storage_key, "Cache write error: {}", e);
        }
    }

    /// Removes expired and unreadable entries across every namespace, then
    /// persists whatever the store has buffered.
    pub fn sweep(&self) -> usize {
        let mut removed = 0;
        for key in self.store.keys() {
            if !key.starts_with(SHARED_PREFIX) {
                continue;
            }

            let stale = match self.store.get(&key) {
                Some(raw) => match serde_json::from_str::<CacheEntry<serde_json::Value>>(&raw) {
                    Ok(entry) => self.is_expired(entry.timestamp),
                    Err(_) => true,
                },
                None => false,
            };

            if stale {
                self.store.remove(&key);
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::debug!(removed, "Swept expired cache entries");
        }
        if let Err(e) = self.store.flush() {
            tracing::warn!("Cache flush error: {}", e);
        }
        removed
    }
}
