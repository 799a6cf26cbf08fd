//! In-memory store client
//!
//! DashMap-backed implementation with per-key atomicity through the map's
//! entry API. Expiry is lazy: an entry past its deadline reads as absent
//! and is removed on access.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use latchkey_common::StoreError;

use crate::client::StoreClient;

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

impl StoredValue {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-memory `StoreClient` for tests and single-process embedding.
///
/// Linearizable per key; never reports `StoreError`.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, StoredValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) keys.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn evict_expired(&self, key: &str) {
        let now = Instant::now();
        let _ = self.entries.remove_if(key, |_, stored| stored.is_expired(now));
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) if occupied.get().is_expired(now) => {
                occupied.insert(StoredValue::new(value));
                Ok(true)
            }
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(vacant) => {
                vacant.insert(StoredValue::new(value));
                Ok(true)
            }
        }
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.evict_expired(key);
        Ok(self.entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn get_and_set(&self, key: &str, value: &str) -> Result<Option<String>, StoreError> {
        let now = Instant::now();
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let prior = occupied.insert(StoredValue::new(value));
                Ok((!prior.is_expired(now)).then(|| prior.value))
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoredValue::new(value));
                Ok(None)
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let now = Instant::now();
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|(_, stored)| !stored.is_expired(now)))
    }

    async fn set_expiry(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        self.evict_expired(key);
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                entry.expires_at = Some(Instant::now() + ttl);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, StoreError> {
        self.evict_expired(key);
        let now = Instant::now();
        Ok(self.entries.get(key).and_then(|entry| {
            entry
                .expires_at
                .map(|at| at.saturating_duration_since(now))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_if_absent_then_get() {
        let store = MemoryStore::new();

        assert!(store.set_if_absent("k", "v1").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), Some("v1".to_string()));
    }

    #[tokio::test]
    async fn test_set_if_absent_respects_existing() {
        let store = MemoryStore::new();

        assert!(store.set_if_absent("k", "v1").await.unwrap());
        assert!(!store.set_if_absent("k", "v2").await.unwrap());
        // Losing attempt must not overwrite
        assert_eq!(store.get("k").await.unwrap(), Some("v1".to_string()));
    }

    #[tokio::test]
    async fn test_get_and_set_returns_prior() {
        let store = MemoryStore::new();

        assert_eq!(store.get_and_set("k", "v1").await.unwrap(), None);
        assert_eq!(
            store.get_and_set("k", "v2").await.unwrap(),
            Some("v1".to_string())
        );
        assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();

        store.set_if_absent("k", "v").await.unwrap();
        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_expired_key_reads_as_absent() {
        let store = MemoryStore::new();

        store.set_if_absent("k", "v").await.unwrap();
        assert!(store.set_expiry("k", Duration::from_millis(20)).await.unwrap());

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(store.get("k").await.unwrap(), None);
        // Expired slot is free for a new writer
        assert!(store.set_if_absent("k", "v2").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));
    }

    #[tokio::test]
    async fn test_get_and_set_over_expired_returns_none() {
        let store = MemoryStore::new();

        store.set_if_absent("k", "old").await.unwrap();
        store.set_expiry("k", Duration::from_millis(20)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(store.get_and_set("k", "new").await.unwrap(), None);
        assert_eq!(store.get("k").await.unwrap(), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_ttl() {
        let store = MemoryStore::new();

        assert_eq!(store.ttl("missing").await.unwrap(), None);

        store.set_if_absent("k", "v").await.unwrap();
        assert_eq!(store.ttl("k").await.unwrap(), None);

        store.set_expiry("k", Duration::from_secs(30)).await.unwrap();
        let remaining = store.ttl("k").await.unwrap().unwrap();
        assert!(remaining <= Duration::from_secs(30));
        assert!(remaining > Duration::from_secs(29));
    }

    #[tokio::test]
    async fn test_set_expiry_on_missing_key() {
        let store = MemoryStore::new();
        assert!(!store.set_expiry("missing", Duration::from_secs(1)).await.unwrap());
    }

    #[tokio::test]
    async fn test_overwrite_clears_expiry() {
        let store = MemoryStore::new();

        store.set_if_absent("k", "v1").await.unwrap();
        store.set_expiry("k", Duration::from_secs(30)).await.unwrap();

        // A replacement writes a fresh value with no expiry
        store.get_and_set("k", "v2").await.unwrap();
        assert_eq!(store.ttl("k").await.unwrap(), None);
    }
}
