// In-memory query cache.
// Stores serialized responses by query key with a freshness window and an
// in-flight flag for de-duplicating concurrent identical fetches.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use super::keys::{Family, QueryKey};

/// Freshness window for cached reads: 1 minute.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// One cache slot: data (absent while the first fetch is in flight),
/// when it was stored, and whether a fetch for this key is running.
#[derive(Debug, Clone)]
struct Entry {
    value: Option<serde_json::Value>,
    cached_at: DateTime<Utc>,
    in_flight: bool,
}

impl Entry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        let elapsed = Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);
        elapsed <= ttl
    }
}

/// Cache of read results keyed by operation and parameters.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, Entry>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached value for a key if it is still within the freshness
    /// window. A miss (absent, stale, or undecodable) means the caller
    /// should fetch.
    pub fn get_fresh<T: DeserializeOwned>(&self, key: &QueryKey, ttl: Duration) -> Option<T> {
        let entry = self.entries.get(key)?;
        if !entry.is_fresh(ttl) {
            return None;
        }
        let value = entry.value.as_ref()?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Store a fetched value and clear the in-flight flag.
    pub fn insert<T: Serialize>(&mut self, key: QueryKey, value: &T) {
        let value = match serde_json::to_value(value) {
            Ok(v) => Some(v),
            Err(_) => None,
        };
        self.entries.insert(
            key,
            Entry {
                value,
                cached_at: Utc::now(),
                in_flight: false,
            },
        );
    }

    /// Mark a fetch as starting. Returns false when a fetch for this key is
    /// already in flight, in which case the caller must not start another.
    pub fn begin_fetch(&mut self, key: &QueryKey) -> bool {
        match self.entries.get_mut(key) {
            Some(entry) if entry.in_flight => false,
            Some(entry) => {
                entry.in_flight = true;
                true
            }
            None => {
                self.entries.insert(
                    key.clone(),
                    Entry {
                        value: None,
                        cached_at: Utc::now(),
                        in_flight: true,
                    },
                );
                true
            }
        }
    }

    /// Clear the in-flight flag after a failed fetch so the key can be
    /// retried later. Successful fetches clear it through `insert`.
    pub fn finish_fetch(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.in_flight = false;
        }
    }

    /// Whether a fetch for this key is currently running.
    pub fn is_in_flight(&self, key: &QueryKey) -> bool {
        self.entries.get(key).is_some_and(|e| e.in_flight)
    }

    /// Drop every entry belonging to a family. The next read of any dropped
    /// key goes to the network.
    pub fn invalidate(&mut self, family: &Family) {
        self.entries.retain(|key, _| !key.in_family(family));
    }

    /// Drop everything. Used by logout.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repos_key(page: u32) -> QueryKey {
        QueryKey::Repos { page }
    }

    #[test]
    fn test_insert_and_get_fresh() {
        let mut cache = QueryCache::new();
        cache.insert(repos_key(1), &vec!["a".to_string(), "b".to_string()]);

        let hit: Option<Vec<String>> = cache.get_fresh(&repos_key(1), DEFAULT_TTL);
        assert_eq!(hit, Some(vec!["a".to_string(), "b".to_string()]));

        let miss: Option<Vec<String>> = cache.get_fresh(&repos_key(2), DEFAULT_TTL);
        assert!(miss.is_none());
    }

    #[test]
    fn test_stale_entry_is_a_miss() {
        let mut cache = QueryCache::new();
        cache.insert(QueryKey::CurrentUser, &"octocat".to_string());

        // Backdate the entry past any freshness window.
        cache.entries.get_mut(&QueryKey::CurrentUser).unwrap().cached_at =
            Utc::now() - chrono::Duration::seconds(600);

        let hit: Option<String> = cache.get_fresh(&QueryKey::CurrentUser, DEFAULT_TTL);
        assert!(hit.is_none());
    }

    #[test]
    fn test_begin_fetch_deduplicates() {
        let mut cache = QueryCache::new();

        assert!(cache.begin_fetch(&repos_key(1)));
        // Second identical read while the first is in flight.
        assert!(!cache.begin_fetch(&repos_key(1)));
        assert!(cache.is_in_flight(&repos_key(1)));

        // A different key is unaffected.
        assert!(cache.begin_fetch(&repos_key(2)));
    }

    #[test]
    fn test_insert_clears_in_flight() {
        let mut cache = QueryCache::new();
        cache.begin_fetch(&repos_key(1));
        cache.insert(repos_key(1), &1u32);

        assert!(!cache.is_in_flight(&repos_key(1)));
        assert!(cache.begin_fetch(&repos_key(1)));
    }

    #[test]
    fn test_finish_fetch_allows_retry_after_failure() {
        let mut cache = QueryCache::new();
        cache.begin_fetch(&repos_key(1));
        cache.finish_fetch(&repos_key(1));

        assert!(cache.begin_fetch(&repos_key(1)));
    }

    #[test]
    fn test_invalidate_family_forces_refetch() {
        let mut cache = QueryCache::new();
        cache.insert(repos_key(1), &1u32);
        cache.insert(repos_key(2), &2u32);
        cache.insert(QueryKey::CurrentUser, &"octocat".to_string());

        cache.invalidate(&Family::RepoList);

        let p1: Option<u32> = cache.get_fresh(&repos_key(1), DEFAULT_TTL);
        let p2: Option<u32> = cache.get_fresh(&repos_key(2), DEFAULT_TTL);
        assert!(p1.is_none());
        assert!(p2.is_none());

        // Other families survive.
        let user: Option<String> = cache.get_fresh(&QueryKey::CurrentUser, DEFAULT_TTL);
        assert_eq!(user, Some("octocat".to_string()));
    }

    #[test]
    fn test_invalidate_contents_scoped_to_repo() {
        let mut cache = QueryCache::new();
        let mine = QueryKey::Contents {
            owner: "octocat".to_string(),
            repo: "widget".to_string(),
            path: "src".to_string(),
        };
        let other = QueryKey::Contents {
            owner: "octocat".to_string(),
            repo: "gadget".to_string(),
            path: "src".to_string(),
        };
        cache.insert(mine.clone(), &1u32);
        cache.insert(other.clone(), &2u32);

        cache.invalidate(&Family::Contents {
            owner: "octocat".to_string(),
            repo: "widget".to_string(),
        });

        assert!(cache.get_fresh::<u32>(&mine, DEFAULT_TTL).is_none());
        assert_eq!(cache.get_fresh::<u32>(&other, DEFAULT_TTL), Some(2));
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut cache = QueryCache::new();
        cache.insert(repos_key(1), &1u32);
        cache.insert(QueryKey::CurrentUser, &"octocat".to_string());

        cache.clear();

        assert!(cache.is_empty());
        assert!(cache.get_fresh::<u32>(&repos_key(1), DEFAULT_TTL).is_none());
    }
}
