//! Bearer token cache
//!
//! The token and its renewal timestamp live in an injected [`KeyValueStore`];
//! the cache only decides when a stored token is stale. The HTTP exchange
//! that mints a fresh token belongs to the price client.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use tracing::warn;

use crate::storage::KeyValueStore;

const TOKEN_KEY: &str = "bearer_token";
const RENEWED_AT_KEY: &str = "token_renewed_at";

/// Cached, expiring bearer token over a key-value store
pub struct TokenCache {
    store: Box<dyn KeyValueStore>,
    lifetime: Duration,
}

impl TokenCache {
    pub fn new(store: Box<dyn KeyValueStore>, lifetime: Duration) -> Self {
        Self { store, lifetime }
    }

    /// Stored token, if any, regardless of age
    pub fn get(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    /// Whether a refresh is due: no token, no parseable renewal timestamp, or
    /// the token has outlived its configured lifetime
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(unix_now())
    }

    fn is_expired_at(&self, now: u64) -> bool {
        if self.store.get(TOKEN_KEY).is_none() {
            return true;
        }
        let Some(renewed_at) = self
            .store
            .get(RENEWED_AT_KEY)
            .and_then(|v| v.parse::<u64>().ok())
        else {
            return true;
        };
        now.saturating_sub(renewed_at) > self.lifetime.as_secs()
    }

    /// Store a freshly minted token and stamp its renewal time
    pub fn put(&self, token: &str) -> Result<()> {
        self.store.set(TOKEN_KEY, token)?;
        if let Err(err) = self.store.set(RENEWED_AT_KEY, &unix_now().to_string()) {
            // Token without a timestamp just forces an early refresh next time
            warn!("failed to persist token renewal timestamp: {err}");
        }
        Ok(())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn cache(lifetime_secs: u64) -> TokenCache {
        TokenCache::new(Box::new(MemoryStore::new()), Duration::from_secs(lifetime_secs))
    }

    #[test]
    fn test_empty_store_is_expired() {
        assert!(cache(3600).is_expired());
    }

    #[test]
    fn test_fresh_token_is_not_expired() {
        let cache = cache(3600);
        cache.put("abc").unwrap();

        assert!(!cache.is_expired());
        assert_eq!(cache.get().as_deref(), Some("abc"));
    }

    #[test]
    fn test_token_expires_after_lifetime() {
        let cache = cache(3600);
        cache.put("abc").unwrap();

        let renewed_at: u64 = cache.store.get("token_renewed_at").unwrap().parse().unwrap();
        assert!(!cache.is_expired_at(renewed_at + 3600));
        assert!(cache.is_expired_at(renewed_at + 3601));
    }

    #[test]
    fn test_token_without_timestamp_is_expired() {
        let store = MemoryStore::new();
        store.set("bearer_token", "abc").unwrap();
        let cache = TokenCache::new(Box::new(store), Duration::from_secs(3600));

        assert!(cache.is_expired());
    }

    #[test]
    fn test_garbage_timestamp_is_expired() {
        let store = MemoryStore::new();
        store.set("bearer_token", "abc").unwrap();
        store.set("token_renewed_at", "yesterday").unwrap();
        let cache = TokenCache::new(Box::new(store), Duration::from_secs(3600));

        assert!(cache.is_expired());
    }
}
