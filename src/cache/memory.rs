//! In-memory cache implementation
//!
//! Stores values in a HashMap with TTL-based expiration. Expiry is lazy:
//! an expired entry is dropped when it is next read, there is no background
//! sweep. Entry counts are small (one per feature plus two fixed keys), so
//! no bounded-size eviction is needed.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::cache::UsageCache;

/// Entry in the in-memory cache with expiration
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// In-memory usage cache
///
/// # Thread Safety
///
/// Uses RwLock for interior mutability, allowing concurrent reads.
/// Overlapping writes to the same key are last-write-wins.
pub struct MemoryCache {
    data: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl MemoryCache {
    /// Create a new cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Create a new cache with a TTL given in milliseconds
    pub fn with_ttl_ms(ttl_ms: u64) -> Self {
        Self::new(Duration::from_millis(ttl_ms))
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let data = self.data.read().unwrap();
        data.values().filter(|e| !e.is_expired()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UsageCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        {
            let data = self.data.read().unwrap();
            match data.get(key) {
                Some(entry) if !entry.is_expired() => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Entry exists but has expired: drop it.
        let mut data = self.data.write().unwrap();
        if data.get(key).map(|e| e.is_expired()).unwrap_or(false) {
            data.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, value: String) {
        let mut data = self.data.write().unwrap();
        data.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    async fn clear(&self) {
        let mut data = self.data.write().unwrap();
        data.clear();
    }
}
