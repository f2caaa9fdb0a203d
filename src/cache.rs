// Time-boxed content cache
// Pages fetch their content document through `cached_fetch` so a session does not
// refetch the same document within the TTL. Entries hold the serialized JSON.

use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

// Ten minutes, what the public pages ask for
pub const DEFAULT_PAGE_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Default)]
pub struct CacheStats {
    pub size_bytes: AtomicUsize,
    pub items_count: AtomicUsize,
    pub hit_count: AtomicUsize,
    pub miss_count: AtomicUsize,
    pub eviction_count: AtomicUsize,
    pub expired_count: AtomicUsize,
    pub rejected_count: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStatsReport {
    pub size_bytes: usize,
    pub items_count: usize,
    pub hit_count: usize,
    pub miss_count: usize,
    pub eviction_count: usize,
    pub expired_count: usize,
    pub rejected_count: usize,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_size_mb: usize,
    pub default_ttl_seconds: u64,
    pub eviction_policy: EvictionPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size_mb: 16,
            default_ttl_seconds: DEFAULT_PAGE_TTL.as_secs(),
            eviction_policy: EvictionPolicy::LeastRecentlyUsed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvictionPolicy {
    LeastRecentlyUsed,
    LeastFrequentlyUsed,
    OldestFirst,
}

pub fn calculate_item_size(key: &str, data: &[u8]) -> usize {
    key.len() + data.len() + std::mem::size_of::<CacheEntry>()
}

struct CacheEntry {
    data: Bytes,
    created_at: Instant,
    ttl: Duration,
    access_count: usize,
    last_accessed: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

pub struct ContentCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    config: RwLock<CacheConfig>,
    stats: CacheStats,
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl ContentCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config: RwLock::new(config),
            stats: CacheStats::default(),
        }
    }

    fn max_size_bytes(&self) -> usize {
        self.config.read().max_size_mb * 1024 * 1024
    }

    /// Return the cached value for `key` or run `loader`, caching its result.
    ///
    /// Loader errors propagate untouched and leave the cache as it was. A
    /// cached payload that no longer deserializes into `T` counts as a miss.
    pub async fn cached_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        loader: F,
        ttl: Option<Duration>,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(data) = self.get(key) {
            match serde_json::from_slice::<T>(&data) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!("Discarding undecodable cache entry {}: {}", key, e);
                    self.remove_entry(key, false);
                }
            }
        }

        let value = loader().await?;
        match serde_json::to_vec(&value) {
            Ok(bytes) => {
                self.store(key, Bytes::from(bytes), ttl);
            }
            Err(e) => warn!("Not caching {}: {}", key, e),
        }
        Ok(value)
    }

    // Returns false when the item alone exceeds the cache capacity
    pub fn store(&self, key: &str, data: Bytes, ttl: Option<Duration>) -> bool {
        let (default_ttl, policy) = {
            let config = self.config.read();
            (
                Duration::from_secs(config.default_ttl_seconds),
                config.eviction_policy,
            )
        };
        let ttl = ttl.unwrap_or(default_ttl);
        let item_size = calculate_item_size(key, &data);
        let max_size_bytes = self.max_size_bytes();

        if item_size > max_size_bytes {
            self.stats.rejected_count.fetch_add(1, Ordering::SeqCst);
            return false;
        }

        // Map and counters change together under the entries lock
        let mut entries = self.entries.lock();
        self.detach(&mut entries, key, false);

        while self.stats.size_bytes.load(Ordering::SeqCst) + item_size > max_size_bytes {
            if !self.evict_one(&mut entries, policy) {
                break;
            }
        }

        let now = Instant::now();
        let entry = CacheEntry {
            data,
            created_at: now,
            ttl,
            access_count: 0,
            last_accessed: now,
        };
        entries.insert(key.to_string(), entry);
        self.stats.items_count.fetch_add(1, Ordering::SeqCst);
        self.stats.size_bytes.fetch_add(item_size, Ordering::SeqCst);
        debug!("Cached {} ({} bytes, ttl {:?})", key, item_size, ttl);
        true
    }

    pub fn get(&self, key: &str) -> Option<Bytes> {
        let found = {
            let mut entries = self.entries.lock();
            let state = match entries.get_mut(key) {
                Some(entry) if entry.is_expired() => Err(true),
                Some(entry) => {
                    entry.access_count += 1;
                    entry.last_accessed = Instant::now();
                    Ok(entry.data.clone())
                }
                None => Err(false),
            };
            if matches!(state, Err(true)) {
                self.detach(&mut entries, key, true);
            }
            state
        };

        match found {
            Ok(data) => {
                self.stats.hit_count.fetch_add(1, Ordering::SeqCst);
                Some(data)
            }
            Err(_) => {
                self.stats.miss_count.fetch_add(1, Ordering::SeqCst);
                None
            }
        }
    }

    /// Drop every entry whose key starts with `prefix`. Returns the count.
    pub fn invalidate(&self, prefix: &str) -> usize {
        let keys: Vec<String> = self
            .entries
            .lock()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        let count = keys.len();
        for key in keys {
            self.remove_entry(&key, false);
        }
        count
    }

    pub fn clear(&self) -> usize {
        self.invalidate("")
    }

    pub fn set_eviction_policy(&self, policy: EvictionPolicy) {
        self.config.write().eviction_policy = policy;
    }

    pub fn stats(&self) -> CacheStatsReport {
        CacheStatsReport {
            size_bytes: self.stats.size_bytes.load(Ordering::SeqCst),
            items_count: self.stats.items_count.load(Ordering::SeqCst),
            hit_count: self.stats.hit_count.load(Ordering::SeqCst),
            miss_count: self.stats.miss_count.load(Ordering::SeqCst),
            eviction_count: self.stats.eviction_count.load(Ordering::SeqCst),
            expired_count: self.stats.expired_count.load(Ordering::SeqCst),
            rejected_count: self.stats.rejected_count.load(Ordering::SeqCst),
        }
    }

    fn evict_one(&self, entries: &mut HashMap<String, CacheEntry>, policy: EvictionPolicy) -> bool {
        let victim = match policy {
            EvictionPolicy::LeastRecentlyUsed => entries
                .iter()
                .min_by_key(|(_, e)| e.last_accessed)
                .map(|(k, _)| k.clone()),
            EvictionPolicy::LeastFrequentlyUsed => entries
                .iter()
                .min_by_key(|(_, e)| e.access_count)
                .map(|(k, _)| k.clone()),
            EvictionPolicy::OldestFirst => entries
                .iter()
                .min_by_key(|(_, e)| e.created_at)
                .map(|(k, _)| k.clone()),
        };

        match victim {
            Some(key) => {
                self.detach(entries, &key, false);
                self.stats.eviction_count.fetch_add(1, Ordering::SeqCst);
                true
            }
            None => false,
        }
    }

    fn remove_entry(&self, key: &str, expired: bool) {
        let mut entries = self.entries.lock();
        self.detach(&mut entries, key, expired);
    }

    // Caller holds the entries lock
    fn detach(&self, entries: &mut HashMap<String, CacheEntry>, key: &str, expired: bool) -> bool {
        match entries.remove(key) {
            Some(entry) => {
                self.account_removed(key, &entry);
                if expired {
                    self.stats.expired_count.fetch_add(1, Ordering::SeqCst);
                }
                true
            }
            None => false,
        }
    }

    fn account_removed(&self, key: &str, entry: &CacheEntry) {
        self.stats
            .size_bytes
            .fetch_sub(calculate_item_size(key, &entry.data), Ordering::SeqCst);
        self.stats.items_count.fetch_sub(1, Ordering::SeqCst);
    }
}
