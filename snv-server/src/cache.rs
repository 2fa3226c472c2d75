//! In-process caches for upstream responses.
//!
//! Segment lists are fetched per (UF, BR, segment type, date) and reused
//! across queries through a small FIFO cache. Eviction is strictly by
//! insertion order; lookups do not refresh an entry's position.
//!
//! Dataset versions are cached per date with a TTL.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{MiniSegment, ReferenceDate};

/// Default number of segment lists kept.
pub const DEFAULT_SEGMENT_CAPACITY: usize = 10;

/// Default lifetime of a cached dataset version.
pub const DEFAULT_VERSION_TTL: Duration = Duration::from_secs(60 * 60);

/// A cached, shareable segment list.
pub type SegmentList = Arc<Vec<MiniSegment>>;

/// Normalized key of a segment list: `UF|BR|TYPE|DATE`, uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SegmentListKey(String);

impl SegmentListKey {
    pub fn new(uf: &str, br: &str, segment_type: &str, date: ReferenceDate) -> Self {
        Self(format!("{uf}|{br}|{segment_type}|{date}").to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Map plus insertion order. A key is in `lists` iff it appears exactly
/// once in `order`.
#[derive(Debug, Default)]
struct Entries {
    lists: HashMap<SegmentListKey, SegmentList>,
    order: VecDeque<SegmentListKey>,
}

/// Bounded FIFO cache of segment lists.
///
/// Safe to share between concurrent queries. There is no single-flight
/// guarantee: two concurrent misses on the same key both run their fetcher
/// and the last write wins.
#[derive(Debug)]
pub struct SegmentListCache {
    capacity: usize,
    entries: RwLock<Entries>,
}

impl Default for SegmentListCache {
    fn default() -> Self {
        Self::new(DEFAULT_SEGMENT_CAPACITY)
    }
}

impl SegmentListCache {
    /// Create a cache holding at most `capacity` lists (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(Entries::default()),
        }
    }

    /// Get a cached list.
    pub async fn get(&self, key: &SegmentListKey) -> Option<SegmentList> {
        self.entries.read().await.lists.get(key).cloned()
    }

    /// Return the cached list for `key`, or run `fetcher`, store its result
    /// and return it.
    ///
    /// The lock is not held while `fetcher` runs.
    pub async fn get_or_fetch<F, Fut>(&self, key: &SegmentListKey, fetcher: F) -> SegmentList
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Vec<MiniSegment>>,
    {
        if let Some(cached) = self.get(key).await {
            debug!(key = %key, "segment cache hit");
            return cached;
        }

        debug!(key = %key, "segment cache miss");
        let fetched = fetcher().await;
        self.put(key.clone(), fetched).await
    }

    /// Insert or replace a list.
    ///
    /// A new key evicts the oldest entry when the cache is full. Replacing
    /// an existing key keeps its place in the eviction order.
    pub async fn put(&self, key: SegmentListKey, segments: Vec<MiniSegment>) -> SegmentList {
        let list: SegmentList = Arc::new(segments);
        let mut entries = self.entries.write().await;

        if !entries.lists.contains_key(&key) {
            if entries.lists.len() >= self.capacity {
                if let Some(oldest) = entries.order.pop_front() {
                    entries.lists.remove(&oldest);
                    debug!(evicted = %oldest, "segment cache full, evicted oldest entry");
                }
            }
            entries.order.push_back(key.clone());
        }

        entries.lists.insert(key, list.clone());
        list
    }

    /// Number of cached lists.
    pub async fn len(&self) -> usize {
        self.entries.read().await.lists.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.lists.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from oldest to newest.
    pub async fn keys(&self) -> Vec<SegmentListKey> {
        self.entries.read().await.order.iter().cloned().collect()
    }
}

/// TTL cache of dataset versions by reference date.
pub struct VersionCache {
    versions: MokaCache<ReferenceDate, String>,
}

impl VersionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            versions: MokaCache::builder()
                .time_to_live(ttl)
                .max_capacity(64)
                .build(),
        }
    }

    pub async fn get(&self, date: &ReferenceDate) -> Option<String> {
        self.versions.get(date).await
    }

    pub async fn insert(&self, date: ReferenceDate, version: String) {
        self.versions.insert(date, version).await;
    }
}

impl Default for VersionCache {
    fn default() -> Self {
        Self::new(DEFAULT_VERSION_TTL)
    }
}
