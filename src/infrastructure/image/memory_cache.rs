//! In-memory, size-aware LRU image cache.

use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::entities::{ThumbnailImage, image_cost_kb};
use crate::domain::ports::ImageCachePort;

/// Fraction of available memory given to the cache (1/8).
pub const DEFAULT_MEMORY_DIVISOR: u64 = 8;

/// Budget used when available memory cannot be determined (16 MiB).
pub const MIN_BUDGET_KB: usize = 16 * 1024;

/// Cache capacity in kilobytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheBudget {
    kb: usize,
}

impl CacheBudget {
    /// Creates a budget of exactly `kb` kilobytes.
    #[must_use]
    pub const fn from_kb(kb: usize) -> Self {
        Self { kb }
    }

    /// Derives the budget from a memory size in bytes.
    /// A result of zero falls back to [`MIN_BUDGET_KB`].
    #[must_use]
    pub fn from_memory_bytes(bytes: u64, divisor: u64) -> Self {
        let kb = bytes / 1024 / divisor.max(1);
        let kb = usize::try_from(kb).unwrap_or(usize::MAX);
        if kb == 0 {
            Self::from_kb(MIN_BUDGET_KB)
        } else {
            Self::from_kb(kb)
        }
    }

    /// Uses `1 / divisor` of the memory currently available to the process.
    #[must_use]
    pub fn from_available_memory(divisor: u64) -> Self {
        let mut system = sysinfo::System::new();
        system.refresh_memory();
        let available = system.available_memory();
        let budget = Self::from_memory_bytes(available, divisor);
        debug!(
            available_bytes = available,
            divisor = divisor,
            budget_kb = budget.kb,
            "Computed image cache budget"
        );
        budget
    }

    /// Returns the budget in kilobytes.
    #[must_use]
    pub const fn kb(self) -> usize {
        self.kb
    }
}

struct CacheEntry {
    image: ThumbnailImage,
    cost_kb: usize,
}

struct CacheInner {
    entries: LruCache<String, CacheEntry>,
    total_cost_kb: usize,
}

/// Thread-safe LRU cache for decoded thumbnails, bounded by total cost.
///
/// Each entry costs its decoded byte size in kilobytes. Inserting evicts
/// least-recently-used entries until the new one fits; an entry larger than
/// the whole budget is rejected and nothing is evicted for it.
pub struct BoundedImageCache {
    inner: Mutex<CacheInner>,
    budget_kb: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for BoundedImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedImageCache")
            .field("budget_kb", &self.budget_kb)
            .field("total_cost_kb", &self.total_cost_kb())
            .finish_non_exhaustive()
    }
}

impl BoundedImageCache {
    /// Creates a cache with the given budget.
    #[must_use]
    pub fn new(budget: CacheBudget) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: LruCache::unbounded(),
                total_cost_kb: 0,
            }),
            budget_kb: budget.kb(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a cache sized to 1/8 of available memory.
    #[must_use]
    pub fn with_default_budget() -> Self {
        Self::new(CacheBudget::from_available_memory(DEFAULT_MEMORY_DIVISOR))
    }

    /// Returns the configured budget in kilobytes.
    #[must_use]
    pub const fn budget_kb(&self) -> usize {
        self.budget_kb
    }

    /// Returns the summed cost of all resident entries.
    #[must_use]
    pub fn total_cost_kb(&self) -> usize {
        self.inner.lock().total_cost_kb
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let (size, cost_kb) = {
            let inner = self.inner.lock();
            (inner.entries.len(), inner.total_cost_kb)
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size,
            cost_kb,
            budget_kb: self.budget_kb,
        }
    }

    fn insert_locked(&self, inner: &mut CacheInner, url: String, image: ThumbnailImage) -> bool {
        let cost_kb = image_cost_kb(&image);
        if cost_kb > self.budget_kb {
            debug!(
                url = %url,
                cost_kb = cost_kb,
                budget_kb = self.budget_kb,
                "Image exceeds cache budget, not storing"
            );
            return false;
        }

        if let Some(old) = inner.entries.pop(&url) {
            inner.total_cost_kb -= old.cost_kb;
        }

        while inner.total_cost_kb + cost_kb > self.budget_kb {
            let Some((evicted, entry)) = inner.entries.pop_lru() else {
                break;
            };
            inner.total_cost_kb -= entry.cost_kb;
            trace!(url = %evicted, cost_kb = entry.cost_kb, "Evicted least recently used image");
        }

        trace!(url = %url, cost_kb = cost_kb, "Storing image in memory cache");
        inner.entries.put(url, CacheEntry { image, cost_kb });
        inner.total_cost_kb += cost_kb;
        true
    }
}

impl Default for BoundedImageCache {
    fn default() -> Self {
        Self::with_default_budget()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
    /// Summed cost of resident images in kilobytes.
    pub cost_kb: usize,
    /// Configured budget in kilobytes.
    pub budget_kb: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images, {}/{} KiB, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.cost_kb, self.budget_kb, self.hit_rate, self.hits, self.misses
        )
    }
}

impl ImageCachePort for BoundedImageCache {
    fn get(&self, url: &str) -> Option<ThumbnailImage> {
        let mut inner = self.inner.lock();
        if let Some(entry) = inner.entries.get(url) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(url = %url, "Memory cache hit");
            Some(entry.image.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(url = %url, "Memory cache miss");
            None
        }
    }

    fn peek(&self, url: &str) -> Option<ThumbnailImage> {
        self.inner.lock().entries.peek(url).map(|e| e.image.clone())
    }

    fn put(&self, url: String, image: ThumbnailImage) -> bool {
        let mut inner = self.inner.lock();
        self.insert_locked(&mut inner, url, image)
    }

    fn put_if_absent(&self, url: String, image: ThumbnailImage) -> bool {
        let mut inner = self.inner.lock();
        if inner.entries.contains(&url) {
            trace!(url = %url, "Image already cached, keeping existing entry");
            return false;
        }
        self.insert_locked(&mut inner, url, image)
    }

    fn contains(&self, url: &str) -> bool {
        self.inner.lock().entries.contains(url)
    }

    fn evict(&self, url: &str) {
        let mut inner = self.inner.lock();
        if let Some(entry) = inner.entries.pop(url) {
            inner.total_cost_kb -= entry.cost_kb;
            debug!(url = %url, "Evicted image from memory cache");
        }
    }

    fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.total_cost_kb = 0;
        debug!("Cleared memory image cache");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use test_case::test_case;

    /// 16x16 RGBA, exactly 1 KiB.
    fn one_kb() -> ThumbnailImage {
        Arc::new(image::DynamicImage::new_rgba8(16, 16))
    }

    fn sized(width: u32, height: u32) -> ThumbnailImage {
        Arc::new(image::DynamicImage::new_rgba8(width, height))
    }

    #[test]
    fn test_cache_put_and_get() {
        let cache = BoundedImageCache::new(CacheBudget::from_kb(64));
        assert!(cache.put("a.jpg".into(), sized(100, 100)));

        let retrieved = cache.get("a.jpg");
        assert_eq!(retrieved.map(|img| img.width()), Some(100));
        assert_eq!(cache.total_cost_kb(), 39);
    }

    #[test]
    fn test_cache_miss() {
        let cache = BoundedImageCache::new(CacheBudget::from_kb(64));
        assert!(cache.get("nonexistent").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_refreshes_recency() {
        let cache = BoundedImageCache::new(CacheBudget::from_kb(3));
        cache.put("A".into(), one_kb());
        cache.put("B".into(), one_kb());
        cache.put("C".into(), one_kb());

        assert!(cache.get("A").is_some());
        cache.put("D".into(), one_kb());

        assert!(cache.contains("A"));
        assert!(!cache.contains("B"));
        assert!(cache.contains("C"));
        assert!(cache.contains("D"));
    }

    #[test]
    fn test_peek_does_not_promote() {
        let cache = BoundedImageCache::new(CacheBudget::from_kb(2));
        cache.put("A".into(), one_kb());
        cache.put("B".into(), one_kb());

        let _ = cache.peek("A");
        cache.put("C".into(), one_kb());

        assert!(cache.peek("A").is_none());
        assert!(cache.peek("B").is_some());
    }

    #[test]
    fn test_eviction_frees_enough_for_large_entry() {
        let cache = BoundedImageCache::new(CacheBudget::from_kb(4));
        cache.put("A".into(), one_kb());
        cache.put("B".into(), one_kb());
        cache.put("C".into(), one_kb());

        // 32x32 RGBA = 4 KiB, needs the whole budget.
        assert!(cache.put("big".into(), sized(32, 32)));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_cost_kb(), 4);
    }

    #[test]
    fn test_oversized_entry_is_rejected() {
        let cache = BoundedImageCache::new(CacheBudget::from_kb(2));
        cache.put("A".into(), one_kb());

        assert!(!cache.put("huge".into(), sized(32, 32)));
        assert!(!cache.contains("huge"));
        assert!(cache.contains("A"));
        assert_eq!(cache.total_cost_kb(), 1);
    }

    #[test]
    fn test_put_if_absent_keeps_existing() {
        let cache = BoundedImageCache::new(CacheBudget::from_kb(64));
        assert!(cache.put_if_absent("a.jpg".into(), sized(16, 16)));
        assert!(!cache.put_if_absent("a.jpg".into(), sized(32, 32)));

        assert_eq!(cache.peek("a.jpg").map(|img| img.width()), Some(16));
        assert_eq!(cache.total_cost_kb(), 1);
    }

    #[test]
    fn test_replacing_entry_updates_cost() {
        let cache = BoundedImageCache::new(CacheBudget::from_kb(64));
        cache.put("a.jpg".into(), sized(32, 32));
        cache.put("a.jpg".into(), one_kb());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_cost_kb(), 1);
    }

    #[test]
    fn test_capacity_invariant_over_many_puts() {
        let budget = 50;
        let cache = BoundedImageCache::new(CacheBudget::from_kb(budget));

        let mut seed: u32 = 7;
        for i in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let side = 8 + (seed >> 16) % 64;
            cache.put(format!("img-{}", i % 40), sized(side, side));
            if i % 3 == 0 {
                let _ = cache.get(&format!("img-{}", (i * 7) % 40));
            }
            assert!(cache.total_cost_kb() <= budget, "budget exceeded at put {i}");
        }
    }

    #[test]
    fn test_evict_and_clear() {
        let cache = BoundedImageCache::new(CacheBudget::from_kb(64));
        cache.put("a".into(), one_kb());
        cache.put("b".into(), one_kb());

        cache.evict("a");
        assert!(!cache.contains("a"));
        assert_eq!(cache.total_cost_kb(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.total_cost_kb(), 0);
    }

    #[test]
    fn test_cache_stats() {
        let cache = BoundedImageCache::new(CacheBudget::from_kb(64));
        cache.put("test1".into(), one_kb());

        let _ = cache.get("test1");
        let _ = cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.cost_kb, 1);
        assert!(stats.to_string().starts_with("Cache: 1 images, 1/64 KiB"));
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(BoundedImageCache::new(CacheBudget::from_kb(20)));

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let cache = cache.clone();
                scope.spawn(move || {
                    for i in 0..200 {
                        let key = format!("{worker}-{}", i % 30);
                        cache.put(key.clone(), one_kb());
                        let _ = cache.get(&key);
                    }
                });
            }
        });

        assert!(cache.total_cost_kb() <= 20);
        assert_eq!(cache.len(), cache.total_cost_kb());
    }

    #[test_case(8 * 1024 * 1024 * 1024, 8, 1024 * 1024 ; "eight_gib")]
    #[test_case(512 * 1024 * 1024, 8, 64 * 1024 ; "half_gib")]
    #[test_case(0, 8, MIN_BUDGET_KB ; "unknown_memory")]
    #[test_case(4096, 0, 4 ; "zero_divisor_treated_as_one")]
    fn test_budget_from_memory_bytes(bytes: u64, divisor: u64, expected_kb: usize) {
        assert_eq!(CacheBudget::from_memory_bytes(bytes, divisor).kb(), expected_kb);
    }
}
