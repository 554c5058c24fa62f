use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use amplitude_core::{AmplitudeError, IndexSeries, MarketSource, Panel};
use amplitude_types::{CacheConfig, MarketDetails};
use lru::LruCache;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

struct LruTtlStore<K, V> {
    inner: Mutex<LruCache<K, Entry<V>>>,
    ttl: Duration,
}

impl<K: Hash + Eq, V: Clone> LruTtlStore<K, V> {
    fn new(capacity: usize, ttl: Duration) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(cap)),
            ttl,
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = guard.get(key)
            && Instant::now() <= entry.expires_at
        {
            return Some(entry.value.clone());
        }
        guard.pop(key);
        None
    }

    fn put(&self, key: K, value: V) {
        let expires_at = Instant::now() + self.ttl;
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.put(key, Entry { value, expires_at });
    }

    fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ComponentsKey {
    market: String,
    codes_csv: Option<String>,
}

impl From<&MarketDetails> for ComponentsKey {
    fn from(m: &MarketDetails) -> Self {
        Self {
            market: m.market.clone(),
            codes_csv: m.codes_csv.clone(),
        }
    }
}

/// Read-through cache in front of another [`MarketSource`].
///
/// Successful loads are kept for the configured TTL in a bounded LRU; failures are never
/// cached so a file that appears later is picked up on the next call.
pub struct CachingSource<S> {
    inner: S,
    index: LruTtlStore<String, IndexSeries>,
    components: LruTtlStore<ComponentsKey, Panel>,
}

impl<S: MarketSource> CachingSource<S> {
    /// Wrap `inner` with the given cache settings.
    #[must_use]
    pub fn new(inner: S, cfg: &CacheConfig) -> Self {
        Self {
            inner,
            index: LruTtlStore::new(cfg.max_entries, cfg.ttl()),
            components: LruTtlStore::new(cfg.max_entries, cfg.ttl()),
        }
    }

    /// The wrapped source.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop every cached load, e.g. after files were rewritten.
    pub fn clear(&self) {
        self.index.clear();
        self.components.clear();
    }

    /// Number of cached loads (index and component).
    #[must_use]
    pub fn cached(&self) -> usize {
        self.index.len() + self.components.len()
    }
}

impl<S: MarketSource> MarketSource for CachingSource<S> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn load_index(&self, idx_code: &str) -> Result<IndexSeries, AmplitudeError> {
        let key = idx_code.to_string();
        if let Some(hit) = self.index.get(&key) {
            #[cfg(feature = "tracing")]
            tracing::trace!(idx_code, "index cache hit");
            return Ok(hit);
        }
        let series = self.inner.load_index(idx_code)?;
        self.index.put(key, series.clone());
        Ok(series)
    }

    fn load_components(&self, market: &MarketDetails) -> Result<Panel, AmplitudeError> {
        let key = ComponentsKey::from(market);
        if let Some(hit) = self.components.get(&key) {
            #[cfg(feature = "tracing")]
            tracing::trace!(market = %market.market, "components cache hit");
            return Ok(hit);
        }
        let panel = self.inner.load_components(market)?;
        self.components.put(key, panel.clone());
        Ok(panel)
    }
}
