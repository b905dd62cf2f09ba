use common::errors::WeatherError;
use common::models::WeatherRecord;
use lru::LruCache;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;
use tracing::debug;

/// Thread-safe LRU cache of weather records keyed by city name.
///
/// City names are used verbatim, so "London" and "london" are distinct keys.
/// All operations are serialized behind one mutex; callers must not hold any
/// cache state across a remote fetch.
pub struct WeatherCache {
    inner: Mutex<LruCache<String, WeatherRecord>>,
}

impl WeatherCache {
    pub fn with_capacity(capacity: usize) -> Result<Self, WeatherError> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| WeatherError::config("cache capacity must be at least 1"))?;

        Ok(Self {
            inner: Mutex::new(LruCache::new(capacity)),
        })
    }

    pub async fn capacity(&self) -> usize {
        self.inner.lock().await.cap().get()
    }

    /// Look up a city, promoting it to most recently used on a hit.
    pub async fn get(&self, city: &str) -> Option<WeatherRecord> {
        self.inner.lock().await.get(city).cloned()
    }

    /// Insert or overwrite a city's record, marking it most recently used.
    ///
    /// Returns the key evicted to make room, if any. Overwrites never evict.
    pub async fn put(&self, city: impl Into<String>, data: WeatherRecord) -> Option<String> {
        let city = city.into();
        let mut cache = self.inner.lock().await;

        // `push` hands back the old pair on overwrite, so only a different key is an eviction
        let evicted = cache
            .push(city.clone(), data)
            .map(|(key, _)| key)
            .filter(|key| *key != city);
        if let Some(lru) = &evicted {
            debug!(city = %lru, "Evicted least recently used entry");
        }
        evicted
    }

    /// Snapshot of cached cities, least recently used first.
    pub async fn keys(&self) -> Vec<String> {
        self.inner
            .lock()
            .await
            .iter()
            .rev()
            .map(|(city, _)| city.clone())
            .collect()
    }

    /// Membership test that leaves recency untouched.
    pub async fn contains(&self, city: &str) -> bool {
        self.inner.lock().await.contains(city)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
