use common::errors::WeatherError;
use common::models::WeatherRecord;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use crate::cache::WeatherCache;
use crate::config::ClientOptions;
use crate::fetcher::WeatherFetcher;
use crate::refresh::{RefreshScheduler, TickReport};

/// Read-through weather client bound to one API key.
///
/// Lookups are answered from an LRU cache when possible; misses go to the
/// fetcher and successful results are cached. Failed lookups are never cached.
pub struct WeatherClient {
    api_key: Arc<str>,
    cache: Arc<WeatherCache>,
    fetcher: Arc<dyn WeatherFetcher>,
    scheduler: RefreshScheduler,
    options: ClientOptions,
}

impl std::fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherClient")
            .field("api_key", &"<redacted>")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl WeatherClient {
    pub fn new(
        api_key: impl Into<String>,
        fetcher: Arc<dyn WeatherFetcher>,
        options: ClientOptions,
    ) -> Result<Self, WeatherError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(WeatherError::config("API key must not be empty"));
        }
        if options.refresh_interval.is_zero() {
            return Err(WeatherError::config("refresh interval must be greater than zero"));
        }

        let api_key: Arc<str> = api_key.into();
        let cache = Arc::new(WeatherCache::with_capacity(options.cache_capacity)?);
        let scheduler = RefreshScheduler::new(cache.clone(), fetcher.clone(), api_key.clone());

        Ok(Self {
            api_key,
            cache,
            fetcher,
            scheduler,
            options,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn options(&self) -> ClientOptions {
        self.options
    }

    /// Current weather for `city`, served from cache when present.
    #[instrument(skip(self), fields(city = %city))]
    pub async fn get_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        if let Some(cached) = self.cache.get(city).await {
            info!(city = %city, "Cache hit");
            return Ok(cached);
        }

        info!(city = %city, "Fetching weather from API");
        let weather = self.fetcher.fetch(city, &self.api_key).await?;

        self.cache.put(city, weather.clone()).await;

        Ok(weather)
    }

    /// Cached cities, least recently used first.
    pub async fn cached_cities(&self) -> Vec<String> {
        self.cache.keys().await
    }

    /// Start background refresh; `false` if it is already running.
    pub async fn start_polling(&self, period: Duration) -> bool {
        self.scheduler.start(period).await
    }

    pub async fn stop_polling(&self) -> bool {
        self.scheduler.stop().await
    }

    pub async fn is_polling(&self) -> bool {
        self.scheduler.is_running().await
    }

    /// Refresh every cached city now, outside the polling schedule.
    pub async fn refresh_now(&self) -> TickReport {
        self.scheduler.refresh_now().await
    }
}
