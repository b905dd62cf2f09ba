use crate::fetcher::WeatherFetcher;
use async_trait::async_trait;
use common::errors::WeatherError;
use common::models::WeatherRecord;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn record(main: &str, temp: f64) -> WeatherRecord {
    WeatherRecord::new(main, format!("{} today", main.to_lowercase()), temp, temp - 2.0)
}

/// In-memory fetcher with scripted per-city outcomes.
///
/// Cities without a scripted outcome report `CityNotFound`.
#[derive(Default)]
pub struct StubFetcher {
    outcomes: Mutex<HashMap<String, Result<WeatherRecord, WeatherError>>>,
    calls: Mutex<Vec<(String, String)>>,
    total: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, city: &str, outcome: Result<WeatherRecord, WeatherError>) {
        self.outcomes.lock().unwrap().insert(city.to_string(), outcome);
    }

    pub fn call_count(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, city: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(c, _)| c == city).count()
    }

    pub fn api_keys_seen(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, k)| k.clone()).collect()
    }
}

#[async_trait]
impl WeatherFetcher for StubFetcher {
    async fn fetch(&self, city: &str, api_key: &str) -> Result<WeatherRecord, WeatherError> {
        self.total.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((city.to_string(), api_key.to_string()));
        self.outcomes
            .lock()
            .unwrap()
            .get(city)
            .cloned()
            .unwrap_or_else(|| Err(WeatherError::CityNotFound(city.to_string())))
    }
}
