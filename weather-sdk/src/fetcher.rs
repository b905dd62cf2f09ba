use async_trait::async_trait;
use common::errors::WeatherError;
use common::models::WeatherRecord;

/// One remote lookup of the current weather for a city.
///
/// Implementations classify failures as `InvalidCredential`, `CityNotFound`
/// or `Transport`. Callers never retry; any retry or timeout policy belongs
/// to the implementation.
#[async_trait]
pub trait WeatherFetcher: Send + Sync {
    async fn fetch(&self, city: &str, api_key: &str) -> Result<WeatherRecord, WeatherError>;
}
