use async_trait::async_trait;
use common::errors::WeatherError;
use common::http_client::HttpClient;
use common::models::WeatherRecord;
use serde::Deserialize;
use tracing::{error, instrument};

use crate::config::Config;
use crate::fetcher::WeatherFetcher;

#[derive(Debug, Deserialize)]
struct OpenWeatherResponse {
    weather: Vec<Condition>,
    main: Measurements,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct Measurements {
    temp: f64,
    feels_like: f64,
}

/// Fetcher backed by the OpenWeatherMap current-weather endpoint
pub struct OpenWeatherFetcher {
    http_client: HttpClient,
    base_url: String,
}

impl OpenWeatherFetcher {
    pub fn new(base_url: impl Into<String>, http_client: HttpClient) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let http_client = HttpClient::new(config.http_timeout, config.http_max_retries)?;
        Ok(Self::new(config.openweather_url.clone(), http_client))
    }

    fn url_for(&self, city: &str, api_key: &str) -> String {
        format!(
            "{}?q={}&appid={}",
            self.base_url,
            urlencoding::encode(city),
            urlencoding::encode(api_key)
        )
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherFetcher {
    #[instrument(skip(self, api_key), fields(city = %city))]
    async fn fetch(&self, city: &str, api_key: &str) -> Result<WeatherRecord, WeatherError> {
        let url = self.url_for(city, api_key);

        let response: OpenWeatherResponse = self
            .http_client
            .get_json(&url, city)
            .await
            .map_err(|e| WeatherError::from_http(e, city))
            .inspect_err(|e| error!(city = %city, error = %e, "Weather lookup failed"))?;

        let condition = response.weather.into_iter().next().ok_or_else(|| {
            WeatherError::transport(format!("response for {} has no weather conditions", city))
        })?;

        Ok(WeatherRecord::new(
            condition.main,
            condition.description,
            response.main.temp,
            response.main.feels_like,
        ))
    }
}
