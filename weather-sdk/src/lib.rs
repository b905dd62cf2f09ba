//! Caching client for the OpenWeatherMap current-weather API.
//!
//! A [`ClientRegistry`] hands out at most one [`WeatherClient`] at a time. Each
//! client answers lookups from a bounded LRU cache and can optionally refresh
//! every cached city in the background.

pub mod api_client;
pub mod cache;
pub mod client;
pub mod config;
pub mod fetcher;
pub mod refresh;
pub mod registry;

#[cfg(test)]
mod test_support;

pub use api_client::OpenWeatherFetcher;
pub use cache::WeatherCache;
pub use client::WeatherClient;
pub use common::errors::WeatherError;
pub use common::http_client::HttpClient;
pub use common::models::WeatherRecord;
pub use config::{ClientOptions, Config};
pub use fetcher::WeatherFetcher;
pub use refresh::{RefreshFailure, RefreshScheduler, SchedulerState, TickReport};
pub use registry::ClientRegistry;
