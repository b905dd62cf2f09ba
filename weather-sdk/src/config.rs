use common::tracing::LogFormat;
use std::env;
use std::time::Duration;

pub const DEFAULT_CACHE_CAPACITY: usize = 10;
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Per-client tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    pub cache_capacity: usize,
    pub refresh_interval: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

pub struct Config {
    pub api_key: Option<String>,
    pub openweather_url: String,
    pub client: ClientOptions,
    pub polling_enabled: bool,
    pub http_timeout: Duration,
    pub http_max_retries: u32,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            api_key: lookup("OPENWEATHER_API_KEY").filter(|k| !k.trim().is_empty()),
            openweather_url: lookup("OPENWEATHER_URL")
                .unwrap_or_else(|| DEFAULT_OPENWEATHER_URL.to_string()),
            client: ClientOptions {
                cache_capacity: parsed("CACHE_CAPACITY")
                    .and_then(|c| usize::try_from(c).ok())
                    .unwrap_or(DEFAULT_CACHE_CAPACITY),
                refresh_interval: parsed("REFRESH_INTERVAL_SECS")
                    .filter(|s| *s > 0)
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_REFRESH_INTERVAL),
            },
            polling_enabled: lookup("POLLING_ENABLED")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            http_timeout: Duration::from_secs(parsed("HTTP_TIMEOUT_SECS").unwrap_or(5)),
            http_max_retries: parsed("HTTP_MAX_RETRIES")
                .and_then(|r| u32::try_from(r).ok())
                .unwrap_or(2),
            log_format: lookup("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        }
    }
}
