use crate::errors::HttpError;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

const BASE_BACKOFF_MS: u64 = 100;
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Delay before retry number `attempt + 1`: 100ms doubling, capped at five seconds.
fn backoff_for(attempt: u32) -> Duration {
    let millis = BASE_BACKOFF_MS.saturating_mul(2_u64.saturating_pow(attempt));
    Duration::from_millis(millis).min(MAX_BACKOFF)
}

/// HTTP client with retry logic and timeout
pub struct HttpClient {
    client: Client,
    max_retries: u32,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration, max_retries: u32) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;

        Ok(Self {
            client,
            max_retries,
            timeout,
        })
    }

    /// Fetch JSON from URL, retrying transient failures with exponential backoff.
    ///
    /// Client errors (4xx other than 429) are returned on the first attempt.
    /// `label` is logged in place of the URL, which may carry credentials.
    #[instrument(skip_all, fields(request = %label))]
    pub async fn get_json<T>(&self, url: &str, label: &str) -> Result<T, HttpError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut attempt = 0;

        loop {
            match self.fetch_with_timeout(url).await {
                Ok(response) => {
                    info!(attempt = attempt + 1, "Request successful");
                    return Ok(response);
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let backoff = backoff_for(attempt);
                    warn!(
                        attempt = attempt + 1,
                        backoff_ms = backoff.as_millis(),
                        error = %e,
                        "Request failed, retrying with exponential backoff"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(attempts = attempt + 1, error = %e, "Request failed");
                    return Err(e);
                }
            }
        }
    }

    async fn fetch_with_timeout<T>(&self, url: &str) -> Result<T, HttpError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| HttpError::timeout(format!("no response within {:?}", self.timeout)))?
            .map_err(|e| {
                if e.is_timeout() {
                    HttpError::timeout(format!("no response within {:?}", self.timeout))
                } else {
                    HttpError::Network(e.without_url())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("unexpected status"),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| HttpError::Network(e.without_url()))?;
        let json: T = serde_json::from_str(&text)?;

        Ok(json)
    }
}
