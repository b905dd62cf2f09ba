use common::errors::WeatherError;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::client::WeatherClient;
use crate::config::ClientOptions;
use crate::fetcher::WeatherFetcher;

/// Holds at most one live [`WeatherClient`].
///
/// Asking for the key of the tracked client returns that same client; asking
/// for any other key stops the tracked client's polling and replaces it.
/// Callers that still hold an `Arc` to a replaced client can keep using it for
/// lookups, but it no longer refreshes in the background.
pub struct ClientRegistry {
    fetcher: Arc<dyn WeatherFetcher>,
    options: ClientOptions,
    slot: Mutex<Option<Arc<WeatherClient>>>,
}

impl ClientRegistry {
    pub fn new(fetcher: Arc<dyn WeatherFetcher>, options: ClientOptions) -> Self {
        Self {
            fetcher,
            options,
            slot: Mutex::new(None),
        }
    }

    /// Client for `api_key`, creating or replacing the tracked one as needed.
    ///
    /// `polling_enabled` only applies when a new client is created; a reused
    /// client keeps its current polling state.
    pub async fn get_instance(
        &self,
        api_key: &str,
        polling_enabled: bool,
    ) -> Result<Arc<WeatherClient>, WeatherError> {
        let mut slot = self.slot.lock().await;

        if let Some(existing) = slot.as_ref()
            && existing.api_key() == api_key
        {
            info!("Reusing existing weather client");
            return Ok(existing.clone());
        }

        let client = Arc::new(WeatherClient::new(
            api_key,
            self.fetcher.clone(),
            self.options,
        )?);

        if let Some(previous) = slot.take() {
            previous.stop_polling().await;
            info!("Replaced weather client for a different API key");
        }

        if polling_enabled {
            client.start_polling(self.options.refresh_interval).await;
        }

        info!(polling = polling_enabled, "Created weather client");
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Forget the tracked client if it belongs to `api_key`, stopping its polling.
    ///
    /// Returns `false` without side effects when the key does not match. A
    /// refresh tick already in progress still completes.
    pub async fn remove_instance(&self, api_key: &str) -> bool {
        let mut slot = self.slot.lock().await;

        let matches = slot
            .as_ref()
            .is_some_and(|client| client.api_key() == api_key);
        if !matches {
            return false;
        }

        if let Some(client) = slot.take() {
            client.stop_polling().await;
            info!("Removed weather client");
        }
        true
    }

    pub async fn current(&self) -> Option<Arc<WeatherClient>> {
        self.slot.lock().await.clone()
    }
}
