//! Background refresh of cached cities.
//!
//! A [`RefreshScheduler`] owns at most one periodic tokio task. Each tick takes
//! a snapshot of the cache keys and re-fetches them one by one, writing every
//! successful result back into the cache. Failures are logged and collected in
//! a [`TickReport`]; they never stop the task.
//!
//! Stopping cancels future ticks only. A tick that is already running finishes
//! and may still write to the cache after [`RefreshScheduler::stop`] returned.
//! Likewise a city evicted between the snapshot and its refresh is inserted
//! again by that refresh.

use chrono::{DateTime, Utc};
use common::errors::WeatherError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, info, info_span, instrument, warn};

use crate::cache::WeatherCache;
use crate::fetcher::WeatherFetcher;

/// A city whose refresh failed during a tick
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshFailure {
    pub city: String,
    pub error: WeatherError,
}

/// Outcome of one refresh pass over the cache
#[derive(Debug, Clone)]
pub struct TickReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub refreshed: Vec<String>,
    pub failures: Vec<RefreshFailure>,
}

impl TickReport {
    pub fn attempted(&self) -> usize {
        self.refreshed.len() + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

#[derive(Clone)]
struct RefreshWorker {
    cache: Arc<WeatherCache>,
    fetcher: Arc<dyn WeatherFetcher>,
    api_key: Arc<str>,
}

impl RefreshWorker {
    #[instrument(skip(self))]
    async fn tick(&self) -> TickReport {
        let started_at = Utc::now();
        let cities = self.cache.keys().await;
        info!(count = cities.len(), "Refreshing cached cities");

        let mut refreshed = Vec::with_capacity(cities.len());
        let mut failures = Vec::new();

        for city in cities {
            match self.fetcher.fetch(&city, &self.api_key).await {
                Ok(record) => {
                    self.cache.put(city.clone(), record).await;
                    refreshed.push(city);
                }
                Err(error) => {
                    warn!(city = %city, error = %error, "Refresh failed, keeping cached entry");
                    failures.push(RefreshFailure { city, error });
                }
            }
        }

        let report = TickReport {
            started_at,
            finished_at: Utc::now(),
            refreshed,
            failures,
        };
        info!(
            refreshed = report.refreshed.len(),
            failed = report.failures.len(),
            "Refresh completed"
        );
        report
    }

    async fn run(self, period: Duration, cancel: CancellationToken) {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }
            self.tick().await;
        }

        info!("Refresh task stopped");
    }
}

/// Periodic re-fetch of every cached city.
pub struct RefreshScheduler {
    worker: RefreshWorker,
    running: Mutex<Option<CancellationToken>>,
}

impl RefreshScheduler {
    pub fn new(
        cache: Arc<WeatherCache>,
        fetcher: Arc<dyn WeatherFetcher>,
        api_key: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            worker: RefreshWorker {
                cache,
                fetcher,
                api_key: api_key.into(),
            },
            running: Mutex::new(None),
        }
    }

    /// Spawn the periodic task; the first tick fires one `period` from now.
    ///
    /// Returns `false` and changes nothing if the scheduler is already running
    /// or `period` is zero. Must be called from within a tokio runtime.
    pub async fn start(&self, period: Duration) -> bool {
        if period.is_zero() {
            warn!("Refusing to start refresh scheduler with a zero period");
            return false;
        }

        let mut running = self.running.lock().await;
        if running.is_some() {
            warn!("Refresh scheduler already running");
            return false;
        }

        let cancel = CancellationToken::new();
        let span = info_span!("refresh_scheduler", period_secs = period.as_secs());
        tokio::spawn(
            self.worker
                .clone()
                .run(period, cancel.clone())
                .instrument(span),
        );
        *running = Some(cancel);

        info!(period_secs = period.as_secs(), "Refresh scheduler started");
        true
    }

    /// Cancel future ticks. Returns whether a task was running.
    pub async fn stop(&self) -> bool {
        match self.running.lock().await.take() {
            Some(cancel) => {
                cancel.cancel();
                info!("Refresh scheduler stopping");
                true
            }
            None => false,
        }
    }

    pub async fn state(&self) -> SchedulerState {
        if self.running.lock().await.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    pub async fn is_running(&self) -> bool {
        self.state().await == SchedulerState::Running
    }

    /// Run one refresh pass inline, independent of the periodic task.
    pub async fn refresh_now(&self) -> TickReport {
        self.worker.tick().await
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(cancel) = self.running.get_mut().take() {
            cancel.cancel();
        }
    }
}
