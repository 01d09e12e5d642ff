//! Forecast fetch cache
//!
//! Each [`ForecastKey`] is fetched at most once at a time: callers asking for
//! a key whose fetch is still running wait on that same fetch. A successful
//! payload is served from memory until it is older than the configured TTL;
//! failures are never cached. Expired entries are evicted whenever a new fetch
//! starts. Fetches run as spawned tasks and finish even when no caller is left.

use crate::config::SunnyConfig;
use crate::error::{FetchFailure, SourceError};
use crate::models::{ForecastKey, Location, RawForecastPayload};
use crate::time_utils::Clock;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Anything that can produce a forecast payload for a key.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch(&self, key: &ForecastKey) -> Result<RawForecastPayload, SourceError>;
}

/// TTL and retry behaviour of a [`ForecastCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    /// Age at which a stored payload stops being served
    pub ttl: Duration,
    /// Retries after the first failed attempt
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each further retry
    pub retry_delay: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
        }
    }
}

impl CachePolicy {
    #[must_use]
    pub fn from_config(config: &SunnyConfig) -> Self {
        Self {
            ttl: Duration::from_secs(config.cache.stale_time_seconds),
            max_retries: config.weather.max_retries,
            retry_delay: Duration::from_millis(config.weather.retry_delay_ms),
        }
    }

    fn backoff(&self, retry: u32) -> Duration {
        self.retry_delay
            .saturating_mul(2_u32.saturating_pow(retry.saturating_sub(1)))
    }
}

type FetchResult = Result<Arc<RawForecastPayload>, FetchFailure>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

enum CacheEntry {
    /// Fetch in flight; every caller for the key awaits this future
    Pending(SharedFetch),
    Ready {
        payload: Arc<RawForecastPayload>,
        fetched_at: DateTime<Utc>,
    },
}

/// In-memory single-flight cache in front of a [`ForecastSource`].
pub struct ForecastCache {
    source: Arc<dyn ForecastSource>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
    entries: Mutex<HashMap<ForecastKey, CacheEntry>>,
}

impl ForecastCache {
    pub fn new(source: Arc<dyn ForecastSource>, clock: Arc<dyn Clock>, policy: CachePolicy) -> Self {
        Self {
            source,
            clock,
            policy,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub async fn get_weather(&self, date: NaiveDate, location: Location) -> FetchResult {
        self.get(ForecastKey::new(date, location)).await
    }

    /// Return the payload for `key`, fetching it if nothing fresh is stored.
    ///
    /// Concurrent calls for the same key share one fetch and all observe its
    /// outcome. A failed fetch is dropped so the next call starts over.
    #[tracing::instrument(name = "forecast_cache_get", level = "debug", skip_all, fields(key = %key))]
    pub async fn get(&self, key: ForecastKey) -> FetchResult {
        let fetch = {
            let mut entries = self.entries.lock();
            match entries.get(&key) {
                Some(CacheEntry::Ready {
                    payload,
                    fetched_at,
                }) if self.is_fresh(*fetched_at) => {
                    debug!("Key found and still fresh");
                    return Ok(Arc::clone(payload));
                }
                Some(CacheEntry::Pending(fetch)) => {
                    debug!("Joining in-flight fetch");
                    fetch.clone()
                }
                _ => {
                    debug!("Key not found or expired, starting fetch");
                    self.evict_expired(&mut entries);
                    let fetch = self.start_fetch(key);
                    entries.insert(key, CacheEntry::Pending(fetch.clone()));
                    fetch
                }
            }
        };

        let result = fetch.clone().await;
        self.settle(key, &fetch, &result);
        result
    }

    /// Number of stored entries, in flight or ready.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_fresh(&self, fetched_at: DateTime<Utc>) -> bool {
        let ttl = TimeDelta::from_std(self.policy.ttl).unwrap_or(TimeDelta::MAX);
        self.clock.now() - fetched_at < ttl
    }

    fn evict_expired(&self, entries: &mut HashMap<ForecastKey, CacheEntry>) {
        let before = entries.len();
        entries.retain(|_, entry| match entry {
            CacheEntry::Ready { fetched_at, .. } => self.is_fresh(*fetched_at),
            CacheEntry::Pending(_) => true,
        });
        let evicted = before - entries.len();
        if evicted > 0 {
            debug!("Evicted {} expired entries", evicted);
        }
    }

    /// Spawn the retrying fetch so it runs to completion even if every caller goes away.
    fn start_fetch(&self, key: ForecastKey) -> SharedFetch {
        let source = Arc::clone(&self.source);
        let policy = self.policy.clone();
        let handle = tokio::spawn(async move {
            fetch_with_retry(source.as_ref(), &key, &policy)
                .await
                .map(Arc::new)
        });
        async move {
            handle.await.unwrap_or_else(|e| {
                error!("Fetch task for {} did not finish: {}", key, e);
                Err(FetchFailure::new())
            })
        }
        .boxed()
        .shared()
    }

    /// Replace the pending entry with the fetch outcome, once per fetch.
    fn settle(&self, key: ForecastKey, fetch: &SharedFetch, result: &FetchResult) {
        let mut entries = self.entries.lock();
        let is_this_fetch = matches!(
            entries.get(&key),
            Some(CacheEntry::Pending(pending)) if Shared::ptr_eq(pending, fetch)
        );
        if !is_this_fetch {
            return;
        }

        match result {
            Ok(payload) => {
                entries.insert(
                    key,
                    CacheEntry::Ready {
                        payload: Arc::clone(payload),
                        fetched_at: self.clock.now(),
                    },
                );
            }
            Err(_) => {
                entries.remove(&key);
            }
        }
    }
}

async fn fetch_with_retry(
    source: &dyn ForecastSource,
    key: &ForecastKey,
    policy: &CachePolicy,
) -> Result<RawForecastPayload, FetchFailure> {
    let max_attempts = policy.max_retries.saturating_add(1);

    for attempt in 0..max_attempts {
        if attempt > 0 {
            let wait = policy.backoff(attempt);
            debug!("Sleeping {:?} before retry", wait);
            tokio::time::sleep(wait).await;
        }

        debug!("Fetching {} (attempt {}/{})", key, attempt + 1, max_attempts);
        match source.fetch(key).await {
            Ok(payload) => {
                if attempt > 0 {
                    info!("Fetched {} after {} attempts", key, attempt + 1);
                }
                return Ok(payload);
            }
            Err(e) => {
                warn!(
                    "Fetch attempt {}/{} for {} failed: {}",
                    attempt + 1,
                    max_attempts,
                    key,
                    e
                );
            }
        }
    }

    error!("Giving up on {} after {} attempts", key, max_attempts);
    Err(FetchFailure::new())
}
