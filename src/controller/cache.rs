use crate::args::RunMode;
use crate::cache::CacheStore;
use crate::error::AppError;
use log::{debug, error, warn};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub const CACHE_DURATION: Duration = Duration::from_secs(3 * 60 * 60);

/// Serves serialized scrape results out of a [`CacheStore`], scraping only
/// when nothing usable is cached.
#[derive(Clone)]
pub struct Orchestrator {
    cache: Arc<dyn CacheStore>,
    run_mode: RunMode,
    ttl: Duration,
}

impl Orchestrator {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheStore>, run_mode: RunMode, ttl: Duration) -> Self {
        Self {
            cache,
            run_mode,
            ttl,
        }
    }

    /// Returns the cached payload for `key` when running in production and one
    /// is present. Otherwise runs `scrape`, writes its serialized result
    /// through to the cache (in every run mode) and returns it. The write runs
    /// on its own task and does not hold up the response.
    ///
    /// When `scrape` fails, whatever the cache still holds for `key` is
    /// served instead; with nothing cached the scrape error is returned.
    /// Cache failures never change the outcome, they only get logged.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the scrape fails with nothing cached, or its
    /// result cannot be serialized
    pub async fn fetch_with_cache<T, F, Fut>(
        &self,
        key: &str,
        scrape: F,
    ) -> Result<String, AppError>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        if self.run_mode.reads_cache() {
            if let Some(cached) = self.read(key).await {
                debug!("cache hit for {key}");
                return Ok(cached);
            }
            debug!("cache miss for {key}");
        }

        match scrape().await {
            Ok(data) => {
                let serialized = serde_json::to_string(&data)?;
                self.write(key, &serialized);
                Ok(serialized)
            }
            Err(e) => {
                if let Some(stale) = self.read(key).await {
                    warn!("scrape for {key} failed ({e}), serving cached copy");
                    return Ok(stale);
                }
                error!("scrape for {key} failed: {e}");
                Err(e)
            }
        }
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.cache.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("cache read for {key} failed, treating as miss: {e}");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        let cache = Arc::clone(&self.cache);
        let (key, value, ttl) = (key.to_string(), value.to_string(), self.ttl);
        tokio::spawn(async move {
            if let Err(e) = cache.set(&key, value, ttl).await {
                warn!("cache write for {key} failed: {e}");
            }
        });
    }
}
