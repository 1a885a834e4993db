use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug, Clone)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),
    #[error("expiry out of range: {0:?}")]
    InvalidExpiry(Duration),
}

/// Key/value store holding serialized payloads. Values are opaque strings.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// `Ok(None)` is a miss, including an entry that has expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: String, expire: Duration) -> Result<(), CacheError>;
}

#[derive(Clone, Debug)]
pub struct CachedValue {
    pub data: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedValue {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

pub type CacheMap = Arc<RwLock<HashMap<String, CachedValue>>>;

/// In-process store. Expired entries are evicted when they are next read.
#[derive(Clone, Default)]
pub struct MemoryCache {
    map: CacheMap,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Utc::now();
        {
            let map = self.map.read().await;
            match map.get(key) {
                Some(entry) if entry.is_fresh(now) => return Ok(Some(entry.data.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut map = self.map.write().await;
        // another writer may have refreshed it in between
        if map.get(key).is_some_and(|entry| !entry.is_fresh(now)) {
            map.remove(key);
        }
        Ok(map.get(key).map(|entry| entry.data.clone()))
    }

    async fn set(&self, key: &str, value: String, expire: Duration) -> Result<(), CacheError> {
        let ttl =
            chrono::Duration::from_std(expire).map_err(|_| CacheError::InvalidExpiry(expire))?;
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or(CacheError::InvalidExpiry(expire))?;
        self.map.write().await.insert(
            key.to_string(),
            CachedValue {
                data: value,
                expires_at,
            },
        );
        Ok(())
    }
}
