#![allow(dead_code)]

use async_trait::async_trait;
use clap::Parser;
use discgolf_tournaments::args::Args;
use discgolf_tournaments::cache::{CacheError, CacheStore};
use discgolf_tournaments::controller::client::Upstream;
use discgolf_tournaments::error::AppError;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const OFFICIAL_URL: &str = "https://official.test/kilpailut/";
pub const METRIX_URL: &str = "https://metrix.test/feed.json";
pub const BAGTAG_URL: &str = "https://bagtag.test/status";
pub const RATINGS_URL: &str = "https://ratings.test/latest";
pub const PRODUCTS_URL: &str = "https://products.test/search";

pub const OFFICIAL_HTML: &str = include_str!("official_listing.html");
pub const METRIX_FEED: &str = include_str!("metrix_feed.json");

/// Canned upstream answering by exact url.
#[derive(Default)]
pub struct FakeUpstream {
    responses: HashMap<String, Result<String, AppError>>,
    calls: Mutex<Vec<String>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn failing(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(
            url.to_string(),
            Err(AppError::Upstream {
                url: url.to_string(),
                status,
            }),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn get_text(&self, url: &str) -> Result<String, AppError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(AppError::Network(format!("no route to {url}"))))
    }
}

/// Cache whose transport is down.
#[derive(Default)]
pub struct BrokenCache {
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
}

#[async_trait]
impl CacheStore for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: String, _expire: Duration) -> Result<(), CacheError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

/// Cache whose writes never complete.
#[derive(Default)]
pub struct StalledCache;

#[async_trait]
impl CacheStore for StalledCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String, _expire: Duration) -> Result<(), CacheError> {
        std::future::pending().await
    }
}

/// Cache writes run on spawned tasks; yielding lets them land.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

pub fn test_args(production: bool) -> Args {
    let run_mode = if production { "production" } else { "development" };
    Args::try_parse_from([
        "discgolf-tournaments",
        "--official-url",
        OFFICIAL_URL,
        "--metrix-url",
        METRIX_URL,
        "--bagtag-endpoint",
        BAGTAG_URL,
        "--ratings-endpoint",
        RATINGS_URL,
        "--products-endpoint",
        PRODUCTS_URL,
        "--run-mode",
        run_mode,
    ])
    .unwrap()
}
