mod common;

use common::{
    BrokenCache, FakeUpstream, METRIX_FEED, METRIX_URL, OFFICIAL_HTML, OFFICIAL_URL, StalledCache,
    settle, test_args,
};
use discgolf_tournaments::args::RunMode;
use discgolf_tournaments::cache::{CacheStore, MemoryCache};
use discgolf_tournaments::controller::cache::{CACHE_DURATION, Orchestrator};
use discgolf_tournaments::controller::tournaments::{Source, get_tournaments};
use discgolf_tournaments::error::AppError;
use discgolf_tournaments::model::TournamentRecord;
use discgolf_tournaments::state::AppState;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

async fn warm(cache: &MemoryCache, key: &str, value: &str) {
    cache
        .set(key, value.to_string(), Duration::from_secs(60))
        .await
        .unwrap();
}

#[tokio::test]
async fn test4_production_serves_fresh_cache_without_scraping() {
    let cache = MemoryCache::new();
    warm(&cache, "official", r#"[{"cached":true}]"#).await;
    let orchestrator = Orchestrator::new(Arc::new(cache), RunMode::Production, CACHE_DURATION);

    let scrapes = AtomicUsize::new(0);
    let counter = &scrapes;
    let body = orchestrator
        .fetch_with_cache("official", move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::<TournamentRecord>::new())
        })
        .await
        .unwrap();

    assert_eq!(body, r#"[{"cached":true}]"#);
    assert_eq!(scrapes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test4_failed_scrape_with_empty_cache_is_an_error() {
    let orchestrator =
        Orchestrator::new(Arc::new(MemoryCache::new()), RunMode::Production, CACHE_DURATION);

    let result = orchestrator
        .fetch_with_cache("metrix", || async {
            Err::<Vec<TournamentRecord>, _>(AppError::Network("connection reset".to_string()))
        })
        .await;

    match result {
        Err(AppError::Network(msg)) => assert_eq!(msg, "connection reset"),
        other => panic!("expected the scrape error, got {other:?}"),
    }
}

#[tokio::test]
async fn test4_miss_scrapes_and_writes_through() {
    let cache = Arc::new(MemoryCache::new());
    let orchestrator = Orchestrator::new(cache.clone(), RunMode::Production, CACHE_DURATION);

    let body = orchestrator
        .fetch_with_cache("ratings", || async { Ok(vec![1, 2, 3]) })
        .await
        .unwrap();

    assert_eq!(body, "[1,2,3]");
    settle().await;
    assert_eq!(cache.get("ratings").await.unwrap().as_deref(), Some("[1,2,3]"));
}

#[tokio::test]
async fn test4_development_skips_cache_reads_but_still_writes() {
    let cache = Arc::new(MemoryCache::new());
    warm(&cache, "official", "[\"old\"]").await;
    let orchestrator = Orchestrator::new(cache.clone(), RunMode::Development, CACHE_DURATION);

    let body = orchestrator
        .fetch_with_cache("official", || async { Ok(vec!["new"]) })
        .await
        .unwrap();

    assert_eq!(body, "[\"new\"]");
    settle().await;
    assert_eq!(cache.get("official").await.unwrap().as_deref(), Some("[\"new\"]"));
}

#[tokio::test]
async fn test4_failed_scrape_falls_back_to_cached_copy() {
    let cache = Arc::new(MemoryCache::new());
    warm(&cache, "metrix", "[\"kept\"]").await;
    let orchestrator = Orchestrator::new(cache, RunMode::Development, CACHE_DURATION);

    let body = orchestrator
        .fetch_with_cache("metrix", || async {
            Err::<Vec<String>, _>(AppError::Upstream {
                url: METRIX_URL.to_string(),
                status: 503,
            })
        })
        .await
        .unwrap();

    assert_eq!(body, "[\"kept\"]");
}

#[tokio::test]
async fn test4_broken_cache_never_blocks_a_scrape() {
    let cache = Arc::new(BrokenCache::default());
    let orchestrator = Orchestrator::new(cache.clone(), RunMode::Production, CACHE_DURATION);

    let body = orchestrator
        .fetch_with_cache("official", || async { Ok(vec!["fresh"]) })
        .await
        .unwrap();

    assert_eq!(body, "[\"fresh\"]");
    settle().await;
    assert_eq!(cache.gets.load(Ordering::SeqCst), 1);
    assert_eq!(cache.sets.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test4_broken_cache_and_failed_scrape_is_still_the_scrape_error() {
    let orchestrator =
        Orchestrator::new(Arc::new(BrokenCache::default()), RunMode::Production, CACHE_DURATION);

    let result = orchestrator
        .fetch_with_cache("official", || async {
            Err::<Vec<String>, _>(AppError::Network("timed out".to_string()))
        })
        .await;

    assert!(matches!(result, Err(AppError::Network(_))));
}

#[tokio::test]
async fn test4_expired_entries_are_scraped_again() {
    let cache = Arc::new(MemoryCache::new());
    let orchestrator = Orchestrator::new(cache, RunMode::Production, Duration::ZERO);

    let scrapes = AtomicUsize::new(0);
    let counter = &scrapes;
    for _ in 0..2 {
        orchestrator
            .fetch_with_cache("official", move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Vec::<TournamentRecord>::new())
            })
            .await
            .unwrap();
    }
    assert_eq!(scrapes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test4_metrix_output_round_trips_to_primaries_only() {
    let upstream = Arc::new(FakeUpstream::new().with(METRIX_URL, METRIX_FEED));
    let state = AppState::new(Arc::new(MemoryCache::new()), upstream, &test_args(true));

    let body = get_tournaments(&state, Source::Metrix).await.unwrap();
    let parsed: Vec<TournamentRecord> = serde_json::from_str(&body).unwrap();

    assert_eq!(parsed.len(), 3);
    assert!(parsed.iter().all(|t| t.round.is_some()));
}

#[tokio::test]
async fn test4_second_production_request_comes_from_cache() {
    let upstream = Arc::new(FakeUpstream::new().with(OFFICIAL_URL, OFFICIAL_HTML));
    let state = AppState::new(Arc::new(MemoryCache::new()), upstream.clone(), &test_args(true));

    let first = get_tournaments(&state, Source::Official).await.unwrap();
    settle().await;
    let second = get_tournaments(&state, Source::Official).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(upstream.call_count(), 1);
    let parsed: Value = serde_json::from_str(&first).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test4_development_requests_always_scrape() {
    let upstream = Arc::new(FakeUpstream::new().with(OFFICIAL_URL, OFFICIAL_HTML));
    let state = AppState::new(Arc::new(MemoryCache::new()), upstream.clone(), &test_args(false));

    get_tournaments(&state, Source::Official).await.unwrap();
    get_tournaments(&state, Source::Official).await.unwrap();

    assert_eq!(upstream.call_count(), 2);
}

#[tokio::test]
async fn test4_slow_cache_write_does_not_hold_the_response() {
    let orchestrator =
        Orchestrator::new(Arc::new(StalledCache), RunMode::Production, CACHE_DURATION);

    let body = tokio::time::timeout(
        Duration::from_secs(5),
        orchestrator.fetch_with_cache("official", || async { Ok(vec!["fresh"]) }),
    )
    .await
    .expect("response waited on the cache write")
    .unwrap();

    assert_eq!(body, "[\"fresh\"]");
}

#[test]
fn test4_default_ttl_is_the_cache_duration() {
    assert_eq!(test_args(true).cache_ttl(), CACHE_DURATION);
    assert_eq!(CACHE_DURATION, Duration::from_secs(3 * 60 * 60));
}
