//! Pass-through endpoints for feeds that need no normalization.

use actix_web::HttpResponse;
use actix_web::web::{Data, Path};
use log::error;
use reqwest::Url;
use serde_json::{Value, json};

use crate::controller::client::Upstream;
use crate::controller::tournaments::json_body;
use crate::error::AppError;
use crate::state::AppState;

/// What the proxies answer with on any failure.
pub const GENERIC_FAILURE: &str = "An error occured";

pub const RATINGS_KEY: &str = "ratings";

#[must_use]
pub fn products_key(kind: &str, query: &str) -> String {
    format!("products:{kind}:{query}")
}

/// `<endpoint>/<kind>?q=<query>`, with both parts percent-encoded.
///
/// # Errors
///
/// Will return `Err` if the endpoint cannot carry path segments
pub fn products_url(endpoint: &Url, kind: &str, query: &str) -> Result<Url, AppError> {
    let mut url = endpoint.clone();
    url.path_segments_mut()
        .map_err(|()| AppError::Config(format!("{endpoint} cannot be a products endpoint")))?
        .pop_if_empty()
        .push(kind);
    url.query_pairs_mut().append_pair("q", query);
    Ok(url)
}

async fn fetch_json(upstream: &dyn Upstream, url: &Url) -> Result<Value, AppError> {
    let body = upstream.get_text(url.as_str()).await?;
    Ok(serde_json::from_str(&body)?)
}

fn configured<'a>(endpoint: Option<&'a Url>, name: &str) -> Result<&'a Url, AppError> {
    endpoint.ok_or_else(|| AppError::Config(format!("{name} is not configured")))
}

fn generic_failure(route: &str, err: &AppError) -> HttpResponse {
    error!("{route}: {err}");
    HttpResponse::InternalServerError().json(json!({ "message": GENERIC_FAILURE }))
}

async fn fetch_bagtag(state: &AppState) -> Result<Value, AppError> {
    let url = configured(state.endpoints.bagtag.as_ref(), "BAGTAG_ENDPOINT")?;
    fetch_json(state.upstream.as_ref(), url).await
}

async fn fetch_products(state: &AppState, kind: &str, query: &str) -> Result<String, AppError> {
    let endpoint = configured(state.endpoints.products.as_ref(), "PRODUCTS_ENDPOINT")?;
    let url = products_url(endpoint, kind, query)?;
    let upstream = state.upstream.as_ref();
    state
        .orchestrator
        .fetch_with_cache(&products_key(kind, query), || fetch_json(upstream, &url))
        .await
}

async fn fetch_ratings(state: &AppState) -> Result<String, AppError> {
    let url = configured(state.endpoints.ratings.as_ref(), "RATINGS_ENDPOINT")?;
    let upstream = state.upstream.as_ref();
    state
        .orchestrator
        .fetch_with_cache(RATINGS_KEY, || fetch_json(upstream, url))
        .await
}

/// Passed through uncached.
pub async fn bagtag(state: Data<AppState>) -> HttpResponse {
    match fetch_bagtag(&state).await {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => generic_failure("/bagtag", &e),
    }
}

pub async fn products(state: Data<AppState>, path: Path<(String, String)>) -> HttpResponse {
    let (kind, query) = path.into_inner();
    match fetch_products(&state, &kind, &query).await {
        Ok(body) => json_body(body),
        Err(e) => generic_failure("/products", &e),
    }
}

pub async fn ratings(state: Data<AppState>) -> HttpResponse {
    match fetch_ratings(&state).await {
        Ok(body) => json_body(body),
        Err(e) => generic_failure("/ratings", &e),
    }
}
