use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use actix_web::web::Data;
use reqwest::Url;

use crate::controller::client::Upstream;
use crate::controller::metrix::parse_metrix_text;
use crate::controller::official::parse_official;
use crate::error::AppError;
use crate::model::TournamentRecord;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Official,
    Metrix,
}

impl Source {
    #[must_use]
    pub const fn cache_key(self) -> &'static str {
        match self {
            Self::Official => "official",
            Self::Metrix => "metrix",
        }
    }
}

/// # Errors
///
/// Will return `Err` if the listing page cannot be fetched
pub async fn fetch_official(
    upstream: &dyn Upstream,
    url: &Url,
) -> Result<Vec<TournamentRecord>, AppError> {
    let html = upstream.get_text(url.as_str()).await?;
    parse_official(&html, url)
}

/// # Errors
///
/// Will return `Err` if the feed cannot be fetched or is not a JSON array
pub async fn scrape_metrix(
    upstream: &dyn Upstream,
    url: &Url,
) -> Result<Vec<TournamentRecord>, AppError> {
    let body = upstream.get_text(url.as_str()).await?;
    parse_metrix_text(&body)
}

/// Cached, serialized listing for one source.
///
/// # Errors
///
/// Will return `Err` if the scrape fails and nothing is cached
pub async fn get_tournaments(state: &AppState, source: Source) -> Result<String, AppError> {
    let upstream = state.upstream.as_ref();
    match source {
        Source::Official => {
            let url = &state.endpoints.official;
            state
                .orchestrator
                .fetch_with_cache(source.cache_key(), || fetch_official(upstream, url))
                .await
        }
        Source::Metrix => {
            let url = &state.endpoints.metrix;
            state
                .orchestrator
                .fetch_with_cache(source.cache_key(), || scrape_metrix(upstream, url))
                .await
        }
    }
}

pub async fn official_tournaments(state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let body = get_tournaments(&state, Source::Official).await?;
    Ok(json_body(body))
}

pub async fn metrix_tournaments(state: Data<AppState>) -> Result<HttpResponse, AppError> {
    let body = get_tournaments(&state, Source::Metrix).await?;
    Ok(json_body(body))
}

pub(crate) fn json_body(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::json()).body(body)
}
