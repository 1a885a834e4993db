use crate::args::Args;
use crate::cache::CacheStore;
use crate::controller::cache::Orchestrator;
use crate::controller::client::Upstream;
use reqwest::Url;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub official: Url,
    pub metrix: Url,
    pub bagtag: Option<Url>,
    pub ratings: Option<Url>,
    pub products: Option<Url>,
}

impl From<&Args> for Endpoints {
    fn from(args: &Args) -> Self {
        Self {
            official: args.official_url.clone(),
            metrix: args.metrix_url.clone(),
            bagtag: args.bagtag_endpoint.clone(),
            ratings: args.ratings_endpoint.clone(),
            products: args.products_endpoint.clone(),
        }
    }
}

/// Shared by every request handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub upstream: Arc<dyn Upstream>,
    pub endpoints: Endpoints,
}

impl AppState {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheStore>, upstream: Arc<dyn Upstream>, args: &Args) -> Self {
        Self {
            orchestrator: Orchestrator::new(cache, args.run_mode, args.cache_ttl()),
            upstream,
            endpoints: Endpoints::from(args),
        }
    }
}
