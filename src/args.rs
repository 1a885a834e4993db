use crate::controller::cache::CACHE_DURATION;
use clap::{Parser, ValueEnum};
use reqwest::Url;
use std::time::Duration;

pub mod validation;

/// Loads `.env` (if present) and parses the command line, with every option
/// falling back to its environment variable.
#[must_use]
pub fn args_checks() -> Args {
    dotenvy::dotenv().ok();
    Args::parse()
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub bind_host: String,

    /// Page holding the official tournament table.
    #[arg(long, env = "OFFICIAL_URL", value_parser = crate::args::validation::check_http_url)]
    pub official_url: Url,
    /// JSON feed of Metrix competitions.
    #[arg(long, env = "METRIX_URL", value_parser = crate::args::validation::check_http_url)]
    pub metrix_url: Url,

    #[arg(long, env = "BAGTAG_ENDPOINT", value_parser = crate::args::validation::check_http_url)]
    pub bagtag_endpoint: Option<Url>,
    #[arg(long, env = "RATINGS_ENDPOINT", value_parser = crate::args::validation::check_http_url)]
    pub ratings_endpoint: Option<Url>,
    /// Product searches go to `<endpoint>/<type>?q=<query>`.
    #[arg(long, env = "PRODUCTS_ENDPOINT", value_parser = crate::args::validation::check_http_url)]
    pub products_endpoint: Option<Url>,

    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = CACHE_DURATION.as_secs())]
    pub cache_ttl_secs: u64,
    /// Only production reads the cache; every mode writes it.
    #[arg(long, env = "RUN_MODE", value_enum, default_value_t = RunMode::Development)]
    pub run_mode: RunMode,
    /// Unset means outbound requests may wait forever.
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS")]
    pub upstream_timeout_secs: Option<u64>,
}

impl Args {
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    #[must_use]
    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Development,
    Production,
}

impl RunMode {
    #[must_use]
    pub fn reads_cache(self) -> bool {
        matches!(self, Self::Production)
    }
}
