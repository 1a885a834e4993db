use crate::error::AppError;
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use std::time::Duration;

/// Outbound GET used by every scraper and proxy.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String, AppError>;
}

pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    /// # Errors
    ///
    /// Will return `Err` if the http client cannot be built
    pub fn new(timeout: Option<Duration>) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get_text(&self, url: &str) -> Result<String, AppError> {
        debug!("GET {url}");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Upstream {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }
}
