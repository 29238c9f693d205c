//! Asset delivery: how a tile URL becomes bytes or a load failure

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::StatusCode;

use super::types::{TileData, TileLoadFailure};
use crate::Result;

/// Shared async HTTP client so connection pools are reused across slots
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(concat!("mtmap/", env!("CARGO_PKG_VERSION")))
        .pool_idle_timeout(std::time::Duration::from_secs(90))
        .pool_max_idle_per_host(16)
        .build()
        .unwrap_or_else(|e| {
            log::warn!("falling back to default HTTP client: {}", e);
            reqwest::Client::new()
        })
});

/// Loads one tile asset. A missing or broken asset is reported as a
/// [`TileLoadFailure`]; the caller never inspects transport details.
#[async_trait]
pub trait TileFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<TileData, TileLoadFailure>;
}

/// Fetches tiles over HTTP, resolving relative asset paths against a base URL
#[derive(Debug, Clone)]
pub struct HttpTileFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTileFetcher {
    /// `base_url` is prefixed to relative URLs such as `/tiles/0/0_0.png`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, HTTP_CLIENT.clone())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    /// A fetcher with its own client and a custom user agent
    pub fn with_user_agent(base_url: impl Into<String>, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn resolve(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            format!("{}/{}", self.base_url, url)
        }
    }
}

#[async_trait]
impl TileFetcher for HttpTileFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<TileData, TileLoadFailure> {
        let full_url = self.resolve(url);
        let response = self
            .client
            .get(&full_url)
            .send()
            .await
            .map_err(|e| TileLoadFailure::Network(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(TileLoadFailure::Missing),
            status => return Err(TileLoadFailure::Status(status.as_u16())),
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TileLoadFailure::Network(e.to_string()))?;
        TileData::decode(body.to_vec())
    }
}
