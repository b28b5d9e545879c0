use async_trait::async_trait;
use reqwest::Client;

use crate::app::Result;
use crate::config::ApiConfig;
use crate::fetcher::Fetcher;
use crate::render::embed::{EmbedResource, LoadError, ResourceLoader};

const DEFAULT_USER_AGENT: &str = concat!("tintuc/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed client for the summary document and embed resources.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(api.timeout())
            .gzip(true)
            .brotli(true)
            .user_agent(api.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;

        let body = response.bytes().await?.to_vec();
        tracing::info!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}

/// Remote embed resources are "loaded" by downloading them. Inline scripts
/// need no download and are accepted as long as they have a body.
#[async_trait]
impl ResourceLoader for HttpFetcher {
    async fn load(&self, resource: &EmbedResource) -> std::result::Result<(), LoadError> {
        let Some(url) = resource.remote_url() else {
            return if resource.is_blank() {
                Err(LoadError::Execute("empty script body".into()))
            } else {
                Ok(())
            };
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::Fetch(e.to_string()))?;
        response
            .error_for_status()
            .map_err(|e| LoadError::Fetch(e.to_string()))?;
        Ok(())
    }
}
