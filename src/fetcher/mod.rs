pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;

#[async_trait]
pub trait Fetcher {
    /// Fetch `url` and return the response body.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
