use async_trait::async_trait;
use reqwest::Client;

use crate::fetcher::{check_status, render_body, FetchOutcome, Fetcher};

/// Async reqwest client shared by every request.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let response = self.client.get(url).send().await?;

        check_status(response.status())?;

        let body = response.bytes().await?;

        Ok(render_body(&body))
    }
}
