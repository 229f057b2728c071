use async_trait::async_trait;
use reqwest::blocking::Client;

use crate::fetcher::{check_status, render_body, FetchError, FetchOutcome, Fetcher};

/// Synchronous reqwest client driven from tokio's blocking pool.
///
/// The client is built and dropped on the blocking thread: a
/// `reqwest::blocking::Client` owns its own runtime and panics if that
/// runtime is torn down inside an async context.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockingFetcher;

impl BlockingFetcher {
    fn fetch_sync(url: &str) -> FetchOutcome {
        let client = Client::builder().build()?;
        let response = client.get(url).send()?;

        check_status(response.status())?;

        let body = response.bytes()?;
        Ok(render_body(&body))
    }
}

#[async_trait]
impl Fetcher for BlockingFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let url = url.to_string();

        tokio::task::spawn_blocking(move || Self::fetch_sync(&url))
            .await
            .map_err(|e| FetchError::Internal(format!("blocking fetch task failed: {}", e)))?
    }
}
