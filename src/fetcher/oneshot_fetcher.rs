use async_trait::async_trait;

use crate::fetcher::{check_status, render_body, FetchOutcome, Fetcher};

/// `reqwest::get`: a throwaway client per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct OneshotFetcher;

#[async_trait]
impl Fetcher for OneshotFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let response = reqwest::get(url).await?;
        check_status(response.status())?;
        let body = response.bytes().await?;

        Ok(render_body(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url() {
        let err = OneshotFetcher.fetch("://missing-scheme").await.unwrap_err();
        assert_eq!(err.kind(), "InvalidUrl");
    }
}
