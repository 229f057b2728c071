use async_trait::async_trait;
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::client::conn::http1;
use hyper::header::HOST;
use hyper::{Method, Request};
use hyper_util::rt::TokioIo;

use crate::fetcher::transport::{Connector, Target};
use crate::fetcher::{check_status, render_body, FetchError, FetchOutcome, Fetcher};

/// hyper 1.x client connection, one per call, over [`Connector`] streams.
#[derive(Clone)]
pub struct HyperFetcher {
    connector: Connector,
}

impl HyperFetcher {
    pub fn new(connector: Connector) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl Fetcher for HyperFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let target = Target::parse(url)?;
        let stream = self.connector.connect(&target).await?;

        let (mut sender, connection) = http1::handshake(TokioIo::new(stream))
            .await
            .map_err(|e| FetchError::transport(&e))?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!("hyper connection ended with error: {}", e);
            }
        });

        let request = Request::builder()
            .method(Method::GET)
            .uri(target.path.as_str())
            .header(HOST, target.authority())
            .body(Empty::<Bytes>::new())
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let response = sender
            .send_request(request)
            .await
            .map_err(|e| FetchError::transport(&e))?;

        check_status(response.status())?;

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| FetchError::transport(&e))?
            .to_bytes();

        Ok(render_body(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsupported_scheme() {
        let fetcher = HyperFetcher::new(Connector::new().unwrap());
        let err = fetcher.fetch("ftp://example.com/").await.unwrap_err();
        assert_eq!(err.kind(), "InvalidUrl");
    }
}
