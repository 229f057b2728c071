use std::sync::Arc;
use std::time::Duration;

use crate::app::Result;
use crate::fetcher::blocking_fetcher::BlockingFetcher;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::hyper_fetcher::HyperFetcher;
use crate::fetcher::oneshot_fetcher::OneshotFetcher;
use crate::fetcher::socket_fetcher::SocketFetcher;
use crate::fetcher::transport::Connector;
use crate::fetcher::{FetchError, FetchOutcome, Fetcher};

/// A named client stack.
#[derive(Clone)]
pub struct Strategy {
    pub name: &'static str,
    pub fetcher: Arc<dyn Fetcher>,
}

impl Strategy {
    pub fn new(name: &'static str, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { name, fetcher }
    }

    /// Runs the fetcher once, bounded by `timeout` when one is configured.
    pub async fn run(&self, url: &str, timeout: Option<Duration>) -> FetchOutcome {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, self.fetcher.fetch(url))
                .await
                .unwrap_or_else(|_| {
                    Err(FetchError::Transport(format!(
                        "request timed out after {}s",
                        limit.as_secs_f64()
                    )))
                }),
            None => self.fetcher.fetch(url).await,
        }
    }
}

/// Ordered, immutable list of strategies tried on every request.
#[derive(Clone)]
pub struct StrategyRegistry {
    strategies: Vec<Strategy>,
}

impl StrategyRegistry {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    /// The five stacks in report order.
    pub fn standard() -> Result<Self> {
        let connector = Connector::new()?;

        Ok(Self::new(vec![
            Strategy::new("reqwest", Arc::new(HttpFetcher::new()?)),
            Strategy::new("reqwest::get", Arc::new(OneshotFetcher)),
            Strategy::new("reqwest::blocking", Arc::new(BlockingFetcher)),
            Strategy::new("hyper", Arc::new(HyperFetcher::new(connector.clone()))),
            Strategy::new("tokio-rustls", Arc::new(SocketFetcher::new(connector))),
        ]))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Strategy> {
        self.strategies.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
