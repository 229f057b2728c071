//! # whoami-probe
//!
//! A small HTTP service that, on every request, fetches a remote "whoami"
//! page through five different Rust HTTP client stacks and reports which
//! host and addresses each one saw.
//!
//! ## Architecture
//!
//! ```text
//! Server → Report → Strategy registry → Fetcher → Parser
//! ```
//!
//! - [`server`]: axum front end, any GET renders a report
//! - [`report`]: runs the strategies in order and assembles the text
//! - [`fetcher`]: one `Fetcher` trait, five client implementations
//! - [`parser`]: keeps the hostname/IP lines of a fetched body
//!
//! ## Quick Start
//!
//! ```bash
//! # Serve on 0.0.0.0:8080
//! whoami-probe
//!
//! # Print one report and exit
//! whoami-probe probe --remote-url http://127.0.0.1:8081/
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the service
/// identity, the configured target and the strategy registry.
pub mod app;

/// Command-line interface using clap.
///
/// - `serve` - Run the HTTP server (default)
/// - `probe` - Print one report to stdout
/// - `default-config` - Print a commented config file
pub mod cli;

/// Configuration loaded from `~/.config/whoami-probe/config.toml`.
pub mod config;

/// HTTP fetching through several client stacks.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for a single GET
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): shared reqwest client
/// - [`OneshotFetcher`](fetcher::oneshot_fetcher::OneshotFetcher): `reqwest::get`
/// - [`BlockingFetcher`](fetcher::blocking_fetcher::BlockingFetcher): `reqwest::blocking`
/// - [`HyperFetcher`](fetcher::hyper_fetcher::HyperFetcher): hyper client connection
/// - [`SocketFetcher`](fetcher::socket_fetcher::SocketFetcher): raw HTTP/1.0 over tokio-rustls
pub mod fetcher;

/// Line filtering of fetched pages.
pub mod parser;

/// Report text assembled per request.
pub mod report;

/// axum HTTP server.
pub mod server;
