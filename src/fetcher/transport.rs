//! TCP/TLS connection setup shared by the low-level fetchers.
//!
//! The hyper and raw-socket variants do not bring their own connector, so
//! this module resolves the URL, opens the TCP stream and, for `https`,
//! wraps it in a rustls session trusting the `webpki-roots` store.

use std::sync::Arc;

use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use url::{Host, Url};

use crate::fetcher::FetchError;

pub trait Io: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Io for T {}

pub type BoxedStream = Box<dyn Io>;

/// Where a GET goes, split out of the URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub tls: bool,
    /// Host as written in the URL (IPv6 literals keep their brackets).
    pub host: String,
    /// Host as passed to the resolver.
    pub connect_host: String,
    pub port: u16,
    /// Path plus query, always starting with `/`.
    pub path: String,
}

impl Target {
    pub fn parse(url: &str) -> Result<Self, FetchError> {
        let parsed =
            Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

        let tls = match parsed.scheme() {
            "https" => true,
            "http" => false,
            other => {
                return Err(FetchError::InvalidUrl(format!(
                    "unsupported scheme '{}' in {}",
                    other, url
                )))
            }
        };

        let connect_host = match parsed.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            None => return Err(FetchError::InvalidUrl(format!("no host in {}", url))),
        };
        let host = parsed
            .host_str()
            .map(String::from)
            .unwrap_or_else(|| connect_host.clone());

        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| FetchError::InvalidUrl(format!("no port for {}", url)))?;

        let mut path = parsed.path().to_string();
        if let Some(query) = parsed.query() {
            path.push('?');
            path.push_str(query);
        }

        Ok(Self {
            tls,
            host,
            connect_host,
            port,
            path,
        })
    }

    /// Value for the `Host` header; the port is omitted when it is the
    /// scheme default.
    pub fn authority(&self) -> String {
        let default_port = if self.tls { 443 } else { 80 };
        if self.port == default_port {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Opens plain or TLS streams to a [`Target`].
#[derive(Clone)]
pub struct Connector {
    tls: TlsConnector,
}

impl Connector {
    pub fn new() -> Result<Self, rustls::Error> {
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Ok(Self {
            tls: TlsConnector::from(Arc::new(config)),
        })
    }

    pub async fn connect(&self, target: &Target) -> Result<BoxedStream, FetchError> {
        tracing::trace!("Connecting to {}:{}", target.connect_host, target.port);

        let stream = TcpStream::connect((target.connect_host.as_str(), target.port))
            .await
            .map_err(|e| {
                FetchError::Transport(format!(
                    "failed to connect to {}:{}: {}",
                    target.host, target.port, e
                ))
            })?;

        if !target.tls {
            return Ok(Box::new(stream));
        }

        let server_name = ServerName::try_from(target.connect_host.clone())
            .map_err(|e| FetchError::InvalidUrl(format!("invalid server name: {}", e)))?;

        let tls_stream = self
            .tls
            .connect(server_name, stream)
            .await
            .map_err(|e| {
                FetchError::Transport(format!("TLS handshake with {} failed: {}", target.host, e))
            })?;

        Ok(Box::new(tls_stream))
    }
}
