pub mod blocking_fetcher;
pub mod http_fetcher;
pub mod hyper_fetcher;
pub mod oneshot_fetcher;
pub mod registry;
pub mod socket_fetcher;
pub mod transport;

use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::parser::parse_content;

pub use registry::{Strategy, StrategyRegistry};

/// Why a single GET against the remote failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP Error {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Internal(String),
}

impl FetchError {
    /// Name rendered in the report, e.g. `# Error: (HttpStatus) ...`.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::HttpStatus { .. } => "HttpStatus",
            FetchError::Transport(_) => "Transport",
            FetchError::InvalidUrl(_) => "InvalidUrl",
            FetchError::Internal(_) => "Internal",
        }
    }

    pub fn from_status(status: StatusCode) -> Self {
        FetchError::HttpStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    pub fn transport(err: &(dyn StdError + 'static)) -> Self {
        FetchError::Transport(describe(err))
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return FetchError::from_status(status);
        }
        if err.is_builder() {
            return FetchError::InvalidUrl(describe(&err));
        }
        FetchError::transport(&err)
    }
}

pub type FetchOutcome = std::result::Result<String, FetchError>;

/// One way of issuing `GET url` and returning the filtered body.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// Fails on any status of 400 or above, including non-standard 6xx codes.
pub fn check_status(status: StatusCode) -> Result<(), FetchError> {
    if status.as_u16() >= 400 {
        return Err(FetchError::from_status(status));
    }
    Ok(())
}

/// Decodes a body (lossy UTF-8) and keeps the interesting lines.
pub fn render_body(body: &[u8]) -> String {
    parse_content(&String::from_utf8_lossy(body))
}

/// Flattens an error and its sources into one line.
pub fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }

    message.replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_status_error_message() {
        let err = FetchError::from_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.kind(), "HttpStatus");
        assert_eq!(err.to_string(), "HTTP Error 503: Service Unavailable");
    }

    #[test]
    fn test_status_without_reason() {
        let status = StatusCode::from_u16(599).unwrap();
        let err = FetchError::from_status(status);
        assert_eq!(err.to_string(), "HTTP Error 599: ");
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(check_status(StatusCode::NO_CONTENT).is_ok());
        assert!(check_status(StatusCode::FOUND).is_ok());
        assert!(check_status(StatusCode::NOT_FOUND).is_err());
        assert!(check_status(StatusCode::BAD_GATEWAY).is_err());
    }

    #[test]
    fn test_check_status_non_standard_codes() {
        let weird = StatusCode::from_u16(600).unwrap();
        assert_eq!(
            check_status(weird).unwrap_err(),
            FetchError::HttpStatus {
                status: 600,
                reason: String::new(),
            }
        );
        assert!(check_status(StatusCode::from_u16(999).unwrap()).is_err());
        assert!(check_status(StatusCode::from_u16(399).unwrap()).is_ok());
    }

    #[test]
    fn test_render_body_lossy() {
        let body = b"Hostname: a\xff\nFoo";
        assert_eq!(render_body(body), "    Hostname: a\u{fffd}");
    }

    #[test]
    fn test_describe_includes_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Outer(inner);
        assert_eq!(describe(&err), "outer: refused");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(FetchError::Transport("x".into()).kind(), "Transport");
        assert_eq!(FetchError::InvalidUrl("x".into()).kind(), "InvalidUrl");
        assert_eq!(FetchError::Internal("x".into()).kind(), "Internal");
    }
}
