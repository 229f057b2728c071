use std::time::Duration;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::StrategyRegistry;

/// Process-wide facts rendered in every report header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub name: String,
    pub version: String,
    pub hostname: String,
}

impl ServiceIdentity {
    /// Resolves the identity of this process. Called once at start-up.
    ///
    /// The version is the compiler that built the binary, captured by `build.rs`.
    pub fn detect() -> Self {
        Self {
            name: "Rust".to_string(),
            version: env!("WHOAMI_PROBE_RUSTC_VERSION").to_string(),
            hostname: Self::hostname(),
        }
    }

    fn hostname() -> String {
        if let Ok(name) = std::env::var("HOSTNAME") {
            let name = name.trim();
            if !name.is_empty() {
                return name.to_string();
            }
        }

        Self::hostname_from_command().unwrap_or_else(|| "unknown".to_string())
    }

    fn hostname_from_command() -> Option<String> {
        use std::process::Command;
        let output = Command::new("hostname").output().ok()?;
        if !output.status.success() {
            return None;
        }
        let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!name.is_empty()).then_some(name)
    }
}

/// Everything a request needs, built once and shared read-only.
pub struct AppContext {
    pub identity: ServiceIdentity,
    pub remote_url: String,
    pub request_timeout: Option<Duration>,
    pub registry: StrategyRegistry,
}

impl AppContext {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_registry(config, ServiceIdentity::detect(), StrategyRegistry::standard()?)
    }

    pub fn with_registry(
        config: &Config,
        identity: ServiceIdentity,
        registry: StrategyRegistry,
    ) -> Result<Self> {
        url::Url::parse(&config.remote_url)?;

        Ok(Self {
            identity,
            remote_url: config.remote_url.clone(),
            request_timeout: config.request_timeout(),
            registry,
        })
    }
}
