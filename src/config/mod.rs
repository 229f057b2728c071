//! Configuration for the probe service.
//!
//! Read from `~/.config/whoami-probe/config.toml` when present, or from the
//! file passed with `--config`. Every key is optional.

use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_REMOTE_URL: &str = "https://whoami.local.test";

/// Main configuration struct.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// Page fetched by every strategy.
    pub remote_url: String,
    /// Upper bound for a single fetch. Unset means each client's own default.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Load configuration from `path`.
    ///
    /// Missing fields in the config file will use default values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load configuration from the default path, falling back to defaults
    /// when no file exists there.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        Self::load(&config_path)
    }

    /// Get the default config file path: `~/.config/whoami-probe/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("whoami-probe").join("config.toml"))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn listen_socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.listen_addr.parse()
    }

    /// A commented config file holding the default values.
    pub fn default_config_content() -> String {
        format!(
            r##"# whoami-probe configuration

# Address the HTTP server listens on
listen_addr = "{DEFAULT_LISTEN_ADDR}"

# Page requested through every HTTP client on each inbound request
remote_url = "{DEFAULT_REMOTE_URL}"

# Per-request deadline in seconds (unset: no deadline)
# request_timeout_secs = 10
"##
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config() {
        let content = r#"
remote_url = "http://127.0.0.1:9000/"
"#;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.remote_url, "http://127.0.0.1:9000/");
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_listen_socket_addr() {
        let config = Config::default();
        assert_eq!(config.listen_socket_addr().unwrap().port(), 8080);

        let bad = Config {
            listen_addr: "localhost".into(),
            ..Config::default()
        };
        assert!(bad.listen_socket_addr().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen_addr = \"127.0.0.1:9090\"").unwrap();
        writeln!(file, "request_timeout_secs = 5").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:9090");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.remote_url, DEFAULT_REMOTE_URL);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "request_timeout_secs = \"soon\"").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
