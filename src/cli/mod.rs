pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, ConfigError};

#[derive(Parser)]
#[command(name = "whoami-probe")]
#[command(about = "Fetches a whoami page through several HTTP clients and reports the result", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/whoami-probe/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Address to listen on, e.g. 0.0.0.0:8080
    #[arg(short, long, global = true)]
    pub listen: Option<String>,

    /// Page to fetch on every request
    #[arg(short, long, global = true)]
    pub remote_url: Option<String>,

    /// Per-fetch deadline in seconds
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Render one report to stdout and exit
    Probe,
    /// Print a commented default config file
    DefaultConfig,
}

impl Cli {
    /// Loads the config file and applies command-line overrides.
    pub fn resolve_config(&self) -> Result<Config, ConfigError> {
        let base = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_default()?,
        };

        Ok(self.apply_overrides(base))
    }

    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(listen) = &self.listen {
            config.listen_addr = listen.clone();
        }
        if let Some(remote_url) = &self.remote_url {
            config.remote_url = remote_url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = Some(timeout);
        }
        config
    }

    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}
