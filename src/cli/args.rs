//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::fetch::CancelPolicy;

/// Download an image from a URL and report what was loaded.
#[derive(Debug, Clone, Parser)]
#[command(name = "imageloader", version)]
pub struct Cli {
    /// Image URL to load. Reads URLs from stdin, one per line, when omitted.
    pub url: Option<String>,

    /// Path to the config file (default: platform config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// What to do with a fetch superseded by a newer one: abort or detach
    #[arg(long, value_name = "POLICY")]
    pub cancel_policy: Option<CancelPolicy>,

    /// Overall request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u32>,

    /// Treat the network as online without probing
    #[arg(long)]
    pub skip_connectivity_check: bool,
}

impl Cli {
    /// Config file to load: `--config` or the platform default.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::config_path)
    }

    /// Apply flag overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(policy) = self.cancel_policy {
            config.fetch.cancel_policy = policy;
        }
        if let Some(timeout) = self.timeout {
            config.fetch.timeout_seconds = timeout;
        }
        if self.skip_connectivity_check {
            config.connectivity.enabled = false;
        }
    }
}
