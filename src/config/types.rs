use serde::{Deserialize, Serialize};

use crate::fetch::CancelPolicy;

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Settings for the image fetch pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Overall request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 10).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
    /// Largest accepted response body in bytes (default: 32 MiB).
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    /// What happens to a fetch superseded by a newer one (default: abort).
    #[serde(default)]
    pub cancel_policy: CancelPolicy,
}

/// Settings for the reachability probe that gates loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityConfig {
    /// Disable to treat the network as always online.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// `host:port` to open a TCP connection to (default: "1.1.1.1:443").
    #[serde(default = "default_probe_addr")]
    pub probe_addr: String,
    /// Probe connection timeout in milliseconds (default: 1500).
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Seconds between probes (default: 5).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

/// Front-end settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// URL suggested when the interactive session starts.
    #[serde(default = "default_url")]
    pub default_url: String,
    /// Log filter used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    10
}

fn default_max_bytes() -> u64 {
    32 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

fn default_probe_addr() -> String {
    "1.1.1.1:443".to_string()
}

fn default_probe_timeout_ms() -> u64 {
    1500
}

fn default_poll_interval() -> u64 {
    5
}

fn default_url() -> String {
    "https://picsum.photos/200".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            max_bytes: default_max_bytes(),
            cancel_policy: CancelPolicy::default(),
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            probe_addr: default_probe_addr(),
            probe_timeout_ms: default_probe_timeout_ms(),
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_url: default_url(),
            log_level: default_log_level(),
        }
    }
}
