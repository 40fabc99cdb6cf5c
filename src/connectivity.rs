//! Network reachability indicator.
//!
//! A probe runs on an interval and publishes online/offline transitions on
//! a watch channel. The front end consults it before starting a fetch.

use std::future::Future;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::config::ConnectivityConfig;

/// Shortest accepted interval between probes.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A single reachability check.
pub trait ConnectivityProbe: Send + Sync + 'static {
    fn check(&self) -> impl Future<Output = bool> + Send;
}

/// Online if a TCP connection to `addr` opens within the timeout.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }
}

impl ConnectivityProbe for TcpProbe {
    async fn check(&self) -> bool {
        match timeout(self.timeout, TcpStream::connect(self.addr.as_str())).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!(addr = %self.addr, error = %e, "Connectivity probe failed");
                false
            }
            Err(_) => {
                tracing::debug!(addr = %self.addr, "Connectivity probe timed out");
                false
            }
        }
    }
}

/// Tracks whether the network is currently reachable.
pub struct ConnectivityMonitor {
    state: watch::Receiver<bool>,
    task: Option<JoinHandle<()>>,
}

impl ConnectivityMonitor {
    /// Probe once, then keep probing every `period` in the background.
    ///
    /// `period` is raised to [`MIN_POLL_INTERVAL`] if shorter.
    pub async fn start<P: ConnectivityProbe>(probe: P, period: Duration) -> Self {
        let period = period.max(MIN_POLL_INTERVAL);
        let initial = probe.check().await;
        tracing::info!(online = initial, "Initial connectivity");
        let (tx, state) = watch::channel(initial);

        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the initial probe already ran.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                let online = probe.check().await;
                let changed = tx.send_if_modified(|current| {
                    if *current == online {
                        return false;
                    }
                    *current = online;
                    true
                });
                if changed {
                    tracing::info!(online, "Connectivity changed");
                }
            }
        });

        Self {
            state,
            task: Some(task),
        }
    }

    /// Build a monitor from config: a TCP probe, or always-online if disabled.
    pub async fn from_config(config: &ConnectivityConfig) -> Self {
        if !config.enabled {
            return Self::fixed(true);
        }
        let probe = TcpProbe::new(
            config.probe_addr.clone(),
            Duration::from_millis(config.probe_timeout_ms),
        );
        Self::start(probe, Duration::from_secs(config.poll_interval_seconds)).await
    }

    /// A monitor that never changes state.
    pub fn fixed(online: bool) -> Self {
        let (_tx, state) = watch::channel(online);
        Self { state, task: None }
    }

    pub fn is_online(&self) -> bool {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.clone()
    }
}

impl Drop for ConnectivityMonitor {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
