//! Drives the controller from text input.
//!
//! Each URL line plays the role of pressing "Load Image"; the connectivity
//! monitor gates loading: nothing is fetched while offline.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;

use crate::cli::view::{connectivity_badge, status_line};
use crate::connectivity::ConnectivityMonitor;
use crate::fetch::{FetchStatus, Generation, ImageDecoder, ImageFetchController, Transport};

/// Result of a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Started(Generation),
    /// Refused because the network is unreachable.
    Offline,
}

/// A parsed line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Load(String),
    /// Blank line: load the default URL.
    LoadDefault,
    Cancel,
    Status,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Command::LoadDefault,
            "cancel" => Command::Cancel,
            "status" => Command::Status,
            "quit" | "exit" => Command::Quit,
            url => Command::Load(url.to_string()),
        }
    }
}

pub struct Session<T: Transport, D: ImageDecoder> {
    controller: ImageFetchController<T, D>,
    connectivity: ConnectivityMonitor,
    default_url: String,
}

impl<T: Transport, D: ImageDecoder> Session<T, D> {
    pub fn new(
        controller: ImageFetchController<T, D>,
        connectivity: ConnectivityMonitor,
        default_url: impl Into<String>,
    ) -> Self {
        Self {
            controller,
            connectivity,
            default_url: default_url.into(),
        }
    }

    pub fn controller(&self) -> &ImageFetchController<T, D> {
        &self.controller
    }

    /// Start loading `url` unless the network is known to be down.
    pub fn load(&self, url: &str) -> LoadOutcome {
        if !self.connectivity.is_online() {
            tracing::warn!(url = %url, "Load refused while offline");
            return LoadOutcome::Offline;
        }
        LoadOutcome::Started(self.controller.start_fetch(url))
    }

    /// Load a single URL and wait for its outcome.
    pub async fn run_once<W: Write>(&self, url: &str, out: &mut W) -> std::io::Result<FetchStatus> {
        let mut status_rx = self.controller.subscribe();
        if self.load(url) == LoadOutcome::Offline {
            writeln!(out, "{}: cannot load {}", connectivity_badge(false), url)?;
            return Ok(FetchStatus::Error);
        }
        writeln!(out, "{}", status_line(&FetchStatus::Loading))?;

        let status = wait_settled(&mut status_rx).await;
        writeln!(out, "{}", status_line(&status))?;
        Ok(status)
    }

    /// Process commands from `input` until `quit` or end of input.
    ///
    /// At end of input a fetch still in flight is allowed to settle.
    pub async fn run_interactive<R, W>(&self, input: R, out: &mut W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        let mut status_rx = self.controller.subscribe();
        let mut online_rx = self.connectivity.subscribe();

        writeln!(
            out,
            "[{}] {} (default: {})",
            connectivity_badge(self.connectivity.is_online()),
            status_line(&self.controller.current_status()),
            self.default_url
        )?;
        status_rx.borrow_and_update();
        online_rx.borrow_and_update();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    match Command::parse(&line) {
                        Command::Load(url) => self.handle_load(&url, &mut status_rx, out)?,
                        Command::LoadDefault => {
                            let url = self.default_url.clone();
                            self.handle_load(&url, &mut status_rx, out)?;
                        }
                        Command::Cancel => self.controller.cancel_current(),
                        Command::Status => {
                            writeln!(out, "{}", status_line(&self.controller.current_status()))?;
                        }
                        Command::Quit => return Ok(()),
                    }
                }
                Ok(()) = status_rx.changed() => {
                    let status = status_rx.borrow_and_update().clone();
                    writeln!(out, "{}", status_line(&status))?;
                }
                Ok(()) = online_rx.changed() => {
                    let online = *online_rx.borrow_and_update();
                    writeln!(out, "[{}]", connectivity_badge(online))?;
                }
            }
        }

        // A result may already be published but not yet printed.
        let unseen = status_rx.has_changed().unwrap_or(false);
        if self.controller.is_in_flight() || unseen {
            let status = wait_settled(&mut status_rx).await;
            writeln!(out, "{}", status_line(&status))?;
        }
        Ok(())
    }

    /// Start a load and print `Loading...` right away.
    ///
    /// The watch channel only keeps the latest value, so a fast failure
    /// would otherwise replace `Loading` before the select loop sees it.
    fn handle_load<W: Write>(
        &self,
        url: &str,
        status_rx: &mut watch::Receiver<FetchStatus>,
        out: &mut W,
    ) -> std::io::Result<()> {
        match self.load(url) {
            LoadOutcome::Started(generation) => {
                tracing::debug!(generation = generation.value(), "Load accepted");
                writeln!(out, "{}", status_line(&FetchStatus::Loading))?;
                let current = status_rx.borrow_and_update().clone();
                if !current.is_loading() {
                    writeln!(out, "{}", status_line(&current))?;
                }
                Ok(())
            }
            LoadOutcome::Offline => {
                writeln!(out, "{}: cannot load {}", connectivity_badge(false), url)
            }
        }
    }
}

/// Wait until the status leaves `Loading`.
async fn wait_settled(rx: &mut watch::Receiver<FetchStatus>) -> FetchStatus {
    match rx.wait_for(|status| !status.is_loading()).await {
        Ok(status) => status.clone(),
        Err(_) => FetchStatus::Error,
    }
}
