//! The image-fetch state machine.
//!
//! One fetch is "current" at a time. Starting a new fetch allocates a fresh
//! [`Generation`]; a completion only publishes its result if its generation
//! is still the current one, so the observed status always belongs to the
//! most recently started fetch regardless of completion order.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::fetch::decode::ImageDecoder;
use crate::fetch::error::FetchError;
use crate::fetch::status::{DecodedImage, FetchStatus, Generation};
use crate::fetch::transport::Transport;

/// What happens to a superseded fetch.
///
/// Either way its result is ignored; this only decides whether the work
/// keeps running in the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelPolicy {
    /// Abort the superseded task, interrupting its network read.
    #[default]
    Abort,
    /// Let the superseded task run to completion and drop its result.
    Detach,
}

impl std::str::FromStr for CancelPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(CancelPolicy::Abort),
            "detach" => Ok(CancelPolicy::Detach),
            other => Err(format!(
                "unknown cancel policy '{}' (expected 'abort' or 'detach')",
                other
            )),
        }
    }
}

/// Owns the single active fetch and its published status.
///
/// Must be used from within a tokio runtime: fetches run on spawned tasks
/// and decoding runs on the blocking pool. Dropping the controller aborts
/// whatever is still in flight.
pub struct ImageFetchController<T: Transport, D: ImageDecoder> {
    inner: Arc<Inner<T, D>>,
}

struct Inner<T, D> {
    transport: T,
    decoder: D,
    policy: CancelPolicy,
    state: Mutex<ControllerState>,
    status: watch::Sender<FetchStatus>,
}

#[derive(Default)]
struct ControllerState {
    /// Highest generation handed out. Cancellation also consumes one.
    generation: Generation,
    in_flight: Option<InFlight>,
}

struct InFlight {
    generation: Generation,
    url: String,
    task: JoinHandle<()>,
}

impl<T: Transport, D: ImageDecoder> ImageFetchController<T, D> {
    pub fn new(transport: T, decoder: D, policy: CancelPolicy) -> Self {
        let (status, _) = watch::channel(FetchStatus::Idle);
        Self {
            inner: Arc::new(Inner {
                transport,
                decoder,
                policy,
                state: Mutex::new(ControllerState::default()),
                status,
            }),
        }
    }

    pub fn policy(&self) -> CancelPolicy {
        self.inner.policy
    }

    /// Start fetching `url`, superseding any fetch still in flight.
    ///
    /// The URL is not validated here; a malformed one surfaces as
    /// [`FetchStatus::Error`].
    pub fn start_fetch(&self, url: impl Into<String>) -> Generation {
        let url = url.into();
        let mut state = self.inner.state.lock();

        let generation = state.generation.next();
        state.generation = generation;

        if let Some(previous) = state.in_flight.take() {
            self.inner.supersede(previous);
        }

        self.inner.status.send_replace(FetchStatus::Loading);
        tracing::info!(generation = generation.value(), url = %url, "Fetch started");

        // The lock is held across the spawn, so the task cannot complete
        // before its InFlight entry is recorded.
        let inner = Arc::clone(&self.inner);
        let task_url = url.clone();
        let task = tokio::spawn(async move {
            let outcome = inner.fetch_and_decode(&task_url).await;
            inner.complete(generation, outcome);
        });

        state.in_flight = Some(InFlight {
            generation,
            url,
            task,
        });
        generation
    }

    /// Cancel the in-flight fetch, if any, and return to [`FetchStatus::Idle`].
    ///
    /// With nothing in flight this is a no-op and the status is unchanged.
    pub fn cancel_current(&self) {
        let mut state = self.inner.state.lock();
        let Some(current) = state.in_flight.take() else {
            tracing::debug!("Cancel requested with nothing in flight");
            return;
        };

        state.generation = state.generation.next();
        tracing::info!(
            generation = current.generation.value(),
            url = %current.url,
            "Fetch cancelled"
        );
        self.inner.supersede(current);
        self.inner.status.send_replace(FetchStatus::Idle);
    }

    /// Snapshot of the latest non-superseded status.
    pub fn current_status(&self) -> FetchStatus {
        self.inner.status.borrow().clone()
    }

    /// Receive every status the controller publishes from now on.
    pub fn subscribe(&self) -> watch::Receiver<FetchStatus> {
        self.inner.status.subscribe()
    }

    pub fn current_generation(&self) -> Generation {
        self.inner.state.lock().generation
    }

    pub fn is_in_flight(&self) -> bool {
        self.inner.state.lock().in_flight.is_some()
    }
}

impl<T: Transport, D: ImageDecoder> Drop for ImageFetchController<T, D> {
    fn drop(&mut self) {
        if let Some(current) = self.inner.state.lock().in_flight.take() {
            current.task.abort();
        }
    }
}

impl<T: Transport, D: ImageDecoder> Inner<T, D> {
    async fn fetch_and_decode(self: &Arc<Self>, url: &str) -> Result<DecodedImage, FetchError> {
        let bytes = self.transport.fetch(url).await?;

        let inner = Arc::clone(self);
        tokio::task::spawn_blocking(move || inner.decoder.decode(&bytes))
            .await
            .map_err(|e| FetchError::TaskFailed(e.to_string()))?
    }

    fn supersede(&self, previous: InFlight) {
        tracing::debug!(
            generation = previous.generation.value(),
            url = %previous.url,
            policy = ?self.policy,
            "Superseding in-flight fetch"
        );
        match self.policy {
            CancelPolicy::Abort => previous.task.abort(),
            CancelPolicy::Detach => drop(previous.task),
        }
    }

    fn complete(&self, generation: Generation, outcome: Result<DecodedImage, FetchError>) {
        let mut state = self.state.lock();
        if state.generation != generation {
            tracing::debug!(
                generation = generation.value(),
                current = state.generation.value(),
                "Discarding result of superseded fetch"
            );
            return;
        }
        state.in_flight = None;

        let status = match outcome {
            Ok(image) => {
                tracing::info!(
                    generation = generation.value(),
                    width = image.width(),
                    height = image.height(),
                    "Fetch succeeded"
                );
                FetchStatus::Success(image)
            }
            Err(err) => {
                tracing::warn!(
                    generation = generation.value(),
                    kind = err.kind(),
                    error = %err,
                    "Fetch failed"
                );
                FetchStatus::Error
            }
        };
        tracing::debug!(
            generation = generation.value(),
            status = status.label(),
            "Publishing status"
        );
        self.status.send_replace(status);
    }
}
