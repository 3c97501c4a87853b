//! Runs analytics requests on the tokio runtime and reports their outcomes back
//! to the UI thread.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::orchestrator::FetchTicket;
use crate::api::{AnalyticsBackend, FetchError};
use crate::types::AnalyticsResult;

const COMPLETION_BUFFER: usize = 32;

/// The outcome of one request, tagged with the ticket it was issued for.
#[derive(Debug)]
pub struct Completion {
    pub ticket: FetchTicket,
    pub outcome: Result<AnalyticsResult, FetchError>,
}

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Issues at most one live request at a time.
///
/// Issuing a new ticket cancels the request in flight; a cancelled request
/// never produces a [`Completion`].
pub struct Fetcher {
    backend: Arc<dyn AnalyticsBackend>,
    runtime: Handle,
    timeout: Duration,
    tx: mpsc::Sender<Completion>,
    rx: mpsc::Receiver<Completion>,
    in_flight: Option<CancellationToken>,
    waker: Option<Waker>,
}

impl Fetcher {
    pub fn new(backend: Arc<dyn AnalyticsBackend>, runtime: Handle, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::channel(COMPLETION_BUFFER);
        Self {
            backend,
            runtime,
            timeout,
            tx,
            rx,
            in_flight: None,
            waker: None,
        }
    }

    /// Called after each completion is queued, e.g. to request a repaint.
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.waker = Some(Arc::new(waker));
    }

    /// Start the request for `ticket`, cancelling whatever was in flight.
    pub fn issue(&mut self, ticket: FetchTicket) {
        self.cancel();

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        let timeout = self.timeout;

        self.runtime.spawn(async move {
            let repository = ticket.repository.id;
            let outcome = tokio::select! {
                _ = token.cancelled() => {
                    debug!(repository, generation = ticket.generation, "analytics request cancelled");
                    return;
                }
                outcome = tokio::time::timeout(timeout, backend.fetch(repository)) => {
                    outcome.unwrap_or(Err(FetchError::Timeout(timeout)))
                }
            };

            if tx.send(Completion { ticket, outcome }).await.is_err() {
                debug!(repository, "fetcher dropped before completion was delivered");
                return;
            }
            if let Some(wake) = waker {
                wake();
            }
        });
    }

    /// Cancel the request in flight, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }

    /// Completions that have arrived so far, without waiting.
    pub fn try_completions(&mut self) -> Vec<Completion> {
        let mut completions = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            completions.push(completion);
        }
        completions
    }

    /// Wait for the next completion.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        self.rx.recv().await
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        self.cancel();
    }
}
