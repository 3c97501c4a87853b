//! The request state machine behind the dashboard.
//!
//! [`Orchestrator`] owns the selection, the fetch state and the current
//! analytics result. It never performs I/O itself: entering `Loading` hands out
//! a [`FetchTicket`], and whoever runs the request reports back through
//! [`Orchestrator::resolve`] with that ticket. Tickets carry a generation
//! number, so a response for a superseded selection is recognized and dropped.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::api::FetchError;
use crate::types::{AnalyticsResult, FetchState, Repository};

/// Authorization to run one analytics request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub repository: Repository,
}

/// What [`Orchestrator::resolve`] did with an outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The outcome belonged to the current request; the machine is now in the
    /// given state
    Applied(FetchState),
    /// The outcome belonged to a superseded request and was dropped
    Stale,
}

/// Read-only view of the orchestrator, handed to the selector and renderers.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub selection: Repository,
    pub state: FetchState,
    pub result: Arc<AnalyticsResult>,
    /// Diagnostic text of the last failure; never shown as-is to the user
    pub error: Option<String>,
    pub generation: u64,
    /// When the current result arrived
    pub updated_at: Option<DateTime<Local>>,
}

impl Snapshot {
    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }
}

#[derive(Debug)]
pub struct Orchestrator {
    selection: Repository,
    state: FetchState,
    result: Arc<AnalyticsResult>,
    error: Option<String>,
    generation: u64,
    mounted: bool,
    updated_at: Option<DateTime<Local>>,
}

impl Orchestrator {
    pub fn new(initial: Repository) -> Self {
        Self {
            selection: initial,
            state: FetchState::Idle,
            result: Arc::new(AnalyticsResult::default()),
            error: None,
            generation: 0,
            mounted: false,
            updated_at: None,
        }
    }

    /// The implicit first selection: fetch the initial repository.
    ///
    /// Only the first call starts a request.
    pub fn mount(&mut self) -> Option<FetchTicket> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        Some(self.begin_fetch())
    }

    /// Make `repository` the selection and start fetching it.
    ///
    /// Re-selecting the current repository after mount is a no-op. Selecting
    /// while a request is in flight supersedes that request.
    pub fn dispatch_selection(&mut self, repository: Repository) -> Option<FetchTicket> {
        if self.mounted && repository == self.selection {
            debug!(repository = %repository, "repository already selected");
            return None;
        }
        if self.state == FetchState::Loading {
            debug!(
                previous = %self.selection,
                next = %repository,
                "superseding in-flight request"
            );
        }
        info!(repository = %repository, "repository selected");
        self.selection = repository;
        self.mounted = true;
        Some(self.begin_fetch())
    }

    fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state = FetchState::Loading;
        self.result = Arc::new(AnalyticsResult::default());
        self.error = None;
        self.updated_at = None;
        FetchTicket {
            generation: self.generation,
            repository: self.selection,
        }
    }

    /// Apply the outcome of the request authorized by `ticket`.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<AnalyticsResult, FetchError>,
    ) -> Resolution {
        if ticket.generation != self.generation || self.state != FetchState::Loading {
            debug!(
                repository = %ticket.repository,
                generation = ticket.generation,
                current = self.generation,
                "dropping stale analytics response"
            );
            return Resolution::Stale;
        }

        match outcome {
            Ok(result) => {
                info!(repository = %ticket.repository, "analytics loaded");
                self.result = Arc::new(result);
                self.state = FetchState::Success;
            }
            Err(e) => {
                warn!(repository = %ticket.repository, error = %e, "analytics fetch failed");
                self.result = Arc::new(AnalyticsResult::default());
                self.error = Some(e.to_string());
                self.state = FetchState::Failed;
            }
        }
        self.updated_at = Some(Local::now());
        Resolution::Applied(self.state)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            selection: self.selection,
            state: self.state,
            result: Arc::clone(&self.result),
            error: self.error.clone(),
            generation: self.generation,
            updated_at: self.updated_at,
        }
    }

    pub fn selection(&self) -> Repository {
        self.selection
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
