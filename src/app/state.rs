use eframe::App as EApp;
use std::sync::Arc;
use tokio::runtime::Handle;

use super::fetcher::Fetcher;
use super::layout::{dashboard_panels, Panel};
use super::orchestrator::{Orchestrator, Resolution, Snapshot};
use super::selector::{self, SelectorItem};
use super::ui::{draw_ui, ChartTextures};
use crate::api::{AnalyticsBackend, FetchError, HttpAnalyticsBackend};
use crate::catalog::{DEFAULT_REPOSITORY, REPOSITORIES};
use crate::config::Config;
use crate::types::Repository;

/// Main application state
///
/// Owns the request state machine and the fetcher that runs its requests. All
/// state changes happen through `&mut self`, on whichever thread drives the UI.
pub struct App {
    pub config: Config,
    catalog: &'static [Repository],
    orchestrator: Orchestrator,
    fetcher: Fetcher,
}

impl App {
    pub fn new(config: Config, backend: Arc<dyn AnalyticsBackend>, runtime: Handle) -> Self {
        let fetcher = Fetcher::new(backend, runtime, config.timeout);
        Self {
            config,
            catalog: &REPOSITORIES,
            orchestrator: Orchestrator::new(DEFAULT_REPOSITORY),
            fetcher,
        }
    }

    /// Build an app that talks to the configured backend over HTTP.
    pub fn with_http_backend(config: Config, runtime: Handle) -> Result<Self, FetchError> {
        let backend = HttpAnalyticsBackend::new(&config.gateway(), &config.endpoint, config.timeout)?;
        Ok(Self::new(config, Arc::new(backend), runtime))
    }

    /// Called whenever a request completes, from the runtime's thread.
    pub fn set_waker(&mut self, waker: impl Fn() + Send + Sync + 'static) {
        self.fetcher.set_waker(waker);
    }

    /// Start the initial fetch for the default repository.
    pub fn mount(&mut self) {
        if let Some(ticket) = self.orchestrator.mount() {
            self.fetcher.issue(ticket);
        }
    }

    /// Select `repository` and fetch it, superseding any request in flight.
    ///
    /// Returns whether a request was issued.
    pub fn dispatch_selection(&mut self, repository: Repository) -> bool {
        match self.orchestrator.dispatch_selection(repository) {
            Some(ticket) => {
                self.fetcher.issue(ticket);
                true
            }
            None => false,
        }
    }

    /// A click on the repository list. Disabled and already-selected entries
    /// are ignored.
    pub fn click(&mut self, repository: Repository) -> bool {
        let target = self
            .selector_items()
            .iter()
            .find(|item| item.repository == repository)
            .and_then(selector::click);
        match target {
            Some(repository) => self.dispatch_selection(repository),
            None => false,
        }
    }

    pub fn selector_items(&self) -> Vec<SelectorItem> {
        selector::items(self.catalog, &self.orchestrator.snapshot())
    }

    /// Apply every completion that has arrived, without waiting.
    pub fn pump(&mut self) -> Vec<Resolution> {
        self.fetcher
            .try_completions()
            .into_iter()
            .map(|completion| self.orchestrator.resolve(&completion.ticket, completion.outcome))
            .collect()
    }

    /// Wait for the next completion and apply it.
    pub async fn settle(&mut self) -> Option<Resolution> {
        let completion = self.fetcher.next_completion().await?;
        Some(self.orchestrator.resolve(&completion.ticket, completion.outcome))
    }

    pub fn snapshot(&self) -> Snapshot {
        self.orchestrator.snapshot()
    }

    pub fn catalog(&self) -> &'static [Repository] {
        self.catalog
    }

    /// Panels for the current selection and result.
    pub fn panels(&self) -> Vec<Panel> {
        let snapshot = self.orchestrator.snapshot();
        dashboard_panels(&snapshot.selection, &snapshot.result)
    }
}

/// eframe entry point: drains fetch completions every frame, then draws.
pub struct AppWrapper {
    pub app: App,
    textures: ChartTextures,
}

impl AppWrapper {
    pub fn new(app: App) -> Self {
        let capacity = app.config.chart_cache_capacity;
        Self {
            app,
            textures: ChartTextures::new(capacity),
        }
    }
}

impl EApp for AppWrapper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let resolutions = self.app.pump();
        if resolutions
            .iter()
            .any(|r| matches!(r, Resolution::Applied(_)))
        {
            self.textures.clear();
        }
        draw_ui(&mut self.app, &mut self.textures, ctx);
    }
}
