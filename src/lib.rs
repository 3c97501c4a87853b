//! # Repository Forecast Dashboard
//!
//! `repocast` is a desktop dashboard for repository issue analytics. The user
//! picks a repository from a fixed catalog; the dashboard sends one aggregated
//! request to an analytics backend and renders the response as time-series
//! charts and pre-rendered forecast images.
//!
//! ## Features
//!
//! - Explicit request state machine with stale-response protection
//! - Cancellation of superseded requests and a bounded request timeout
//! - Line, bar and stacked-bar charts rendered with plotters
//! - Forecast image panels driven by a metric table, loaded lazily
//! - Configuration from a JSON file and environment variables
//!
//! ## Example
//!
//! ```no_run
//! use repocast::{app::AppWrapper, Config, RepocastApp};
//! use eframe::NativeOptions;
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let _guard = runtime.enter();
//!
//! let mut app = RepocastApp::with_http_backend(Config::default(), runtime.handle().clone()).unwrap();
//! app.mount();
//!
//! eframe::run_native(
//!     "Timeseries Forecasting",
//!     NativeOptions::default(),
//!     Box::new(|_cc| Ok(Box::new(AppWrapper::new(app)) as Box<dyn eframe::App>)),
//! ).unwrap();
//! ```

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod plotting;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use app::App as RepocastApp;
pub use config::Config;
pub use types::{AnalyticsResult, FetchState, Repository};
