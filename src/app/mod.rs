mod fetcher;
pub mod layout;
pub mod orchestrator;
pub mod selector;
mod state;
mod ui;

pub use fetcher::{Completion, Fetcher};
pub use layout::{dashboard_panels, Panel, SummaryStat};
pub use orchestrator::{FetchTicket, Orchestrator, Resolution, Snapshot};
pub use selector::SelectorItem;
pub use state::{App, AppWrapper};
pub use ui::ChartTextures;
