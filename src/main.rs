//! Timeseries Forecasting dashboard
//!
//! A GUI application that shows issue analytics and forecast images for a set
//! of well known repositories.

use anyhow::{anyhow, Context as _, Result};
use eframe::egui;
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use repocast::app::{App, AppWrapper};
use repocast::Config;

const DEFAULT_LOG_FILTER: &str = if cfg!(feature = "dev") {
    "repocast=debug"
} else {
    "repocast=info"
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::load().context("failed to load configuration")?;
    info!(backend = %config.backend_url, endpoint = %config.endpoint, "starting dashboard");

    // Requests run on this runtime while eframe owns the main thread
    let runtime = Runtime::new().context("failed to start tokio runtime")?;
    let _guard = runtime.enter();

    let app = App::with_http_backend(config, runtime.handle().clone())
        .context("failed to set up analytics client")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Timeseries Forecasting"),
        ..Default::default()
    };

    eframe::run_native(
        "Timeseries Forecasting",
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);

            let mut app = app;
            let ctx = cc.egui_ctx.clone();
            app.set_waker(move || ctx.request_repaint());
            app.mount();
            Ok(Box::new(AppWrapper::new(app)) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| anyhow!("error running application: {e}"))
}
