use egui::{Align2, Color32, Context, FontId, Sense, Stroke, TextureHandle, Ui, Vec2};
use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::{debug, warn};

use super::layout::{Panel, SummaryStat};
use super::App;
use crate::plotting::{render_chart, ChartSpec, ForecastPanel, ImageSlot};

const SIDE_PANEL_WIDTH: f32 = 240.0;
const FORECAST_IMAGE_SIZE: Vec2 = Vec2::new(640.0, 360.0);
const DIVIDER_COLOR: Color32 = Color32::from_rgb(255, 165, 0);

/// Chart textures keyed by spec fingerprint and size.
pub struct ChartTextures {
    cache: LruCache<(u64, u32, u32), TextureHandle>,
}

impl ChartTextures {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    fn get_or_render(
        &mut self,
        ctx: &Context,
        spec: &ChartSpec,
        width: u32,
        height: u32,
    ) -> Option<TextureHandle> {
        let key = (spec.fingerprint(), width, height);
        if let Some(texture) = self.cache.get(&key) {
            return Some(texture.clone());
        }

        match render_chart(spec, width, height) {
            Ok(chart) => {
                let image = egui::ColorImage::from_rgb(
                    [chart.width as usize, chart.height as usize],
                    &chart.rgb,
                );
                let texture = ctx.load_texture(
                    format!("chart-{:016x}", key.0),
                    image,
                    egui::TextureOptions::LINEAR,
                );
                debug!(title = %spec.title, "chart rendered");
                self.cache.put(key, texture.clone());
                Some(texture)
            }
            Err(e) => {
                warn!(title = %spec.title, error = %e, "failed to render chart");
                None
            }
        }
    }
}

/// Draw the main application UI
pub fn draw_ui(app: &mut App, textures: &mut ChartTextures, ctx: &Context) {
    egui::TopBottomPanel::top("header").show(ctx, |ui| {
        ui.add_space(4.0);
        ui.heading("Timeseries Forecasting");
        ui.add_space(4.0);
    });

    egui::SidePanel::left("repositories")
        .exact_width(SIDE_PANEL_WIDTH)
        .resizable(false)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                for item in app.selector_items() {
                    let response = ui.add_enabled(
                        item.enabled,
                        egui::SelectableLabel::new(item.selected, item.repository.label),
                    );
                    if response.clicked() {
                        app.click(item.repository);
                    }
                }
            });
        });

    egui::CentralPanel::default().show(ctx, |ui| {
        let snapshot = app.snapshot();
        if snapshot.is_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!("Loading {}...", snapshot.selection.label));
            });
            return;
        }

        if let Some(updated_at) = snapshot.updated_at {
            ui.weak(format!("Updated {}", updated_at.format("%H:%M:%S")));
        }

        let chart_width = app.config.chart_width;
        let chart_height = app.config.chart_height;
        let panels = app.panels();
        egui::ScrollArea::vertical().show(ui, |ui| {
            for panel in &panels {
                match panel {
                    Panel::Chart(spec) => draw_chart_panel(ui, textures, spec, chart_width, chart_height),
                    Panel::Summary(stats) => draw_summary(ui, stats),
                    Panel::Forecast(forecast) => draw_forecast(ui, forecast),
                }
                ui.add_space(12.0);
            }
        });
    });
}

fn draw_chart_panel(ui: &mut Ui, textures: &mut ChartTextures, spec: &ChartSpec, width: u32, height: u32) {
    match textures.get_or_render(ui.ctx(), spec, width, height) {
        Some(texture) => {
            ui.image(&texture);
        }
        None => {
            ui.label(format!("{} (chart unavailable)", spec.title));
        }
    }
}

fn divider(ui: &mut Ui) {
    let (rect, _) = ui.allocate_exact_size(Vec2::new(ui.available_width(), 3.0), Sense::hover());
    ui.painter().rect_filled(rect, 0.0, DIVIDER_COLOR);
}

fn draw_summary(ui: &mut Ui, stats: &[SummaryStat]) {
    divider(ui);
    for (i, stat) in stats.iter().enumerate() {
        ui.label(
            egui::RichText::new(format!("{}.{}: {}", i + 1, stat.label, stat.value)).size(18.0),
        );
    }
}

fn draw_forecast(ui: &mut Ui, panel: &ForecastPanel) {
    divider(ui);
    ui.label(egui::RichText::new(&panel.heading).size(18.0));
    for slot in &panel.images {
        ui.strong(&slot.caption);
        draw_image_slot(ui, slot);
    }
}

/// Reserve the image's space and only hand the URL to the loader once the slot
/// scrolls into view.
fn draw_image_slot(ui: &mut Ui, slot: &ImageSlot) {
    let (rect, _) = ui.allocate_exact_size(FORECAST_IMAGE_SIZE, Sense::hover());
    if !ui.is_rect_visible(rect) {
        return;
    }

    match &slot.url {
        Some(url) => {
            ui.put(
                rect,
                egui::Image::from_uri(url.as_str()).fit_to_exact_size(FORECAST_IMAGE_SIZE),
            );
        }
        None => {
            let painter = ui.painter();
            painter.rect_stroke(rect, 4.0, Stroke::new(1.0, Color32::GRAY));
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "image unavailable",
                FontId::proportional(14.0),
                Color32::GRAY,
            );
        }
    }
}
