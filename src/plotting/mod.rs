mod chart;
pub mod panels;
mod styles;

pub use chart::{draw_chart, render_chart, PlotError, RenderedChart, MAX_DRAWN_POINTS};
pub use panels::{
    bar_chart, forecast_panel, line_chart, stacked_bar_chart, ChartKind, ChartSpec,
    ForecastPanel, ImageSlot, SeriesSpec,
};
pub use styles::{ChartStyle, ChartTheme};
