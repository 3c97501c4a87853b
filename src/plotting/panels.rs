//! Declarative panel descriptions.
//!
//! Every builder here is a pure function of its inputs. Charts come out as a
//! [`ChartSpec`] that [`super::render_chart`] can rasterize; forecast images
//! come out as a [`ForecastPanel`] the UI lays out. Empty input produces an
//! empty spec, never an error.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::catalog::ForecastMetric;
use crate::types::{DataPoint, ImageBundle, NamedSeries};

/// Y axis title shared by every issue chart.
pub const Y_AXIS_TITLE: &str = "Issues";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Line,
    Bar,
    StackedBar,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SeriesSpec {
    pub name: String,
    /// One value per category of the owning chart
    pub values: Vec<u64>,
}

/// Everything needed to draw one chart.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub y_axis_title: &'static str,
    /// X axis categories, in order
    pub categories: Vec<String>,
    pub series: Vec<SeriesSpec>,
    /// Print each value next to its point or bar
    pub data_labels: bool,
    /// Print the total above each stack
    pub stack_labels: bool,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Per-category sum over all series, saturating at `u64::MAX`.
    pub fn stack_totals(&self) -> Vec<u64> {
        (0..self.categories.len())
            .map(|i| {
                self.series
                    .iter()
                    .map(|s| s.values.get(i).copied().unwrap_or(0))
                    .fold(0u64, u64::saturating_add)
            })
            .collect()
    }

    /// Largest value the y axis has to fit.
    pub fn y_max(&self) -> u64 {
        match self.kind {
            ChartKind::StackedBar => self.stack_totals().into_iter().max().unwrap_or(0),
            ChartKind::Line | ChartKind::Bar => self
                .series
                .iter()
                .flat_map(|s| s.values.iter().copied())
                .max()
                .unwrap_or(0),
        }
    }

    /// Stable key for caching rendered output of this spec.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

fn single_series(kind: ChartKind, title: &str, data: &[DataPoint]) -> ChartSpec {
    let (categories, values): (Vec<String>, Vec<u64>) =
        data.iter().map(|p| (p.label.clone(), p.count)).unzip();
    let series = if categories.is_empty() {
        Vec::new()
    } else {
        vec![SeriesSpec {
            name: title.to_string(),
            values,
        }]
    };
    ChartSpec {
        kind,
        title: title.to_string(),
        y_axis_title: Y_AXIS_TITLE,
        categories,
        series,
        data_labels: true,
        stack_labels: false,
    }
}

/// Single-series line chart with a zero baseline.
pub fn line_chart(title: &str, data: &[DataPoint]) -> ChartSpec {
    single_series(ChartKind::Line, title, data)
}

/// Single-series vertical bar chart with value labels.
pub fn bar_chart(title: &str, data: &[DataPoint]) -> ChartSpec {
    single_series(ChartKind::Bar, title, data)
}

/// Stacked vertical bars, one stack per category, totals on top.
///
/// Categories are the union of all series labels in first-seen order; a series
/// without a point for some category contributes 0 there. Repeated labels
/// within one series are summed.
pub fn stacked_bar_chart(title: &str, series: &[NamedSeries]) -> ChartSpec {
    let mut categories: Vec<String> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for point in series.iter().flat_map(|s| s.data.iter()) {
        if !index.contains_key(point.label.as_str()) {
            index.insert(point.label.as_str(), categories.len());
            categories.push(point.label.clone());
        }
    }

    let aligned = if categories.is_empty() {
        Vec::new()
    } else {
        series
            .iter()
            .map(|s| {
                let mut values = vec![0u64; categories.len()];
                for point in &s.data {
                    let slot = &mut values[index[point.label.as_str()]];
                    *slot = slot.saturating_add(point.count);
                }
                SeriesSpec {
                    name: s.name.clone(),
                    values,
                }
            })
            .collect()
    };

    ChartSpec {
        kind: ChartKind::StackedBar,
        title: title.to_string(),
        y_axis_title: Y_AXIS_TITLE,
        categories,
        series: aligned,
        data_labels: true,
        stack_labels: true,
    }
}

/// One forecast image with its caption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageSlot {
    pub caption: String,
    /// `None` when the backend sent no usable URL
    pub url: Option<String>,
}

/// The three forecast images of one metric.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForecastPanel {
    pub heading: String,
    pub images: [ImageSlot; 3],
}

/// Build the image triple for `metric` from its bundle.
pub fn forecast_panel(metric: &ForecastMetric, bundle: &ImageBundle) -> ForecastPanel {
    let caption = metric.caption;
    let slot = |prefix: &str, url: &str| ImageSlot {
        caption: format!("{prefix} for {caption}"),
        url: Some(url.trim()).filter(|u| !u.is_empty()).map(str::to_string),
    };

    ForecastPanel {
        heading: format!(
            "Timeseries Forecasting of {caption} using Tensorflow and Keras LSTM based on past month"
        ),
        images: [
            slot("Model Loss", &bundle.model_loss_image_url),
            slot("LSTM Generated Data", &bundle.lstm_generated_image_url),
            slot("All Issues Data", &bundle.all_issues_data_image),
        ],
    }
}
