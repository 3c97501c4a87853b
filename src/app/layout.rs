//! Fans one analytics result out into the dashboard's panels.

use crate::catalog::FORECAST_METRICS;
use crate::plotting::{bar_chart, forecast_panel, line_chart, stacked_bar_chart, ChartSpec, ForecastPanel};
use crate::types::{AnalyticsResult, Repository};

/// Shown in place of a summary value the backend did not send.
pub const MISSING_VALUE: &str = "n/a";

/// A labelled summary statistic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SummaryStat {
    pub label: &'static str,
    pub value: String,
}

/// One self-contained visual unit of the dashboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Panel {
    Chart(ChartSpec),
    Summary(Vec<SummaryStat>),
    Forecast(ForecastPanel),
}

/// All panels for `repository`, top to bottom.
pub fn dashboard_panels(repository: &Repository, result: &AnalyticsResult) -> Vec<Panel> {
    let name = repository.label;
    let mut panels = vec![
        Panel::Chart(line_chart(
            &format!("Line Chart for issues of {name} in last 2 years"),
            &result.created,
        )),
        Panel::Chart(bar_chart(
            &format!("Monthly Created Issues for {name} in last 2 years"),
            &result.created,
        )),
        Panel::Chart(bar_chart(
            &format!("Stars Count for {name} in last 2 years"),
            &result.star_count,
        )),
        Panel::Chart(bar_chart(
            &format!("Forks Count for {name} in last 2 years"),
            &result.fork_count,
        )),
        Panel::Chart(bar_chart(
            &format!("Weekly Closed Issues for {name} in last 2 years"),
            &result.closed_week,
        )),
        Panel::Chart(stacked_bar_chart(
            &format!("Created and Closed Issues for {name} in last 2 years"),
            &result.stacked,
        )),
        Panel::Summary(summary(result)),
    ];

    panels.extend(
        FORECAST_METRICS
            .iter()
            .map(|metric| Panel::Forecast(forecast_panel(metric, result.images(metric.key)))),
    );
    panels
}

fn summary(result: &AnalyticsResult) -> Vec<SummaryStat> {
    let stat = |label, value: &str| SummaryStat {
        label,
        value: if value.trim().is_empty() {
            MISSING_VALUE.to_string()
        } else {
            value.to_string()
        },
    };
    vec![
        stat(
            "The day of the week maximum number of issues created",
            &result.max_issue_created_day,
        ),
        stat(
            "The day of the week maximum number of issues closed",
            &result.max_issue_closed_day,
        ),
        stat(
            "The month of the year that has maximum number of issues closed",
            &result.max_issue_close_month,
        ),
    ]
}
