use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;

use super::panels::{ChartKind, ChartSpec};
use super::styles::{ChartStyle, ChartTheme};
use crate::utils::downsample;

pub type PlotError = Box<dyn Error + Send + Sync>;

type Chart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Longer series are merged down to this many categories before drawing.
pub const MAX_DRAWN_POINTS: usize = 500;

/// An RGB raster of one chart.
#[derive(Clone, Debug)]
pub struct RenderedChart {
    pub width: u32,
    pub height: u32,
    /// Row-major, 3 bytes per pixel
    pub rgb: Vec<u8>,
}

/// Rasterize `spec` into a `width` x `height` RGB buffer.
pub fn render_chart(spec: &ChartSpec, width: u32, height: u32) -> Result<RenderedChart, PlotError> {
    let width = width.max(1);
    let height = height.max(1);
    let mut rgb = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (width, height)).into_drawing_area();
        draw_chart(spec, &root)?;
        root.present()?;
    }
    Ok(RenderedChart { width, height, rgb })
}

/// Draw `spec` onto an existing drawing area.
pub fn draw_chart(spec: &ChartSpec, root: &DrawingArea<BitMapBackend, Shift>) -> Result<(), PlotError> {
    let theme = ChartTheme::default();
    let style = ChartStyle::default();
    root.fill(&theme.background_color)?;

    let spec = downsample(spec, MAX_DRAWN_POINTS);
    let (x_min, x_max) = x_range(spec.categories.len());
    let y_max = y_axis_max(spec.y_max());

    // Categories sit on integer x positions so mesh ticks line up with them.
    let categories = spec.categories.clone();
    let x_label_formatter = move |x: &f64| category_label(&categories, *x);
    let y_label_formatter = |y: &f64| format_count(*y);

    let mut chart = ChartBuilder::on(root)
        .caption(
            &spec.title,
            ("sans-serif", style.caption_size)
                .into_font()
                .color(&theme.text_color),
        )
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .y_desc(spec.y_axis_title)
        .label_style(("sans-serif", style.font_size).into_font().color(&theme.text_color))
        .x_labels(spec.categories.len().clamp(1, 24))
        .x_label_formatter(&x_label_formatter)
        .y_label_formatter(&y_label_formatter)
        // Rotate x labels for better readability
        .x_label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color)
                .transform(FontTransform::Rotate90)
                .pos(Pos::new(HPos::Right, VPos::Center)),
        )
        .draw()?;

    draw_baseline(&mut chart, &theme, x_min, x_max)?;

    if spec.is_empty() {
        chart.draw_series(std::iter::once(Text::new(
            "No data".to_string(),
            (0.0, y_max / 2.0),
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        )))?;
        return Ok(());
    }

    match spec.kind {
        ChartKind::Line => draw_line(&mut chart, &spec, &theme, &style)?,
        ChartKind::Bar => draw_bars(&mut chart, &spec, &theme, &style)?,
        ChartKind::StackedBar => draw_stacked(&mut chart, &spec, &theme, &style)?,
    }

    Ok(())
}

fn draw_baseline(chart: &mut Chart<'_, '_>, theme: &ChartTheme, x_min: f64, x_max: f64) -> Result<(), PlotError> {
    let baseline = ShapeStyle::from(&theme.baseline_color).stroke_width(1);
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(x_min, 0.0), (x_max, 0.0)],
        baseline,
    )))?;
    Ok(())
}

fn value_label_style(theme: &ChartTheme, style: &ChartStyle, vpos: VPos) -> TextStyle<'static> {
    ("sans-serif", style.data_label_size)
        .into_font()
        .color(&theme.text_color)
        .pos(Pos::new(HPos::Center, vpos))
}

fn draw_line(chart: &mut Chart<'_, '_>, spec: &ChartSpec, theme: &ChartTheme, style: &ChartStyle) -> Result<(), PlotError> {
    for (index, series) in spec.series.iter().enumerate() {
        let color = theme.series_color(index);
        let points: Vec<(f64, f64)> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v as f64))
            .collect();

        chart.draw_series(LineSeries::new(points.clone(), color.stroke_width(style.line_width)))?;
        chart.draw_series(points.iter().map(|p| Circle::new(*p, 3, color.filled())))?;

        if spec.data_labels {
            let label_style = value_label_style(theme, style, VPos::Bottom);
            chart.draw_series(
                points
                    .iter()
                    .map(|(x, y)| Text::new(format_count(*y), (*x, *y), label_style.clone())),
            )?;
        }
    }
    Ok(())
}

fn draw_bars(chart: &mut Chart<'_, '_>, spec: &ChartSpec, theme: &ChartTheme, style: &ChartStyle) -> Result<(), PlotError> {
    let half = style.bar_width / 2.0;
    for (index, series) in spec.series.iter().enumerate() {
        let color = theme.series_color(index);
        chart.draw_series(series.values.iter().enumerate().map(|(i, v)| {
            let x = i as f64;
            Rectangle::new([(x - half, 0.0), (x + half, *v as f64)], color.mix(0.85).filled())
        }))?;

        if spec.data_labels {
            let label_style = value_label_style(theme, style, VPos::Bottom);
            chart.draw_series(series.values.iter().enumerate().map(|(i, v)| {
                Text::new(format_count(*v as f64), (i as f64, *v as f64), label_style.clone())
            }))?;
        }
    }
    Ok(())
}

fn draw_stacked<'a>(chart: &mut Chart<'a, 'a>, spec: &ChartSpec, theme: &ChartTheme, style: &ChartStyle) -> Result<(), PlotError> {
    let half = style.bar_width / 2.0;
    let mut base = vec![0u64; spec.categories.len()];

    for (index, series) in spec.series.iter().enumerate() {
        let color = theme.series_color(index);
        let segments: Vec<(f64, f64, f64)> = series
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let bottom = base[i] as f64;
                base[i] = base[i].saturating_add(*v);
                (i as f64, bottom, base[i] as f64)
            })
            .collect();

        chart
            .draw_series(segments.iter().map(|(x, bottom, top)| {
                Rectangle::new([(x - half, *bottom), (x + half, *top)], color.mix(0.85).filled())
            }))?
            .label(series.name.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));

        if spec.data_labels {
            let label_style = value_label_style(theme, style, VPos::Center);
            chart.draw_series(
                segments
                    .iter()
                    .filter(|(_, bottom, top)| top > bottom)
                    .map(|(x, bottom, top)| {
                        Text::new(
                            format_count(top - bottom),
                            (*x, (bottom + top) / 2.0),
                            label_style.clone(),
                        )
                    }),
            )?;
        }
    }

    if spec.stack_labels {
        let total_style = value_label_style(theme, style, VPos::Bottom);
        chart.draw_series(spec.stack_totals().into_iter().enumerate().map(|(i, total)| {
            Text::new(format_count(total as f64), (i as f64, total as f64), total_style.clone())
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(theme.background_color)
        .border_style(theme.axis_color)
        .label_font(("sans-serif", style.font_size).into_font().color(&theme.text_color))
        .draw()?;

    Ok(())
}

/// X range with one unit per category, centred on integer positions.
pub(super) fn x_range(categories: usize) -> (f64, f64) {
    (-0.5, categories.max(1) as f64 - 0.5)
}

/// Upper y bound: headroom above the largest value for labels, and a unit
/// range for empty or all-zero charts.
pub(super) fn y_axis_max(max_value: u64) -> f64 {
    if max_value == 0 {
        1.0
    } else {
        max_value as f64 * 1.15
    }
}

/// Label for an x tick; only ticks that land on a category are labelled.
pub(super) fn category_label(categories: &[String], x: f64) -> String {
    let nearest = x.round();
    if (x - nearest).abs() > 1e-6 || nearest < 0.0 {
        return String::new();
    }
    categories.get(nearest as usize).cloned().unwrap_or_default()
}

/// Use K/M formatting for large numbers
pub(super) fn format_count(value: f64) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}
