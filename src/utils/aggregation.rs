use crate::plotting::{ChartSpec, SeriesSpec};

/// Merge neighbouring categories so that at most `target_points` remain.
///
/// Each window keeps the label of its first category and sums the values of
/// every series over the window.
pub fn downsample(spec: &ChartSpec, target_points: usize) -> ChartSpec {
    let target_points = target_points.max(1);
    if spec.categories.len() <= target_points {
        return spec.clone();
    }

    let window_size = (spec.categories.len() as f64 / target_points as f64).ceil() as usize;
    let categories = spec
        .categories
        .chunks(window_size)
        .map(|chunk| chunk[0].clone())
        .collect();
    let series = spec
        .series
        .iter()
        .map(|s| SeriesSpec {
            name: s.name.clone(),
            values: s
                .values
                .chunks(window_size)
                .map(|chunk| chunk.iter().copied().fold(0u64, u64::saturating_add))
                .collect(),
        })
        .collect();

    ChartSpec {
        categories,
        series,
        ..spec.clone()
    }
}
