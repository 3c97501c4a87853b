use plotters::style::{RGBAColor, RGBColor};

/// Chart theme configuration
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
    pub baseline_color: RGBAColor,
    /// Series colors, cycled in order
    pub palette: &'static [RGBColor],
}

const SERIES_PALETTE: [RGBColor; 6] = [
    RGBColor(135, 206, 250), // light sky blue
    RGBColor(255, 165, 0),   // orange
    RGBColor(144, 238, 144), // light green
    RGBColor(240, 128, 128), // light coral
    RGBColor(221, 160, 221), // plum
    RGBColor(240, 230, 140), // khaki
];

impl ChartTheme {
    pub fn series_color(&self, index: usize) -> RGBColor {
        self.palette[index % self.palette.len()]
    }
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(0, 0, 0, 0.94),
            text_color: RGBAColor(255, 255, 255, 0.8),
            grid_color: RGBAColor(255, 255, 255, 0.15),
            axis_color: RGBAColor(255, 255, 255, 0.8),
            baseline_color: RGBAColor(128, 128, 128, 1.0),
            palette: &SERIES_PALETTE,
        }
    }
}

/// Chart style configuration
pub struct ChartStyle {
    pub line_width: u32,
    pub font_size: u32,
    pub caption_size: u32,
    pub data_label_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
    /// Fraction of a category slot covered by its bar
    pub bar_width: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_width: 2,
            font_size: 13,
            caption_size: 22,
            data_label_size: 12,
            margin: 10,
            label_area_size: 60,
            bar_width: 0.7,
        }
    }
}
