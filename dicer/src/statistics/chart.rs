use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::{
    preferences::Theme,
    statistics::aggregator::{StatType, Summary},
};

pub const CHART_WIDTH: f64 = 540.0;
pub const CHART_HEIGHT: f64 = 300.0;
pub const CHART_PADDING: f64 = 50.0;
pub const GRID_LINES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub value: u32,
    pub count: u64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub y: f64,
    pub label: u64,
}

/// Plot coordinates for a frequency series. Higher counts sit closer to the
/// top of the plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub axis_title: String,
    pub min_value: u32,
    pub max_value: u32,
    pub max_count: u64,
    pub points: Vec<ChartPoint>,
    pub grid: Vec<GridLine>,
}

impl ChartLayout {
    /// `None` when there is nothing to plot.
    pub fn from_series(series: &[(u32, u64)], stat_type: StatType) -> Option<Self> {
        let min_value = series.iter().map(|&(v, _)| v).min()?;
        let max_value = series.iter().map(|&(v, _)| v).max()?;
        let max_count = series.iter().map(|&(_, c)| c).max()?;

        let plot_width = CHART_WIDTH - 2.0 * CHART_PADDING;
        let plot_height = CHART_HEIGHT - 2.0 * CHART_PADDING;

        let x_scale = |value: u32| {
            if min_value == max_value {
                CHART_WIDTH / 2.0
            } else {
                CHART_PADDING
                    + (value - min_value) as f64 / (max_value - min_value) as f64 * plot_width
            }
        };
        let y_scale = |count: u64| {
            let fraction = if max_count == 0 {
                0.0
            } else {
                count as f64 / max_count as f64
            };
            CHART_HEIGHT - CHART_PADDING - fraction * plot_height
        };

        let points = series
            .iter()
            .map(|&(value, count)| ChartPoint {
                value,
                count,
                x: x_scale(value),
                y: y_scale(count),
            })
            .collect();

        let grid = (0..=GRID_LINES)
            .map(|i| GridLine {
                y: CHART_PADDING + i as f64 * plot_height / GRID_LINES as f64,
                label: (max_count as f64 / GRID_LINES as f64 * (GRID_LINES - i) as f64).round()
                    as u64,
            })
            .collect();

        Some(Self {
            axis_title: stat_type.axis_title().to_string(),
            min_value,
            max_value,
            max_count,
            points,
            grid,
        })
    }

    pub fn from_summary(summary: &Summary, stat_type: StatType) -> Option<Self> {
        Self::from_series(&summary.series, stat_type)
    }

    /// Unstyled markup; the embedding page supplies the `chart-*` classes.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        // writing into a String cannot fail
        let _ = self.write_svg(&mut svg, None);
        svg
    }

    /// Standalone markup carrying its own stylesheet for `theme`.
    pub fn to_themed_svg(&self, theme: Theme) -> String {
        let mut svg = String::new();
        let _ = self.write_svg(&mut svg, Some(theme));
        svg
    }

    pub fn write_svg(&self, f: &mut impl Write, theme: Option<Theme>) -> std::fmt::Result {
        let (w, h, pad) = (CHART_WIDTH, CHART_HEIGHT, CHART_PADDING);
        write!(
            f,
            r#"<svg class="chart-svg" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">"#
        )?;
        if let Some(theme) = theme {
            write_style(f, theme)?;
        }

        for line in &self.grid {
            write!(
                f,
                r#"<line class="chart-grid" x1="{pad}" y1="{y}" x2="{x2}" y2="{y}"/>"#,
                y = line.y,
                x2 = w - pad
            )?;
        }

        write!(
            f,
            r#"<line class="chart-axis" x1="{pad}" y1="{pad}" x2="{pad}" y2="{y2}"/>"#,
            y2 = h - pad
        )?;
        write!(
            f,
            r#"<line class="chart-axis" x1="{pad}" y1="{y}" x2="{x2}" y2="{y}"/>"#,
            y = h - pad,
            x2 = w - pad
        )?;

        for line in &self.grid {
            write!(
                f,
                r#"<text class="chart-label" x="{x}" y="{y}" text-anchor="end">{label}</text>"#,
                x = pad - 10.0,
                y = line.y + 5.0,
                label = line.label
            )?;
        }

        for point in &self.points {
            write!(
                f,
                r#"<text class="chart-label" x="{x}" y="{y}" text-anchor="middle">{value}</text>"#,
                x = point.x,
                y = h - pad + 20.0,
                value = point.value
            )?;
        }

        write!(f, r#"<path class="chart-line" d=""#)?;
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            let command = if i == 0 { 'M' } else { 'L' };
            write!(f, "{command} {} {}", point.x, point.y)?;
        }
        write!(f, r#""/>"#)?;

        for point in &self.points {
            write!(
                f,
                r#"<circle class="chart-dot" cx="{}" cy="{}" r="5"/>"#,
                point.x, point.y
            )?;
        }

        write!(
            f,
            r#"<text class="chart-label" x="{x}" y="{y}" text-anchor="middle" font-weight="700">{title}</text>"#,
            x = w / 2.0,
            y = h - 5.0,
            title = self.axis_title
        )?;
        write!(
            f,
            r#"<text class="chart-label" x="15" y="{y}" text-anchor="middle" transform="rotate(-90 15 {y})" font-weight="700">Rolls</text>"#,
            y = h / 2.0
        )?;
        write!(f, "</svg>")
    }
}

fn write_style(f: &mut impl Write, theme: Theme) -> std::fmt::Result {
    let (background, text, grid, accent) = match theme {
        Theme::Light => ("#ffffff", "#4a5568", "#e2e8f0", "#667eea"),
        Theme::Dark => ("#1a202c", "#cbd5e0", "#2d3748", "#9f7aea"),
    };
    write!(
        f,
        "<style>\
         .chart-svg {{ background: {background}; }}\
         .chart-grid {{ stroke: {grid}; stroke-width: 1; }}\
         .chart-axis {{ stroke: {text}; stroke-width: 2; }}\
         .chart-label {{ fill: {text}; font: 12px sans-serif; }}\
         .chart-line {{ fill: none; stroke: {accent}; stroke-width: 3; }}\
         .chart-dot {{ fill: {accent}; }}\
         </style>"
    )
}
