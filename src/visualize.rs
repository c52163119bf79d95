//! Distribution comparison plots
//!
//! Renders a two-panel figure from a dataset: a violin plot (Gaussian kernel
//! density, Silverman bandwidth) on the left and a box plot with a mean
//! marker on the right. PNG is the default output; a `.svg` extension selects
//! the SVG backend. Purely presentational: nothing here feeds the verdict.

use crate::algorithm::Algorithm;
use crate::anova::GroupSummary;
use crate::dataset::{Dataset, Group};
use crate::error::{AnovaError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Violin fill colors, one per group position
const VIOLIN_PALETTE: [RGBColor; 3] = [
    RGBColor(228, 26, 28),
    RGBColor(55, 126, 184),
    RGBColor(77, 175, 74),
];

/// Box fill colors, one per group position
const BOX_PALETTE: [RGBColor; 3] = [
    RGBColor(102, 194, 165),
    RGBColor(252, 141, 98),
    RGBColor(141, 160, 203),
];

/// Density evaluation points per violin
const KDE_GRID_POINTS: usize = 100;

/// Bandwidths the density extends beyond the data extremes
const KDE_CUT: f64 = 2.0;

/// Maximum half-width of a violin or box, in category units
const HALF_WIDTH: f64 = 0.4;

/// Image settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 500,
        }
    }
}

/// Box-and-whisker statistics (Tukey, 1.5·IQR whiskers)
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub mean: f64,
    /// Smallest value ≥ Q1 - 1.5·IQR
    pub lower_whisker: f64,
    /// Largest value ≤ Q3 + 1.5·IQR
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn new(summary: &GroupSummary, values: &[f64]) -> Self {
        let fence = 1.5 * summary.iqr();
        let low_fence = summary.q1 - fence;
        let high_fence = summary.q3 + fence;

        let inside = values
            .iter()
            .copied()
            .filter(|v| (low_fence..=high_fence).contains(v));
        let (lower_whisker, upper_whisker) = inside.fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), v| (lo.min(v), hi.max(v)),
        );

        let outliers = values
            .iter()
            .copied()
            .filter(|v| !(low_fence..=high_fence).contains(v))
            .collect();

        Self {
            q1: summary.q1,
            median: summary.median,
            q3: summary.q3,
            mean: summary.mean,
            // Quartiles are interpolated, so the fences always contain data
            // unless every value is an outlier; fall back to the box edges.
            lower_whisker: if lower_whisker.is_finite() {
                lower_whisker
            } else {
                summary.q1
            },
            upper_whisker: if upper_whisker.is_finite() {
                upper_whisker
            } else {
                summary.q3
            },
            outliers,
        }
    }
}

/// Silverman's rule-of-thumb bandwidth: 0.9·min(σ, IQR/1.34)·n^(-1/5)
pub fn silverman_bandwidth(summary: &GroupSummary) -> f64 {
    let spread = summary.std_dev.min(summary.iqr() / 1.34);
    let spread = if spread > 0.0 {
        spread
    } else if summary.std_dev > 0.0 {
        summary.std_dev
    } else {
        1.0
    };
    0.9 * spread * (summary.count as f64).powf(-0.2)
}

/// Gaussian kernel density evaluated on an even grid
///
/// Returns `(value, density)` pairs covering the data range extended by
/// `KDE_CUT` bandwidths on each side.
pub fn kde_profile(values: &[f64], bandwidth: f64, points: usize) -> Vec<(f64, f64)> {
    if values.is_empty() || bandwidth <= 0.0 || points < 2 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = min - KDE_CUT * bandwidth;
    let high = max + KDE_CUT * bandwidth;
    let step = (high - low) / (points - 1) as f64;

    let norm = 1.0 / (values.len() as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    (0..points)
        .map(|i| {
            let y = low + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|x| {
                    let z = (y - x) / bandwidth;
                    (-0.5 * z * z).exp()
                })
                .sum::<f64>()
                * norm;
            (y, density)
        })
        .collect()
}

/// Everything needed to draw one group in both panels
#[derive(Debug, Clone)]
struct GroupPlot {
    algorithm: Algorithm,
    values: Vec<f64>,
    box_stats: BoxStats,
    density: Vec<(f64, f64)>,
}

impl GroupPlot {
    fn from_group(group: &Group) -> Result<Self> {
        let summary = GroupSummary::from_group(group)?;
        let bandwidth = silverman_bandwidth(&summary);
        Ok(Self {
            algorithm: group.algorithm,
            values: group.values.clone(),
            box_stats: BoxStats::new(&summary, &group.values),
            density: kde_profile(&group.values, bandwidth, KDE_GRID_POINTS),
        })
    }

    /// Closed outline of the violin centered at `center`
    fn violin_outline(&self, center: f64) -> Vec<(f64, f64)> {
        let peak = self
            .density
            .iter()
            .map(|&(_, d)| d)
            .fold(0.0_f64, f64::max);
        if peak <= 0.0 {
            return Vec::new();
        }

        let right = self
            .density
            .iter()
            .map(|&(y, d)| (center + HALF_WIDTH * d / peak, y));
        let left = self
            .density
            .iter()
            .rev()
            .map(|&(y, d)| (center - HALF_WIDTH * d / peak, y));
        right.chain(left).collect()
    }
}

/// Y-axis range covering data, whiskers and densities, with 5% padding
fn value_range(groups: &[GroupPlot]) -> (f64, f64) {
    let (lo, hi) = groups
        .iter()
        .flat_map(|g| {
            g.values
                .iter()
                .copied()
                .chain(g.density.iter().map(|&(y, _)| y))
        })
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1e-6);
    (lo - pad, hi + pad)
}

/// Render the violin and box plot comparison to `path`
pub fn render_comparison(dataset: &Dataset, path: &Path, config: &PlotConfig) -> Result<()> {
    let groups = dataset.groups();
    if groups.is_empty() {
        return Err(AnovaError::insufficient("dataset is empty, nothing to plot"));
    }

    let plots = groups
        .iter()
        .map(GroupPlot::from_group)
        .collect::<Result<Vec<_>>>()?;

    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    let size = (config.width, config.height);
    let outcome = if is_svg {
        draw_figure(&SVGBackend::new(path, size).into_drawing_area(), &plots)
    } else {
        draw_figure(&BitMapBackend::new(path, size).into_drawing_area(), &plots)
    };

    outcome.map_err(|e| AnovaError::Plot(format!("{}: {}", path.display(), e)))?;
    tracing::debug!("Rendered {} groups to {}", plots.len(), path.display());
    Ok(())
}

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

fn draw_figure<DB>(root: &DrawingArea<DB, Shift>, plots: &[GroupPlot]) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));
    let y_range = value_range(plots);

    draw_violin_panel(&panels[0], plots, y_range)?;
    draw_box_panel(&panels[1], plots, y_range)?;

    root.present()?;
    Ok(())
}

fn category_axis_label(plots: &[GroupPlot], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    plots
        .get(idx as usize)
        .map(|p| p.algorithm.to_string())
        .unwrap_or_default()
}

fn draw_violin_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    plots: &[GroupPlot],
    (y_min, y_max): (f64, f64),
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let x_max = plots.len() as f64 - 0.5;
    let mut chart = ChartBuilder::on(area)
        .caption(
            "Control Error Distribution by Algorithm (Violin Plot)",
            ("sans-serif", 20),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..x_max, y_min..y_max)?;

    let label_fmt = |x: &f64| category_axis_label(plots, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(2 * plots.len() + 1)
        .x_label_formatter(&label_fmt)
        .x_desc("Algorithm")
        .y_desc("Control Error (mm)")
        .draw()?;

    for (idx, plot) in plots.iter().enumerate() {
        let color = VIOLIN_PALETTE[idx % VIOLIN_PALETTE.len()];
        let center = idx as f64;
        let outline = plot.violin_outline(center);
        if outline.is_empty() {
            continue;
        }

        chart.draw_series(std::iter::once(Polygon::new(
            outline.clone(),
            color.mix(0.6).filled(),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            outline,
            BLACK.stroke_width(1),
        )))?;

        // Inner box: interquartile bar and median dot
        let b = &plot.box_stats;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(center - 0.03, b.q1), (center + 0.03, b.q3)],
            BLACK.filled(),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(center, b.lower_whisker), (center, b.upper_whisker)],
            BLACK.stroke_width(1),
        )))?;
        chart.draw_series(std::iter::once(Circle::new(
            (center, b.median),
            3,
            WHITE.filled(),
        )))?;
    }

    Ok(())
}

fn draw_box_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    plots: &[GroupPlot],
    (y_min, y_max): (f64, f64),
) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let x_max = plots.len() as f64 - 0.5;
    let mut chart = ChartBuilder::on(area)
        .caption(
            "Control Error Distribution by Algorithm (Box Plot)",
            ("sans-serif", 20),
        )
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..x_max, y_min..y_max)?;

    let label_fmt = |x: &f64| category_axis_label(plots, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(2 * plots.len() + 1)
        .x_label_formatter(&label_fmt)
        .x_desc("Algorithm")
        .y_desc("Control Error (mm)")
        .draw()?;

    for (idx, plot) in plots.iter().enumerate() {
        let color = BOX_PALETTE[idx % BOX_PALETTE.len()];
        let center = idx as f64;
        let (left, right) = (center - HALF_WIDTH * 0.8, center + HALF_WIDTH * 0.8);
        let b = &plot.box_stats;

        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, b.q1), (right, b.q3)],
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, b.q1), (right, b.q3)],
            BLACK.stroke_width(1),
        )))?;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(left, b.median), (right, b.median)],
            BLACK.stroke_width(2),
        )))?;

        // Whiskers with caps
        let cap = HALF_WIDTH * 0.3;
        chart.draw_series(
            [
                vec![(center, b.q3), (center, b.upper_whisker)],
                vec![(center, b.q1), (center, b.lower_whisker)],
                vec![(center - cap, b.upper_whisker), (center + cap, b.upper_whisker)],
                vec![(center - cap, b.lower_whisker), (center + cap, b.lower_whisker)],
            ]
            .into_iter()
            .map(|segment| PathElement::new(segment, BLACK.stroke_width(1))),
        )?;

        chart.draw_series(
            b.outliers
                .iter()
                .map(|&y| Circle::new((center, y), 3, BLACK.stroke_width(1))),
        )?;
    }

    // Mean markers (diamonds), labelled once in the legend
    chart
        .draw_series(plots.iter().enumerate().map(|(idx, plot)| {
            EmptyElement::at((idx as f64, plot.box_stats.mean))
                + Polygon::new(vec![(0, -7), (7, 0), (0, 7), (-7, 0)], RED.filled())
        }))?
        .label("Mean")
        .legend(|(x, y)| {
            Polygon::new(
                vec![(x + 10, y - 6), (x + 16, y), (x + 10, y + 6), (x + 4, y)],
                RED.filled(),
            )
        });

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    Ok(())
}
