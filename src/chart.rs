// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! SVG trend chart of the four ratios over time.
//!
//! Percent ratios (current ratio, debt ratio) share the upper panel; ROE and
//! interest coverage live in the lower one since their scales differ by an
//! order of magnitude.

use anyhow::{Context, Result};
use chrono::Local;
use plotters::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::normalizer::MetricKind;
use crate::series::{ChartPoint, TimeSeries};

const COLOR_BLUE: RGBColor = RGBColor(59, 130, 246);
const COLOR_ROSE: RGBColor = RGBColor(244, 63, 94);
const COLOR_EMERALD: RGBColor = RGBColor(16, 185, 129);
const COLOR_AMBER: RGBColor = RGBColor(245, 158, 11);

fn metric_color(kind: MetricKind) -> RGBColor {
    match kind {
        MetricKind::Liquidity => COLOR_BLUE,
        MetricKind::Stability => COLOR_ROSE,
        MetricKind::Profitability => COLOR_EMERALD,
        MetricKind::Activity => COLOR_AMBER,
    }
}

/// One line of the chart: x is the point index
#[derive(Debug, Clone, PartialEq)]
pub struct TrendLine {
    pub kind: MetricKind,
    pub points: Vec<(f64, f64)>,
}

fn metric_value(point: &ChartPoint, kind: MetricKind) -> f64 {
    match kind {
        MetricKind::Liquidity => point.liquidity,
        MetricKind::Stability => point.stability,
        MetricKind::Profitability => point.profitability,
        MetricKind::Activity => point.activity,
    }
}

pub fn trend_lines(points: &[ChartPoint], kinds: &[MetricKind]) -> Vec<TrendLine> {
    kinds
        .iter()
        .map(|&kind| TrendLine {
            kind,
            points: points
                .iter()
                .enumerate()
                .map(|(i, p)| (i as f64, metric_value(p, kind)))
                .collect(),
        })
        .collect()
}

/// Y range covering every value, anchored at zero, with 10% headroom
pub fn y_range(lines: &[TrendLine]) -> Range<f64> {
    let values = lines.iter().flat_map(|l| l.points.iter().map(|&(_, y)| y));
    let (min, max) = values.fold((0.0f64, 0.0f64), |(lo, hi), y| (lo.min(y), hi.max(y)));
    let span = (max - min).max(1.0);
    let low = if min < 0.0 { min - span * 0.1 } else { 0.0 };
    low..(max + span * 0.1)
}

fn x_range(len: usize) -> Range<f64> {
    // a single point still needs a non-empty axis
    -0.5..(len.max(1) as f64 - 0.5)
}

fn draw_panel(
    area: &DrawingArea<SVGBackend, plotters::coord::Shift>,
    caption: &str,
    labels: &[String],
    lines: &[TrendLine],
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range(labels.len()), y_range(lines))?;

    let label_at = |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    };

    chart
        .configure_mesh()
        .x_labels(labels.len().max(1))
        .x_label_formatter(&label_at)
        .draw()?;

    for line in lines {
        let color = metric_color(line.kind);
        chart
            .draw_series(LineSeries::new(line.points.clone(), color.stroke_width(2)))?
            .label(format!("{} ({})", line.kind.ratio_name(), line.kind.unit()))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        chart.draw_series(
            line.points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    Ok(())
}

/// Render the trend chart of `series` to `path`
pub fn render_trend_chart(series: &TimeSeries, title: &str, path: &Path) -> Result<()> {
    let points = series.chart_points();
    let labels: Vec<String> = points.iter().map(|p| p.name.clone()).collect();

    let root = SVGBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 30))?;
    let (upper, lower) = root.split_vertically(380);

    draw_panel(
        &upper,
        "Liquidity and leverage (%)",
        &labels,
        &trend_lines(&points, &[MetricKind::Liquidity, MetricKind::Stability]),
    )?;
    draw_panel(
        &lower,
        "Profitability (%) and interest coverage (x)",
        &labels,
        &trend_lines(&points, &[MetricKind::Profitability, MetricKind::Activity]),
    )?;

    root.present()?;
    Ok(())
}

/// Render into `output_dir` under a timestamped name and return the path
pub fn write_trend_chart(series: &TimeSeries, title: &str, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let code = series.latest().stock_code.as_str();
    let code = if code.is_empty() { "fallback" } else { code };
    let path = output_dir.join(format!(
        "trend_{}_{}.svg",
        code,
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    render_trend_chart(series, title, &path)?;
    tracing::info!(path = %path.display(), "generated trend chart");
    Ok(path)
}
