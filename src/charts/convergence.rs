//! Convergence chart.
//!
//! Two panels side by side: scheme prices against the analytic reference on
//! the left, absolute deviations on the right, both indexed by step count.

use std::path::Path;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use polars::prelude::DataFrame;

use crate::charts::{padded_range, PALETTE};
use crate::data::DataProcessor;

pub const WIDTH: u32 = 1200;
pub const HEIGHT: u32 = 500;

/// Render the two-panel convergence figure for a table that already carries
/// its derived `_diff` columns.
pub fn render(
    df: &DataFrame,
    index_col: &str,
    reference: &str,
    x_desc: &str,
    out_path: &Path,
) -> Result<()> {
    let scheme_cols = DataProcessor::scheme_columns(df, index_col, reference);
    let diff_cols = DataProcessor::diff_columns(df);

    let root = BitMapBackend::new(out_path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 2));

    draw_price_panel(&panels[0], df, index_col, reference, &scheme_cols, x_desc)?;
    draw_diff_panel(&panels[1], df, index_col, &diff_cols, x_desc)?;

    root.present()?;
    Ok(())
}

fn draw_price_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    df: &DataFrame,
    index_col: &str,
    reference: &str,
    scheme_cols: &[String],
    x_desc: &str,
) -> Result<()> {
    let mut series: Vec<(String, Vec<(f64, f64)>)> = Vec::new();
    for name in scheme_cols {
        series.push((name.clone(), DataProcessor::series_xy(df, index_col, name)?));
    }
    let analytic = DataProcessor::series_xy(df, index_col, reference)?;

    let all_points = series
        .iter()
        .flat_map(|(_, points)| points.iter())
        .chain(analytic.iter());
    let (x_min, x_max) = padded_range(all_points.clone().map(|p| p.0));
    let (y_min, y_max) = padded_range(all_points.map(|p| p.1));

    let mut chart = ChartBuilder::on(area)
        .caption("Price by scheme", ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart.configure_mesh().x_desc(x_desc).y_desc("price").draw()?;

    for (i, (name, points)) in series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                color.stroke_width(2),
            ))?
            .label(name)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    // Dashed black reference line, drawn last so it stays on top.
    chart
        .draw_series(DashedLineSeries::new(
            analytic.iter().copied(),
            6,
            4,
            BLACK.stroke_width(1),
        ))?
        .label(reference)
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(1)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_diff_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    df: &DataFrame,
    index_col: &str,
    diff_cols: &[String],
    x_desc: &str,
) -> Result<()> {
    let mut series: Vec<(String, Vec<(f64, f64)>)> = Vec::new();
    for name in diff_cols {
        series.push((name.clone(), DataProcessor::series_xy(df, index_col, name)?));
    }

    let all_points = series.iter().flat_map(|(_, points)| points.iter());
    let (x_min, x_max) = padded_range(all_points.clone().map(|p| p.0));
    let (_, y_max) = padded_range(all_points.map(|p| p.1));

    let mut chart = ChartBuilder::on(area)
        .caption("Deviation from analytic", ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("diff price")
        .draw()?;

    for (i, (name, points)) in series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                color.stroke_width(2),
            ))?
            .label(name)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}
