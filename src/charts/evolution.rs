//! Fokker-Planck density evolution charts.
//!
//! A static snapshot of the initial density plus an animated GIF of the
//! density evolving forwards in time. The y-axis ceiling is the global
//! maximum of the density over the whole table, so every frame shares the
//! same scale; the reference curve is the slice at the table's actual
//! earliest time, never a hard-coded time value.

use std::path::Path;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::charts::animation::{self, FRAME_HEIGHT, FRAME_WIDTH};
use crate::charts::{padded_range, LIGHT_GRAY};
use crate::data::{CsvTable, DataProcessor};

/// Render the density at the earliest time as a standalone PNG.
pub fn render_initial_snapshot(table: &CsvTable, out_path: &Path) -> Result<()> {
    let df = table.dataframe();
    let times = DataProcessor::sorted_times(df, "T")?;
    let initial =
        DataProcessor::series_xy(&DataProcessor::time_slice(df, "T", times[0])?, "S", "f")?;

    let (x_min, x_max) = padded_range(initial.iter().map(|p| p.0));
    let (y_min, y_max) = padded_range(initial.iter().map(|p| p.1));

    let root = BitMapBackend::new(out_path, (FRAME_WIDTH, FRAME_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Initial density", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;
    chart.configure_mesh().draw()?;
    chart.draw_series(LineSeries::new(
        initial.iter().copied(),
        BLUE.stroke_width(2),
    ))?;

    root.present()?;
    Ok(())
}

/// Animate the density evolution in forward chronological order.
pub fn render_evolution_animation(table: &CsvTable, out_path: &Path) -> Result<()> {
    let df = table.dataframe();

    // Shared y ceiling across every frame.
    let ylim = DataProcessor::column_max(df, "f")?;
    let times = DataProcessor::sorted_times(df, "T")?;
    let initial =
        DataProcessor::series_xy(&DataProcessor::time_slice(df, "T", times[0])?, "S", "f")?;
    let x_range = padded_range(initial.iter().map(|p| p.0));

    let frames = playback_order(&times).into_iter().map(|t| {
        let slice = DataProcessor::time_slice(df, "T", t)?;
        let current = DataProcessor::series_xy(&slice, "S", "f")?;
        animation::render_frame(|root| {
            draw_evolution_frame(root, t, &initial, &current, x_range, ylim)
        })
    });
    animation::write_gif(out_path, frames)
}

/// Frame order for the evolution animation: forward chronological.
pub fn playback_order(times: &[f64]) -> Vec<f64> {
    times.to_vec()
}

fn draw_evolution_frame(
    root: &DrawingArea<BitMapBackend, Shift>,
    t: f64,
    initial: &[(f64, f64)],
    current: &[(f64, f64)],
    x_range: (f64, f64),
    ylim: f64,
) -> Result<()> {
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(root)
        .caption(format!("time = {t:.2}"), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.0..x_range.1, 0.0..ylim)?;
    chart.configure_mesh().draw()?;

    chart.draw_series(DashedLineSeries::new(
        initial.iter().copied(),
        5,
        3,
        LIGHT_GRAY.stroke_width(1),
    ))?;
    chart.draw_series(LineSeries::new(
        current.iter().copied(),
        BLACK.stroke_width(2),
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_runs_in_forward_chronological_order() {
        let times = [0.0, 0.25, 0.5, 1.0];
        assert_eq!(playback_order(&times), vec![0.0, 0.25, 0.5, 1.0]);
    }
}

