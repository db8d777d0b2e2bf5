//! European option comparison panels and the solution-surface animation.

use std::path::Path;

use anyhow::{ensure, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use polars::prelude::{col, lit, DataFrame, DataType, IntoLazy};

use crate::charts::{animation, padded_range};
use crate::data::{CsvTable, DataProcessor};

pub const PANEL_WIDTH: u32 = 500;
pub const PANEL_HEIGHT: u32 = 600;

/// Lower/upper bound of the spot window applied to the solution surface,
/// after exponentiating the log-spot column.
pub const SPOT_WINDOW: (f64, f64) = (0.5, 2.0);

/// Render one comparison panel per option pair: analytic prices as filled
/// circles, FDM prices as crosses, markets along the x-axis.
pub fn render_comparison(table: &CsvTable, out_path: &Path) -> Result<()> {
    let df = table.dataframe();
    let option_ids = table.distinct_strings("Option")?;
    let pairs = DataProcessor::pair_options(&option_ids);
    ensure!(
        !pairs.is_empty(),
        "need at least two option identifiers, got {}",
        option_ids.len()
    );

    let markets = table.distinct_strings("Market")?;
    // The solver writes an Analytic column next to FDM; if an older file
    // lacks it, the FDM prices stand in as the reference.
    let analytic_col = if df.column("Analytic").is_ok() {
        "Analytic"
    } else {
        "FDM"
    };

    let width = PANEL_WIDTH * pairs.len() as u32;
    let root = BitMapBackend::new(out_path, (width, PANEL_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, pairs.len()));

    for (panel, (opt1, opt2)) in panels.iter().zip(pairs.iter()) {
        draw_pair_panel(panel, df, &markets, analytic_col, opt1, opt2)?;
    }

    root.present()?;
    Ok(())
}

/// Animate the option value surface: one frame per time slice, played from
/// the latest time back to the earliest, the direction the backward pricing
/// PDE is solved in.
pub fn render_solution_animation(table: &CsvTable, out_path: &Path) -> Result<()> {
    let windowed =
        DataProcessor::spot_window(table.dataframe(), "S", SPOT_WINDOW.0, SPOT_WINDOW.1)?;
    let times = DataProcessor::sorted_times(&windowed, "T")?;
    let earliest = times[0];
    let latest = times[times.len() - 1];

    // Reference curves and axis ranges are computed once and shared by every
    // frame.
    let value_curve =
        DataProcessor::series_xy(&DataProcessor::time_slice(&windowed, "T", earliest)?, "S", "f")?;
    let payoff_curve =
        DataProcessor::series_xy(&DataProcessor::time_slice(&windowed, "T", latest)?, "S", "f")?;
    let surface = DataProcessor::series_xy(&windowed, "S", "f")?;
    let x_range = padded_range(surface.iter().map(|p| p.0));
    let y_range = padded_range(surface.iter().map(|p| p.1));

    let frames = playback_order(&times).into_iter().map(|t| {
        let slice = DataProcessor::time_slice(&windowed, "T", t)?;
        let current = DataProcessor::series_xy(&slice, "S", "f")?;
        animation::render_frame(|root| {
            draw_solution_frame(root, t, &current, &value_curve, &payoff_curve, x_range, y_range)
        })
    });
    animation::write_gif(out_path, frames)
}

/// Frame order for the solution animation: reverse chronological.
pub fn playback_order(times: &[f64]) -> Vec<f64> {
    times.iter().rev().copied().collect()
}

fn draw_solution_frame(
    root: &DrawingArea<BitMapBackend, Shift>,
    t: f64,
    current: &[(f64, f64)],
    value_curve: &[(f64, f64)],
    payoff_curve: &[(f64, f64)],
    x_range: (f64, f64),
    y_range: (f64, f64),
) -> Result<()> {
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(root)
        .caption(format!("time = {t:.2}"), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_range.0..x_range.1, y_range.0..y_range.1)?;
    chart
        .configure_mesh()
        .x_desc("Spot")
        .y_desc("Value of option")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            current.iter().copied(),
            RED.stroke_width(2),
        ))?
        .label("Solution")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
    chart
        .draw_series(DashedLineSeries::new(
            value_curve.iter().copied(),
            5,
            3,
            BLACK.stroke_width(1),
        ))?
        .label("Value (t=0)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(1)));
    chart
        .draw_series(LineSeries::new(
            payoff_curve.iter().copied(),
            BLACK.stroke_width(1),
        ))?
        .label("Payoff (t=T)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(1)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_pair_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    df: &DataFrame,
    markets: &[String],
    analytic_col: &str,
    opt1: &str,
    opt2: &str,
) -> Result<()> {
    let analytic1 = market_points(df, opt1, analytic_col, markets)?;
    let fdm1 = market_points(df, opt1, "FDM", markets)?;
    let analytic2 = market_points(df, opt2, analytic_col, markets)?;
    let fdm2 = market_points(df, opt2, "FDM", markets)?;

    let (y_min, y_max) = padded_range(
        analytic1
            .iter()
            .chain(&fdm1)
            .chain(&analytic2)
            .chain(&fdm2)
            .map(|p| p.1),
    );
    let x_max = markets.len() as f64 - 0.5;

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{opt1} vs {opt2}"), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..x_max, y_min..y_max)?;

    let market_label = |x: &f64| -> String {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        markets.get(idx as usize).cloned().unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_labels(markets.len())
        .x_label_formatter(&market_label)
        .x_desc("Market")
        .y_desc("Price")
        .draw()?;

    chart
        .draw_series(
            analytic1
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, RED.filled())),
        )?
        .label(format!("Analytic {opt1}"))
        .legend(|(x, y)| Circle::new((x + 10, y), 4, RED.filled()));
    chart
        .draw_series(
            fdm1.iter()
                .map(|&(x, y)| Cross::new((x, y), 5, BLACK.stroke_width(2))),
        )?
        .label(format!("FDM {opt1}"))
        .legend(|(x, y)| Cross::new((x + 10, y), 5, BLACK.stroke_width(2)));
    chart
        .draw_series(
            analytic2
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
        )?
        .label(format!("Analytic {opt2}"))
        .legend(|(x, y)| Circle::new((x + 10, y), 4, BLUE.filled()));
    chart
        .draw_series(
            fdm2.iter()
                .map(|&(x, y)| Cross::new((x, y), 5, BLACK.stroke_width(2))),
        )?
        .label(format!("FDM {opt2}"))
        .legend(|(x, y)| Cross::new((x + 10, y), 5, BLACK.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

/// Prices of one option across markets, as (market index, price) points.
fn market_points(
    df: &DataFrame,
    option_id: &str,
    value_col: &str,
    markets: &[String],
) -> Result<Vec<(f64, f64)>> {
    let sub = df
        .clone()
        .lazy()
        .filter(col("Option").eq(lit(option_id)))
        .collect()?;

    let market_series = sub.column("Market")?;
    let value_cast = sub.column(value_col)?.cast(&DataType::Float64)?;
    let value_ca = value_cast.f64()?;

    let mut points = Vec::new();
    for i in 0..sub.height() {
        let (Ok(market), Some(value)) = (market_series.get(i), value_ca.get(i)) else {
            continue;
        };
        let name = market.to_string().trim_matches('"').to_string();
        if let Some(idx) = markets.iter().position(|m| *m == name) {
            points.push((idx as f64, value));
        }
    }
    Ok(points)
}
