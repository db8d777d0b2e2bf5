//! Spatial and temporal convergence charts for the FDM pricer.

use anyhow::Result;
use log::info;

use fdmviz::charts::convergence;
use fdmviz::config::Paths;
use fdmviz::data::{CsvTable, DataProcessor};

const REFERENCE: &str = "Analytic";

fn main() -> Result<()> {
    env_logger::init();
    let paths = Paths::from_env();

    let datasets = [
        (
            "convergenceExample1.csv",
            "NS",
            "spatial steps",
            "convergence_spatial.png",
        ),
        (
            "convergenceExample2.csv",
            "NT",
            "time steps",
            "convergence_time.png",
        ),
    ];

    for (input, index_col, x_desc, output) in datasets {
        let table = CsvTable::load(&paths.input(input))?;
        let derived = DataProcessor::append_abs_diff(table.dataframe(), index_col, REFERENCE)?;

        let out = paths.output(output);
        convergence::render(&derived, index_col, REFERENCE, x_desc, &out)?;
        info!("saved {}", out.display());
    }

    Ok(())
}
