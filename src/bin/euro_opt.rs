//! European option price comparison and solution-surface animation.

use anyhow::Result;
use log::info;

use fdmviz::charts::options;
use fdmviz::config::Paths;
use fdmviz::data::CsvTable;

fn main() -> Result<()> {
    env_logger::init();
    let paths = Paths::from_env();

    let sample = CsvTable::load(&paths.input("EuroOptExample_sample.csv"))?;
    let out = paths.output("EuroOptExample.png");
    options::render_comparison(&sample, &out)?;
    info!("saved {}", out.display());

    let solution = CsvTable::load(&paths.input("EuroOptExample_solution.csv"))?;
    let out = paths.output("EuroOptExample_solution.gif");
    options::render_solution_animation(&solution, &out)?;
    info!("saved {}", out.display());

    Ok(())
}
