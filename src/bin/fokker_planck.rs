//! Fokker-Planck density snapshot and evolution animation.

use anyhow::Result;
use log::info;

use fdmviz::charts::evolution;
use fdmviz::config::Paths;
use fdmviz::data::CsvTable;

fn main() -> Result<()> {
    env_logger::init();
    let paths = Paths::from_env();

    let table = CsvTable::load(&paths.input("fokker_planck_equation.csv"))?;

    let out = paths.output("FokkerPlackExampleInit.png");
    evolution::render_initial_snapshot(&table, &out)?;
    info!("saved {}", out.display());

    let out = paths.output("fokkerPlackExample.gif");
    evolution::render_evolution_animation(&table, &out)?;
    info!("saved {}", out.display());

    Ok(())
}
