//! Searches random three-variable distributions for examples that separate
//! information measures.
//!
//! Run with `cargo run --example information_measures`.

#[allow(dead_code)]
#[path = "../tests/common/measures.rs"]
mod measures;

use conjecture_find::{
    below, distributions, named, Cell, Distribution, DisplayOptions, ExampleFinder, FindError,
    Settings, Table,
};
use log::{info, LevelFilter};
use measures::{
    broja_redundancy, coinformation, dual_total_correlation, gk_common_information,
    proj_redundancy,
};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

fn summary(d: &Distribution, options: &DisplayOptions) -> String {
    let mut table = Table::new(vec!["measure", "value"]);
    table.add_row(vec![Cell::from("I[X:Y:Z]"), Cell::from(coinformation(d))]);
    table.add_row(vec![Cell::from("B[X:Y:Z]"), Cell::from(dual_total_correlation(d))]);
    table.add_row(vec![Cell::from("G[X:Y:Z]"), Cell::from(gk_common_information(d))]);
    if d.alphabets()[..2].iter().all(|&k| k <= 2) {
        table.add_row(vec![Cell::from("I_BROJA"), Cell::from(broja_redundancy(d))]);
        table.add_row(vec![Cell::from("I_proj"), Cell::from(proj_redundancy(d))]);
    }
    table.render(options)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let options = DisplayOptions::default().with_precision(4);
    let mut finder = ExampleFinder::new(Settings::default().with_seed(2016));

    println!("== coinformation below -0.3 ==");
    let d = finder.find(
        &distributions(3, 2),
        &below("coinformation", coinformation, -0.3),
    )?;
    println!("{}", d);
    println!("{}", summary(&d, &options));
    info!("stats: {:?}", finder.stats());

    println!("== common information above dual total correlation ==");
    let predicate = named("G[X:Y:Z] > B[X:Y:Z]", |d: &Distribution| {
        gk_common_information(d) > dual_total_correlation(d) + 1e-9
    });
    match finder.find(&distributions(3, 3).uniform(true), &predicate) {
        Ok(d) => println!("unexpected example:\n{}", d),
        Err(err @ FindError::NoExampleFound { .. }) => println!("{}\n", err),
        Err(err) => return Err(err.into()),
    }

    println!("== BROJA and Proj redundancy disagree ==");
    let predicate = named("I_BROJA != I_proj", |d: &Distribution| {
        (broja_redundancy(d) - proj_redundancy(d)).abs() > 1e-4
    });
    let d = finder.find(&distributions(3, 2).uniform(true), &predicate)?;
    println!("{}", d);
    println!("{}", summary(&d, &options));
    info!("stats: {:?}", finder.stats());

    Ok(())
}
