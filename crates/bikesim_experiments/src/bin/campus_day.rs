//! Monte Carlo batch over the default campus scenario.
//!
//! Usage: campus_day [REPETITIONS] [CSV_PATH]
//!
//! Runs REPETITIONS independently seeded days (default 200), prints the
//! mean hourly loss table, and optionally writes the per-run aggregates
//! to CSV_PATH.

use std::env;
use std::error::Error;

use bikesim_experiments::{
    export_to_csv, monte_carlo_sets, run_parallel_experiments, MonteCarloSummary, ParameterSet,
};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let repetitions: usize = env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(200);
    let csv_path = env::args().nth(2);

    let base = ParameterSet::default();
    let sets = monte_carlo_sets(&base, repetitions);
    let results = run_parallel_experiments(sets.clone(), None);
    let summary = MonteCarloSummary::from_results(&results);

    println!(
        "{} runs, capacity {}, {} bikes/hub, demand peak {}/h",
        summary.repetitions, base.max_bikes_per_hub, base.initial_bikes_per_hub, base.demand_peak
    );
    println!("hour  mean no-bike  mean no-parking");
    for hour in 0..summary.mean_no_bike.len() {
        println!(
            "{hour:>4}  {:>12.3}  {:>15.3}",
            summary.mean_no_bike[hour], summary.mean_no_parking[hour]
        );
    }
    println!("mean service rate: {:.4}", summary.mean_service_rate);

    if let Some(path) = csv_path {
        export_to_csv(&results, &sets, &path)?;
        println!("per-run aggregates written to {path}");
    }

    Ok(())
}
