//! Parallel simulation execution using rayon.
//!
//! Each run builds its own world from its own seeded generator, so runs
//! share no mutable state and a batch parallelizes embarrassingly.

use bevy_ecs::prelude::World;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use bikesim_core::demand::ProfileDemand;
use bikesim_core::patterns::{campus_choice_model, campus_network, commuter_profile};
use bikesim_core::runner::{initialize_simulation, run_until_empty, simulation_schedule};
use bikesim_core::scenario::build_scenario;

use crate::metrics::{extract_metrics, MonteCarloSummary, SimulationResult};
use crate::parameters::{monte_carlo_sets, ParameterSet};

/// Run a single campus-day simulation with the given parameter set.
pub fn run_single_simulation(param_set: &ParameterSet) -> SimulationResult {
    let mut world = World::new();
    let network = campus_network();
    let num_hubs = network.num_hubs();
    let demand = ProfileDemand::uniform(num_hubs, commuter_profile(param_set.demand_peak))
        .expect("commuter profile is a valid intensity profile");

    build_scenario(
        &mut world,
        param_set.scenario_params(),
        network,
        &demand,
        Box::new(campus_choice_model()),
    )
    .expect("parameter set should build a valid scenario");
    initialize_simulation(&mut world);

    let mut schedule = simulation_schedule();
    let _steps = run_until_empty(&mut world, &mut schedule, 1_000_000);

    extract_metrics(&mut world)
}

/// Run multiple simulations in parallel across available CPU cores.
/// Results come back in the same order as the input parameter sets.
pub fn run_parallel_experiments(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
) -> Vec<SimulationResult> {
    run_parallel_experiments_with_progress(parameter_sets, num_threads, true)
}

/// Same as [`run_parallel_experiments`] with an optional progress bar.
pub fn run_parallel_experiments_with_progress(
    parameter_sets: Vec<ParameterSet>,
    num_threads: Option<usize>,
    show_progress: bool,
) -> Vec<SimulationResult> {
    let total = parameter_sets.len();
    let pb = if show_progress && total > 0 {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(bar)
    } else {
        None
    };

    let pool = {
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = num_threads {
            builder = builder.num_threads(threads);
        }
        builder.build().expect("Failed to create thread pool")
    };

    let pb_clone = pb.clone();
    let results = pool.install(|| {
        parameter_sets
            .par_iter()
            .map(|param_set| {
                let result = run_single_simulation(param_set);
                if let Some(ref progress_bar) = pb_clone {
                    progress_bar.inc(1);
                }
                result
            })
            .collect()
    });

    if let Some(ref progress_bar) = pb {
        progress_bar.finish_with_message("Completed");
    }

    results
}

/// Run `repetitions` independently seeded copies of one configuration and
/// average the hourly loss arrays.
pub fn run_monte_carlo(
    base: &ParameterSet,
    repetitions: usize,
    num_threads: Option<usize>,
) -> MonteCarloSummary {
    let sets = monte_carlo_sets(base, repetitions);
    let results = run_parallel_experiments_with_progress(sets, num_threads, false);
    MonteCarloSummary::from_results(&results)
}
