//! Batch experimentation for the bike-share network simulation.
//!
//! This crate runs many simulations in parallel with varying parameters,
//! extracts hourly loss metrics, averages Monte Carlo repetitions and
//! exports results for analysis.
//!
//! # Quick Start
//!
//! ```no_run
//! use bikesim_experiments::{
//!     find_best_result_index, run_parallel_experiments, ParameterSpace, ServiceWeights,
//! };
//!
//! // Define parameter space (grid search)
//! let space = ParameterSpace::grid()
//!     .initial_bikes_per_hub(vec![3, 5, 7])
//!     .demand_peak(vec![2.0, 4.0, 6.0])
//!     .repetitions(10);
//!
//! // Run experiments in parallel
//! let parameter_sets = space.generate();
//! let results = run_parallel_experiments(parameter_sets, None);
//!
//! // Rank configurations by service level
//! let weights = ServiceWeights::default();
//! let best_idx = find_best_result_index(&results, &weights).unwrap();
//! ```
//!
//! # Architecture
//!
//! - [`parameters`]: parameter grids and Monte Carlo seed derivation
//! - [`runner`]: parallel simulation execution using rayon
//! - [`metrics`]: metrics extraction from finished worlds
//! - [`service`]: service-level scoring of results
//! - [`export`]: result export to CSV/JSON/Parquet

pub mod export;
pub mod metrics;
pub mod parameters;
pub mod runner;
pub mod service;

pub use export::{export_to_csv, export_to_json, export_to_parquet};
pub use metrics::{MonteCarloSummary, SimulationResult};
pub use parameters::{monte_carlo_sets, ParameterSet, ParameterSpace};
pub use runner::{run_monte_carlo, run_parallel_experiments, run_single_simulation};
pub use service::{calculate_service_scores, find_best_result_index, ServiceWeights};
