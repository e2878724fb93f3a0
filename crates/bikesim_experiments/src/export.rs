//! Result export to CSV, JSON and Parquet.

pub mod csv;
pub mod json;
pub mod parquet;
mod writer_utils;

use std::error::Error;
use std::fs::File;
use std::path::Path;

use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

/// Write one CSV row of aggregates per run.
pub fn export_to_csv<P: AsRef<Path>>(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    path: P,
) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    csv::export_to_csv_impl(results, parameter_sets, file)
}

/// Write the full parameter/result pairs as a JSON array.
pub fn export_to_json<P: AsRef<Path>>(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    path: P,
) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    json::export_to_json_impl(results, parameter_sets, file)
}

/// Write per-run aggregates as a Parquet table.
pub fn export_to_parquet<P: AsRef<Path>>(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    path: P,
) -> Result<(), Box<dyn Error>> {
    parquet::write_run_summary_parquet(path, results, parameter_sets)
}
