use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, UInt32Array, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};

use crate::export::writer_utils::write_record_batch;
use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

/// One row of aggregates per run.
pub fn write_run_summary_parquet<P: AsRef<Path>>(
    path: P,
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
) -> Result<(), Box<dyn Error>> {
    if results.len() != parameter_sets.len() {
        return Err(format!(
            "Results length ({}) doesn't match parameter_sets length ({})",
            results.len(),
            parameter_sets.len()
        )
        .into());
    }

    let n = results.len();
    let mut experiment_ids = Vec::with_capacity(n);
    let mut run_ids = Vec::with_capacity(n);
    let mut seeds = Vec::with_capacity(n);
    let mut demand_peaks = Vec::with_capacity(n);
    let mut total_requests = Vec::with_capacity(n);
    let mut completed_trips = Vec::with_capacity(n);
    let mut total_no_bike = Vec::with_capacity(n);
    let mut total_no_parking = Vec::with_capacity(n);
    let mut service_rates = Vec::with_capacity(n);

    for (result, param_set) in results.iter().zip(parameter_sets.iter()) {
        experiment_ids.push(param_set.experiment_id.clone());
        run_ids.push(param_set.run_id as u64);
        seeds.push(param_set.seed);
        demand_peaks.push(param_set.demand_peak);
        total_requests.push(result.total_requests);
        completed_trips.push(result.completed_trips as u64);
        total_no_bike.push(result.total_no_bike);
        total_no_parking.push(result.total_no_parking);
        service_rates.push(result.service_rate());
    }

    let schema = Schema::new(vec![
        Field::new("experiment_id", DataType::Utf8, false),
        Field::new("run_id", DataType::UInt64, false),
        Field::new("seed", DataType::UInt64, false),
        Field::new("demand_peak", DataType::Float64, false),
        Field::new("total_requests", DataType::UInt32, false),
        Field::new("completed_trips", DataType::UInt64, false),
        Field::new("total_no_bike", DataType::UInt32, false),
        Field::new("total_no_parking", DataType::UInt32, false),
        Field::new("service_rate", DataType::Float64, false),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(experiment_ids)),
        Arc::new(UInt64Array::from(run_ids)),
        Arc::new(UInt64Array::from(seeds)),
        Arc::new(Float64Array::from(demand_peaks)),
        Arc::new(UInt32Array::from(total_requests)),
        Arc::new(UInt64Array::from(completed_trips)),
        Arc::new(UInt32Array::from(total_no_bike)),
        Arc::new(UInt32Array::from(total_no_parking)),
        Arc::new(Float64Array::from(service_rates)),
    ];

    write_record_batch(path, schema, arrays)
}

/// Long-format hourly loss table: one row per `(run, hour)`.
pub fn write_hourly_losses_parquet<P: AsRef<Path>>(
    path: P,
    results: &[SimulationResult],
) -> Result<(), Box<dyn Error>> {
    let mut run_ids = Vec::new();
    let mut hours = Vec::new();
    let mut no_bike = Vec::new();
    let mut no_parking = Vec::new();

    for (run_id, result) in results.iter().enumerate() {
        for hour in 0..result.no_bike_events.len() {
            run_ids.push(run_id as u64);
            hours.push(hour as u32);
            no_bike.push(result.no_bike_events[hour]);
            no_parking.push(result.no_parking_events[hour]);
        }
    }

    let schema = Schema::new(vec![
        Field::new("run_id", DataType::UInt64, false),
        Field::new("hour", DataType::UInt32, false),
        Field::new("no_bike_events", DataType::UInt32, false),
        Field::new("no_parking_events", DataType::UInt32, false),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from(run_ids)),
        Arc::new(UInt32Array::from(hours)),
        Arc::new(UInt32Array::from(no_bike)),
        Arc::new(UInt32Array::from(no_parking)),
    ];

    write_record_batch(path, schema, arrays)
}
