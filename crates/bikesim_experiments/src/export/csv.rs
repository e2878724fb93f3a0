use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

pub(crate) fn export_to_csv_impl(
    results: &[SimulationResult],
    parameter_sets: &[ParameterSet],
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    if results.len() != parameter_sets.len() {
        return Err(format!(
            "Results length ({}) doesn't match parameter_sets length ({})",
            results.len(),
            parameter_sets.len()
        )
        .into());
    }

    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "experiment_id",
        "run_id",
        "seed",
        "max_bikes_per_hub",
        "initial_bikes_per_hub",
        "horizon_hours",
        "demand_peak",
        "total_requests",
        "completed_trips",
        "failed_requests",
        "stranded_trips",
        "relocated_trips",
        "total_no_bike",
        "total_no_parking",
        "uniform_fallbacks",
        "service_rate",
    ])?;

    for (result, param_set) in results.iter().zip(parameter_sets.iter()) {
        wtr.write_record([
            &param_set.experiment_id,
            &param_set.run_id.to_string(),
            &param_set.seed.to_string(),
            &param_set.max_bikes_per_hub.to_string(),
            &param_set.initial_bikes_per_hub.to_string(),
            &param_set.horizon_hours.to_string(),
            &param_set.demand_peak.to_string(),
            &result.total_requests.to_string(),
            &result.completed_trips.to_string(),
            &result.failed_requests.to_string(),
            &result.stranded_trips.to_string(),
            &result.relocated_trips.to_string(),
            &result.total_no_bike.to_string(),
            &result.total_no_parking.to_string(),
            &result.uniform_fallbacks.to_string(),
            &result.service_rate().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::export_to_csv;
    use crate::parameters::ParameterSet;
    use crate::runner::run_single_simulation;

    #[test]
    fn csv_export_writes_header_and_rows() {
        let sets = vec![ParameterSet::default()];
        let results = vec![run_single_simulation(&sets[0])];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.csv");
        export_to_csv(&results, &sets, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("experiment_id,run_id,seed"));
        assert!(header.contains("total_no_bike"));
        assert_eq!(lines.count(), 1);
        assert!(contents.contains("campus-day"));
    }

    #[test]
    fn csv_export_rejects_mismatched_lengths() {
        let sets = vec![ParameterSet::default()];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.csv");
        let err = export_to_csv(&[], &sets, &path);
        assert!(err.is_err());
    }
}
