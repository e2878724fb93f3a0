use serde::Serialize;

use crate::metrics::SimulationResult;
use crate::parameters::ParameterSet;

#[derive(Serialize)]
struct RunRow<'a> {
    parameters: &'a ParameterSet,
    result: &'a SimulationResult,
}

pub(crate) fn export_to_json_impl(
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

    let rows: Vec<RunRow> = parameter_sets
        .iter()
        .zip(results.iter())
        .map(|(parameters, result)| RunRow { parameters, result })
        .collect();

    serde_json::to_writer_pretty(file, &rows)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::export_to_json;
    use crate::parameters::ParameterSet;
    use crate::runner::run_single_simulation;

    #[test]
    fn json_export_round_trips_through_serde() {
        let sets = vec![ParameterSet::default()];
        let results = vec![run_single_simulation(&sets[0])];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.json");
        export_to_json(&results, &sets, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["parameters"]["experiment_id"], "campus-day");
        assert_eq!(
            rows[0]["result"]["no_bike_events"].as_array().unwrap().len(),
            24
        );
    }
}
