//! Service-level scoring: collapses a run's losses into one number so
//! parameter sweeps can be ranked.

use crate::metrics::SimulationResult;

/// Configurable weights for the service-level score.
///
/// The score starts from the fraction of requests served and subtracts
/// weighted loss rates. A no-bike event is a rider turned away, so it
/// defaults to a heavier penalty than a no-parking event, which costs
/// rider time but still ends in a docked bike.
#[derive(Debug, Clone, Copy)]
pub struct ServiceWeights {
    pub no_bike_penalty: f64,
    pub no_parking_penalty: f64,
}

impl Default for ServiceWeights {
    fn default() -> Self {
        Self {
            no_bike_penalty: 1.0,
            no_parking_penalty: 0.4,
        }
    }
}

/// Score a single run. Higher is better; a loss-free run scores 1.0.
pub fn service_score(result: &SimulationResult, weights: &ServiceWeights) -> f64 {
    if result.total_requests == 0 {
        return 1.0;
    }
    let demand = f64::from(result.total_requests);
    let no_bike_rate = f64::from(result.total_no_bike) / demand;
    let no_parking_rate = f64::from(result.total_no_parking) / demand;
    result.service_rate()
        - weights.no_bike_penalty * no_bike_rate
        - weights.no_parking_penalty * no_parking_rate
}

pub fn calculate_service_scores(
    results: &[SimulationResult],
    weights: &ServiceWeights,
) -> Vec<f64> {
    results
        .iter()
        .map(|result| service_score(result, weights))
        .collect()
}

/// Index of the best-scoring result, or `None` for an empty batch.
pub fn find_best_result_index(
    results: &[SimulationResult],
    weights: &ServiceWeights,
) -> Option<usize> {
    calculate_service_scores(results, weights)
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).expect("scores are finite"))
        .map(|(index, _)| index)
}
