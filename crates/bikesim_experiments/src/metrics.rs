//! Metrics extraction from simulation results.

use bevy_ecs::prelude::World;

use bikesim_core::ecs::{BikeStock, HourlyDemand};
use bikesim_core::telemetry::{collect_trip_records, SimTelemetry, TripOutcome};

/// Aggregated metrics from a single simulation run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SimulationResult {
    /// No-bike events per hour.
    pub no_bike_events: Vec<u32>,
    /// No-parking events per hour.
    pub no_parking_events: Vec<u32>,
    pub total_no_bike: u32,
    pub total_no_parking: u32,
    /// Requests generated across all hubs and hours.
    pub total_requests: u32,
    pub completed_trips: usize,
    /// Requests refused at an empty hub.
    pub failed_requests: usize,
    /// Trips still riding when the horizon ended.
    pub stranded_trips: usize,
    /// Completed or stranded trips that were redirected at least once.
    pub relocated_trips: usize,
    /// Times a degenerate destination-weight vector was recovered with the
    /// uniform fallback.
    pub uniform_fallbacks: u64,
    /// Per-hub stock at the end of the run.
    pub final_stock: Vec<u32>,
}

impl SimulationResult {
    /// Fraction of requests that ended as completed trips.
    pub fn service_rate(&self) -> f64 {
        if self.total_requests == 0 {
            return 1.0;
        }
        self.completed_trips as f64 / f64::from(self.total_requests)
    }
}

/// Extract metrics from a completed simulation world.
pub fn extract_metrics(world: &mut World) -> SimulationResult {
    let records = collect_trip_records(world);

    let telemetry = world
        .resource::<SimTelemetry>();
    let no_bike_events = telemetry.no_bike_events().to_vec();
    let no_parking_events = telemetry.no_parking_events().to_vec();
    let uniform_fallbacks = telemetry.uniform_fallbacks;

    let completed_trips = records
        .iter()
        .filter(|r| r.outcome == TripOutcome::Completed)
        .count();
    let failed_requests = records
        .iter()
        .filter(|r| r.outcome == TripOutcome::FailedNoBike)
        .count();
    let stranded_trips = records
        .iter()
        .filter(|r| r.outcome == TripOutcome::Stranded)
        .count();
    let relocated_trips = records.iter().filter(|r| r.relocations > 0).count();

    SimulationResult {
        total_no_bike: no_bike_events.iter().sum(),
        total_no_parking: no_parking_events.iter().sum(),
        no_bike_events,
        no_parking_events,
        total_requests: world.resource::<HourlyDemand>().total_requests(),
        completed_trips,
        failed_requests,
        stranded_trips,
        relocated_trips,
        uniform_fallbacks,
        final_stock: world.resource::<BikeStock>().as_slice().to_vec(),
    }
}

/// Hourly loss means over a batch of independently seeded repetitions.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MonteCarloSummary {
    pub repetitions: usize,
    pub mean_no_bike: Vec<f64>,
    pub mean_no_parking: Vec<f64>,
    pub mean_service_rate: f64,
}

impl MonteCarloSummary {
    pub fn from_results(results: &[SimulationResult]) -> Self {
        let repetitions = results.len();
        let horizon = results
            .first()
            .map(|r| r.no_bike_events.len())
            .unwrap_or(0);

        let mut mean_no_bike = vec![0.0; horizon];
        let mut mean_no_parking = vec![0.0; horizon];
        for result in results {
            for hour in 0..horizon {
                mean_no_bike[hour] += f64::from(result.no_bike_events[hour]);
                mean_no_parking[hour] += f64::from(result.no_parking_events[hour]);
            }
        }
        if repetitions > 0 {
            let n = repetitions as f64;
            for hour in 0..horizon {
                mean_no_bike[hour] /= n;
                mean_no_parking[hour] /= n;
            }
        }

        let mean_service_rate = if repetitions > 0 {
            results.iter().map(|r| r.service_rate()).sum::<f64>() / repetitions as f64
        } else {
            0.0
        };

        Self {
            repetitions,
            mean_no_bike,
            mean_no_parking,
            mean_service_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(no_bike: Vec<u32>, no_parking: Vec<u32>, completed: usize, total: u32) -> SimulationResult {
        SimulationResult {
            total_no_bike: no_bike.iter().sum(),
            total_no_parking: no_parking.iter().sum(),
            no_bike_events: no_bike,
            no_parking_events: no_parking,
            total_requests: total,
            completed_trips: completed,
            failed_requests: 0,
            stranded_trips: 0,
            relocated_trips: 0,
            uniform_fallbacks: 0,
            final_stock: vec![],
        }
    }

    #[test]
    fn service_rate_handles_zero_demand() {
        let r = result(vec![0; 24], vec![0; 24], 0, 0);
        assert_eq!(r.service_rate(), 1.0);
    }

    #[test]
    fn monte_carlo_summary_averages_per_hour() {
        let a = result(vec![2, 0], vec![0, 4], 8, 10);
        let b = result(vec![0, 0], vec![0, 2], 10, 10);
        let summary = MonteCarloSummary::from_results(&[a, b]);
        assert_eq!(summary.repetitions, 2);
        assert_eq!(summary.mean_no_bike, vec![1.0, 0.0]);
        assert_eq!(summary.mean_no_parking, vec![0.0, 3.0]);
        assert!((summary.mean_service_rate - 0.9).abs() < 1e-12);
    }
}
