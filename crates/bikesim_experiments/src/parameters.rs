//! Parameter variation framework: grid search over scenario knobs.

use serde::{Deserialize, Serialize};

use bikesim_core::scenario::ScenarioParams;

/// Parameter configuration for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSet {
    pub experiment_id: String,
    pub run_id: usize,
    /// Master seed for this run; parallel runs never share a generator.
    pub seed: u64,
    pub max_bikes_per_hub: u32,
    pub initial_bikes_per_hub: u32,
    pub horizon_hours: usize,
    /// Peak of the commuter demand profile, in requests per hour per hub.
    pub demand_peak: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            experiment_id: "campus-day".to_string(),
            run_id: 0,
            seed: 42,
            max_bikes_per_hub: 10,
            initial_bikes_per_hub: 5,
            horizon_hours: 24,
            demand_peak: 4.0,
        }
    }
}

impl ParameterSet {
    pub fn scenario_params(&self) -> ScenarioParams {
        ScenarioParams::default()
            .with_seed(self.seed)
            .with_horizon_hours(self.horizon_hours)
            .with_fleet(self.initial_bikes_per_hub, self.max_bikes_per_hub)
    }
}

/// Independently seeded repetitions of one configuration, for Monte Carlo
/// averaging.
pub fn monte_carlo_sets(base: &ParameterSet, repetitions: usize) -> Vec<ParameterSet> {
    (0..repetitions)
        .map(|run_id| ParameterSet {
            run_id,
            seed: base.seed.wrapping_add(run_id as u64),
            ..base.clone()
        })
        .collect()
}

/// Grid search builder: the cartesian product of the supplied axes, with
/// `repetitions` differently seeded copies of each combination.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    experiment_id: String,
    base_seed: u64,
    repetitions: usize,
    horizon_hours: usize,
    max_bikes: Vec<u32>,
    initial_bikes: Vec<u32>,
    demand_peaks: Vec<f64>,
}

impl ParameterSpace {
    pub fn grid() -> Self {
        Self {
            experiment_id: "grid".to_string(),
            base_seed: 42,
            repetitions: 1,
            horizon_hours: 24,
            max_bikes: vec![10],
            initial_bikes: vec![5],
            demand_peaks: vec![4.0],
        }
    }

    pub fn experiment_id(mut self, id: impl Into<String>) -> Self {
        self.experiment_id = id.into();
        self
    }

    pub fn base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    pub fn repetitions(mut self, repetitions: usize) -> Self {
        self.repetitions = repetitions.max(1);
        self
    }

    pub fn max_bikes_per_hub(mut self, values: Vec<u32>) -> Self {
        self.max_bikes = values;
        self
    }

    pub fn initial_bikes_per_hub(mut self, values: Vec<u32>) -> Self {
        self.initial_bikes = values;
        self
    }

    pub fn demand_peak(mut self, values: Vec<f64>) -> Self {
        self.demand_peaks = values;
        self
    }

    /// Generate all parameter sets. Combinations where the initial fleet
    /// would not fit the racks are skipped.
    pub fn generate(&self) -> Vec<ParameterSet> {
        let mut sets = Vec::new();
        let mut run_id = 0;
        for &max_bikes in &self.max_bikes {
            for &initial_bikes in &self.initial_bikes {
                if initial_bikes > max_bikes {
                    continue;
                }
                for &demand_peak in &self.demand_peaks {
                    for _ in 0..self.repetitions {
                        sets.push(ParameterSet {
                            experiment_id: self.experiment_id.clone(),
                            run_id,
                            seed: self.base_seed.wrapping_add(run_id as u64),
                            max_bikes_per_hub: max_bikes,
                            initial_bikes_per_hub: initial_bikes,
                            horizon_hours: self.horizon_hours,
                            demand_peak,
                        });
                        run_id += 1;
                    }
                }
            }
        }
        sets
    }
}
